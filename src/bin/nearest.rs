
use std::{env, process};
use log::{error, info};
use semantic_similarity::{build_semantic_descriptors_from_files, init_logger, Corpus, Descriptors, Metric, SimilarityError};


// prints the k most similar words to each query word, using cosine similarity
// between co-occurrence descriptors built from the given corpus files.
// treated as binary executable so it can be ran independently from main

fn main() {

    // arguments to this executable should be:
    // k, the number of neighbours to print
    // path to a file with one query word per line
    // one or more corpus files
    // example: ... 10 Input/words.txt Input/sw.txt Input/wp.txt
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("usage: nearest <k> <words_file> <corpus_file>...");
        process::exit(2);
    }
    let k: usize = match args[1].parse() {
        Ok(k) => k,
        Err(e) => {
            eprintln!("k should be a non negative integer, got '{}': {}", args[1], e);
            process::exit(2)
        }
    };
    init_logger("info");

    if let Err(e) = run(k, &args[2], &args[3..]) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(k: usize, words_file: &str, corpus_files: &[String]) -> Result<(), SimilarityError> {

    let descriptors = build_semantic_descriptors_from_files(corpus_files)?;
    info!("{} words with descriptors", descriptors.len());

    let text = Corpus::read_file(words_file)?;
    let queries = text.lines().map(str::trim).filter(|line| !line.is_empty());
    for token in queries {
        run_similarity(token, k, &descriptors)?;
    }
    Ok(())
}

fn run_similarity(token: &str, k: usize, descriptors: &Descriptors) -> Result<(), SimilarityError> {

    println!("searching {} most similar words to {}", k, token);
    match descriptors.find_k_most_similar(token, k, &Metric::Cosine) {
        Ok(similarities) => {
            for (i, (similar_token, score)) in similarities.iter().enumerate() {
                println!("{} : {} ? {} = {:.4}", i, token, similar_token, score);
            }
        },
        // unknown words are reported and skipped, other errors stop the run
        Err(SimilarityError::MissingKey(word)) => println!("'{}' is not in the corpus", word),
        Err(e) => return Err(e)
    }
    println!();
    Ok(())
}
