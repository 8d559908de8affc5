
// imports
use crate::errors::SimilarityError;
use crate::similarity::{SimilarityMetric, SparseVector};

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::time::Instant;
use log::{debug, info};
use rayon::prelude::*;

/// Word -> descriptor of that word.
pub type DescriptorTable = HashMap<String, SparseVector>;

const SENTENCE_SEPARATORS: [char; 3] = ['.', '!', '?'];
const SENTENCE_PUNCTUATION: [&str; 5] = [",", "-", "--", ";", ":"];


/// Counts every word of `sentence` except `target_word`. All occurrences of the target
/// are skipped, every other occurrence counts once.
pub fn sentence_word_counts(sentence: &[String], target_word: &str) -> SparseVector {
    let mut word_counts = SparseVector::new();
    for word in sentence.iter().filter(|w| w.as_str() != target_word) {
        *word_counts.entry(word.to_owned()).or_insert(0) += 1;
    }
    word_counts
}

/// Builds the co-occurrence descriptor of every distinct word found in `sentences`.
pub fn build_semantic_descriptors(sentences: &[Vec<String>]) -> Descriptors {
    Descriptors::build(sentences)
}

/// Reads, tokenizes and concatenates the sentences of all files, then builds one table.
pub fn build_semantic_descriptors_from_files<P: AsRef<Path>>(filenames: &[P]) -> Result<Descriptors, SimilarityError> {
    let sentences = Corpus::load(filenames)?;
    Ok(Descriptors::build(&sentences))
}


/// Immutable table of descriptors, created once per corpus and only read afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Descriptors {
    table: DescriptorTable
}

impl Descriptors {

    // adds the contribution of one sentence to a partial table. Every distinct word of the
    // sentence gets an entry even if the sentence holds nothing else to count.
    fn accumulate(table: &mut DescriptorTable, sentence: &[String]) {
        let distinct: HashSet<&String> = sentence.iter().collect();
        for word in distinct {
            let counts = sentence_word_counts(sentence, word);
            let descriptor = table.entry(word.to_owned()).or_default();
            for (other, count) in counts {
                *descriptor.entry(other).or_insert(0) += count;
            }
        }
    }

    // key-wise addition of two partial tables
    fn add_tables(left: DescriptorTable, right: DescriptorTable) -> DescriptorTable {
        let (mut larger, smaller) = if left.len() >= right.len() { (left, right) } else { (right, left) };
        for (word, vec) in smaller {
            let descriptor = larger.entry(word).or_default();
            for (other, count) in vec {
                *descriptor.entry(other).or_insert(0) += count;
            }
        }
        larger
    }

    pub fn build(sentences: &[Vec<String>]) -> Descriptors {

        // each rayon worker folds its share of the sentences into a partial table,
        // the partial tables are then summed key by key
        let timer = Instant::now();
        let table = sentences
        .par_iter()
        .fold(DescriptorTable::new, |mut table, sentence| {
            Descriptors::accumulate(&mut table, sentence);
            table
        })
        .reduce(DescriptorTable::new, Descriptors::add_tables);

        info!("built {} descriptors from {} sentences in {} ms", table.len(), sentences.len(), timer.elapsed().as_millis());
        Descriptors { table }
    }

    /// Key-wise sum of two tables, the same table a build over both sentence lists gives.
    pub fn merge(self, other: Descriptors) -> Descriptors {
        Descriptors { table: Descriptors::add_tables(self.table, other.table) }
    }

    pub fn get(&self, word: &str) -> Result<&SparseVector, SimilarityError> {
        self.table.get(word).ok_or_else(|| SimilarityError::MissingKey(word.to_owned()))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.table.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The `k` words most similar to `word`, best first, the word itself excluded.
    /// Equal scores are ordered alphabetically.
    pub fn find_k_most_similar<M>(&self, word: &str, k: usize, metric: &M) -> Result<Vec<(String, f64)>, SimilarityError>
    where
        M: SimilarityMetric + ?Sized {

        let descriptor = self.get(word)?;
        let mut scores: Vec<(&String, f64)> = self.table
        .iter()
        .filter(|(other, _)| other.as_str() != word)
        .map(|(other, vec)| (other, metric.similarity(descriptor, vec)))
        .collect();

        // sort by most similar in descending order
        scores.sort_by(|(w1, s1), (w2, s2)| s2.total_cmp(s1).then_with(|| w1.cmp(w2)));
        scores.truncate(k);

        Ok(scores.into_iter().map(|(w, s)| (w.to_owned(), s)).collect())
    }

}


pub struct Corpus {}

impl Corpus {

    /// Reads a file as latin-1, every byte is one character so decoding never fails.
    pub fn read_file<P: AsRef<Path>>(file_path: P) -> Result<String, SimilarityError> {
        let bytes = fs::read(file_path.as_ref())?;
        Ok(bytes.iter().map(|b| *b as char).collect())
    }

    /// Lower cases the text and cuts it into tokenized sentences, empty ones are dropped.
    pub fn split_sentences(text: &str) -> Vec<Vec<String>> {
        text.to_lowercase()
        .split(SENTENCE_SEPARATORS)
        .map(Corpus::tokenize)
        .filter(|sentence| !sentence.is_empty())
        .collect()
    }

    /// Sentences of all files in order, as one sequence.
    pub fn load<P: AsRef<Path>>(filenames: &[P]) -> Result<Vec<Vec<String>>, SimilarityError> {

        let mut all_sentences = Vec::new();
        for filename in filenames {
            let text = Corpus::read_file(filename)?;
            let sentences = Corpus::split_sentences(&text);
            debug!("{}: {} sentences", filename.as_ref().display(), sentences.len());
            all_sentences.extend(sentences);
        }

        info!("loaded {} sentences from {} files", all_sentences.len(), filenames.len());
        Ok(all_sentences)
    }

}


// defines the behavior needed for tokenizing a sentence
pub trait Tokenizer {
    fn tokenize(sequence: &str) -> Vec<String>;
}

impl Tokenizer for Corpus {
    // secondary punctuation becomes a space, then split on whitespace
    fn tokenize(sequence: &str) -> Vec<String> {
        let mut cleaned = sequence.to_string();
        for punctuation in SENTENCE_PUNCTUATION {
            cleaned = cleaned.replace(punctuation, " ");
        }
        split_tokens(&cleaned).map(|x| x.to_string()).collect()
    }
}

/// Splits on unicode whitespace and on the ascii separators `\x1c`..=`\x1f`, dropping empty pieces.
pub fn split_tokens(text: &str) -> impl Iterator<Item = &str> {
    text
    .split(|c: char| c.is_whitespace() || ('\x1c'..='\x1f').contains(&c))
    .filter(|token| !token.is_empty())
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::similarity::cosine_similarity;
    use std::io::Write;
    use rayon::ThreadPoolBuilder;
    use tempfile::NamedTempFile;

    fn sentences(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter().map(|s| s.iter().map(|w| w.to_string()).collect()).collect()
    }

    fn vector(entries: &[(&str, usize)]) -> SparseVector {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn corpus_file(content: &[u8]) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn sentence_counts_skip_every_target_occurrence() {
        let sentence = sentences(&[&["a", "b", "a", "c", "b"]]).remove(0);
        assert_eq!(sentence_word_counts(&sentence, "a"), vector(&[("b", 2), ("c", 1)]));
        assert_eq!(sentence_word_counts(&sentence, "b"), vector(&[("a", 2), ("c", 1)]));
        assert_eq!(sentence_word_counts(&sentence, "z"), vector(&[("a", 2), ("b", 2), ("c", 1)]));
    }

    #[test]
    fn descriptors_golden_example() {

        // the repeated "a" is processed once as a target, and "b" occurs once next to it
        let descriptors = build_semantic_descriptors(&sentences(&[&["a", "b", "a"], &["b", "c"]]));

        assert_eq!(descriptors.len(), 3);
        assert_eq!(descriptors.get("a").unwrap(), &vector(&[("b", 1)]));
        assert_eq!(descriptors.get("b").unwrap(), &vector(&[("a", 2), ("c", 1)]));
        assert_eq!(descriptors.get("c").unwrap(), &vector(&[("b", 1)]));
    }

    #[test]
    fn lone_word_gets_empty_descriptor() {
        let descriptors = build_semantic_descriptors(&sentences(&[&["alone"], &["x", "y"]]));
        assert!(descriptors.contains("alone"));
        assert!(descriptors.get("alone").unwrap().is_empty());
    }

    #[test]
    fn missing_word_is_an_error() {
        let descriptors = build_semantic_descriptors(&sentences(&[&["x", "y"]]));
        match descriptors.get("z") {
            Err(SimilarityError::MissingKey(word)) => assert_eq!(word, "z"),
            other => panic!("expected missing key, got {:?}", other)
        }
    }

    #[test]
    fn build_does_not_depend_on_thread_count_or_order() {

        let raw = sentences(&[
            &["the", "cat", "sat", "on", "the", "mat"],
            &["the", "dog", "sat"],
            &["a", "cat", "and", "a", "dog"],
            &["mat", "mat", "mat"],
            &["on", "and", "on"],
        ]);
        let single = ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        let many = ThreadPoolBuilder::new().num_threads(4).build().unwrap();

        let sequential = single.install(|| build_semantic_descriptors(&raw));
        let parallel = many.install(|| build_semantic_descriptors(&raw));
        let mut reversed = raw.clone();
        reversed.reverse();
        let reversed = many.install(|| build_semantic_descriptors(&reversed));

        assert_eq!(sequential, parallel);
        assert_eq!(sequential, reversed);
        assert_eq!(sequential.get("the").unwrap(), &vector(&[("cat", 1), ("sat", 2), ("on", 1), ("mat", 1), ("dog", 1)]));
        assert_eq!(sequential.get("mat").unwrap(), &vector(&[("the", 2), ("cat", 1), ("sat", 1), ("on", 1)]));
    }

    #[test]
    fn counts_are_additive_across_corpora() {

        let first = sentences(&[&["a", "b"], &["b", "c", "c"]]);
        let second = sentences(&[&["c", "a"], &["d"], &["a", "b", "b"]]);
        let mut both = first.clone();
        both.extend(second.clone());

        let merged = build_semantic_descriptors(&first).merge(build_semantic_descriptors(&second));
        assert_eq!(merged, build_semantic_descriptors(&both));
        assert_eq!(merged.get("a").unwrap(), &vector(&[("b", 3), ("c", 1)]));
    }

    #[test]
    fn tokenizer_strips_secondary_punctuation() {
        assert_eq!(Corpus::tokenize(" well, well--so; it: goes-on "), vec!["well", "well", "so", "it", "goes", "on"]);
        assert!(Corpus::tokenize(" ,;: -- ").is_empty());
    }

    #[test]
    fn ascii_separators_split_tokens() {
        assert_eq!(Corpus::split_sentences("a\x1fb c"), sentences(&[&["a", "b", "c"]]));
        assert_eq!(Corpus::tokenize("\x1cx\x1dy\x1e\u{a0}z\u{85}"), vec!["x", "y", "z"]);
    }

    #[test]
    fn split_sentences_on_terminators() {
        let text = "The Cat sat. The DOG ran!  Why?? ... Lone,word";
        assert_eq!(Corpus::split_sentences(text), sentences(&[
            &["the", "cat", "sat"],
            &["the", "dog", "ran"],
            &["why"],
            &["lone", "word"],
        ]));
    }

    #[test]
    fn files_are_read_as_latin1() {

        // 0xC9 is 'É' in latin-1 and invalid as a standalone utf-8 byte
        let f = corpus_file(b"Caf\xC9 noir. caf\xE9 au lait");
        let sentences_read = Corpus::load(&[f.path()]).unwrap();
        assert_eq!(sentences_read, sentences(&[&["café", "noir"], &["café", "au", "lait"]]));
    }

    #[test]
    fn files_are_concatenated() {

        let f1 = corpus_file(b"King man. Queen woman!");
        let f2 = corpus_file(b"king, queen? man");
        let descriptors = build_semantic_descriptors_from_files(&[f1.path(), f2.path()]).unwrap();

        assert_eq!(descriptors.len(), 4);
        assert_eq!(descriptors.get("king").unwrap(), &vector(&[("man", 1), ("queen", 1)]));
        assert_eq!(descriptors.get("man").unwrap(), &vector(&[("king", 1)]));

        let separate = build_semantic_descriptors_from_files(&[f1.path()]).unwrap()
        .merge(build_semantic_descriptors_from_files(&[f2.path()]).unwrap());
        assert_eq!(descriptors, separate);
    }

    #[test]
    fn missing_file_propagates_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        match build_semantic_descriptors_from_files(&[missing]) {
            Err(SimilarityError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected io error, got {:?}", other)
        }
    }

    #[test]
    fn k_most_similar_ranking() {

        let descriptors = build_semantic_descriptors(&sentences(&[
            &["cat", "purrs", "softly"],
            &["kitten", "purrs", "softly"],
            &["dog", "barks", "loudly"],
        ]));

        let ranking = descriptors.find_k_most_similar("cat", 2, &cosine_similarity).unwrap();
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].0, "kitten");
        assert!((ranking[0].1 - 1.0).abs() < 1e-12);
        assert!(ranking.iter().all(|(w, _)| w != "cat"));

        assert!(descriptors.find_k_most_similar("lion", 2, &cosine_similarity).is_err());
    }
}
