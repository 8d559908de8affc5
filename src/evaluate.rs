
use crate::cooccurrence::{split_tokens, Corpus, Descriptors};
use crate::errors::SimilarityError;
use crate::similarity::SimilarityMetric;

use std::fmt::Display;
use std::path::Path;
use log::{debug, info};


/// One line of an answer file: `word correct_answer choice_1 ... choice_n`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    pub word: String,
    pub answer: String,
    pub choices: Vec<String>
}

impl TestCase {

    /// `line_number` is 1-based and only used for error reporting.
    pub fn parse_line(line: &str, line_number: usize) -> Result<TestCase, SimilarityError> {

        let tokens: Vec<&str> = split_tokens(line).collect();
        if tokens.len() < 3 {
            return Err(SimilarityError::MalformedInput { line: line_number, content: line.trim().to_owned() });
        }

        Ok(TestCase {
            word: tokens[0].to_owned(),
            answer: tokens[1].to_owned(),
            choices: tokens[2..].iter().map(|x| x.to_string()).collect()
        })
    }

    pub fn read_file<P: AsRef<Path>>(file_path: P) -> Result<Vec<TestCase>, SimilarityError> {
        let text = Corpus::read_file(file_path)?;
        text.lines()
        .enumerate()
        .map(|(i, line)| TestCase::parse_line(line, i + 1))
        .collect()
    }

}


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimilarityReport {
    correct: usize,
    total: usize
}

impl SimilarityReport {

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// `100 * correct / total`. Reports only come out of an evaluation of at least one case.
    pub fn percentage(&self) -> f64 {
        100.0 * self.correct as f64 / self.total as f64
    }
}

impl Display for SimilarityReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}% ({}/{})", self.percentage(), self.correct, self.total)
    }
}


/// Picks the choice whose descriptor is most similar to the descriptor of `word`.
///
/// The first choice is the starting best and only a strictly greater score replaces the
/// current best, so among equal scores the earliest choice wins. Every word involved must
/// have a descriptor, an unknown word is a `MissingKey` error rather than an empty vector.
pub fn most_similar_word<'a, M>(word: &str, choices: &'a [String], descriptors: &Descriptors, similarity_fn: &M) -> Result<&'a str, SimilarityError>
where
    M: SimilarityMetric + ?Sized {

    let (first, rest) = choices
    .split_first()
    .ok_or_else(|| SimilarityError::EmptyChoiceSet(word.to_owned()))?;

    let vec1 = descriptors.get(word)?;
    let mut best_choice = first.as_str();
    let mut best_score = similarity_fn.similarity(vec1, descriptors.get(first)?);
    debug!("{} ? {} = {}", word, first, best_score);

    for choice in rest {
        let score = similarity_fn.similarity(vec1, descriptors.get(choice)?);
        debug!("{} ? {} = {}", word, choice, score);
        if score > best_score {
            best_score = score;
            best_choice = choice.as_str();
        }
    }

    Ok(best_choice)
}

/// Answers every test case of the file and counts the correct answers.
/// A file with no test cases is an `EmptyTestSet` error.
pub fn run_similarity_test<P, M>(filename: P, descriptors: &Descriptors, similarity_fn: &M) -> Result<SimilarityReport, SimilarityError>
where
    P: AsRef<Path>,
    M: SimilarityMetric + ?Sized {

    let cases = TestCase::read_file(filename.as_ref())?;
    if cases.is_empty() {
        return Err(SimilarityError::EmptyTestSet(filename.as_ref().display().to_string()));
    }
    evaluate_cases(&cases, descriptors, similarity_fn)
}

pub fn evaluate_cases<M>(cases: &[TestCase], descriptors: &Descriptors, similarity_fn: &M) -> Result<SimilarityReport, SimilarityError>
where
    M: SimilarityMetric + ?Sized {

    if cases.is_empty() {
        return Err(SimilarityError::EmptyTestSet("<in memory>".to_owned()));
    }

    let mut correct = 0;
    for case in cases {
        let guess = most_similar_word(&case.word, &case.choices, descriptors, similarity_fn)?;
        if guess == case.answer {
            correct += 1;
        } else {
            debug!("{}: guessed '{}', expected '{}'", case.word, guess, case.answer);
        }
    }

    let report = SimilarityReport { correct, total: cases.len() };
    info!("answered {} of {} test cases correctly", report.correct, report.total);
    Ok(report)
}
