
use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;
use std::str::FromStr;
use ndarray::Array1;
use crate::errors::SimilarityError;

/// Word -> count. Missing keys count as zero.
pub type SparseVector = HashMap<String, usize>;

/// Returned whenever one of the compared vectors has a zero norm. It is lower than
/// any defined cosine score, so evaluation treats it as the worst possible match.
pub const UNDEFINED_SIMILARITY: f64 = -1.0;


/// Euclidean norm of a sparse vector, 0 for a vector with no keys.
pub fn norm(vec: &SparseVector) -> f64 {
    let sum_of_squares: f64 = vec.values().map(|v| (*v as f64) * (*v as f64)).sum();
    sum_of_squares.sqrt()
}

// sorted union of the keys of both vectors, the common axis for the dense form
fn key_union<'a>(vec1: &'a SparseVector, vec2: &'a SparseVector) -> Vec<&'a str> {
    vec1.keys()
    .chain(vec2.keys())
    .map(|k| k.as_str())
    .collect::<BTreeSet<&str>>()
    .into_iter()
    .collect()
}

/// Expands a sparse vector over `keys`, absent words become 0.
pub fn convert_sparse_to_full(vec: &SparseVector, keys: &[&str]) -> Array1<f64> {
    keys.iter().map(|k| *vec.get(*k).unwrap_or(&0) as f64).collect()
}

/// Cosine of the angle between two count vectors, or [`UNDEFINED_SIMILARITY`]
/// when either of them is empty or all zero.
pub fn cosine_similarity(vec1: &SparseVector, vec2: &SparseVector) -> f64 {

    // both vectors must be laid out over the identical key set before the dot product
    let keys = key_union(vec1, vec2);
    let full_vec1 = convert_sparse_to_full(vec1, &keys);
    let full_vec2 = convert_sparse_to_full(vec2, &keys);
    let dot_product = full_vec1.dot(&full_vec2);

    let norms = norm(vec1) * norm(vec2);
    if norms == 0.0 {
        return UNDEFINED_SIMILARITY
    }
    dot_product / norms
}

/// Weighted jaccard: sum of elementwise minimums over sum of elementwise maximums.
pub fn jaccard_similarity(vec1: &SparseVector, vec2: &SparseVector) -> f64 {

    if norm(vec1) * norm(vec2) == 0.0 {
        return UNDEFINED_SIMILARITY
    }

    let keys = key_union(vec1, vec2);
    let full_vec1 = convert_sparse_to_full(vec1, &keys);
    let full_vec2 = convert_sparse_to_full(vec2, &keys);
    let mins = full_vec1.iter().zip(full_vec2.iter()).map(|(a, b)| a.min(*b)).sum::<f64>();
    let maxs = full_vec1.iter().zip(full_vec2.iter()).map(|(a, b)| a.max(*b)).sum::<f64>();
    mins / maxs
}

/// Maps the euclidean distance into (0, 1] as `1 / (1 + distance)`.
pub fn euclidean_similarity(vec1: &SparseVector, vec2: &SparseVector) -> f64 {

    if norm(vec1) * norm(vec2) == 0.0 {
        return UNDEFINED_SIMILARITY
    }

    let keys = key_union(vec1, vec2);
    let diff = convert_sparse_to_full(vec1, &keys) - convert_sparse_to_full(vec2, &keys);
    let distance = diff.mapv(|a| a.powi(2)).sum().sqrt();
    1.0 / (1.0 + distance)
}


/// Scores how alike two descriptors are, higher is more similar.
pub trait SimilarityMetric {
    fn similarity(&self, vec1: &SparseVector, vec2: &SparseVector) -> f64;
}

impl<F> SimilarityMetric for F
where
    F: Fn(&SparseVector, &SparseVector) -> f64 {
    fn similarity(&self, vec1: &SparseVector, vec2: &SparseVector) -> f64 {
        self(vec1, vec2)
    }
}


/// The metrics that can be selected by name from the configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    Cosine,
    Jaccard,
    Euclidean
}

impl SimilarityMetric for Metric {
    fn similarity(&self, vec1: &SparseVector, vec2: &SparseVector) -> f64 {
        match self {
            Metric::Cosine => cosine_similarity(vec1, vec2),
            Metric::Jaccard => jaccard_similarity(vec1, vec2),
            Metric::Euclidean => euclidean_similarity(vec1, vec2)
        }
    }
}

impl FromStr for Metric {
    type Err = SimilarityError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cosine" => Ok(Metric::Cosine),
            "jaccard" => Ok(Metric::Jaccard),
            "euclidean" => Ok(Metric::Euclidean),
            other => Err(SimilarityError::Config(format!("unrecognized metric {}", other)))
        }
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Metric::Cosine => "cosine",
            Metric::Jaccard => "jaccard",
            Metric::Euclidean => "euclidean"
        };
        write!(f, "{}", name)
    }
}
