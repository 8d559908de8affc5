
mod errors;
mod similarity;
mod cooccurrence;
mod evaluate;
mod config;
mod pipeline;

pub use errors::SimilarityError;
pub use similarity::{
    norm, convert_sparse_to_full, cosine_similarity, jaccard_similarity, euclidean_similarity,
    Metric, SimilarityMetric, SparseVector, UNDEFINED_SIMILARITY
};
pub use cooccurrence::{
    build_semantic_descriptors, build_semantic_descriptors_from_files, sentence_word_counts,
    Corpus, DescriptorTable, Descriptors, Tokenizer
};
pub use evaluate::{evaluate_cases, most_similar_word, run_similarity_test, SimilarityReport, TestCase};
pub use config::{Config, CorpusRun, JsonTypes};
pub use pipeline::{init_logger, Pipeline, RunSummary};
