use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimilarityError {
    #[error("malformed test line {line}: '{content}' (expected: word answer choice...)")]
    MalformedInput { line: usize, content: String },

    #[error("word '{0}' has no descriptor, it never appeared in the corpus")]
    MissingKey(String),

    #[error("no choices were given for word '{0}'")]
    EmptyChoiceSet(String),

    #[error("test file {0} holds no test cases, accuracy is undefined")]
    EmptyTestSet(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
