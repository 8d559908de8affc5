
// imports
use crate::config::JsonTypes;
use crate::cooccurrence::build_semantic_descriptors_from_files;
use crate::errors::SimilarityError;
use crate::evaluate::{run_similarity_test, SimilarityReport};

use std::time::Instant;
use env_logger::Builder;
use log::{info, warn, LevelFilter};
use rayon::ThreadPoolBuilder;


/// Outcome of one configured corpus run. A failed evaluation, e.g. a test word the
/// corpus never saw, is kept here instead of stopping the remaining runs.
#[derive(Debug)]
pub struct RunSummary {
    pub name: String,
    pub vocabulary: usize,
    pub report: Result<SimilarityReport, SimilarityError>
}

pub struct Pipeline {}

impl Pipeline {

    // runs every configured corpus through 2 steps -
    // -> descriptors building
    // -> similarity test against the answer file

    pub fn run(params: &JsonTypes) -> Result<Vec<RunSummary>, SimilarityError> {

        info!("{}", params);
        let pool = ThreadPoolBuilder::new().num_threads(params.num_threads).build()?;

        let mut summaries = Vec::new();
        for run in &params.runs {

            let timer = Instant::now();
            info!("building descriptors for run '{}' from {:?}...", run.name, run.corpus_files);
            let descriptors = pool.install(|| build_semantic_descriptors_from_files(run.corpus_files.as_slice()))?;
            info!("run '{}': {} words with descriptors, took {} seconds", run.name, descriptors.len(), timer.elapsed().as_secs());

            let report = run_similarity_test(&params.test_file, &descriptors, &params.metric);
            match &report {
                Ok(report) => info!("run '{}': accuracy {}", run.name, report),
                Err(e) => warn!("run '{}': test failed, {}", run.name, e)
            }

            summaries.push(RunSummary { name: run.name.to_owned(), vocabulary: descriptors.len(), report });
        }

        Ok(summaries)
    }

}

/// Logging for the binaries, `debug`, `info` or `warn` for this crate, anything else defers to `RUST_LOG`.
pub fn init_logger(log_level: &str) {
    let level = match log_level {
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        _ => {
            env_logger::init();
            return
        }
    };
    Builder::new()
    .filter(None, LevelFilter::Off)
    .filter(Some("semantic_similarity"), level)
    .filter(Some("nearest"), level)
    .init();
}
