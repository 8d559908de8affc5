
use serde::Deserialize;
use serde_json::Value;
use std::{fs::File, fmt::Display, io::BufReader};
use crate::errors::SimilarityError;
use crate::similarity::Metric;


/// One descriptor table to build and evaluate, e.g. `{"name": "both", "corpus_files": ["sw.txt", "wp.txt"]}`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CorpusRun {
    pub name: String,
    pub corpus_files: Vec<String>
}

#[derive(Clone, Debug)]
pub struct JsonTypes {
    pub test_file: String,
    pub runs: Vec<CorpusRun>,
    pub metric: Metric,
    pub num_threads: usize,
    pub log_level: String
}

impl Display for JsonTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let runs = self.runs
        .iter()
        .map(|run| format!("{} {:?}", run.name, run.corpus_files))
        .collect::<Vec<String>>()
        .join(", ");
        write!(f, "using parameters:
        test_file: {}
        runs: {}
        metric: {}
        num_threads: {}
        log_level: {}",
        self.test_file, runs, self.metric, self.num_threads, self.log_level)
    }
}

pub struct Config {
    params: JsonTypes
}

impl Config {

    pub fn get_params(&self) -> JsonTypes {
        self.params.clone()
    }

    pub fn new(args: &[String]) -> Result<Config, SimilarityError> {

        if args.len() != 2 {
            return Err(SimilarityError::Config("input should be a path to json file only".to_owned()));
        }

        // parse input json
        let f = BufReader::new(File::open(&args[1])?);
        let json: Value = serde_json::from_reader(f)?;
        Config::from_json(&json)
    }

    pub fn from_json(json: &Value) -> Result<Config, SimilarityError> {

        // validate the required fields
        let test_file = match json.get("test_file") {
            Some(test_file) => test_file.as_str().ok_or_else(|| invalid("test_file", "a string"))?,
            None => return Err(SimilarityError::Config("test_file was not supplied through json".to_owned()))
        };
        let runs: Vec<CorpusRun> = match json.get("runs") {
            Some(runs) => serde_json::from_value(runs.clone())?,
            None => return Err(SimilarityError::Config("runs was not supplied through json".to_owned()))
        };
        if runs.is_empty() {
            return Err(invalid("runs", "a non empty list"));
        }
        if let Some(run) = runs.iter().find(|run| run.corpus_files.is_empty()) {
            return Err(SimilarityError::Config(format!("run {} has no corpus_files", run.name)));
        }

        // handle default vs input parameters
        let metric = match json.get("metric") {
            Some(metric) => metric.as_str().ok_or_else(|| invalid("metric", "a string"))?.parse::<Metric>()?,
            None => Metric::Cosine
        };
        let num_threads = match json.get("num_threads") {
            Some(num_threads) => num_threads.as_u64().filter(|n| *n > 0).ok_or_else(|| invalid("num_threads", "a positive integer"))?,
            None => 4
        };
        let log_level = match json.get("log_level") {
            Some(log_level) => log_level.as_str().ok_or_else(|| invalid("log_level", "a string"))?,
            None => "info"
        };

        let params = JsonTypes {
            test_file: test_file.to_owned(),
            runs,
            metric,
            num_threads: num_threads as usize,
            log_level: log_level.to_lowercase()
        };

        Ok(Self { params })
    }

}

fn invalid(field: &str, expected: &str) -> SimilarityError {
    SimilarityError::Config(format!("given {} is not {}", field, expected))
}


#[cfg(test)]
mod tests {

    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_are_filled() {
        let json = json!({
            "test_file": "test.txt",
            "runs": [{"name": "sw", "corpus_files": ["sw.txt"]}]
        });
        let params = Config::from_json(&json).unwrap().get_params();
        assert_eq!(params.test_file, "test.txt");
        assert_eq!(params.runs, vec![CorpusRun { name: "sw".to_owned(), corpus_files: vec!["sw.txt".to_owned()] }]);
        assert_eq!(params.metric, Metric::Cosine);
        assert_eq!(params.num_threads, 4);
        assert_eq!(params.log_level, "info");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let json = json!({
            "test_file": "test.txt",
            "runs": [
                {"name": "sw", "corpus_files": ["sw.txt"]},
                {"name": "both", "corpus_files": ["sw.txt", "wp.txt"]}
            ],
            "metric": "jaccard",
            "num_threads": 2,
            "log_level": "DEBUG"
        });
        let params = Config::from_json(&json).unwrap().get_params();
        assert_eq!(params.runs.len(), 2);
        assert_eq!(params.runs[1].corpus_files.len(), 2);
        assert_eq!(params.metric, Metric::Jaccard);
        assert_eq!(params.num_threads, 2);
        assert_eq!(params.log_level, "debug");
        assert!(params.to_string().contains("both [\"sw.txt\", \"wp.txt\"]"));
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let bad = [
            json!({"runs": [{"name": "sw", "corpus_files": ["sw.txt"]}]}),
            json!({"test_file": "test.txt"}),
            json!({"test_file": "test.txt", "runs": []}),
            json!({"test_file": "test.txt", "runs": [{"name": "sw", "corpus_files": []}]}),
            json!({"test_file": "test.txt", "runs": [{"name": "sw"}]}),
            json!({"test_file": 3, "runs": [{"name": "sw", "corpus_files": ["sw.txt"]}]}),
            json!({"test_file": "test.txt", "runs": [{"name": "sw", "corpus_files": ["sw.txt"]}], "metric": "manhattan"}),
            json!({"test_file": "test.txt", "runs": [{"name": "sw", "corpus_files": ["sw.txt"]}], "num_threads": 0}),
        ];
        for json in bad {
            assert!(Config::from_json(&json).is_err(), "accepted {}", json);
        }
    }

    #[test]
    fn reads_config_from_args() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, r#"{{"test_file": "t.txt", "runs": [{{"name": "a", "corpus_files": ["a.txt"]}}]}}"#).unwrap();
        f.flush().unwrap();

        let args = vec!["semantic_similarity".to_owned(), f.path().display().to_string()];
        let params = Config::new(&args).unwrap().get_params();
        assert_eq!(params.test_file, "t.txt");

        assert!(Config::new(&args[..1]).is_err());
    }
}
