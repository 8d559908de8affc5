use std::{env, process};
use log::error;
use semantic_similarity::{init_logger, Config, Pipeline};

fn main() {

    let args: Vec<String> = env::args().collect();
    let params = match Config::new(&args) {
        Ok(config) => config.get_params(),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2)
        }
    };
    init_logger(&params.log_level);

    let summaries = match Pipeline::run(&params) {
        Ok(summaries) => summaries,
        Err(e) => {
            error!("{}", e);
            process::exit(1)
        }
    };

    println!("{}", "=".repeat(60));
    println!("SUMMARY ({})", params.metric);
    println!("{}", "=".repeat(60));
    for summary in summaries {
        let outcome = match &summary.report {
            Ok(report) => report.to_string(),
            Err(e) => format!("failed: {}", e)
        };
        println!("{:<20} {:>8} words    {}", summary.name, summary.vocabulary, outcome);
    }
}
