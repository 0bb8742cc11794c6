use std::process::ExitCode;

use irqueue::error::Error;
use irqueue::{Harness, HarnessConfig};
use log::{error, info};

fn run() -> Result<(), Error> {
    let config = match std::env::args().nth(1) {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };

    let report = Harness::new(config)?.run()?;
    info!(
        "producer: {} ok / {} failed (longest streak {})",
        report.producer.successes, report.producer.failures, report.producer.longest_failure_streak
    );
    info!(
        "consumer: {} ok / {} failed (longest streak {})",
        report.consumer.successes, report.consumer.failures, report.consumer.longest_failure_streak
    );
    report.verify()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
