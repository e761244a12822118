use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use log::error;

use xray_classifier::classifier::Classifier;
use xray_classifier::cli;
use xray_classifier::config::Config;
use xray_classifier::model::OnnxModel;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let paths: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        eprintln!("usage: classify <image>...");
        return ExitCode::from(2);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let model = match OnnxModel::load(&config.model_path) {
        Ok(model) => model,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let classifier = Classifier::new(Arc::new(model));

    let stdout = io::stdout();
    match cli::classify_paths(&classifier, &paths, &mut stdout.lock()) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failures) => {
            error!("{} of {} images could not be classified", failures, paths.len());
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("could not write results: {}", e);
            ExitCode::FAILURE
        }
    }
}
