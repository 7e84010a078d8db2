//! # udtrain
//!
//! udtrain drives a batch training pipeline over Universal Dependencies
//! treebanks: it downloads a release, catalogues every treebank with its
//! declared statistics, builds token-budgeted training samples and hands
//! them to an external trainer, then aggregates the resulting scores.
//!
//! ## Getting started
//!
//! ```sh
//! udtrain 0.1.0
//! UD treebank training pipeline.
//!
//! USAGE:
//!     udtrain <SUBCOMMAND>
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!
//! SUBCOMMANDS:
//!     fetch    Download a UD release and build the treebank catalog
//!     help     Prints this message or the help of the given subcommand(s)
//!     stats    Aggregate best scores of trained models
//!     train    Train one model per catalogued treebank
//! ```
//!
use std::fs::OpenOptions;
use std::path::Path;

use structopt::StructOpt;

#[macro_use]
extern crate log;

use udtrain::batch::TrainingBatch;
use udtrain::catalog;
use udtrain::cli;
use udtrain::config::Config;
use udtrain::download::ReleaseDownloader;
use udtrain::error::Error;
use udtrain::stats;

fn main() -> Result<(), Error> {
    let opt = cli::UdTrain::from_args();

    match opt {
        cli::UdTrain::Fetch(f) => {
            let config = Config::from_file(&f.config)?;
            init_logging(&config.logs_dir())?;
            debug!("cli args\n{:#?}", f);

            info!("starting treebank extraction for version {}", f.version);
            let downloader = ReleaseDownloader::new(&config);
            downloader.fetch(&f.version, &f.url)?;
            catalog::build_catalog(&config, &f.version)?;
            info!(
                "treebank extraction and configuration completed for version {}",
                f.version
            );
        }

        cli::UdTrain::Train(t) => {
            let config = Config::from_file(&t.config)?;
            init_logging(&config.logs_dir())?;
            debug!("cli args\n{:#?}", t);

            TrainingBatch::new(&config, &t.version).run()?;
        }

        cli::UdTrain::Stats(s) => {
            let config = Config::from_file(&s.config)?;
            init_logging(&config.logs_dir())?;

            stats::aggregate(&config)?;
        }
    };
    Ok(())
}

/// Attaches the process-wide logger, appending to `training.log` under
/// `logs_dir`. Called exactly once, before any component runs.
fn init_logging(logs_dir: &Path) -> Result<(), Error> {
    std::fs::create_dir_all(logs_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(logs_dir.join("training.log"))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}
