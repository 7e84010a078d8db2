//! Pipeline configuration.
//!
//! Every entry point builds a [Config] once and passes it by reference to the
//! components that need filesystem locations. There is no ambient state.
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::Error;

/// Name of the catalog file produced by the `fetch` subcommand.
pub const CATALOG_FILE: &str = "treebanks_config.json";

/// Filesystem locations the pipeline operates on.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Root directory holding release archives, extracted treebanks and logs.
    pub treebank_root: PathBuf,
    /// Root directory holding one output directory per trained model.
    pub model_root: PathBuf,
    /// Interpreter the external trainer runs under.
    pub trainer_bin: PathBuf,
    /// Entry script of the external trainer.
    pub trainer_script: PathBuf,
}

impl Config {
    /// Loads the configuration from a JSON file.
    ///
    /// A missing file is a fatal configuration error.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        if !path.is_file() {
            return Err(Error::MissingPath(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Location of the downloaded release archive for `version`.
    pub fn archive_path(&self, version: &str) -> PathBuf {
        self.treebank_root.join(format!("ud-treebanks-v{}.tgz", version))
    }

    /// Directory holding the extracted treebanks of `version`.
    pub fn treebanks_dir(&self, version: &str) -> PathBuf {
        self.treebank_root.join(format!("ud-treebanks-v{}", version))
    }

    /// Location of the treebank catalog.
    pub fn catalog_path(&self) -> PathBuf {
        self.treebank_root.join(CATALOG_FILE)
    }

    /// Output directory for the model trained on `treebank`.
    pub fn model_dir(&self, treebank: &str) -> PathBuf {
        self.model_root.join(treebank)
    }

    /// Location of the training sample for `treebank`.
    pub fn train_file(&self, treebank: &str) -> PathBuf {
        self.model_dir(treebank)
            .join(format!("{}_train.conllu", treebank))
    }

    /// Location of the aggregated model statistics.
    pub fn summary_path(&self) -> PathBuf {
        self.model_root.join("models_stats.json")
    }

    /// Directory receiving the pipeline log file.
    pub fn logs_dir(&self) -> PathBuf {
        self.treebank_root.join("logs")
    }
}
