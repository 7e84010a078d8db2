/*! External trainer adapter.

The deep-learning trainer is a separate program. It is invoked synchronously
with a fixed flag set, and the only success signal it exposes is a completion
marker file dropped in the model directory. Exit code and marker are reported
separately: a zero exit does not imply the run finished its lifecycle.

!*/
use std::path::Path;
use std::process::Command;

use log::{debug, info};

use crate::config::Config;
use crate::error::Error;

/// Marker file the trainer drops once a run completes normally.
pub const FINISHED_MARKER: &str = ".finished";

const BATCH_SIZE: &str = "16";
const GPU_IDS: &str = "0";
const PATIENCE: &str = "10";
const MAX_EPOCH: &str = "64";
/// Morphological MISC attributes forwarded to the trainer.
const RELEVANT_MISCS: [&str; 2] = ["CpdPos", "ExtPos"];

/// Result of one external training run.
#[derive(Debug)]
pub struct TrainOutcome {
    /// Exit code of the trainer process, if it exited normally.
    pub exit_code: Option<i32>,
    /// Whether the completion marker was observed afterwards.
    pub finished: bool,
}

/// Invokes the external trainer, blocking until it exits.
pub struct Trainer<'a> {
    config: &'a Config,
}

impl<'a> Trainer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    fn command(&self, model_dir: &Path, train_file: &Path) -> Command {
        let mut cmd = Command::new(&self.config.trainer_bin);
        cmd.arg(&self.config.trainer_script)
            .arg("train")
            .arg("--new_model_path")
            .arg(model_dir)
            .arg("--ftrain")
            .arg(train_file)
            .arg("--batch_size")
            .arg(BATCH_SIZE)
            .arg("--gpu_ids")
            .arg(GPU_IDS)
            .arg("--patience")
            .arg(PATIENCE)
            .arg("--relevant_miscs")
            .args(RELEVANT_MISCS)
            .arg("--max_epoch")
            .arg(MAX_EPOCH);
        cmd
    }

    /// Runs a training round for `treebank`.
    ///
    /// Only the exit status of the trainer is captured, not its output.
    pub fn train(&self, treebank: &str) -> Result<TrainOutcome, Error> {
        info!("starting training for treebank: {}", treebank);

        let model_dir = self.config.model_dir(treebank);
        std::fs::create_dir_all(&model_dir)?;
        let train_file = self.config.train_file(treebank);

        let mut cmd = self.command(&model_dir, &train_file);
        debug!("executing training command: {:?}", cmd);
        let status = cmd.status()?;
        info!("training command exited with: {}", status);

        let finished = model_dir.join(FINISHED_MARKER).is_file();
        Ok(TrainOutcome {
            exit_code: status.code(),
            finished,
        })
    }
}
