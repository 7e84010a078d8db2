/*! Batch orchestration over catalogued treebanks.

For each catalogued treebank: filter on declared size, build the training
sample, invoke the external trainer. One treebank failing must never abort
the batch.

!*/
use std::fs::File;
use std::io::BufReader;

use log::{error, info, warn};

use crate::catalog::TreebankDescriptor;
use crate::config::Config;
use crate::corpus;
use crate::error::Error;
use crate::sample;
use crate::trainer::Trainer;

/// Drives sample construction and training for every catalogued treebank.
pub struct TrainingBatch<'a> {
    config: &'a Config,
    version: String,
}

impl<'a> TrainingBatch<'a> {
    pub fn new(config: &'a Config, version: &str) -> Self {
        Self {
            config,
            version: version.to_string(),
        }
    }

    /// Reads the descriptor list wholesale.
    fn descriptors(&self) -> Result<Vec<TreebankDescriptor>, Error> {
        let path = self.config.catalog_path();
        if !path.is_file() {
            return Err(Error::MissingPath(path));
        }
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Processes every catalogued treebank in order.
    ///
    /// Errors raised while processing one treebank are logged and the batch
    /// moves on to the next one.
    pub fn run(&self) -> Result<(), Error> {
        let descriptors = self.descriptors()?;
        let trainer = Trainer::new(self.config);

        for descriptor in &descriptors {
            let total_tokens = descriptor.treebank_stats.total_tokens;
            info!(
                "preparing to train model for {} with {} tokens",
                descriptor.name, total_tokens
            );

            // too small to ever produce a non-empty sample
            if total_tokens < sample::TOKEN_BUDGET as u64 {
                warn!(
                    "skipping {} due to insufficient tokens ({})",
                    descriptor.name, total_tokens
                );
                continue;
            }

            if let Err(e) = self.process(descriptor, &trainer) {
                error!("error occurred while training {}: {:?}", descriptor.name, e);
            }
        }
        Ok(())
    }

    /// Sample construction and training for a single treebank.
    fn process(&self, descriptor: &TreebankDescriptor, trainer: &Trainer) -> Result<(), Error> {
        let model_dir = self.config.model_dir(&descriptor.name);
        std::fs::create_dir_all(&model_dir)?;

        let treebank_dir = self
            .config
            .treebanks_dir(&self.version)
            .join(&descriptor.name);
        let mut sentences = corpus::load_treebank(&treebank_dir)?;
        sample::shuffle(&mut sentences);
        let selected = sample::select_within_budget(sentences, sample::TOKEN_BUDGET);

        let sample_path = self.config.train_file(&descriptor.name);
        sample::write_sample(&sample_path, &selected)?;
        info!(
            "wrote {} sentences to {:?}",
            selected.len(),
            sample_path
        );

        let outcome = trainer.train(&descriptor.name)?;
        if !outcome.finished {
            // advisory only, the batch keeps going
            error!(
                "training did not finish successfully for {}. check the logs.",
                descriptor.name
            );
        }
        Ok(())
    }
}
