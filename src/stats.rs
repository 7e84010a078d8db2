/*! Model statistics aggregation.

Scans the model root for best-score files and rebuilds the summary file
wholesale, so the summary always reflects exactly the models that currently
have scores.

!*/
use std::{
    collections::BTreeMap,
    fs,
    fs::File,
    io::{BufReader, BufWriter},
};

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Error;

/// Best-epoch snapshot file written by the trainer.
pub const BEST_SCORES_FILE: &str = "scores.best.json";

/// The fields consumed out of a best-score file. All are required;
/// everything else in the file is ignored.
#[derive(Debug, Deserialize)]
struct BestScores {
    #[serde(rename = "LAS_epoch")]
    las_epoch: f64,
    #[serde(rename = "LAS_chuliu_epoch")]
    las_chuliu_epoch: f64,
    acc_head_epoch: f64,
    training_diagnostics: TrainingDiagnostics,
}

#[derive(Debug, Deserialize)]
struct TrainingDiagnostics {
    data_description: DataDescription,
}

#[derive(Debug, Deserialize)]
struct DataDescription {
    n_train_sents: u64,
    n_test_sents: u64,
}

/// Per-model entry of the summary file.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    #[serde(rename = "LAS")]
    pub las: f64,
    #[serde(rename = "LAS_chuliu")]
    pub las_chuliu: f64,
    #[serde(rename = "UAS")]
    pub uas: f64,
    pub train_data: u64,
    pub test_data: u64,
}

impl From<BestScores> for ModelSummary {
    fn from(scores: BestScores) -> ModelSummary {
        ModelSummary {
            las: scores.las_epoch,
            las_chuliu: scores.las_chuliu_epoch,
            uas: scores.acc_head_epoch,
            train_data: scores.training_diagnostics.data_description.n_train_sents,
            test_data: scores.training_diagnostics.data_description.n_test_sents,
        }
    }
}

/// Rebuilds the model summary from every best-score file under the model
/// root and overwrites the summary file.
///
/// Model directories without a best-score file are skipped; a malformed
/// best-score file halts the whole pass.
pub fn aggregate(config: &Config) -> Result<BTreeMap<String, ModelSummary>, Error> {
    let mut summaries = BTreeMap::new();

    for entry in fs::read_dir(&config.model_root)? {
        let entry = entry?;
        let model_dir = entry.path();
        if !model_dir.is_dir() {
            continue;
        }
        let scores_path = model_dir.join(BEST_SCORES_FILE);
        if !scores_path.is_file() {
            continue;
        }

        let file = File::open(&scores_path)?;
        let scores: BestScores = serde_json::from_reader(BufReader::new(file))?;
        let model = entry.file_name().to_string_lossy().into_owned();
        summaries.insert(model, scores.into());
    }

    let summary_path = config.summary_path();
    let out = File::create(&summary_path)?;
    serde_json::to_writer_pretty(BufWriter::new(out), &summaries)?;
    info!("updated models statistics at {:?}", summary_path);

    Ok(summaries)
}
