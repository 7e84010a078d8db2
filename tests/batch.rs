use std::fs;

use tempfile::TempDir;
use test_log::test;

use udtrain::batch::TrainingBatch;
use udtrain::catalog::{TreebankDescriptor, TreebankStats};
use udtrain::config::Config;
use udtrain::corpus::SentenceReader;
use udtrain::sample::TOKEN_BUDGET;
use udtrain::trainer::FINISHED_MARKER;

const VERSION: &str = "2.15";

struct Fixture {
    // keeps the tempdir alive for the duration of the test
    _root: TempDir,
    config: Config,
}

/// Builds an isolated pipeline layout with a stand-in trainer that drops
/// the completion marker into the model directory it is given.
fn fixture() -> Fixture {
    let root = TempDir::new().unwrap();
    let treebank_root = root.path().join("treebanks");
    let model_root = root.path().join("models");
    fs::create_dir_all(&treebank_root).unwrap();
    fs::create_dir_all(&model_root).unwrap();

    let script = root.path().join("fake_trainer.sh");
    fs::write(&script, "touch \"$3/.finished\"\n").unwrap();

    let config = Config {
        treebank_root,
        model_root,
        trainer_bin: "sh".into(),
        trainer_script: script,
    };
    Fixture {
        _root: root,
        config,
    }
}

fn descriptor(config: &Config, name: &str, total_tokens: u64) -> TreebankDescriptor {
    TreebankDescriptor {
        name: name.to_string(),
        language: "Testish".to_string(),
        language_code: Some("tst".to_string()),
        version: VERSION.to_string(),
        treebank_stats: TreebankStats {
            total_tokens,
            total_sentences: total_tokens / 5,
            train_tokens: total_tokens,
            train_sentences: total_tokens / 5,
            dev_tokens: 0,
            dev_sentences: 0,
            test_tokens: 0,
            test_sentences: 0,
        },
        path_model: config.model_dir(name),
    }
}

fn write_catalog(config: &Config, descriptors: &[TreebankDescriptor]) {
    let file = fs::File::create(config.catalog_path()).unwrap();
    serde_json::to_writer_pretty(file, descriptors).unwrap();
}

/// Writes a corpus of `sentences` five-token sentences for `name`.
fn write_corpus(config: &Config, name: &str, sentences: usize) {
    let dir = config.treebanks_dir(VERSION).join(name);
    fs::create_dir_all(&dir).unwrap();

    let mut content = String::new();
    for i in 0..sentences {
        content.push_str(&format!("# sent_id = {}\n", i));
        for t in 1..=5 {
            content.push_str(&format!("{}\tword{}\tword{}\n", t, t, t));
        }
        content.push('\n');
    }
    fs::write(
        dir.join(format!("{}-ud-train.conllu", name.to_lowercase())),
        content,
    )
    .unwrap();
}

#[test]
fn skips_treebanks_below_the_token_budget() {
    let fixture = fixture();
    let config = &fixture.config;
    write_catalog(config, &[descriptor(config, "UD_Testish-Tiny", 100)]);

    TrainingBatch::new(config, VERSION).run().unwrap();

    // never trained, never even given a model directory
    assert!(!config.model_dir("UD_Testish-Tiny").exists());
}

#[test]
fn trains_and_observes_the_completion_marker() {
    let fixture = fixture();
    let config = &fixture.config;
    write_catalog(config, &[descriptor(config, "UD_Testish-Full", 10_000)]);
    write_corpus(config, "UD_Testish-Full", 40);

    TrainingBatch::new(config, VERSION).run().unwrap();

    let model_dir = config.model_dir("UD_Testish-Full");
    let sample_path = model_dir.join("UD_Testish-Full_train.conllu");
    assert!(sample_path.is_file());
    assert!(model_dir.join(FINISHED_MARKER).is_file());

    // 40 sentences of 5 tokens all fit under the budget
    let sentences: Vec<_> = SentenceReader::open(&sample_path)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(sentences.len(), 40);
    let total: usize = sentences.iter().map(|s| s.token_count()).sum();
    assert!(total <= TOKEN_BUDGET);
}

#[test]
fn one_failing_treebank_does_not_abort_the_batch() {
    let fixture = fixture();
    let config = &fixture.config;
    write_catalog(
        config,
        &[
            descriptor(config, "UD_Testish-First", 10_000),
            descriptor(config, "UD_Testish-Broken", 10_000),
            descriptor(config, "UD_Testish-Third", 10_000),
        ],
    );
    // no corpus directory for UD_Testish-Broken
    write_corpus(config, "UD_Testish-First", 10);
    write_corpus(config, "UD_Testish-Third", 10);

    TrainingBatch::new(config, VERSION).run().unwrap();

    for name in ["UD_Testish-First", "UD_Testish-Third"] {
        let model_dir = config.model_dir(name);
        assert!(model_dir.join(format!("{}_train.conllu", name)).is_file());
        assert!(model_dir.join(FINISHED_MARKER).is_file());
    }
    let broken = config.model_dir("UD_Testish-Broken");
    assert!(!broken.join("UD_Testish-Broken_train.conllu").exists());
    assert!(!broken.join(FINISHED_MARKER).exists());
}

#[test]
fn samples_are_reproducible_across_runs() {
    let fixture = fixture();
    let config = &fixture.config;
    write_catalog(config, &[descriptor(config, "UD_Testish-Twice", 10_000)]);
    write_corpus(config, "UD_Testish-Twice", 30);

    let sample_path = config
        .model_dir("UD_Testish-Twice")
        .join("UD_Testish-Twice_train.conllu");

    TrainingBatch::new(config, VERSION).run().unwrap();
    let first = fs::read(&sample_path).unwrap();

    fs::remove_dir_all(config.model_dir("UD_Testish-Twice")).unwrap();
    TrainingBatch::new(config, VERSION).run().unwrap();
    let second = fs::read(&sample_path).unwrap();

    assert_eq!(first, second);
}
