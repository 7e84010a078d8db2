/*! Treebank catalog construction.

Walks an unpacked release, reads each treebank's declared `stats.xml`
statistics, joins them with the scraped language codes and writes the
descriptor list consumed by the training batch.

!*/
use std::{
    fs,
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::archive;
use crate::config::Config;
use crate::error::Error;
use crate::langs;

/// Corpus-wide size statistics declared in a treebank's `stats.xml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreebankStats {
    pub total_tokens: u64,
    pub total_sentences: u64,
    pub train_tokens: u64,
    pub train_sentences: u64,
    pub dev_tokens: u64,
    pub dev_sentences: u64,
    pub test_tokens: u64,
    pub test_sentences: u64,
}

/// One catalogued treebank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreebankDescriptor {
    pub name: String,
    pub language: String,
    pub language_code: Option<String>,
    pub version: String,
    pub treebank_stats: TreebankStats,
    pub path_model: PathBuf,
}

/// Builds the treebank catalog from a previously downloaded release archive.
///
/// Requires the archive to exist; unpacks it, catalogues every `UD*`
/// directory and deletes the archive once the catalog is written.
pub fn build_catalog(config: &Config, version: &str) -> Result<PathBuf, Error> {
    let archive_path = config.archive_path(version);
    if !archive_path.is_file() {
        return Err(Error::MissingPath(archive_path));
    }

    let client = reqwest::blocking::Client::new();
    let languages = langs::fetch_language_codes(&client)?;

    archive::unpack_treebanks(&archive_path, &config.treebank_root)?;
    let treebanks_dir = config.treebanks_dir(version);

    let mut treebank_dirs: Vec<PathBuf> = fs::read_dir(&treebanks_dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_dir()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .map(|name| name.starts_with("UD"))
                    .unwrap_or(false)
        })
        .collect();
    treebank_dirs.sort();

    let mut descriptors = Vec::new();
    for dir in &treebank_dirs {
        let name = match dir.file_name().and_then(|name| name.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };
        let language = match language_of(&name) {
            Some(language) => language,
            None => {
                warn!("cannot derive a language from {}, skipping", name);
                continue;
            }
        };

        let stats = read_stats(&dir.join("stats.xml"))?;
        descriptors.push(TreebankDescriptor {
            language_code: languages.get(&language).cloned(),
            language,
            version: version.to_string(),
            treebank_stats: stats,
            path_model: config.model_dir(&name),
            name,
        });
    }

    let catalog_path = config.catalog_path();
    let file = File::create(&catalog_path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &descriptors)?;
    fs::remove_file(&archive_path)?;

    info!(
        "catalogued {} treebanks into {:?}",
        descriptors.len(),
        catalog_path
    );
    Ok(catalog_path)
}

/// `UD_Ancient_Greek-PROIEL` -> `Ancient_Greek`.
fn language_of(name: &str) -> Option<String> {
    let rest = name.split_once('_')?.1;
    Some(rest.split_once('-')?.0.to_string())
}

/// Parses the eight split-level counts out of a `stats.xml`.
pub fn read_stats(path: &Path) -> Result<TreebankStats, Error> {
    if !path.is_file() {
        return Err(Error::MissingPath(path.to_path_buf()));
    }
    parse_stats(&fs::read_to_string(path)?)
}

fn parse_stats(xml: &str) -> Result<TreebankStats, Error> {
    let size = section(xml, "size")?;
    let (total_tokens, total_sentences) = split_counts(section(size, "total")?)?;
    let (train_tokens, train_sentences) = split_counts(section(size, "train")?)?;
    let (dev_tokens, dev_sentences) = split_counts(section(size, "dev")?)?;
    let (test_tokens, test_sentences) = split_counts(section(size, "test")?)?;

    Ok(TreebankStats {
        total_tokens,
        total_sentences,
        train_tokens,
        train_sentences,
        dev_tokens,
        dev_sentences,
        test_tokens,
        test_sentences,
    })
}

/// Returns the body of the first `<name>...</name>` element.
///
/// The stats files are machine-generated and flat, a full XML parser
/// buys nothing here.
fn section<'x>(xml: &'x str, name: &str) -> Result<&'x str, Error> {
    let open = format!("<{}>", name);
    let close = format!("</{}>", name);
    let start = xml
        .find(&open)
        .ok_or_else(|| Error::MissingField(name.to_string()))?
        + open.len();
    let end = xml[start..]
        .find(&close)
        .ok_or_else(|| Error::MissingField(name.to_string()))?
        + start;
    Ok(&xml[start..end])
}

lazy_static! {
    static ref TOKENS: Regex = Regex::new(r"<tokens>\s*(\d+)\s*</tokens>").unwrap();
    static ref SENTENCES: Regex = Regex::new(r"<sentences>\s*(\d+)\s*</sentences>").unwrap();
}

fn split_counts(section: &str) -> Result<(u64, u64), Error> {
    let tokens = count(section, &TOKENS, "tokens")?;
    let sentences = count(section, &SENTENCES, "sentences")?;
    Ok((tokens, sentences))
}

fn count(section: &str, field: &Regex, name: &str) -> Result<u64, Error> {
    field
        .captures(section)
        .and_then(|capture| capture[1].parse().ok())
        .ok_or_else(|| Error::MissingField(name.to_string()))
}
