/*! Corpus reading facilities.

[SentenceReader] iterates over the blank-line-delimited sentence blocks of a
CoNLL-U file. Blocks are kept as raw lines: the only thing the pipeline derives
from them is their token count.

!*/
use std::{
    fs::File,
    io::{BufRead, BufReader, Lines, Read},
    path::{Path, PathBuf},
};

use glob::glob;
use log::debug;

use crate::error::Error;

/// A raw sentence block.
///
/// Holds the block's lines verbatim, comments included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    lines: Vec<String>,
}

impl Sentence {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of token entries in the block.
    ///
    /// A token entry is a line whose first tab-separated field is a plain
    /// integer id. Comments, multiword ranges (`1-2`) and empty nodes (`1.1`)
    /// are not token entries.
    pub fn token_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| {
                let id = line.split('\t').next().unwrap_or("");
                !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
            })
            .count()
    }
}

/// Reader that yields sentence blocks
/// that are blank-line separated.
pub struct SentenceReader<T: Read> {
    lines: Lines<BufReader<T>>,
}

impl<T: Read> SentenceReader<T> {
    pub fn new(reader: T) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
        }
    }
}

impl SentenceReader<File> {
    pub fn open(src: &Path) -> Result<Self, Error> {
        Ok(Self::new(File::open(src)?))
    }
}

impl<T: Read> Iterator for SentenceReader<T> {
    type Item = Result<Sentence, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut block = Vec::new();
        for line in self.lines.by_ref() {
            let line = match line {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            //cut at empty line
            if line.trim().is_empty() {
                if block.is_empty() {
                    continue;
                }
                return Some(Ok(Sentence::new(block)));
            }
            block.push(line);
        }

        // close eventual last block
        if block.is_empty() {
            None
        } else {
            Some(Ok(Sentence::new(block)))
        }
    }
}

/// Reads every `.conllu` file under `dir` and concatenates their blocks
/// into one ordered sequence.
///
/// Files are read in filename order: directory enumeration order is
/// platform-dependent and would break sample reproducibility.
pub fn load_treebank(dir: &Path) -> Result<Vec<Sentence>, Error> {
    if !dir.is_dir() {
        return Err(Error::MissingPath(dir.to_path_buf()));
    }

    let pattern = format!("{}/*.conllu", dir.display());
    let mut files: Vec<PathBuf> = glob(&pattern)?.collect::<Result<_, _>>()?;
    files.sort();

    let mut sentences = Vec::new();
    for file in &files {
        debug!("reading {:?}", file);
        for sentence in SentenceReader::open(file)? {
            sentences.push(sentence?);
        }
    }
    Ok(sentences)
}
