//! Release archive downloading.
use std::{
    fs::File,
    io::{self, Cursor},
    path::PathBuf,
};

use log::info;
use url::Url;
use zip::ZipArchive;

use crate::config::Config;
use crate::error::Error;

/// Holds the url to download from and
/// the http client that will make the request.
pub struct ReleaseDownloader<'a> {
    config: &'a Config,
    client: reqwest::blocking::Client,
}

impl<'a> ReleaseDownloader<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Downloads the release zip at `url` and extracts the
    /// `ud-treebanks-v{version}.tgz` member into the treebank root.
    ///
    /// A non-success status is surfaced as [Error::Status] and is not retried.
    pub fn fetch(&self, version: &str, url: &Url) -> Result<PathBuf, Error> {
        info!("downloading UD release v{} from {}", version, url);
        let response = self.client.get(url.clone()).send()?;
        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }
        let body = response.bytes()?;

        // the release is a zip wrapping one .tgz per distribution flavour
        let mut archive = ZipArchive::new(Cursor::new(body))?;
        let member = format!("ud-treebanks-v{}.tgz", version);
        let mut entry = match archive.by_name(&member) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(Error::Custom(format!(
                    "no {} found in the release archive",
                    member
                )))
            }
            Err(e) => return Err(e.into()),
        };

        std::fs::create_dir_all(&self.config.treebank_root)?;
        let dst = self.config.archive_path(version);
        let mut out = File::create(&dst)?;
        io::copy(&mut entry, &mut out)?;

        info!("extracted treebank archive to {:?}", dst);
        Ok(dst)
    }
}
