//! Treebank archive unpacking.
use std::{fs::File, path::Path};

use flate2::read::GzDecoder;
use log::info;
use tar::Archive;

use crate::error::Error;

/// Unpacks a `.tgz` treebank archive into `dst`.
///
/// A missing archive is a fatal configuration error.
pub fn unpack_treebanks(archive_path: &Path, dst: &Path) -> Result<(), Error> {
    if !archive_path.is_file() {
        return Err(Error::MissingPath(archive_path.to_path_buf()));
    }

    let tarball = GzDecoder::new(File::open(archive_path)?);
    Archive::new(tarball).unpack(dst)?;

    info!("unpacked {:?} into {:?}", archive_path, dst);
    Ok(())
}
