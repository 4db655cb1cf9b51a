//! Flat listing of blob folders.
//!
//! A data root holds one level of folders (by default one per upload day,
//! named `YYYY-M-D`), each of which can back a [`crate::store::BlobStore`].
//! Listing never recurses and ignores header sidecars.

use chrono::{Datelike, Local, NaiveDate};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::header::{HeaderError, HeaderFormat, SimpleHeader};
use crate::store::{BlobId, HEADER_SUFFIX};

#[derive(Error, Debug)]
pub enum FolderError {
    #[error("Cannot list {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Invalid range {start}..{end} for a folder of {len} blobs")]
    InvalidRange { start: usize, end: usize, len: usize },
    #[error("Index {index} out of range for a folder of {len} blobs")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Unreadable header for {id}: {source}")]
    Header { id: BlobId, source: HeaderError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderSummary {
    pub name: String,
    /// Number of blobs in the folder; sidecars are not counted.
    pub count: usize,
}

/// One row of [`list_blobs_with_attributes`].
#[derive(Debug, Clone, PartialEq)]
pub struct BlobListing {
    pub id: BlobId,
    pub attributes: SimpleHeader,
}

/// Name of the upload folder for `date`, without zero padding.
pub fn dated_folder_name(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.year(), date.month(), date.day())
}

/// Create (if needed) and return today's upload folder under `root`.
pub fn ensure_today_folder(root: &Path) -> Result<PathBuf, FolderError> {
    let path = root.join(dated_folder_name(Local::now().date_naive()));
    if !path.is_dir() {
        fs::create_dir_all(&path).map_err(|source| FolderError::Io { path: path.clone(), source })?;
        info!(path = %path.display(), "created upload folder");
    }
    Ok(path)
}

/// Every sub-directory of `root` with its blob count, sorted by name.
pub fn list_folders(root: &Path) -> Result<Vec<FolderSummary>, FolderError> {
    let mut folders = Vec::new();
    for entry in read_dir(root)? {
        if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let count = list_blobs(&entry.path())?.len();
        folders.push(FolderSummary { name, count });
    }
    folders.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(folders)
}

/// Identities of the blobs stored directly in `dir`, sorted.
pub fn list_blobs(dir: &Path) -> Result<Vec<BlobId>, FolderError> {
    let mut ids: Vec<BlobId> = read_dir(dir)?
        .into_iter()
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| !name.ends_with(HEADER_SUFFIX))
        .filter_map(|name| BlobId::new(name).ok())
        .collect();
    ids.sort();
    Ok(ids)
}

/// The `start..end` window of [`list_blobs`].
pub fn list_blobs_range(dir: &Path, start: usize, end: usize) -> Result<Vec<BlobId>, FolderError> {
    let ids = list_blobs(dir)?;
    if start > end || end > ids.len() {
        return Err(FolderError::InvalidRange { start, end, len: ids.len() });
    }
    Ok(ids[start..end].to_vec())
}

/// The blob at position `index` of [`list_blobs`].
pub fn blob_at(dir: &Path, index: usize) -> Result<BlobId, FolderError> {
    let mut ids = list_blobs(dir)?;
    if index >= ids.len() {
        return Err(FolderError::IndexOutOfRange { index, len: ids.len() });
    }
    Ok(ids.swap_remove(index))
}

/// The `start..end` window of [`list_blobs`], each blob paired with the
/// requested attributes from its sidecar.
///
/// Keys are matched case-insensitively; a key the sidecar lacks comes back
/// as `null`. An empty `keys` returns every attribute. A blob whose sidecar
/// is gone is listed with no attributes.
pub fn list_blobs_with_attributes(
    dir: &Path,
    start: usize,
    end: usize,
    keys: &[String],
) -> Result<Vec<BlobListing>, FolderError> {
    list_blobs_range(dir, start, end)?
        .into_iter()
        .map(|id| {
            let stored = read_sidecar(dir, &id)?;
            let attributes = if keys.is_empty() {
                stored
            } else {
                let mut projected = SimpleHeader::new();
                for key in keys {
                    projected.set(key, stored.get(key).cloned().unwrap_or(Value::Null));
                }
                projected
            };
            Ok(BlobListing { id, attributes })
        })
        .collect()
}

fn read_sidecar(dir: &Path, id: &BlobId) -> Result<SimpleHeader, FolderError> {
    let path = dir.join(id.header_name());
    match fs::read(&path) {
        Ok(bytes) => SimpleHeader::from_bytes(&bytes)
            .map_err(|source| FolderError::Header { id: id.clone(), source }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(id = %id, "blob has no header sidecar");
            Ok(SimpleHeader::new())
        }
        Err(source) => Err(FolderError::Io { path, source }),
    }
}

fn read_dir(dir: &Path) -> Result<Vec<fs::DirEntry>, FolderError> {
    let io_err = |source| FolderError::Io { path: dir.to_owned(), source };
    fs::read_dir(dir)
        .map_err(io_err)?
        .collect::<io::Result<Vec<_>>>()
        .map_err(io_err)
}
