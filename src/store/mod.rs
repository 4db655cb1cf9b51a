//! Blob engine: creates, updates, reads and deletes blob file pairs.
//!
//! Each blob is two files under the store root sharing one base name:
//! the data container (`<id>`) and its header sidecar (`<id>-Header`).
//! See [`crate::container`] for the container layout.
//!
//! # Concurrency
//! Every call performs blocking I/O and keeps no state between calls, so a
//! [`BlobStore`] can be shared freely across threads. Mutating calls
//! (`create`, `update`, `update_header`, `delete`) on the *same* identity
//! must be serialized by the caller; the sidecar merge is a
//! read-modify-write that is not atomic against a second writer. See
//! [`crate::locks::IdentityLocks`].

pub mod error;
pub mod id;

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{ConfigError, StoreConfig};
use crate::container::{self, ContainerError, ContainerHeader};
use crate::header::SimpleHeader;
use crate::validation::Validator;

pub use error::{Artifact, BlobError, ErrorKind};
pub use id::{BlobId, HEADER_SUFFIX};

/// Everything [`BlobStore::read_header`] reports about a blob.
#[derive(Debug, Clone, PartialEq)]
pub struct BlobHeader {
    pub attributes: SimpleHeader,
    pub container: ContainerHeader,
}

#[derive(Debug, Clone)]
pub struct BlobStore {
    config: StoreConfig,
}

impl BlobStore {
    pub fn new(config: StoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn block_size(&self) -> u64 {
        self.config.block_size
    }

    pub fn data_path(&self, id: &BlobId) -> PathBuf {
        self.config.root.join(id.as_str())
    }

    pub fn header_path(&self, id: &BlobId) -> PathBuf {
        self.config.root.join(id.header_name())
    }

    // ── Create ───────────────────────────────────────────────────────────────

    /// Create the file pair for a blob of `total_size` bytes.
    ///
    /// The sidecar is written first, then the container prefix with every
    /// flag unset; the container is pre-allocated to its final length so
    /// later block writes never extend it. If the container cannot be
    /// written the sidecar is removed again.
    pub fn create(
        &self,
        id: &BlobId,
        header: &SimpleHeader,
        total_size: u64,
    ) -> Result<ContainerHeader, BlobError> {
        let block_size = self.config.block_size;
        let max = self.config.max_file_size;
        let blocks = container::block_count_for(total_size, block_size);
        let requested = total_size.saturating_add(container::overhead(blocks));
        if requested > max {
            return Err(BlobError::SizeExceeded { requested, max });
        }
        let prefix = ContainerHeader::new(total_size, block_size)
            .map_err(|_| BlobError::SizeExceeded { requested, max })?;

        let data_path = self.data_path(id);
        let header_path = self.header_path(id);
        if data_path.exists() || header_path.exists() {
            return Err(BlobError::AlreadyExists(id.clone()));
        }

        let header_bytes = header
            .to_bytes()
            .map_err(|source| BlobError::Format { id: id.clone(), source })?;
        write_new(&header_path, &header_bytes).map_err(|e| create_err(id, &header_path, e))?;

        if let Err(e) = self.create_container(&data_path, &prefix) {
            warn!(id = %id, error = %e, "container creation failed, rolling back header");
            if let Err(rm) = fs::remove_file(&header_path) {
                warn!(path = %header_path.display(), error = %rm, "header rollback failed");
            }
            return Err(create_err(id, &data_path, e));
        }

        info!(id = %id, total_size, block_count = prefix.block_count, "blob created");
        Ok(prefix)
    }

    fn create_container(&self, path: &Path, prefix: &ContainerHeader) -> io::Result<()> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        if let Err(e) = write_prefix(&mut file, prefix, self.config.block_size) {
            drop(file);
            let _ = fs::remove_file(path);
            return Err(e);
        }
        Ok(())
    }

    // ── Update ───────────────────────────────────────────────────────────────

    /// Write one block and mark it complete.
    ///
    /// Blocks may be written in any order, and a block that is already
    /// marked may be written again; the new bytes replace the old ones.
    /// Attributes in `header` are merged into the stored sidecar afterwards.
    pub fn update(
        &self,
        id: &BlobId,
        index: u32,
        data: &[u8],
        header: Option<&SimpleHeader>,
    ) -> Result<(), BlobError> {
        let block_size = self.config.block_size;
        if data.len() as u64 > block_size {
            return Err(BlobError::PayloadTooLarge { len: data.len(), block_size });
        }

        let path = self.data_path(id);
        let mut file = match OpenOptions::new().read(true).write(true).open(&path) {
            Ok(f) => f,
            Err(e) => return Err(open_err(id, &path, Artifact::Container, e)),
        };

        let block_count = container::read_block_count(&mut file)
            .map_err(|e| container_err(id, &path, e))?;
        if index >= block_count {
            return Err(BlobError::BlockOutOfRange { id: id.clone(), index, block_count });
        }

        let flags = container::read_flags(&mut file, block_count)
            .map_err(|e| container_err(id, &path, e))?;
        let rewrite = flags[index as usize];

        let offset = container::block_offset(block_count, index, block_size);
        file.seek(SeekFrom::Start(offset))
            .and_then(|_| file.write_all(data))
            .and_then(|_| container::mark_written(&mut file, index))
            .and_then(|_| file.flush())
            .map_err(|e| io_err(&path, e))?;

        debug!(id = %id, index, len = data.len(), offset, rewrite, "block written");

        match header {
            Some(h) if !h.is_empty() => self.update_header(id, h),
            _ => Ok(()),
        }
    }

    /// Merge `update` into the stored sidecar.
    ///
    /// An unparsable sidecar is left untouched and reported as
    /// [`BlobError::Format`]. A missing sidecar is recreated from `update`
    /// as long as the data container still exists.
    pub fn update_header(&self, id: &BlobId, update: &SimpleHeader) -> Result<(), BlobError> {
        if !self.exists(id) {
            return Err(BlobError::NotFound { id: id.clone(), missing: Artifact::Container });
        }
        let path = self.header_path(id);
        let mut merged = match fs::read(&path) {
            Ok(bytes) => SimpleHeader::from_bytes(&bytes)
                .map_err(|source| BlobError::Format { id: id.clone(), source })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(id = %id, "header sidecar missing, recreating it");
                SimpleHeader::new()
            }
            Err(e) => return Err(io_err(&path, e)),
        };
        merged.merge(update);

        let bytes = merged
            .to_bytes()
            .map_err(|source| BlobError::Format { id: id.clone(), source })?;
        fs::write(&path, bytes).map_err(|e| io_err(&path, e))?;
        debug!(id = %id, attributes = merged.len(), "header updated");
        Ok(())
    }

    // ── Read ─────────────────────────────────────────────────────────────────

    /// Sidecar attributes plus the decoded container prefix.
    pub fn read_header(&self, id: &BlobId) -> Result<BlobHeader, BlobError> {
        let path = self.header_path(id);
        let bytes = fs::read(&path).map_err(|e| open_err(id, &path, Artifact::Header, e))?;
        let attributes = SimpleHeader::from_bytes(&bytes)
            .map_err(|source| BlobError::Format { id: id.clone(), source })?;
        let container = self.block_status(id)?;
        Ok(BlobHeader { attributes, container })
    }

    /// Decode only the container prefix: block count, flags, total size.
    pub fn block_status(&self, id: &BlobId) -> Result<ContainerHeader, BlobError> {
        let path = self.data_path(id);
        let file = File::open(&path).map_err(|e| open_err(id, &path, Artifact::Container, e))?;
        ContainerHeader::read(BufReader::new(file)).map_err(|e| container_err(id, &path, e))
    }

    /// Read exactly one block-size worth of bytes at block `index`.
    ///
    /// The last block is returned at full block size; trim with
    /// [`ContainerHeader::block_len`] to get the logical tail.
    pub fn read_data_block(&self, id: &BlobId, index: u32) -> Result<Vec<u8>, BlobError> {
        let block_size = self.config.block_size;
        let path = self.data_path(id);
        let mut file = File::open(&path).map_err(|e| open_err(id, &path, Artifact::Container, e))?;

        let block_count = container::read_block_count(&mut file)
            .map_err(|e| container_err(id, &path, e))?;
        if index >= block_count {
            return Err(BlobError::BlockOutOfRange { id: id.clone(), index, block_count });
        }

        let offset = container::block_offset(block_count, index, block_size);
        let mut buf = vec![0u8; block_size as usize];
        file.seek(SeekFrom::Start(offset))
            .and_then(|_| file.read_exact(&mut buf))
            .map_err(|e| read_err(id, &path, e))?;
        debug!(id = %id, index, offset, "block read");
        Ok(buf)
    }

    pub fn exists(&self, id: &BlobId) -> bool {
        self.data_path(id).is_file()
    }

    /// Indices of blocks not yet written, in ascending order.
    pub fn missing_blocks(&self, id: &BlobId) -> Result<Vec<u32>, BlobError> {
        Ok(self.block_status(id)?.missing_blocks())
    }

    pub fn is_complete(&self, id: &BlobId) -> Result<bool, BlobError> {
        Ok(self.block_status(id)?.is_complete())
    }

    /// Stream the assembled content, trimmed to its declared size, into
    /// `writer`. Returns the number of bytes written.
    pub fn copy_content<W: Write>(&self, id: &BlobId, mut writer: W) -> Result<u64, BlobError> {
        let block_size = self.config.block_size;
        let status = self.block_status(id)?;
        if !status.is_complete() {
            return Err(BlobError::Incomplete {
                id: id.clone(),
                missing: status.missing_blocks().len(),
                block_count: status.block_count,
            });
        }

        let path = self.data_path(id);
        let mut file = File::open(&path).map_err(|e| open_err(id, &path, Artifact::Container, e))?;
        file.seek(SeekFrom::Start(status.header_len()))
            .map_err(|e| io_err(&path, e))?;

        let mut buf = vec![0u8; block_size as usize];
        let mut written = 0u64;
        for index in 0..status.block_count {
            let len = status.block_len(index, block_size) as usize;
            file.read_exact(&mut buf[..len]).map_err(|e| read_err(id, &path, e))?;
            writer.write_all(&buf[..len]).map_err(|e| io_err(&path, e))?;
            written += len as u64;
        }
        writer.flush().map_err(|e| io_err(&path, e))?;
        Ok(written)
    }

    pub fn read_content(&self, id: &BlobId) -> Result<Vec<u8>, BlobError> {
        let mut out = Vec::new();
        self.copy_content(id, &mut out)?;
        Ok(out)
    }

    /// Check that the assembled content hashes to the identity.
    pub fn verify<V: Validator + ?Sized>(&self, id: &BlobId, validator: &V) -> Result<(), BlobError> {
        let claimed = id.digest_bytes()?;
        let content = self.read_content(id)?;
        if validator.validate(&content, &claimed) {
            debug!(id = %id, "blob verified");
            Ok(())
        } else {
            warn!(id = %id, "blob content does not match identity");
            Err(BlobError::Corrupted { id: id.clone() })
        }
    }

    // ── Delete ───────────────────────────────────────────────────────────────

    /// Remove both files. Both removals are attempted even if one fails.
    pub fn delete(&self, id: &BlobId) -> Result<(), BlobError> {
        let data_path = self.data_path(id);
        let header_path = self.header_path(id);
        let data = fs::remove_file(&data_path);
        let header = fs::remove_file(&header_path);

        let mut container_missing = false;
        let mut header_missing = false;
        match data {
            Err(e) if e.kind() == io::ErrorKind::NotFound => container_missing = true,
            Err(e) => return Err(io_err(&data_path, e)),
            Ok(()) => {}
        }
        match header {
            Err(e) if e.kind() == io::ErrorKind::NotFound => header_missing = true,
            Err(e) => return Err(io_err(&header_path, e)),
            Ok(()) => {}
        }

        let missing = match (container_missing, header_missing) {
            (true, true) => Some(Artifact::Both),
            (true, false) => Some(Artifact::Container),
            (false, true) => Some(Artifact::Header),
            (false, false) => None,
        };
        if let Some(missing) = missing {
            if missing != Artifact::Both {
                warn!(id = %id, %missing, "partial blob deleted");
            }
            return Err(BlobError::NotFound { id: id.clone(), missing });
        }
        info!(id = %id, "blob deleted");
        Ok(())
    }
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn write_prefix(file: &mut File, prefix: &ContainerHeader, block_size: u64) -> io::Result<()> {
    file.set_len(prefix.container_len(block_size))?;
    let mut buf = Vec::with_capacity(prefix.header_len() as usize);
    prefix.write(&mut buf)?;
    file.write_all(&buf)?;
    file.flush()
}

fn write_new(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    if let Err(e) = file.write_all(bytes).and_then(|_| file.flush()) {
        drop(file);
        let _ = fs::remove_file(path);
        return Err(e);
    }
    Ok(())
}

fn io_err(path: &Path, source: io::Error) -> BlobError {
    BlobError::Io { path: path.to_owned(), source }
}

fn create_err(id: &BlobId, path: &Path, e: io::Error) -> BlobError {
    if e.kind() == io::ErrorKind::AlreadyExists {
        BlobError::AlreadyExists(id.clone())
    } else {
        io_err(path, e)
    }
}

fn open_err(id: &BlobId, path: &Path, missing: Artifact, e: io::Error) -> BlobError {
    if e.kind() == io::ErrorKind::NotFound {
        BlobError::NotFound { id: id.clone(), missing }
    } else {
        io_err(path, e)
    }
}

fn read_err(id: &BlobId, path: &Path, e: io::Error) -> BlobError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        BlobError::CorruptContainer { id: id.clone(), reason: "container is truncated".into() }
    } else {
        io_err(path, e)
    }
}

fn container_err(id: &BlobId, path: &Path, e: ContainerError) -> BlobError {
    match e {
        ContainerError::Io(e) => read_err(id, path, e),
        other => BlobError::CorruptContainer { id: id.clone(), reason: other.to_string() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::HeaderFormat;
    use serde_json::json;
    use tempfile::TempDir;

    const BLOCK: u64 = 16;

    fn small_store() -> (TempDir, BlobStore) {
        let dir = TempDir::new().unwrap();
        let store = BlobStore::new(StoreConfig {
            root: dir.path().to_path_buf(),
            block_size: BLOCK,
            max_file_size: 1024,
        })
        .unwrap();
        (dir, store)
    }

    fn id(s: &str) -> BlobId {
        BlobId::new(s).unwrap()
    }

    #[test]
    fn test_create_preallocates_container() {
        let (_dir, store) = small_store();
        let prefix = store.create(&id("a"), &SimpleHeader::from_pairs([("name", "a.txt")]), 40).unwrap();

        assert_eq!(prefix.block_count, 3);
        let len = fs::metadata(store.data_path(&id("a"))).unwrap().len();
        assert_eq!(len, 4 + 4 + 3 + 8 + 3 * BLOCK);
        let raw = fs::read(store.data_path(&id("a"))).unwrap();
        assert_eq!(&raw[..11], b"SAVE\x03\x00\x00\x00000");
        assert_eq!(fs::read(store.header_path(&id("a"))).unwrap(), br#"{"name":"a.txt"}"#);
    }

    #[test]
    fn test_size_limit_boundary() {
        let (_dir, store) = small_store();
        let fits = (0..1024u64)
            .rev()
            .find(|&s| s + container::overhead(container::block_count_for(s, BLOCK)) <= 1024)
            .unwrap();
        store.create(&id("edge"), &SimpleHeader::new(), fits).unwrap();

        let err = store.create(&id("over"), &SimpleHeader::new(), fits + 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SizeExceeded);
        assert!(!store.header_path(&id("over")).exists());
        assert!(!store.data_path(&id("over")).exists());
    }

    #[test]
    fn test_create_twice_keeps_progress() {
        let (_dir, store) = small_store();
        store.create(&id("b"), &SimpleHeader::new(), 20).unwrap();
        store.update(&id("b"), 1, b"tail", None).unwrap();

        let err = store.create(&id("b"), &SimpleHeader::new(), 20).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(store.block_status(&id("b")).unwrap().flags, vec![false, true]);
    }

    #[test]
    fn test_create_refuses_taken_name() {
        let (_dir, store) = small_store();
        fs::create_dir(store.data_path(&id("c"))).unwrap();
        let err = store.create(&id("c"), &SimpleHeader::new(), 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert!(!store.header_path(&id("c")).exists());
    }

    #[test]
    fn test_create_without_root_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = BlobStore::new(StoreConfig::with_root(dir.path().join("missing"))).unwrap();
        let err = store.create(&id("c"), &SimpleHeader::new(), 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.is_transient());
    }

    #[test]
    fn test_update_rejects_bad_requests() {
        let (_dir, store) = small_store();
        store.create(&id("d"), &SimpleHeader::new(), 40).unwrap();

        let err = store.update(&id("d"), 0, &[0u8; 17], None).unwrap_err();
        assert!(matches!(err, BlobError::PayloadTooLarge { len: 17, block_size: 16 }));

        let err = store.update(&id("d"), 3, b"x", None).unwrap_err();
        assert!(matches!(err, BlobError::BlockOutOfRange { index: 3, block_count: 3, .. }));

        let err = store.update(&id("nope"), 0, b"x", None).unwrap_err();
        assert!(matches!(err, BlobError::NotFound { missing: Artifact::Container, .. }));

        assert_eq!(store.missing_blocks(&id("d")).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_out_of_order_writes_and_overwrite() {
        let (_dir, store) = small_store();
        store.create(&id("e"), &SimpleHeader::new(), 40).unwrap();

        store.update(&id("e"), 2, b"ccccccc!", None).unwrap();
        store.update(&id("e"), 0, &[b'a'; 16], None).unwrap();
        assert_eq!(store.missing_blocks(&id("e")).unwrap(), vec![1]);

        store.update(&id("e"), 0, &[b'A'; 16], None).unwrap();
        assert_eq!(store.read_data_block(&id("e"), 0).unwrap(), vec![b'A'; 16]);

        let tail = store.read_data_block(&id("e"), 2).unwrap();
        assert_eq!(tail.len(), BLOCK as usize);
        assert_eq!(&tail[..8], b"ccccccc!");
        assert!(tail[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_update_merges_header() {
        let (_dir, store) = small_store();
        store.create(&id("f"), &SimpleHeader::from_pairs([("Name", "f.txt")]), 10).unwrap();
        let extra = SimpleHeader::from_pairs([("Content-Type", "text/plain")]);
        store.update(&id("f"), 0, b"0123456789", Some(&extra)).unwrap();

        let header = store.read_header(&id("f")).unwrap();
        assert_eq!(header.attributes.get("name"), Some(&json!("f.txt")));
        assert_eq!(header.attributes.get("content-type"), Some(&json!("text/plain")));
        assert!(header.container.is_complete());
    }

    #[test]
    fn test_malformed_sidecar_is_left_untouched() {
        let (_dir, store) = small_store();
        store.create(&id("g"), &SimpleHeader::new(), 10).unwrap();
        fs::write(store.header_path(&id("g")), b"{broken").unwrap();

        let extra = SimpleHeader::from_pairs([("tag", "x")]);
        let err = store.update(&id("g"), 0, b"data", Some(&extra)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(fs::read(store.header_path(&id("g"))).unwrap(), b"{broken");
        assert_eq!(store.read_header(&id("g")).unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn test_corrupt_container_detected() {
        let (_dir, store) = small_store();
        store.create(&id("h"), &SimpleHeader::new(), 10).unwrap();
        let path = store.data_path(&id("h"));
        let mut raw = fs::read(&path).unwrap();
        raw[0] = b'X';
        fs::write(&path, &raw).unwrap();

        assert_eq!(store.block_status(&id("h")).unwrap_err().kind(), ErrorKind::CorruptContainer);
        assert_eq!(store.update(&id("h"), 0, b"x", None).unwrap_err().kind(), ErrorKind::CorruptContainer);

        fs::write(&path, b"SAVE\x01\x00").unwrap();
        assert_eq!(store.read_data_block(&id("h"), 0).unwrap_err().kind(), ErrorKind::CorruptContainer);
    }

    #[test]
    fn test_delete_partial_pair() {
        let (_dir, store) = small_store();
        store.create(&id("i"), &SimpleHeader::new(), 10).unwrap();
        fs::remove_file(store.header_path(&id("i"))).unwrap();

        let err = store.delete(&id("i")).unwrap_err();
        assert!(matches!(err, BlobError::NotFound { missing: Artifact::Header, .. }));
        assert!(!store.data_path(&id("i")).exists());

        let err = store.delete(&id("i")).unwrap_err();
        assert!(matches!(err, BlobError::NotFound { missing: Artifact::Both, .. }));
    }

    #[test]
    fn test_incomplete_content_refused() {
        let (_dir, store) = small_store();
        store.create(&id("j"), &SimpleHeader::new(), 20).unwrap();
        store.update(&id("j"), 0, &[1u8; 16], None).unwrap();
        let err = store.read_content(&id("j")).unwrap_err();
        assert!(matches!(err, BlobError::Incomplete { missing: 1, block_count: 2, .. }));
    }

    #[test]
    fn test_empty_blob() {
        let (_dir, store) = small_store();
        let prefix = store.create(&id("k"), &SimpleHeader::new(), 0).unwrap();
        assert_eq!(prefix.block_count, 0);
        assert!(store.is_complete(&id("k")).unwrap());
        assert!(store.read_content(&id("k")).unwrap().is_empty());
        assert_eq!(store.read_data_block(&id("k"), 0).unwrap_err().kind(), ErrorKind::BlockOutOfRange);
    }

    #[test]
    fn test_huge_size_is_size_exceeded() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig { block_size: 1, ..StoreConfig::with_root(dir.path()) };
        let store = BlobStore::new(config).unwrap();

        let err = store.create(&id("huge"), &SimpleHeader::new(), u64::MAX).unwrap_err();
        assert!(matches!(err, BlobError::SizeExceeded { requested: u64::MAX, .. }));
        assert!(!store.header_path(&id("huge")).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_container_rolls_back_header() {
        let (dir, store) = small_store();
        let data_path = store.data_path(&id("l"));
        std::os::unix::fs::symlink(dir.path().join("nowhere"), &data_path).unwrap();
        assert!(!data_path.exists());

        let err = store.create(&id("l"), &SimpleHeader::from_pairs([("name", "l")]), 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert!(!store.header_path(&id("l")).exists());
        assert!(data_path.is_symlink());
    }

    #[test]
    fn test_update_header_recreates_missing_sidecar() {
        let (_dir, store) = small_store();
        store.create(&id("m"), &SimpleHeader::from_pairs([("name", "old")]), 10).unwrap();
        fs::remove_file(store.header_path(&id("m"))).unwrap();

        store.update_header(&id("m"), &SimpleHeader::from_pairs([("Tag", "new")])).unwrap();
        let header = store.read_header(&id("m")).unwrap();
        assert_eq!(header.attributes.get("tag"), Some(&json!("new")));
        assert_eq!(header.attributes.len(), 1);

        let err = store.update_header(&id("absent"), &SimpleHeader::new()).unwrap_err();
        assert!(matches!(err, BlobError::NotFound { missing: Artifact::Container, .. }));
        assert!(!store.header_path(&id("absent")).exists());
    }
}
