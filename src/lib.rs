pub mod conversion;
pub mod header;
pub mod validation;
pub mod container;
pub mod config;
pub mod store;
pub mod folder;
pub mod locks;

pub use config::StoreConfig;
pub use container::ContainerHeader;
pub use header::{HeaderFormat, SimpleHeader};
pub use store::{BlobError, BlobHeader, BlobId, BlobStore, ErrorKind};
pub use validation::{Blake3Validator, Sha256Validator, Validator};
