use blobsave::folder;
use blobsave::store::{BlobId, BlobStore};
use blobsave::{Blake3Validator, HeaderFormat, SimpleHeader, Sha256Validator, StoreConfig, Validator};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blobsave", about = "Block-addressed blob store for resumable uploads")]
struct Cli {
    /// JSON config file (root, block_size, max_file_size)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Store directory; overrides the config file
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Block size in bytes; overrides the config file
    #[arg(long, global = true)]
    block_size: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Allocate an empty blob of SIZE bytes
    Create {
        id: String,
        size: u64,
        /// Header attribute, KEY=VALUE (repeatable)
        #[arg(short, long = "attr", value_parser = parse_attr)]
        attrs: Vec<(String, String)>,
    },
    /// Write the contents of INPUT as block INDEX
    Put {
        id: String,
        index: u32,
        input: PathBuf,
        #[arg(short, long = "attr", value_parser = parse_attr)]
        attrs: Vec<(String, String)>,
    },
    /// Store a whole local file under its SHA-256 identity
    PutFile {
        input: PathBuf,
        #[arg(short, long = "attr", value_parser = parse_attr)]
        attrs: Vec<(String, String)>,
    },
    /// Print header attributes and block progress
    Header {
        id: String,
    },
    /// Dump one block
    GetBlock {
        id: String,
        index: u32,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Cut the last block down to the declared size
        #[arg(long)]
        trim: bool,
    },
    /// Write the assembled content of a complete blob
    Cat {
        id: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List blocks still waiting to be written
    Status {
        id: String,
    },
    /// Check content against the identity digest
    Verify {
        /// Blob to check; give either this or --index
        id: Option<String>,
        /// Folder under the root holding the blob
        #[arg(long)]
        folder: Option<String>,
        /// Position of the blob in the sorted folder listing
        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        index: Option<usize>,
        /// Identity is a BLAKE3 digest instead of SHA-256
        #[arg(long)]
        blake3: bool,
    },
    /// Remove the data container and header sidecar
    Delete {
        id: String,
    },
    /// List folders under the root with their blob counts
    Folders,
    /// List blobs in FOLDER (or the root), optionally a START..END window
    Ls {
        folder: Option<String>,
        #[arg(long)]
        start: Option<usize>,
        #[arg(long)]
        end: Option<usize>,
        /// Header attribute to print next to each blob (repeatable)
        #[arg(short, long = "attr")]
        attrs: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };
    if let Some(root) = cli.root {
        config.root = root;
    }
    if let Some(block_size) = cli.block_size {
        config.block_size = block_size;
    }
    let store = BlobStore::new(config)?;

    match cli.command {

        // ── Create ───────────────────────────────────────────────────────────
        Commands::Create { id, size, attrs } => {
            std::fs::create_dir_all(store.root())?;
            let id = BlobId::new(id)?;
            let prefix = store.create(&id, &header_from(attrs), size)?;
            println!("Created {} ({} bytes, {} blocks)", id, prefix.total_size, prefix.block_count);
        }

        // ── Put ──────────────────────────────────────────────────────────────
        Commands::Put { id, index, input, attrs } => {
            let id = BlobId::new(id)?;
            let data = std::fs::read(&input)?;
            let header = header_from(attrs);
            store.update(&id, index, &data, Some(&header))?;
            println!("  wrote block {} of {} ({} bytes)", index, id, data.len());
        }

        Commands::PutFile { input, attrs } => {
            std::fs::create_dir_all(store.root())?;
            let data = std::fs::read(&input)?;
            let id = BlobId::from_content(&Sha256Validator, &data);
            let mut header = header_from(attrs);
            if let Some(name) = input.file_name() {
                if !header.attributes().contains_key("name") {
                    header.set("name", name.to_string_lossy().into_owned().into());
                }
            }
            store.create(&id, &header, data.len() as u64)?;
            for (index, chunk) in data.chunks(store.block_size() as usize).enumerate() {
                store.update(&id, index as u32, chunk, None)?;
            }
            store.verify(&id, &Sha256Validator)?;
            println!("{}", id);
        }

        // ── Read ─────────────────────────────────────────────────────────────
        Commands::Header { id } => {
            let header = store.read_header(&BlobId::new(id)?)?;
            let c = &header.container;
            println!("{}", String::from_utf8_lossy(&header.attributes.to_bytes()?));
            println!("size {}  blocks {}/{} written", c.total_size, c.written_count(), c.block_count);
        }

        Commands::GetBlock { id, index, output, trim } => {
            let id = BlobId::new(id)?;
            let mut block = store.read_data_block(&id, index)?;
            if trim {
                let status = store.block_status(&id)?;
                block.truncate(status.block_len(index, store.block_size()) as usize);
            }
            open_output(output)?.write_all(&block)?;
        }

        Commands::Cat { id, output } => {
            store.copy_content(&BlobId::new(id)?, open_output(output)?)?;
        }

        Commands::Status { id } => {
            let status = store.block_status(&BlobId::new(id)?)?;
            let missing = status.missing_blocks();
            if missing.is_empty() {
                println!("complete ({} blocks)", status.block_count);
            } else {
                let list: Vec<String> = missing.iter().map(u32::to_string).collect();
                println!("missing {} of {} blocks: {}", missing.len(), status.block_count, list.join(","));
            }
        }

        Commands::Verify { id, folder: name, index, blake3 } => {
            let store = match name {
                Some(name) => BlobStore::new(StoreConfig {
                    root: store.root().join(name),
                    ..store.config().clone()
                })?,
                None => store,
            };
            let id = match (id, index) {
                (Some(id), _) => BlobId::new(id)?,
                (None, Some(index)) => folder::blob_at(store.root(), index)?,
                (None, None) => return Err("verify needs an identity or --index".into()),
            };
            let validator: &dyn Validator = if blake3 { &Blake3Validator } else { &Sha256Validator };
            store.verify(&id, validator)?;
            println!("OK {}", id);
        }

        // ── Delete ───────────────────────────────────────────────────────────
        Commands::Delete { id } => {
            let id = BlobId::new(id)?;
            store.delete(&id)?;
            println!("Deleted {}", id);
        }

        // ── Listing ──────────────────────────────────────────────────────────
        Commands::Folders => {
            for f in folder::list_folders(store.root())? {
                println!("{:<24} {:>8}", f.name, f.count);
            }
        }

        Commands::Ls { folder: name, start, end, attrs } => {
            let dir = match name {
                Some(name) => store.root().join(name),
                None => store.root().to_path_buf(),
            };
            if attrs.is_empty() {
                let ids = match (start, end) {
                    (None, None) => folder::list_blobs(&dir)?,
                    (s, e) => {
                        let all = folder::list_blobs(&dir)?.len();
                        folder::list_blobs_range(&dir, s.unwrap_or(0), e.unwrap_or(all))?
                    }
                };
                for id in ids {
                    println!("{}", id);
                }
            } else {
                let all = folder::list_blobs(&dir)?.len();
                let rows = folder::list_blobs_with_attributes(
                    &dir,
                    start.unwrap_or(0),
                    end.unwrap_or(all),
                    &attrs,
                )?;
                for row in rows {
                    println!("{}  {}", row.id, String::from_utf8_lossy(&row.attributes.to_bytes()?));
                }
            }
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn parse_attr(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))
}

fn header_from(attrs: Vec<(String, String)>) -> SimpleHeader {
    SimpleHeader::from_pairs(attrs)
}

fn open_output(path: Option<PathBuf>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(File::create(p)?),
        None => Box::new(io::stdout().lock()),
    })
}
