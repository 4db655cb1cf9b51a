//! Data container prefix and block offset arithmetic.
//!
//! ```text
//! offset 0    : "SAVE"                 magic
//! offset 4    : block_count            u32 LE
//! offset 8    : flags[block_count]     b'0' = not written, b'1' = written
//! offset 8+N  : total_size             u64 LE
//! offset 16+N : data region            block_count * block_size bytes
//! ```
//!
//! Every block sits at a fixed offset regardless of write order, so a block
//! write is a single positioned write plus a one-byte flag update.

use std::io::{self, Read, Seek, SeekFrom, Write};
use thiserror::Error;

use crate::conversion::{bytes_to_int, bytes_to_int64, int64_to_bytes, int_to_bytes};

pub const MAGIC: &[u8; 4] = b"SAVE";
pub const MAGIC_SIZE: u64 = 4;
pub const BLOCK_COUNT_SIZE: u64 = 4;
pub const TOTAL_SIZE_SIZE: u64 = 8;
/// Offset of the first flag byte.
pub const FLAGS_OFFSET: u64 = MAGIC_SIZE + BLOCK_COUNT_SIZE;

pub const FLAG_UNWRITTEN: u8 = b'0';
pub const FLAG_WRITTEN: u8 = b'1';

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("Invalid magic number")]
    InvalidMagic,
    #[error("Invalid flag byte {byte:#04x} for block {index}")]
    InvalidFlag { index: u32, byte: u8 },
    #[error("{total_size} bytes need {blocks} blocks, more than a container can address")]
    TooManyBlocks { total_size: u64, blocks: u64 },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// `ceil(total_size / block_size)`.
pub fn block_count_for(total_size: u64, block_size: u64) -> u64 {
    total_size.div_ceil(block_size)
}

/// Bytes taken by everything except the data region. Saturates at
/// `u64::MAX` so callers comparing against a limit never overflow.
pub fn overhead(block_count: u64) -> u64 {
    FLAGS_OFFSET
        .saturating_add(block_count)
        .saturating_add(TOTAL_SIZE_SIZE)
}

pub fn flag_offset(index: u32) -> u64 {
    FLAGS_OFFSET + u64::from(index)
}

pub fn data_offset(block_count: u32) -> u64 {
    overhead(u64::from(block_count))
}

pub fn block_offset(block_count: u32, index: u32, block_size: u64) -> u64 {
    data_offset(block_count) + u64::from(index) * block_size
}

/// Decoded container prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub block_count: u32,
    /// One entry per block, `true` once the block has been written.
    pub flags: Vec<bool>,
    pub total_size: u64,
}

impl ContainerHeader {
    /// A fresh prefix for `total_size` bytes with every flag unset.
    pub fn new(total_size: u64, block_size: u64) -> Result<Self, ContainerError> {
        let blocks = block_count_for(total_size, block_size);
        let block_count = u32::try_from(blocks)
            .map_err(|_| ContainerError::TooManyBlocks { total_size, blocks })?;
        Ok(Self {
            block_count,
            flags: vec![false; block_count as usize],
            total_size,
        })
    }

    pub fn header_len(&self) -> u64 {
        data_offset(self.block_count)
    }

    /// Full on-disk length once the data region is allocated.
    pub fn container_len(&self, block_size: u64) -> u64 {
        self.header_len() + u64::from(self.block_count) * block_size
    }

    pub fn is_written(&self, index: u32) -> bool {
        self.flags.get(index as usize).copied().unwrap_or(false)
    }

    pub fn is_complete(&self) -> bool {
        self.flags.iter().all(|&f| f)
    }

    pub fn missing_blocks(&self) -> Vec<u32> {
        (0..self.block_count).filter(|&i| !self.is_written(i)).collect()
    }

    pub fn written_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    /// Logical length of block `index` once trimmed to `total_size`.
    pub fn block_len(&self, index: u32, block_size: u64) -> u64 {
        let start = u64::from(index) * block_size;
        self.total_size.saturating_sub(start).min(block_size)
    }

    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(MAGIC)?;
        writer.write_all(&int_to_bytes(self.block_count))?;
        writer.write_all(&encode_flags(&self.flags))?;
        writer.write_all(&int64_to_bytes(self.total_size))?;
        Ok(())
    }

    pub fn read<R: Read>(mut reader: R) -> Result<Self, ContainerError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(ContainerError::InvalidMagic);
        }
        let mut count = [0u8; 4];
        reader.read_exact(&mut count)?;
        let block_count = bytes_to_int(count);

        let mut raw_flags = vec![0u8; block_count as usize];
        reader.read_exact(&mut raw_flags)?;
        let flags = decode_flags(&raw_flags)?;

        let mut size = [0u8; 8];
        reader.read_exact(&mut size)?;
        Ok(Self {
            block_count,
            flags,
            total_size: bytes_to_int64(size),
        })
    }
}

/// Read only the block count, seeking past the magic.
pub fn read_block_count<R: Read + Seek>(reader: &mut R) -> Result<u32, ContainerError> {
    reader.seek(SeekFrom::Start(0))?;
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(ContainerError::InvalidMagic);
    }
    let mut count = [0u8; 4];
    reader.read_exact(&mut count)?;
    Ok(bytes_to_int(count))
}

/// Read the raw flag bytes of a container holding `block_count` blocks.
pub fn read_flags<R: Read + Seek>(reader: &mut R, block_count: u32) -> Result<Vec<bool>, ContainerError> {
    reader.seek(SeekFrom::Start(FLAGS_OFFSET))?;
    let mut raw = vec![0u8; block_count as usize];
    reader.read_exact(&mut raw)?;
    decode_flags(&raw)
}

/// Set the flag of block `index` to written. Only that byte is touched.
pub fn mark_written<W: Write + Seek>(writer: &mut W, index: u32) -> io::Result<()> {
    writer.seek(SeekFrom::Start(flag_offset(index)))?;
    writer.write_all(&[FLAG_WRITTEN])
}

fn encode_flags(flags: &[bool]) -> Vec<u8> {
    flags
        .iter()
        .map(|&f| if f { FLAG_WRITTEN } else { FLAG_UNWRITTEN })
        .collect()
}

fn decode_flags(raw: &[u8]) -> Result<Vec<bool>, ContainerError> {
    raw.iter()
        .enumerate()
        .map(|(i, &byte)| match byte {
            FLAG_WRITTEN => Ok(true),
            FLAG_UNWRITTEN => Ok(false),
            _ => Err(ContainerError::InvalidFlag { index: i as u32, byte }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const BLOCK: u64 = 2_000_000;

    #[test]
    fn test_block_count_rounds_up() {
        assert_eq!(block_count_for(0, BLOCK), 0);
        assert_eq!(block_count_for(1, BLOCK), 1);
        assert_eq!(block_count_for(BLOCK, BLOCK), 1);
        assert_eq!(block_count_for(5_000_001, BLOCK), 3);
    }

    #[test]
    fn test_offsets_follow_layout() {
        assert_eq!(flag_offset(0), 8);
        assert_eq!(flag_offset(2), 10);
        assert_eq!(data_offset(3), 19);
        assert_eq!(block_offset(3, 2, BLOCK), 19 + 2 * BLOCK);
        assert_eq!(overhead(3), 19);
    }

    #[test]
    fn test_byte_exact_prefix() {
        let header = ContainerHeader::new(5_000_001, BLOCK).unwrap();
        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();

        assert_eq!(&buf[0..4], b"SAVE");
        assert_eq!(&buf[4..8], &[3, 0, 0, 0]);
        assert_eq!(&buf[8..11], b"000");
        assert_eq!(&buf[11..19], &5_000_001u64.to_le_bytes());
        assert_eq!(buf.len() as u64, header.header_len());
        assert_eq!(header.container_len(BLOCK), 19 + 3 * BLOCK);
    }

    #[test]
    fn test_read_back_with_flag_update() {
        let header = ContainerHeader::new(5_000_001, BLOCK).unwrap();
        let mut cursor = Cursor::new(Vec::new());
        header.write(&mut cursor).unwrap();

        mark_written(&mut cursor, 1).unwrap();
        assert_eq!(cursor.get_ref()[8..11], *b"010");
        assert_eq!(read_flags(&mut cursor, 3).unwrap(), vec![false, true, false]);

        cursor.set_position(0);
        let parsed = ContainerHeader::read(&mut cursor).unwrap();
        assert_eq!(parsed.flags, vec![false, true, false]);
        assert_eq!(parsed.missing_blocks(), vec![0, 2]);
        assert_eq!(parsed.total_size, 5_000_001);
        assert_eq!(read_block_count(&mut cursor).unwrap(), 3);
    }

    #[test]
    fn test_rejects_bad_magic_and_flags() {
        let mut bytes = b"SAVX\x01\x00\x00\x000".to_vec();
        bytes.extend_from_slice(&[0u8; 8]);
        assert!(matches!(
            ContainerHeader::read(Cursor::new(&bytes)),
            Err(ContainerError::InvalidMagic)
        ));

        bytes[3] = b'E';
        bytes[8] = b'7';
        assert!(matches!(
            ContainerHeader::read(Cursor::new(&bytes)),
            Err(ContainerError::InvalidFlag { index: 0, byte: b'7' })
        ));
    }

    #[test]
    fn test_overhead_saturates() {
        assert_eq!(overhead(u64::MAX), u64::MAX);
        assert_eq!(overhead(u64::MAX - 16), u64::MAX);
        assert_eq!(overhead(u64::MAX - 17), u64::MAX - 1);
    }

    #[test]
    fn test_block_len_trims_tail() {
        let header = ContainerHeader::new(5_000_001, BLOCK).unwrap();
        assert_eq!(header.block_len(0, BLOCK), BLOCK);
        assert_eq!(header.block_len(2, BLOCK), 1);
        assert_eq!(header.block_len(3, BLOCK), 0);
    }

    #[test]
    fn test_too_many_blocks() {
        assert!(matches!(
            ContainerHeader::new(u64::from(u32::MAX) + 1, 1),
            Err(ContainerError::TooManyBlocks { .. })
        ));
    }
}
