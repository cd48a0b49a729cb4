//! Binary encoding of [`OpenBitSet`].
//!
//! Layout, little-endian:
//!
//! ```text
//! u64        capacity in bits
//! u32        word count N
//! N x u64    words
//! u32        CRC-32 of every preceding byte
//! ```
//!
//! Decoding restores the capacity and the exact words, including words past
//! the ones the capacity needs.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, warn};

use crate::error::{DocSetError, Result};
use crate::util::open_bit_set::{MAX_BITS, OpenBitSet};

/// Writer that feeds every byte it forwards into a CRC-32.
struct ChecksumWriter<W> {
    inner: W,
    hasher: crc32fast::Hasher,
}

impl<W: Write> Write for ChecksumWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.hasher.update(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// Reader that feeds every byte it returns into a CRC-32.
struct ChecksumReader<R> {
    inner: R,
    hasher: crc32fast::Hasher,
}

impl<R: Read> Read for ChecksumReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.hasher.update(&buf[..read]);
        Ok(read)
    }
}

/// Encode `bits` into `writer`.
pub fn write_to<W: Write>(bits: &OpenBitSet, writer: W) -> Result<()> {
    let words = bits.words();
    let word_count = u32::try_from(words.len()).map_err(|_| {
        DocSetError::invalid_argument(format!("{} words do not fit the header", words.len()))
    })?;

    let mut out = ChecksumWriter {
        inner: writer,
        hasher: crc32fast::Hasher::new(),
    };
    out.write_u64::<LittleEndian>(bits.size() as u64)?;
    out.write_u32::<LittleEndian>(word_count)?;
    for &word in words {
        out.write_u64::<LittleEndian>(word)?;
    }

    let checksum = out.hasher.clone().finalize();
    out.inner.write_u32::<LittleEndian>(checksum)?;
    out.inner.flush()?;

    debug!("encoded bit set: {} bits, {word_count} words", bits.size());
    Ok(())
}

/// Decode a bit set written by [`write_to`].
pub fn read_from<R: Read>(reader: R) -> Result<OpenBitSet> {
    let mut input = ChecksumReader {
        inner: reader,
        hasher: crc32fast::Hasher::new(),
    };

    let num_bits = input.read_u64::<LittleEndian>()?;
    if num_bits > MAX_BITS as u64 {
        warn!("rejected bit set with capacity {num_bits}");
        return Err(DocSetError::corrupt(format!(
            "capacity {num_bits} exceeds the maximum of {MAX_BITS} bits"
        )));
    }
    let word_count = input.read_u32::<LittleEndian>()? as usize;

    // Do not trust the header for the allocation size.
    let mut words = Vec::with_capacity(word_count.min(1 << 16));
    for _ in 0..word_count {
        words.push(input.read_u64::<LittleEndian>()?);
    }

    let expected = input.hasher.clone().finalize();
    let stored = input.inner.read_u32::<LittleEndian>()?;
    if stored != expected {
        warn!("rejected bit set: checksum {stored:#010x}, computed {expected:#010x}");
        return Err(DocSetError::corrupt(format!(
            "checksum mismatch: stored {stored:#010x}, computed {expected:#010x}"
        )));
    }

    let bits = OpenBitSet::from_words(words, num_bits as usize).map_err(|err| {
        warn!("rejected bit set: {err}");
        match err {
            DocSetError::InvalidArgument(msg) => DocSetError::corrupt(msg),
            other => other,
        }
    })?;
    debug!("decoded bit set: {} bits, {} words", bits.size(), bits.num_words());
    Ok(bits)
}

/// Encode `bits` into a new byte vector.
pub fn to_bytes(bits: &OpenBitSet) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(16 + bits.num_words() * 8);
    write_to(bits, &mut buf)?;
    Ok(buf)
}

/// Decode a bit set from bytes produced by [`to_bytes`].
pub fn from_bytes(bytes: &[u8]) -> Result<OpenBitSet> {
    read_from(bytes)
}
