//! Bit-level I/O over byte streams.
//!
//! `BitWriter` and `BitReader` carry the fixed-width values of the codec
//! (magic, header bits, codewords) on top of any `std::io::Write` or
//! `std::io::Read`. Both operate in MSB-first order.
//!
//! # Padding Rules
//! - BitWriter: pads the final partial byte with trailing zeros, both in
//!   `finish` and when dropped without finishing
//! - BitReader: padding bits are indistinguishable from data; the codec never
//!   needs them because decoding stops at the sentinel codeword
//!
//! # End of stream
//! `BitReader::read_bits` returns `Ok(None)` when fewer bits remain than were
//! requested. Callers turn that marker into the error that fits their stage.
//!
//! # Example
//! ```
//! use huffproc_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new(Vec::new());
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_bits(0b11, 2).unwrap();
//! // Total: 10111 -> padded to 10111000
//!
//! let bytes = writer.finish().unwrap();
//! let mut reader = BitReader::new(bytes.as_slice());
//! assert_eq!(reader.read_bits(3).unwrap(), Some(0b101));
//! assert_eq!(reader.read_bits(2).unwrap(), Some(0b11));
//! assert_eq!(reader.read_bits(8).unwrap(), None);
//! ```

use std::io::{self, Read, Write};

use crate::error::{BitIoError, Result};

/// Completed bytes are handed to the inner writer once this many accumulate.
const FLUSH_THRESHOLD: usize = 8 * 1024;

/// Size of the read-ahead buffer of `BitReader`.
const READ_CHUNK: usize = 8 * 1024;

/// Writes bits MSB-first into an underlying writer.
///
/// Accumulates bits in a one-byte buffer and moves complete bytes into an
/// internal staging buffer, which is written through in blocks.
///
/// # Invariants
/// - `bit_count` is always < 8
/// - `inner` is `Some` until `finish` returns it
pub struct BitWriter<W: Write> {
    /// Destination; taken out by `finish`
    inner: Option<W>,
    /// Completed bytes not yet handed to `inner`
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
    /// Total bits accepted so far
    total_bits: u64,
}

impl<W: Write> BitWriter<W> {
    /// Create a new BitWriter over `inner`.
    pub fn new(inner: W) -> Self {
        Self {
            inner: Some(inner),
            bytes: Vec::with_capacity(FLUSH_THRESHOLD),
            bit_buffer: 0,
            bit_count: 0,
            total_bits: 0,
        }
    }

    /// Write the lowest `count` bits of `value`, most significant first.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::ValueTooWide` if `value` has bits set above `count`
    /// - `Error::Io` if the underlying writer fails
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        if count < 64 && value >> count != 0 {
            return Err(BitIoError::ValueTooWide { value, count }.into());
        }
        if count == 0 {
            return Ok(());
        }

        let mut remaining = count;
        let mut val = value;

        while remaining > 0 {
            // How many bits fit in the current byte?
            let bits_to_write = remaining.min(8 - self.bit_count as usize);

            // Top bits_to_write bits of what is left
            let shift = remaining - bits_to_write;
            let bits = ((val >> shift) & ((1 << bits_to_write) - 1)) as u8;

            self.bit_buffer |= bits << (8 - self.bit_count as usize - bits_to_write);
            self.bit_count += bits_to_write as u8;

            if self.bit_count == 8 {
                self.bytes.push(self.bit_buffer);
                self.bit_buffer = 0;
                self.bit_count = 0;
            }

            val &= (1u64 << shift) - 1;
            remaining -= bits_to_write;
        }

        self.total_bits += count as u64;

        if self.bytes.len() >= FLUSH_THRESHOLD {
            self.flush_bytes()?;
        }

        Ok(())
    }

    /// Write a single bit.
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.write_bits(bit as u64, 1)
    }

    /// Pad the final partial byte with zeros, flush everything and return
    /// the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.pad_and_flush()?;
        let inner = self
            .inner
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "bit writer already finished"))?;
        Ok(inner)
    }

    /// Total number of bits written (including the partial byte).
    pub fn bit_len(&self) -> u64 {
        self.total_bits
    }

    /// Number of bytes the output occupies once padded.
    pub fn byte_len(&self) -> u64 {
        self.total_bits.div_ceil(8)
    }

    fn flush_bytes(&mut self) -> io::Result<()> {
        if let Some(inner) = self.inner.as_mut() {
            inner.write_all(&self.bytes)?;
        }
        self.bytes.clear();
        Ok(())
    }

    fn pad_and_flush(&mut self) -> io::Result<()> {
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
        self.flush_bytes()?;
        if let Some(inner) = self.inner.as_mut() {
            inner.flush()?;
        }
        Ok(())
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        // Early exit paths still emit the padded last byte. Errors cannot be
        // reported from drop.
        if self.inner.is_some() {
            let _ = self.pad_and_flush();
        }
    }
}

/// Reads bits MSB-first from an underlying reader.
///
/// # Invariants
/// - `bit_count` is in 0..=8 and counts the unread low bits of `current`
/// - `position` counts every bit handed out, including those consumed by a
///   read that ran into the end of the stream
pub struct BitReader<R: Read> {
    /// Source
    inner: R,
    /// Read-ahead buffer
    buf: Box<[u8]>,
    /// Next unread index in buf
    pos: usize,
    /// Valid bytes in buf
    filled: usize,
    /// Byte currently being consumed
    current: u8,
    /// Unread bits left in current (0-8)
    bit_count: u8,
    /// Bits consumed so far
    position: u64,
    /// Inner reader reported end of stream
    eof: bool,
}

impl<R: Read> BitReader<R> {
    /// Create a new BitReader over `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: vec![0u8; READ_CHUNK].into_boxed_slice(),
            pos: 0,
            filled: 0,
            current: 0,
            bit_count: 0,
            position: 0,
            eof: false,
        }
    }

    /// Read `count` bits (0-64), most significant first.
    ///
    /// Returns `Ok(None)` if the stream ends before `count` bits were read.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `Error::Io` if the underlying reader fails
    pub fn read_bits(&mut self, count: usize) -> Result<Option<u64>> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut result = 0u64;
        let mut remaining = count;

        while remaining > 0 {
            if self.bit_count == 0 {
                match self.next_byte()? {
                    Some(byte) => {
                        self.current = byte;
                        self.bit_count = 8;
                    }
                    None => return Ok(None),
                }
            }

            let bits_to_read = remaining.min(self.bit_count as usize);
            let mask = ((1u16 << bits_to_read) - 1) as u8;
            let bits = (self.current >> (self.bit_count as usize - bits_to_read)) & mask;

            result = (result << bits_to_read) | bits as u64;

            self.bit_count -= bits_to_read as u8;
            self.position += bits_to_read as u64;
            remaining -= bits_to_read;
        }

        Ok(Some(result))
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<Option<bool>> {
        Ok(self.read_bits(1)?.map(|bit| bit == 1))
    }

    /// Number of bits consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if self.pos == self.filled {
            if self.eof {
                return Ok(None);
            }
            let n = loop {
                match self.inner.read(&mut self.buf) {
                    Ok(n) => break n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            };
            if n == 0 {
                self.eof = true;
                return Ok(None);
            }
            self.pos = 0;
            self.filled = n;
        }

        let byte = self.buf[self.pos];
        self.pos += 1;
        Ok(Some(byte))
    }
}
