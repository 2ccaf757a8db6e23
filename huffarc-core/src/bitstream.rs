//! Bit-level I/O for prefix codes.
//!
//! This module provides `BitReader` and `BitWriter` for reading and writing
//! data one bit at a time, plus `BitStream`, a direction-checked handle over
//! a single read/write resource.
//!
//! # Bit Ordering
//!
//! Bits are packed MSB-first (Most Significant Bit first): the first bit
//! written lands in bit 7 of the first byte. A partial final byte is padded
//! with zero bits in its low positions. Readers must therefore stop on a
//! known symbol count, never on end of stream, because padding bits can look
//! like the start of another code.
//!
//! # Example
//!
//! ```
//! use huffarc_core::bitstream::{BitReader, BitWriter};
//! use std::io::Cursor;
//!
//! let mut output = Vec::new();
//! {
//!     let mut writer = BitWriter::new(&mut output);
//!     writer.write_bits(0b101, 3).unwrap();
//!     writer.write_bits(0b1100, 4).unwrap();
//!     writer.flush().unwrap();
//! }
//! assert_eq!(output, vec![0b1011_1000]);
//!
//! let mut reader = BitReader::new(Cursor::new(&output));
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(4).unwrap(), 0b1100);
//! ```

use crate::error::{HuffArcError, Result};
use std::fmt;
use std::io::{self, Read, Write};

/// A bit-level reader that wraps any `Read` implementation.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    /// Underlying reader.
    reader: R,
    /// Byte currently being consumed.
    current: u8,
    /// Unread bits left in `current` (counted from its MSB side).
    bits_left: u8,
    /// Total bits read (for error reporting).
    total_bits_read: u64,
}

impl<R: Read> BitReader<R> {
    /// Create a new `BitReader` wrapping the given reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            current: 0,
            bits_left: 0,
            total_bits_read: 0,
        }
    }

    /// Get a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Get a mutable reference to the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consume this `BitReader` and return the underlying reader.
    ///
    /// Any unread bits of a partially consumed byte are lost.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Get the total number of bits read so far.
    pub fn bits_read(&self) -> u64 {
        self.total_bits_read
    }

    /// Fetch the next byte from the source.
    fn fill(&mut self) -> Result<()> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Err(HuffArcError::unexpected_end(self.total_bits_read)),
                Ok(_) => {
                    self.current = byte[0];
                    self.bits_left = 8;
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.bits_left == 0 {
            self.fill()?;
        }

        self.bits_left -= 1;
        self.total_bits_read += 1;
        Ok((self.current >> self.bits_left) & 1 != 0)
    }

    /// Read one byte as eight bits, high bit first.
    ///
    /// The byte does not need to be aligned to the source's byte boundaries.
    pub fn read_byte(&mut self) -> Result<u8> {
        let mut byte = 0u8;
        for _ in 0..8 {
            byte = (byte << 1) | self.read_bit()? as u8;
        }
        Ok(byte)
    }

    /// Read up to 64 bits, the first bit read ending up most significant.
    pub fn read_bits(&mut self, count: u8) -> Result<u64> {
        debug_assert!(count <= 64, "Cannot read more than 64 bits at once");

        let mut value = 0u64;
        for _ in 0..count {
            value = (value << 1) | self.read_bit()? as u64;
        }
        Ok(value)
    }

}

/// A bit-level writer that wraps any `Write` implementation.
///
/// `BitWriter` accumulates bits in an 8-bit buffer and emits each byte as
/// soon as it fills. Call `flush()` (or `finish()`) when done to emit a
/// remaining partial byte; dropping the writer does this on a best-effort
/// basis so the last byte survives early returns.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    /// Underlying writer.
    writer: W,
    /// Pending bits, filled from bit 7 downwards.
    buffer: u8,
    /// Number of pending bits in `buffer`.
    pending: u8,
    /// Total bits written.
    total_bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Create a new `BitWriter` wrapping the given writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: 0,
            pending: 0,
            total_bits_written: 0,
        }
    }

    /// Get a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Get a mutable reference to the underlying writer.
    ///
    /// Writing through this reference while bits are pending interleaves
    /// bytes in the wrong order.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Get the total number of bits written so far (padding excluded).
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    /// Number of bits waiting in the partial byte (0-7).
    pub fn pending_bits(&self) -> u8 {
        self.pending
    }

    /// Emit the buffered byte and reset the buffer.
    fn emit(&mut self) -> Result<()> {
        self.writer.write_all(&[self.buffer])?;
        self.buffer = 0;
        self.pending = 0;
        Ok(())
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        if bit {
            self.buffer |= 1 << (7 - self.pending);
        }
        self.pending += 1;
        self.total_bits_written += 1;

        if self.pending == 8 {
            self.emit()?;
        }
        Ok(())
    }

    /// Write one byte as eight bits, bit 7 first.
    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.write_bits(byte as u64, 8)
    }

    /// Write the low `count` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u64, count: u8) -> Result<()> {
        debug_assert!(count <= 64, "Cannot write more than 64 bits at once");

        for shift in (0..count).rev() {
            self.write_bit((value >> shift) & 1 != 0)?;
        }
        Ok(())
    }

    /// Emit any partial byte (zero-padded) and flush the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        if self.pending > 0 {
            self.emit()?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and report how many bytes the stream occupies in total.
    pub fn finish(&mut self) -> Result<u64> {
        self.flush()?;
        Ok(self.total_bits_written.div_ceil(8))
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        // Best-effort flush on drop
        let _ = self.flush();
    }
}

/// Direction a [`BitStream`] was opened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Bits are read from the resource.
    Read,
    /// Bits are written to the resource.
    Write,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

#[derive(Debug)]
enum Direction<S: Read + Write> {
    Read(BitReader<S>),
    Write(BitWriter<S>),
}

/// A bit stream over one read/write resource, fixed to a single direction.
///
/// Unlike `BitReader`/`BitWriter`, the direction is chosen at run time, so
/// every operation checks it and reports [`HuffArcError::ModeMismatch`]
/// when used the wrong way round.
///
/// ```
/// use huffarc_core::bitstream::{BitStream, Mode};
/// use huffarc_core::HuffArcError;
/// use std::io::Cursor;
///
/// let mut stream = BitStream::new(Cursor::new(Vec::new()), Mode::Write);
/// stream.write_byte(0x5A).unwrap();
/// assert!(matches!(stream.read_bit(), Err(HuffArcError::ModeMismatch { .. })));
/// ```
#[derive(Debug)]
pub struct BitStream<S: Read + Write> {
    inner: Direction<S>,
}

impl<S: Read + Write> BitStream<S> {
    /// Open a bit stream over `stream` in the given direction.
    pub fn new(stream: S, mode: Mode) -> Self {
        let inner = match mode {
            Mode::Read => Direction::Read(BitReader::new(stream)),
            Mode::Write => Direction::Write(BitWriter::new(stream)),
        };
        Self { inner }
    }

    /// The direction this stream was opened in.
    pub fn mode(&self) -> Mode {
        match self.inner {
            Direction::Read(_) => Mode::Read,
            Direction::Write(_) => Mode::Write,
        }
    }

    fn writer(&mut self) -> Result<&mut BitWriter<S>> {
        match &mut self.inner {
            Direction::Write(writer) => Ok(writer),
            Direction::Read(_) => Err(HuffArcError::mode_mismatch(Mode::Write, Mode::Read)),
        }
    }

    fn reader(&mut self) -> Result<&mut BitReader<S>> {
        match &mut self.inner {
            Direction::Read(reader) => Ok(reader),
            Direction::Write(_) => Err(HuffArcError::mode_mismatch(Mode::Read, Mode::Write)),
        }
    }

    /// Write a single bit.
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.writer()?.write_bit(bit)
    }

    /// Write one byte, bit 7 first.
    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.writer()?.write_byte(byte)
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        self.reader()?.read_bit()
    }

    /// Read one byte, high bit first.
    pub fn read_byte(&mut self) -> Result<u8> {
        self.reader()?.read_byte()
    }

    /// Bits waiting in the partial output byte; always 0 when reading.
    pub fn pending_bits(&self) -> u8 {
        match &self.inner {
            Direction::Write(writer) => writer.pending_bits(),
            Direction::Read(_) => 0,
        }
    }

    /// Emit a pending partial byte. Does nothing when reading.
    pub fn flush(&mut self) -> Result<()> {
        match &mut self.inner {
            Direction::Write(writer) => writer.flush(),
            Direction::Read(_) => Ok(()),
        }
    }

    /// Flush (when writing) and release the underlying resource.
    pub fn close(mut self) -> Result<()> {
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_bitreader_basic() {
        // 0b10110101 = 0xB5
        let data = vec![0xB5];
        let mut reader = BitReader::new(Cursor::new(data));

        let bits: Vec<bool> = (0..8).map(|_| reader.read_bit().unwrap()).collect();
        assert_eq!(
            bits,
            vec![true, false, true, true, false, true, false, true]
        );
        assert_eq!(reader.bits_read(), 8);
    }

    #[test]
    fn test_bitreader_unaligned_byte() {
        let data = vec![0x0F, 0xF0];
        let mut reader = BitReader::new(Cursor::new(data));

        assert_eq!(reader.read_bits(4).unwrap(), 0x0);
        assert_eq!(reader.read_byte().unwrap(), 0xFF); // Crosses byte boundary
        assert_eq!(reader.read_bits(4).unwrap(), 0x0);
    }

    #[test]
    fn test_bitreader_end_of_stream() {
        let mut reader = BitReader::new(Cursor::new(vec![0xAA]));
        reader.read_byte().unwrap();

        match reader.read_bit() {
            Err(HuffArcError::UnexpectedEnd { bit_position }) => assert_eq!(bit_position, 8),
            other => panic!("expected UnexpectedEnd, got {:?}", other),
        }
    }

    #[test]
    fn test_bitwriter_basic() {
        let mut output = Vec::new();
        {
            let mut writer = BitWriter::new(&mut output);
            for bit in [true, false, true, true, false, true, false, true] {
                writer.write_bit(bit).unwrap();
            }
            assert_eq!(writer.pending_bits(), 0);
            writer.flush().unwrap();
        }
        assert_eq!(output, vec![0xB5]);
    }

    #[test]
    fn test_bitwriter_padding() {
        let mut output = Vec::new();
        {
            let mut writer = BitWriter::new(&mut output);
            writer.write_bits(0b101, 3).unwrap();
            assert_eq!(writer.pending_bits(), 3);
            assert_eq!(writer.finish().unwrap(), 1);
            assert_eq!(writer.pending_bits(), 0);
        }
        // Unset low bits default to zero
        assert_eq!(output, vec![0b1010_0000]);
    }

    #[test]
    fn test_bitwriter_flushes_on_drop() {
        let mut output = Vec::new();
        {
            let mut writer = BitWriter::new(&mut output);
            writer.write_byte(0x12).unwrap();
            writer.write_bits(0b11, 2).unwrap();
        }
        assert_eq!(output, vec![0x12, 0b1100_0000]);
    }

    #[test]
    fn test_write_byte_matches_bits() {
        let mut by_byte = Vec::new();
        let mut by_bit = Vec::new();
        {
            let mut writer = BitWriter::new(&mut by_byte);
            writer.write_bit(true).unwrap();
            writer.write_byte(0x5A).unwrap();
        }
        {
            let mut writer = BitWriter::new(&mut by_bit);
            writer.write_bit(true).unwrap();
            for i in (0..8).rev() {
                writer.write_bit((0x5A >> i) & 1 != 0).unwrap();
            }
        }
        assert_eq!(by_byte, by_bit);
        assert_eq!(by_byte, vec![0b1010_1101, 0b0000_0000]);
    }

    #[test]
    fn test_roundtrip() {
        let mut output = Vec::new();
        {
            let mut writer = BitWriter::new(&mut output);
            writer.write_bits(0b101, 3).unwrap();
            writer.write_bits(0b1111, 4).unwrap();
            writer.write_byte(0xC3).unwrap();
            writer.write_bits(0b110011, 6).unwrap();
            writer.flush().unwrap();
        }
        assert_eq!(output.len(), 3);

        let mut reader = BitReader::new(Cursor::new(&output));
        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
        assert_eq!(reader.read_bits(4).unwrap(), 0b1111);
        assert_eq!(reader.read_byte().unwrap(), 0xC3);
        assert_eq!(reader.read_bits(6).unwrap(), 0b110011);
        // Three padding bits remain, all zero
        assert_eq!(reader.read_bits(3).unwrap(), 0);
        assert!(reader.read_bit().is_err());
    }

    #[test]
    fn test_bitstream_write_then_read() {
        let mut stream = BitStream::new(Cursor::new(Vec::new()), Mode::Write);
        assert_eq!(stream.mode(), Mode::Write);
        stream.write_bit(true).unwrap();
        stream.write_bit(false).unwrap();
        assert_eq!(stream.pending_bits(), 2);
        stream.write_byte(0xFF).unwrap();
        stream.flush().unwrap();
        assert_eq!(stream.pending_bits(), 0);

        let bytes = match stream.inner {
            Direction::Write(ref writer) => writer.get_ref().get_ref().clone(),
            Direction::Read(_) => unreachable!(),
        };
        assert_eq!(bytes, vec![0b1011_1111, 0b1100_0000]);

        let mut stream = BitStream::new(Cursor::new(bytes), Mode::Read);
        assert!(stream.read_bit().unwrap());
        assert!(!stream.read_bit().unwrap());
        assert_eq!(stream.read_byte().unwrap(), 0xFF);
        assert_eq!(stream.pending_bits(), 0);
        stream.close().unwrap();
    }

    #[test]
    fn test_bitstream_mode_mismatch() {
        let mut reading = BitStream::new(Cursor::new(vec![0u8; 4]), Mode::Read);
        match reading.write_bit(true) {
            Err(HuffArcError::ModeMismatch { expected, actual }) => {
                assert_eq!(expected, Mode::Write);
                assert_eq!(actual, Mode::Read);
            }
            other => panic!("expected ModeMismatch, got {:?}", other),
        }
        assert!(matches!(
            reading.write_byte(1),
            Err(HuffArcError::ModeMismatch { .. })
        ));

        let mut writing = BitStream::new(Cursor::new(Vec::new()), Mode::Write);
        assert!(matches!(
            writing.read_byte(),
            Err(HuffArcError::ModeMismatch {
                expected: Mode::Read,
                actual: Mode::Write
            })
        ));
    }
}
