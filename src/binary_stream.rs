use std::io;
use std::io::Write;

/// State for writing individual bits to a Writer
///
/// Bits are packed most significant bit first: the first bit written
/// lands in bit 7 of the first byte.
pub struct BitWriter<'a, T: Write> {
    /// the underlying output stream
    writer: &'a mut T,
    /// buffer of individual bits not yet written
    buffer: u8,
    /// how many bits are waiting to be written
    buffer_space_used: u8,
    /// total number of bits accepted so far, padding excluded
    bits_written: u64,
}

impl<'a, T: Write> BitWriter<'a, T> {
    pub fn new(writer: &'a mut T) -> BitWriter<'a, T> {
        BitWriter {
            writer,
            buffer: 0,
            buffer_space_used: 0,
            bits_written: 0,
        }
    }

    /// write a non-byte-aligned number of bits
    ///
    /// buf: a byte array containing a contigous block
    /// count: how many bits of buf to write
    ///
    /// returns the number of byte writes incurred onto
    /// the underlying stream, but does not guarantee that
    /// all bits have been written, use flush or finish to
    /// write any remaining bits.
    pub fn write_bits(&mut self, buf: &[u8], count: usize) -> Result<usize, io::Error> {
        let mut remaining_bits_offset = 0;
        let mut bytes_written = 0;
        if self.buffer_space_used == 0 {
            // this is efficient for large blocks of byte writes
            let quick_byte_count = count / 8;
            self.writer.write_all(&buf[0..quick_byte_count])?;
            bytes_written = quick_byte_count;
            remaining_bits_offset = quick_byte_count * 8;
        }
        for bit_index in remaining_bits_offset..count {
            let byte_index = bit_index / 8;
            let bit_index = bit_index % 8;
            let bit_val: bool = (buf[byte_index] & 0b10000000_u8.rotate_right(bit_index as u32)) > 0;
            if bit_val {
                self.buffer |= 0b10000000_u8.rotate_right(self.buffer_space_used as u32);
            } else {
                self.buffer &= 0b01111111_u8.rotate_right(self.buffer_space_used as u32);
            }
            self.buffer_space_used += 1;
            if self.buffer_space_used == 8 {
                self.writer.write_all(&[self.buffer])?;
                bytes_written += 1;
                self.buffer_space_used = 0;
                self.buffer = 0; // depended upon in flush()
            }
        }
        self.bits_written += count as u64;
        Ok(bytes_written)
    }

    /// write the lowest `length` bits of a right-aligned code word,
    /// most significant of those first
    pub fn write_code_word(&mut self, pattern: u128, length: u32) -> Result<usize, io::Error> {
        if length == 0 {
            return Ok(0);
        }
        let aligned = pattern << (u128::BITS - length);
        self.write_bits(&aligned.to_be_bytes(), length as usize)
    }

    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Number of zero bits the next flush appends to reach a byte boundary
    pub fn pending_padding(&self) -> u8 {
        if self.buffer_space_used == 0 {
            0
        } else {
            8 - self.buffer_space_used
        }
    }

    /// Flush everything and report how many padding bits were appended.
    pub fn finish(mut self) -> Result<u8, io::Error> {
        let padding = self.pending_padding();
        self.flush()?;
        Ok(padding)
    }
}

impl<T: Write> Write for BitWriter<'_, T> {
    /// Writing of byte arrays into the bit writer (for performance)
    ///
    /// Warning: Even when the returned number in the result equals
    ///          the length of the input buffer, not all bits of the
    ///          input may have been written (because of possible
    ///          single bits in BitWriters buffer)
    fn write(&mut self, buf: &[u8]) -> Result<usize, io::Error> {
        self.write_bits(buf, buf.len() * 8)?;
        Ok(buf.len())
    }

    /// Flush all bits and the underlying writer;
    ///
    /// If there are non-byte-aligned bits still
    /// in the buffer, they will be written to the output
    /// with 0 padding to the next byte;
    fn flush(&mut self) -> Result<(), io::Error> {
        if self.buffer_space_used != 0 {
            self.writer.write_all(&[self.buffer])?;
            self.buffer = 0;
            self.buffer_space_used = 0;
        }
        self.writer.flush()
    }
}

/// Reads single bits, most significant bit first, from a byte slice
pub struct BitReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// `None` once every bit of the slice has been consumed
    pub fn read_bit(&mut self) -> Option<bool> {
        let byte = *self.bytes.get(self.position / 8)?;
        let bit_val = byte & 0b10000000_u8.rotate_right((self.position % 8) as u32) > 0;
        self.position += 1;
        Some(bit_val)
    }

    pub fn bits_read(&self) -> usize {
        self.position
    }

    pub fn remaining_bits(&self) -> usize {
        self.bytes.len() * 8 - self.position
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_bit()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining_bits();
        (remaining, Some(remaining))
    }
}
