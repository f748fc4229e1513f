//! Bounds-checked cursor over an element payload.
//!
//! Every read checks the remaining length first and returns
//! [`WireError::Truncated`] instead of panicking. The cursor position is
//! explicit and can be handed between nested parsers as a plain offset.

use crate::WireError;
use bytes::Buf;

/// Little-endian reader over a borrowed byte slice
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader at the start of `buf`
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Create a reader positioned at `pos`
    pub fn at(buf: &'a [u8], pos: usize) -> Self {
        Self {
            buf,
            pos: pos.min(buf.len()),
        }
    }

    /// Current offset from the start of the buffer
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Whether all bytes have been consumed
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    fn need(&self, n: usize) -> Result<(), WireError> {
        if self.remaining() < n {
            Err(WireError::Truncated)
        } else {
            Ok(())
        }
    }

    /// Look at the next byte without consuming it
    pub fn peek_u8(&self) -> Option<u8> {
        self.rest().first().copied()
    }

    /// Read one byte
    pub fn u8(&mut self) -> Result<u8, WireError> {
        self.need(1)?;
        let mut rest = self.rest();
        let v = rest.get_u8();
        self.pos += 1;
        Ok(v)
    }

    /// Read a little-endian u16
    pub fn u16_le(&mut self) -> Result<u16, WireError> {
        self.need(2)?;
        let mut rest = self.rest();
        let v = rest.get_u16_le();
        self.pos += 2;
        Ok(v)
    }

    /// Read a big-endian u16
    pub fn u16_be(&mut self) -> Result<u16, WireError> {
        self.need(2)?;
        let mut rest = self.rest();
        let v = rest.get_u16();
        self.pos += 2;
        Ok(v)
    }

    /// Read a little-endian u32
    pub fn u32_le(&mut self) -> Result<u32, WireError> {
        self.need(4)?;
        let mut rest = self.rest();
        let v = rest.get_u32_le();
        self.pos += 4;
        Ok(v)
    }

    /// Read a big-endian u32
    pub fn u32_be(&mut self) -> Result<u32, WireError> {
        self.need(4)?;
        let mut rest = self.rest();
        let v = rest.get_u32();
        self.pos += 4;
        Ok(v)
    }

    /// Read a big-endian unsigned integer of `width` bytes (0..=8)
    pub fn uint_be(&mut self, width: usize) -> Result<u64, WireError> {
        if width > 8 {
            return Err(WireError::BadLength(width));
        }
        self.need(width)?;
        let mut rest = self.rest();
        let v = rest.get_uint(width);
        self.pos += width;
        Ok(v)
    }

    /// Borrow the next `n` bytes
    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        self.need(n)?;
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Read exactly `N` bytes into an array
    pub fn array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(N)?);
        Ok(out)
    }

    /// Skip `n` bytes
    pub fn skip(&mut self, n: usize) -> Result<(), WireError> {
        self.need(n)?;
        self.pos += n;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_advance() {
        let data = [0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0xAB];
        let mut r = Reader::new(&data);
        assert_eq!(r.u8().unwrap(), 0x01);
        assert_eq!(r.u16_le().unwrap(), 0x1234);
        assert_eq!(r.u32_le().unwrap(), 0x1234_5678);
        assert_eq!(r.position(), 7);
        assert_eq!(r.peek_u8(), Some(0xAB));
        assert_eq!(r.remaining(), 1);
    }

    #[test]
    fn test_big_endian() {
        let data = [0x00, 0x10, 0x11, 0x22, 0x33];
        let mut r = Reader::new(&data);
        assert_eq!(r.u16_be().unwrap(), 0x0010);
        assert_eq!(r.uint_be(3).unwrap(), 0x112233);
        assert!(r.is_empty());
    }

    #[test]
    fn test_truncated_does_not_move() {
        let data = [0x01];
        let mut r = Reader::new(&data);
        assert_eq!(r.u16_le(), Err(WireError::Truncated));
        assert_eq!(r.position(), 0);
        assert_eq!(r.skip(2), Err(WireError::Truncated));
        assert_eq!(r.u8().unwrap(), 1);
        assert_eq!(r.peek_u8(), None);
    }

    #[test]
    fn test_at_clamps() {
        let data = [1, 2, 3];
        let r = Reader::at(&data, 10);
        assert!(r.is_empty());
        let mut r = Reader::at(&data, 1);
        assert_eq!(r.array::<2>().unwrap(), [2, 3]);
    }
}
