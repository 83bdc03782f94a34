//! Bounds-checked little-endian reader over an in-memory buffer

use crate::error::{Result, StreamError};

macro_rules! read_le {
    ($(#[$doc:meta] $name:ident => $ty:ty),* $(,)?) => {
        $(
            #[$doc]
            pub fn $name(&mut self) -> Result<$ty> {
                Ok(<$ty>::from_le_bytes(self.read_array()?))
            }
        )*
    };
}

/// Sequential reader over a byte slice.
///
/// Every read checks the remaining length before touching the buffer and
/// fails with [`StreamError::Truncated`] instead of reading short. The
/// position only advances on success.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current read position in bytes from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if needed > self.remaining() {
            return Err(StreamError::Truncated {
                offset: self.pos,
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Read a fixed-size byte array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Advance past `n` bytes without interpreting them.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }

    /// Return everything after the current position and move to the end.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let rest = &self.data[self.pos..];
        self.pos = self.data.len();
        rest
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    read_le! {
        /// Read a little-endian u16
        read_u16 => u16,
        /// Read a little-endian i16
        read_i16 => i16,
        /// Read a little-endian u32
        read_u32 => u32,
        /// Read a little-endian i32
        read_i32 => i32,
        /// Read a little-endian u64
        read_u64 => u64,
        /// Read a little-endian i64
        read_i64 => i64,
        /// Read a little-endian IEEE 754 single
        read_f32 => f32,
        /// Read a little-endian IEEE 754 double
        read_f64 => f64,
    }

    /// Read a string stored as a u32 byte length followed by UTF-8 bytes.
    ///
    /// The length prefix and the body are both bounds-checked, so a corrupt
    /// length can never cause an over-read or a large allocation.
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.pos;
        let len = self.read_u32()? as usize;
        let body_offset = self.pos;
        let bytes = match self.read_bytes(len) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.pos = start;
                return Err(e);
            }
        };
        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_owned()),
            Err(_) => {
                self.pos = start;
                Err(StreamError::InvalidUtf8 {
                    offset: body_offset,
                })
            }
        }
    }
}
