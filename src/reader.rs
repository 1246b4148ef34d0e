// MIT License
//
// Copyright (c) 2021 Andy Grove
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Little-endian byte primitives over a seekable source (component A).
//!
//! Every multi-byte integer on the wire is little-endian; a short read of a
//! declared size fails with [`AviError::UnexpectedEof`] rather than silently
//! returning a truncated buffer.

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{AviError, Result};
use crate::fourcc::FourCC;

/// Wraps any `Read + Seek` source with the primitives the scanner and header
/// parsers need. Does not buffer across seeks, so end-of-stream is never
/// hidden by a stale read-ahead window.
pub struct ByteReader<R> {
    inner: R,
    length: u64,
}

impl<R: Read + Seek> ByteReader<R> {
    pub fn new(mut inner: R) -> Result<Self> {
        let length = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, length })
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn tell(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    pub fn seek(&mut self, offset: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    pub fn read_fourcc(&mut self) -> Result<FourCC> {
        let mut buf = [0u8; 4];
        self.read_exact_into(&mut buf)?;
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.inner.read_u8().map_err(map_eof)
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        self.inner.read_u16::<LittleEndian>().map_err(map_eof)
    }

    pub fn read_i16_le(&mut self) -> Result<i16> {
        self.inner.read_i16::<LittleEndian>().map_err(map_eof)
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        self.inner.read_u32::<LittleEndian>().map_err(map_eof)
    }

    pub fn read_i32_le(&mut self) -> Result<i32> {
        self.inner.read_i32::<LittleEndian>().map_err(map_eof)
    }

    /// Reads `n` bytes or fails with [`AviError::UnexpectedEof`].
    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.read_exact_into(&mut buf)?;
        Ok(buf)
    }

    pub fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read_exact(buf).map_err(map_eof)
    }
}

fn map_eof(e: std::io::Error) -> AviError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        AviError::UnexpectedEof
    } else {
        AviError::Io(e)
    }
}
