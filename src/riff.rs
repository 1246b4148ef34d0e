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

//! RIFF chunk scanner (component B): FourCC/size framing, JUNK skipping, LIST
//! recursion and search-by-type. A recursive `find_and_read` is clearer here
//! than an explicit state machine — the RIFF tree this crate cares about is
//! shallow and every chunk's size is declared up front, so a per-type parser
//! only ever needs to be bounded by its own end offset.

use std::io::{Read, Seek};

use crate::error::{AviError, Result};
use crate::fourcc::{FourCC, JUNK, LIST};
use crate::reader::ByteReader;

fn align2(offset: u64) -> u64 {
    offset + (offset & 1)
}

/// Scans `[tell(), end)` for a chunk matching `target`, recursing into `LIST`
/// wrappers when `is_list` is set. On a match, `parse` runs with the cursor
/// positioned at the start of the chunk's payload and `next_pos` (the chunk's
/// end, already 2-byte aligned) as its bound.
///
/// A malformed *optional* chunk (`required == false`) is skipped like any
/// other non-matching chunk instead of aborting the scan; a malformed
/// *required* chunk is a hard failure, per §7.
pub fn find_and_read<R, T>(
    reader: &mut ByteReader<R>,
    target: FourCC,
    is_list: bool,
    end: u64,
    required: bool,
    mut parse: impl FnMut(&mut ByteReader<R>, u64) -> Result<T>,
) -> Result<Option<T>>
where
    R: Read + Seek,
{
    while reader.tell()? < end {
        let chunk_id = reader.read_fourcc()?;
        if chunk_id == [0, 0, 0, 0] {
            return if required {
                Err(AviError::MissingRequiredChunk(crate::fourcc::Fourcc(target)))
            } else {
                Ok(None)
            };
        }

        let size = reader.read_u32_le()? as u64;
        let payload_offset = reader.tell()?;
        let next_pos = align2(payload_offset + size);

        if chunk_id == JUNK {
            reader.seek(next_pos)?;
            continue;
        }

        let mut effective_id = chunk_id;
        let mut effective_payload_offset = payload_offset;
        if is_list && chunk_id == LIST {
            effective_id = reader.read_fourcc()?;
            effective_payload_offset = reader.tell()?;
        }

        if effective_id == target {
            reader.seek(effective_payload_offset)?;
            match parse(reader, next_pos) {
                Ok(value) => {
                    reader.seek(next_pos)?;
                    return Ok(Some(value));
                }
                Err(e) => {
                    if required {
                        return Err(e);
                    }
                    reader.seek(next_pos)?;
                    continue;
                }
            }
        }

        reader.seek(next_pos)?;
    }

    if required {
        Err(AviError::MissingRequiredChunk(crate::fourcc::Fourcc(target)))
    } else {
        Ok(None)
    }
}

/// Convenience over [`find_and_read`] for locating a `LIST` of `list_type`
/// and returning the `(payload_start, payload_end)` bounds of its contents,
/// so the caller can keep scanning inside with further `find_and_read` calls.
pub fn find_list_bounds<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    list_type: FourCC,
    end: u64,
    required: bool,
) -> Result<Option<(u64, u64)>> {
    find_and_read(reader, list_type, true, end, required, |r, next_pos| {
        Ok((r.tell()?, next_pos))
    })
}

/// Validates the `RIFF`/`AVI ` file header and returns the end offset of the
/// overall RIFF payload (the declared size is taken as authoritative; a
/// trailing garbage byte beyond it is never visited).
pub fn read_riff_header<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<u64> {
    use crate::fourcc::{AVI_, RIFF};

    reader.seek(0)?;
    let riff = reader.read_fourcc()?;
    if riff != RIFF {
        return Err(AviError::NotAnAvi);
    }
    let size = reader.read_u32_le()? as u64;
    let form = reader.read_fourcc()?;
    if form != AVI_ {
        return Err(AviError::NotAnAvi);
    }
    let payload_start = reader.tell()?;
    Ok(align2(payload_start + size - 4))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn chunk(id: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(id);
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
        if payload.len() % 2 == 1 {
            out.push(0);
        }
        out
    }

    #[test]
    fn skips_junk_and_finds_target() {
        let mut buf = Vec::new();
        buf.extend(chunk(b"JUNK", &[1, 2, 3])); // odd size, padded
        buf.extend(chunk(b"strh", b"payload!"));
        let end = buf.len() as u64;
        let mut r = ByteReader::new(Cursor::new(buf)).unwrap();

        let found = find_and_read(&mut r, *b"strh", false, end, true, |r, next_pos| {
            let data = r.read_exact((next_pos - r.tell()?) as usize)?;
            Ok(data)
        })
        .unwrap();
        assert_eq!(found.unwrap(), b"payload!".to_vec());
    }

    #[test]
    fn missing_required_chunk_errors() {
        let buf = chunk(b"strf", b"xx");
        let end = buf.len() as u64;
        let mut r = ByteReader::new(Cursor::new(buf)).unwrap();
        let err = find_and_read(&mut r, *b"strh", false, end, true, |_, _| Ok(())).unwrap_err();
        assert!(matches!(err, AviError::MissingRequiredChunk(_)));
    }

    #[test]
    fn missing_optional_chunk_returns_none() {
        let buf = chunk(b"strf", b"xx");
        let end = buf.len() as u64;
        let mut r = ByteReader::new(Cursor::new(buf)).unwrap();
        let found = find_and_read(&mut r, *b"strn", false, end, false, |_, _| Ok(())).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn list_recursion_exposes_inner_type() {
        let mut inner = Vec::new();
        inner.extend(*b"hdrl");
        inner.extend(chunk(b"avih", &[9, 9]));
        let buf = chunk(b"LIST", &inner);
        let end = buf.len() as u64;
        let mut r = ByteReader::new(Cursor::new(buf)).unwrap();
        let (start, bound) = find_list_bounds(&mut r, *b"hdrl", end, true).unwrap().unwrap();
        assert!(bound > start);
    }
}
