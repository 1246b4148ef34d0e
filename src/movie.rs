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

//! Movie iterator (component E): walks `movi`, filters by stream id and
//! `db`/`dc` chunk type, enumerates frames and honors the configured frame
//! range.

use std::io::{Read, Seek};

use crate::config::DecodeConfig;
use crate::fourcc::stream_chunk_id;
use crate::reader::ByteReader;
use crate::sink::Reporter;
use crate::error::Result;

/// File position, size and timestamp of one matched movie-data chunk.
/// Frame numbering is 1-based and contiguous in discovery order (§3).
#[derive(Debug, Clone, Copy)]
pub struct FrameRecord {
    pub file_offset: u64,
    pub byte_size: u32,
    pub timestamp_micros: u64,
}

fn align2(offset: u64) -> u64 {
    offset + (offset & 1)
}

/// Resolves `last_frame_number` against `total_frames` per §4.4:
/// `>0` is absolute, `0` means "until EOF", `<0` means `total_frames + value`.
fn last_frame_to_read(last_frame_number: i64, total_frames: u32) -> u64 {
    if last_frame_number > 0 {
        last_frame_number as u64
    } else if last_frame_number < 0 {
        (total_frames as i64 + last_frame_number).max(0) as u64
    } else {
        u64::MAX
    }
}

/// Walks `[movi_start, movi_end)` and returns every matched chunk's
/// [`FrameRecord`] within the configured frame range. Non-matching chunks —
/// audio `wb`, nested `LIST rec `, anything else — are skipped by size
/// without being parsed.
pub fn scan_movie<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    movi_start: u64,
    movi_end: u64,
    stream_number: u32,
    total_frames: u32,
    micros_per_frame: u32,
    config: &DecodeConfig,
    reporter: &dyn Reporter,
) -> Result<Vec<FrameRecord>> {
    let db_id = stream_chunk_id(stream_number, b"db");
    let dc_id = stream_chunk_id(stream_number, b"dc");
    let last = last_frame_to_read(config.last_frame_number, total_frames);

    let mut frames = Vec::new();
    let mut frame_number: u64 = 0;

    reader.seek(movi_start)?;
    while reader.tell()? < movi_end {
        let chunk_id = reader.read_fourcc()?;
        if chunk_id == [0, 0, 0, 0] {
            break;
        }
        let size = reader.read_u32_le()? as u64;
        let payload_offset = reader.tell()?;
        let next_pos = align2(payload_offset + size);

        if chunk_id == db_id || chunk_id == dc_id {
            frame_number += 1;
            if frame_number >= config.first_frame_number as u64 && frame_number <= last {
                frames.push(FrameRecord {
                    file_offset: payload_offset,
                    byte_size: size as u32,
                    timestamp_micros: frame_number * micros_per_frame as u64,
                });
            }
            if last != u64::MAX {
                reporter.progress(frame_number as f64 / last as f64);
            }
            if frame_number >= last {
                break;
            }
        }

        reader.seek(next_pos)?;
    }

    Ok(frames)
}
