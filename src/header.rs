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

//! Header parsers (component C): `avih`, `strh`, `strf`/BITMAPINFO and the
//! optional palette that follows it.

use std::io::{Read, Seek};

use crate::error::{AviError, Result};
use crate::fourcc::{FourCC, Fourcc, STRF, STRH, STRL, VIDS};
use crate::reader::ByteReader;
use crate::riff::{find_and_read, find_list_bounds};
use crate::sink::{LogLevel, Reporter};

/// `avih`: authoritative frame timing and file-level geometry. `width`/
/// `height` here are informational only — `BitmapInfo::width/height` from
/// `strf` govern decoding.
#[derive(Debug, Clone)]
pub struct AviMainHeader {
    pub micros_per_frame: u32,
    pub max_bytes_per_sec: u32,
    pub padding_granularity: u32,
    pub flags: u32,
    pub total_frames: u32,
    pub initial_frames: u32,
    pub streams: u32,
    pub suggested_buffer_size: u32,
    pub width: u32,
    pub height: u32,
}

/// `strh`: only `stream_kind` and `sample_size` drive decoding logic; the
/// rest is retained verbatim for reporting, mirroring the teacher's
/// `AviStreamHeader`.
#[derive(Debug, Clone)]
pub struct StreamHeader {
    pub stream_kind: FourCC,
    pub fcc_handler: FourCC,
    pub flags: u32,
    pub scale: u32,
    pub rate: u32,
    pub length: u32,
    pub sample_size: u32,
}

/// `strf`/BITMAPINFOHEADER. `width`/`height` are signed on the wire — a
/// negative `height` means top-down for RGB-family layouts.
#[derive(Debug, Clone)]
pub struct BitmapInfo {
    pub width: i32,
    pub height: i32,
    pub bit_count: u16,
    pub compression: u32,
    pub colors_used: u32,
    pub palette: Option<Palette>,
}

/// A 256-entry (or fewer, per `colors_used`) 8-bit RGB palette extracted
/// from the bytes immediately following a `strf` BITMAPINFOHEADER when
/// `bit_count <= 8`. Stored as parallel R/G/B arrays per §3.
#[derive(Debug, Clone)]
pub struct Palette {
    pub r: [u8; 256],
    pub g: [u8; 256],
    pub b: [u8; 256],
    pub len: usize,
}

pub fn parse_main_header<R: Read + Seek>(reader: &mut ByteReader<R>, _end: u64) -> Result<AviMainHeader> {
    Ok(AviMainHeader {
        micros_per_frame: reader.read_u32_le()?,
        max_bytes_per_sec: reader.read_u32_le()?,
        padding_granularity: reader.read_u32_le()?,
        flags: reader.read_u32_le()?,
        total_frames: reader.read_u32_le()?,
        initial_frames: reader.read_u32_le()?,
        streams: reader.read_u32_le()?,
        suggested_buffer_size: reader.read_u32_le()?,
        width: reader.read_u32_le()?,
        height: reader.read_u32_le()?,
        // dwReserved[4] and any vendor extension bytes are left unread; the
        // scanner seeks past them using the chunk's declared size.
    })
}

fn parse_stream_header<R: Read + Seek>(reader: &mut ByteReader<R>, _end: u64) -> Result<StreamHeader> {
    let stream_kind = reader.read_fourcc()?;
    let fcc_handler = reader.read_fourcc()?;
    let flags = reader.read_u32_le()?;
    let _priority = reader.read_u16_le()?;
    let _language = reader.read_u16_le()?;
    let _initial_frames = reader.read_u32_le()?;
    let scale = reader.read_u32_le()?;
    let rate = reader.read_u32_le()?;
    let _start = reader.read_u32_le()?;
    let length = reader.read_u32_le()?;
    let _suggested_buffer_size = reader.read_u32_le()?;
    let _quality = reader.read_u32_le()?;
    let sample_size = reader.read_u32_le()?;
    // rcFrame (left, top, right, bottom) is retained by neither the spec nor
    // any decision made from it; left unread like dwReserved above.

    Ok(StreamHeader {
        stream_kind,
        fcc_handler,
        flags,
        scale,
        rate,
        length,
        sample_size,
    })
}

fn parse_bitmap_info<R: Read + Seek>(reader: &mut ByteReader<R>, end: u64) -> Result<BitmapInfo> {
    let _size = reader.read_u32_le()?;
    let width = reader.read_i32_le()?;
    let height = reader.read_i32_le()?;
    let _planes = reader.read_u16_le()?;
    let bit_count = reader.read_u16_le()?;
    let compression = reader.read_u32_le()?;
    let _size_image = reader.read_u32_le()?;
    let _x_pels_per_meter = reader.read_i32_le()?;
    let _y_pels_per_meter = reader.read_i32_le()?;
    let colors_used = reader.read_u32_le()?;
    let _colors_important = reader.read_u32_le()?;

    let palette = if bit_count <= 8 {
        Some(read_palette(reader, end, bit_count, colors_used)?)
    } else {
        None
    };

    Ok(BitmapInfo {
        width,
        height,
        bit_count,
        compression,
        colors_used,
        palette,
    })
}

fn read_palette<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    end: u64,
    bit_count: u16,
    colors_used: u32,
) -> Result<Palette> {
    let count = if colors_used == 0 {
        1usize << bit_count
    } else {
        colors_used as usize
    };

    let remaining = end.saturating_sub(reader.tell()?);
    let needed = count as u64 * 4;
    if remaining < needed {
        return Err(AviError::TruncatedPalette {
            expected: needed as usize,
            found: remaining as usize,
        });
    }

    let mut r = [0u8; 256];
    let mut g = [0u8; 256];
    let mut b = [0u8; 256];
    for i in 0..count.min(256) {
        let bgr = reader.read_exact(4)?;
        b[i] = bgr[0];
        g[i] = bgr[1];
        r[i] = bgr[2];
    }
    // If `colors_used` exceeds 256 (malformed but declared), skip the rest.
    if count > 256 {
        reader.read_exact((count - 256) * 4)?;
    }

    Ok(Palette { r, g, b, len: count.min(256) })
}

/// Locates the first `strl` whose `strh.stream_kind == vids` inside `hdrl`,
/// returning its stream header, format and the number of preceding
/// non-video streams — the counter later used to build `NNdb`/`NNdc` movie
/// chunk ids (§4.4, and the open question resolved in design note §9).
pub fn select_video_stream<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    hdrl_end: u64,
    reporter: &dyn Reporter,
) -> Result<(StreamHeader, BitmapInfo, u32)> {
    let mut stream_number = 0u32;

    loop {
        let bounds = find_list_bounds(reader, STRL, hdrl_end, false)?;
        let (strl_start, strl_end) = match bounds {
            Some(b) => b,
            None => return Err(AviError::MissingRequiredChunk(Fourcc(STRL))),
        };

        reader.seek(strl_start)?;
        let strh = find_and_read(reader, STRH, false, strl_end, true, parse_stream_header)?
            .expect("find_and_read with required=true never returns Ok(None)");

        if strh.stream_kind != VIDS {
            reporter.log(
                LogLevel::Debug,
                &format!("non-video stream skipped: stream_number={stream_number} kind={}", Fourcc(strh.stream_kind)),
            );
            stream_number += 1;
            reader.seek(strl_end)?;
            continue;
        }

        if strh.sample_size > 1 {
            return Err(AviError::UnsupportedMultisample(strh.sample_size));
        }

        reader.seek(strl_start)?;
        let strf = find_and_read(reader, STRF, false, strl_end, true, parse_bitmap_info)?
            .expect("find_and_read with required=true never returns Ok(None)");

        return Ok((strh, strf, stream_number));
    }
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

    fn avih_bytes(total_frames: u32, width: u32, height: u32) -> Vec<u8> {
        let mut b = Vec::new();
        b.extend(40000u32.to_le_bytes()); // micros_per_frame
        b.extend(0u32.to_le_bytes());
        b.extend(0u32.to_le_bytes());
        b.extend(0u32.to_le_bytes());
        b.extend(total_frames.to_le_bytes());
        b.extend(0u32.to_le_bytes());
        b.extend(1u32.to_le_bytes());
        b.extend(0u32.to_le_bytes());
        b.extend(width.to_le_bytes());
        b.extend(height.to_le_bytes());
        b.extend([0u8; 16]); // dwReserved[4]
        b
    }

    #[test]
    fn parses_avih_fields() {
        let payload = avih_bytes(44, 1304, 976);
        let buf = chunk(b"avih", &payload);
        let end = buf.len() as u64;
        let mut r = ByteReader::new(Cursor::new(buf)).unwrap();
        let header = find_and_read(&mut r, *b"avih", false, end, true, parse_main_header)
            .unwrap()
            .unwrap();
        assert_eq!(header.total_frames, 44);
        assert_eq!(header.width, 1304);
        assert_eq!(header.micros_per_frame, 40000);
    }

    fn strf_8bit_with_palette() -> Vec<u8> {
        let mut b = Vec::new();
        b.extend(40u32.to_le_bytes());
        b.extend(2i32.to_le_bytes()); // width
        b.extend((-2i32).to_le_bytes()); // height (top-down)
        b.extend(1u16.to_le_bytes()); // planes
        b.extend(8u16.to_le_bytes()); // bit_count
        b.extend(0u32.to_le_bytes()); // compression
        b.extend(0u32.to_le_bytes()); // size_image
        b.extend(0i32.to_le_bytes());
        b.extend(0i32.to_le_bytes());
        b.extend(4u32.to_le_bytes()); // colors_used
        b.extend(0u32.to_le_bytes());
        // palette: black, red, green, blue
        b.extend([0, 0, 0, 0]);
        b.extend([0, 0, 255, 0]);
        b.extend([0, 255, 0, 0]);
        b.extend([255, 0, 0, 0]);
        b
    }

    #[test]
    fn parses_strf_with_palette() {
        let payload = strf_8bit_with_palette();
        let buf = chunk(b"strf", &payload);
        let end = buf.len() as u64;
        let mut r = ByteReader::new(Cursor::new(buf)).unwrap();
        let info = find_and_read(&mut r, *b"strf", false, end, true, parse_bitmap_info)
            .unwrap()
            .unwrap();
        assert_eq!(info.bit_count, 8);
        assert_eq!(info.height, -2);
        let pal = info.palette.unwrap();
        assert_eq!(pal.len, 4);
        assert_eq!((pal.r[1], pal.g[1], pal.b[1]), (255, 0, 0));
        assert_eq!((pal.r[3], pal.g[3], pal.b[3]), (0, 0, 255));
    }

    #[test]
    fn truncated_palette_errors() {
        let mut payload = strf_8bit_with_palette();
        payload.truncate(payload.len() - 2); // cut into the last palette entry
        let buf = chunk(b"strf", &payload);
        let end = buf.len() as u64;
        let mut r = ByteReader::new(Cursor::new(buf)).unwrap();
        let err = find_and_read(&mut r, *b"strf", false, end, true, parse_bitmap_info).unwrap_err();
        assert!(matches!(err, AviError::TruncatedPalette { .. }));
    }
}
