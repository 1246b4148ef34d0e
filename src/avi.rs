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

//! Ties components A-G together: open a byte source, resolve headers and a
//! decode plan, then either eagerly decode every frame in range or hand back
//! a [`VirtualIndex`] for lazy, random-access decoding. Mirrors the control
//! flow that scans to `hdrl`, parses headers, freezes a decode plan, scans
//! to `movi`, enumerates frames, then decodes or indexes them.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use crate::config::DecodeConfig;
use crate::decode::{decode_frame, PixelBuffer};
use crate::error::Result;
use crate::fourcc::{AVIH, HDRL, MOVI};
use crate::format::DecodePlan;
use crate::header::{self, AviMainHeader, StreamHeader};
use crate::index::VirtualIndex;
use crate::movie::scan_movie;
use crate::reader::ByteReader;
use crate::riff::{find_and_read, find_list_bounds, read_riff_header};
use crate::sink::{LogLevel, NullReporter, Reporter};

/// An opened AVI: header state is parsed once and is immutable thereafter.
/// The byte source stays live until `decode_frames` or `into_virtual_index`
/// consumes `self`.
pub struct AviFile<R> {
    reader: ByteReader<R>,
    main_header: AviMainHeader,
    stream_header: StreamHeader,
    plan: DecodePlan,
    stream_number: u32,
    movi_start: u64,
    movi_end: u64,
}

impl AviFile<File> {
    /// Opens a file on disk by path.
    pub fn open_path<P: AsRef<Path>>(path: P, reporter: &dyn Reporter) -> Result<Self> {
        Self::open(File::open(path)?, reporter)
    }
}

impl<R: Read + Seek> AviFile<R> {
    /// Parses `RIFF`/`hdrl`/`strl`/`strf` and locates `movi`, without
    /// enumerating a single frame yet — a cheap header-only probe a caller
    /// can use just to report metadata. `reporter` receives scanning
    /// diagnostics such as "non-video stream skipped".
    pub fn open(source: R, reporter: &dyn Reporter) -> Result<Self> {
        let mut reader = ByteReader::new(source)?;

        let riff_end = read_riff_header(&mut reader)?;

        let (hdrl_start, hdrl_end) = find_list_bounds(&mut reader, HDRL, riff_end, true)?
            .expect("find_list_bounds with required=true never returns Ok(None)");

        reader.seek(hdrl_start)?;
        let main_header = find_and_read(&mut reader, AVIH, false, hdrl_end, true, header::parse_main_header)?
            .expect("find_and_read with required=true never returns Ok(None)");

        let (stream_header, bitmap_info, stream_number) =
            header::select_video_stream(&mut reader, hdrl_end, reporter)?;
        let plan = DecodePlan::resolve(&bitmap_info)?;

        reader.seek(hdrl_end)?;
        let (movi_start, movi_end) = find_list_bounds(&mut reader, MOVI, riff_end, true)?
            .expect("find_list_bounds with required=true never returns Ok(None)");

        Ok(Self {
            reader,
            main_header,
            stream_header,
            plan,
            stream_number,
            movi_start,
            movi_end,
        })
    }

    pub fn main_header(&self) -> &AviMainHeader {
        &self.main_header
    }

    pub fn stream_header(&self) -> &StreamHeader {
        &self.stream_header
    }

    pub fn decode_plan(&self) -> &DecodePlan {
        &self.plan
    }

    fn scan(&mut self, config: &DecodeConfig, reporter: &dyn Reporter) -> Result<Vec<crate::movie::FrameRecord>> {
        scan_movie(
            &mut self.reader,
            self.movi_start,
            self.movi_end,
            self.stream_number,
            self.main_header.total_frames,
            self.main_header.micros_per_frame,
            config,
            reporter,
        )
    }

    /// Eagerly decodes every matched frame within `config`'s range into
    /// pixel buffers, releasing the byte source when done. A malformed
    /// frame chunk (truncated data, an unsupported layout, ...) fails the
    /// whole call — only running out of memory while growing the stack is
    /// recoverable, and that trims the stack to what was decoded so far.
    pub fn decode_frames(mut self, config: DecodeConfig, reporter: &dyn Reporter) -> Result<Vec<PixelBuffer>> {
        let records = self.scan(&config, reporter)?;

        let mut frames = Vec::new();
        for record in records {
            self.reader.seek(record.file_offset)?;
            let data = self.reader.read_exact(record.byte_size as usize)?;
            let buf = decode_frame(&data, &self.plan, config.convert_to_gray, config.flip_vertical)?;
            if frames.try_reserve(1).is_err() {
                reporter.log(
                    LogLevel::Warn,
                    "out of memory growing the eager frame stack; returning frames decoded so far",
                );
                return Ok(frames);
            }
            frames.push(buf);
        }
        Ok(frames)
    }

    /// Builds a [`VirtualIndex`] of frame records within `config`'s range;
    /// frames are decoded lazily through the returned index, which keeps the
    /// byte source open for its own lifetime.
    pub fn into_virtual_index(mut self, config: DecodeConfig, reporter: &dyn Reporter) -> Result<VirtualIndex<R>> {
        let records = self.scan(&config, reporter)?;
        Ok(VirtualIndex::new(self.reader, self.plan, config, records))
    }

    /// Dispatches on `config.is_virtual`.
    pub fn decode(self, config: DecodeConfig, reporter: &dyn Reporter) -> Result<Decoded<R>> {
        if config.is_virtual {
            Ok(Decoded::Virtual(self.into_virtual_index(config, reporter)?))
        } else {
            Ok(Decoded::Eager(self.decode_frames(config, reporter)?))
        }
    }
}

/// Header metadata only, with no byte source retained — returned by
/// [`probe`].
#[derive(Debug, Clone)]
pub struct AviProbe {
    pub main_header: AviMainHeader,
    pub stream_header: StreamHeader,
    pub decode_plan: DecodePlan,
}

/// Opens `source` just far enough to report its headers and decode plan,
/// then drops the byte source. Useful for a file-info listing where no
/// frame will ever be decoded.
pub fn probe<R: Read + Seek>(source: R, reporter: &dyn Reporter) -> Result<AviProbe> {
    let avi = AviFile::open(source, reporter)?;
    Ok(AviProbe {
        main_header: avi.main_header,
        stream_header: avi.stream_header,
        decode_plan: avi.plan,
    })
}

/// Either eagerly decoded pixel buffers or a lazy, random-access index —
/// chosen by [`DecodeConfig::is_virtual`].
pub enum Decoded<R> {
    Eager(Vec<PixelBuffer>),
    Virtual(VirtualIndex<R>),
}

impl<R> Decoded<R> {
    pub fn is_virtual(&self) -> bool {
        matches!(self, Decoded::Virtual(_))
    }
}

/// Convenience reporter for callers who want `decode`'s default behavior —
/// silent unless they pass their own [`Reporter`].
pub fn null_reporter() -> NullReporter {
    NullReporter
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

    fn list(list_type: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut inner = Vec::new();
        inner.extend_from_slice(list_type);
        inner.extend_from_slice(body);
        chunk(b"LIST", &inner)
    }

    fn avih(total_frames: u32, micros_per_frame: u32, width: u32, height: u32) -> Vec<u8> {
        let mut b = Vec::new();
        b.extend(micros_per_frame.to_le_bytes());
        b.extend(0u32.to_le_bytes());
        b.extend(0u32.to_le_bytes());
        b.extend(0u32.to_le_bytes());
        b.extend(total_frames.to_le_bytes());
        b.extend(0u32.to_le_bytes());
        b.extend(1u32.to_le_bytes());
        b.extend(0u32.to_le_bytes());
        b.extend(width.to_le_bytes());
        b.extend(height.to_le_bytes());
        b.extend([0u8; 16]);
        chunk(b"avih", &b)
    }

    fn strh_vids() -> Vec<u8> {
        let mut b = Vec::new();
        b.extend(*b"vids");
        b.extend(*b"\0\0\0\0");
        b.extend(0u32.to_le_bytes());
        b.extend(0u16.to_le_bytes());
        b.extend(0u16.to_le_bytes());
        b.extend(0u32.to_le_bytes());
        b.extend(1u32.to_le_bytes());
        b.extend(25u32.to_le_bytes());
        b.extend(0u32.to_le_bytes());
        b.extend(2u32.to_le_bytes());
        b.extend(0u32.to_le_bytes());
        b.extend(0u32.to_le_bytes());
        b.extend(0u32.to_le_bytes());
        b.extend([0u8; 8]);
        chunk(b"strh", &b)
    }

    fn strf_indexed_2x2() -> Vec<u8> {
        let mut b = Vec::new();
        b.extend(40u32.to_le_bytes());
        b.extend(2i32.to_le_bytes());
        b.extend((-2i32).to_le_bytes());
        b.extend(1u16.to_le_bytes());
        b.extend(8u16.to_le_bytes());
        b.extend(0u32.to_le_bytes());
        b.extend(0u32.to_le_bytes());
        b.extend(0i32.to_le_bytes());
        b.extend(0i32.to_le_bytes());
        b.extend(4u32.to_le_bytes());
        b.extend(0u32.to_le_bytes());
        b.extend([0, 0, 0, 0]);
        b.extend([0, 0, 255, 0]);
        b.extend([0, 255, 0, 0]);
        b.extend([255, 0, 0, 0]);
        chunk(b"strf", &b)
    }

    fn build_minimal_avi() -> Vec<u8> {
        let mut strl_body = Vec::new();
        strl_body.extend(strh_vids());
        strl_body.extend(strf_indexed_2x2());
        let strl = list(b"strl", &strl_body);

        let mut hdrl_body = Vec::new();
        hdrl_body.extend(avih(2, 40000, 2, 2));
        hdrl_body.extend(strl);
        let hdrl = list(b"hdrl", &hdrl_body);

        let mut movi_body = Vec::new();
        movi_body.extend(chunk(b"00db", &[0, 1, 0, 0, 2, 3, 0, 0]));
        movi_body.extend(chunk(b"00db", &[3, 2, 0, 0, 1, 0, 0, 0]));
        let movi = list(b"movi", &movi_body);

        let mut riff_body = Vec::new();
        riff_body.extend(*b"AVI ");
        riff_body.extend(hdrl);
        riff_body.extend(movi);

        let mut file = Vec::new();
        file.extend(*b"RIFF");
        file.extend((riff_body.len() as u32).to_le_bytes());
        file.extend(riff_body);
        file
    }

    #[test]
    fn open_path_reads_an_on_disk_file() {
        use std::io::Write;

        let bytes = build_minimal_avi();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();

        let avi = AviFile::open_path(file.path(), &NullReporter).unwrap();
        assert_eq!(avi.main_header().total_frames, 2);

        let frames = avi.decode_frames(DecodeConfig::default(), &NullReporter).unwrap();
        assert_eq!(frames.len(), 2);
    }

    #[test]
    fn s1_end_to_end_indexed_two_frames() {
        let bytes = build_minimal_avi();
        let avi = AviFile::open(Cursor::new(bytes), &NullReporter).unwrap();
        assert_eq!(avi.main_header().total_frames, 2);
        assert_eq!(avi.main_header().micros_per_frame, 40000);

        let frames = avi.decode_frames(DecodeConfig::default(), &NullReporter).unwrap();
        assert_eq!(frames.len(), 2);
        match &frames[0] {
            PixelBuffer::Gray8 { bytes, .. } => assert_eq!(bytes, &vec![0, 1, 2, 3]),
            _ => panic!("expected Gray8"),
        }
        match &frames[1] {
            PixelBuffer::Gray8 { bytes, .. } => assert_eq!(bytes, &vec![3, 2, 1, 0]),
            _ => panic!("expected Gray8"),
        }
    }

    #[test]
    fn virtual_index_decodes_on_demand() {
        let bytes = build_minimal_avi();
        let avi = AviFile::open(Cursor::new(bytes), &NullReporter).unwrap();
        let config = DecodeConfig { is_virtual: true, ..Default::default() };
        let mut index = avi.into_virtual_index(config, &NullReporter).unwrap();
        assert_eq!(index.size(), 2);
        assert_eq!(index.slice_label(1).unwrap(), "0 s");
        assert_eq!(index.slice_label(2).unwrap(), "0.04 s");
        match index.get_processor(2).unwrap() {
            PixelBuffer::Gray8 { bytes, .. } => assert_eq!(bytes, vec![3, 2, 1, 0]),
            _ => panic!("expected Gray8"),
        }
    }

    #[test]
    fn decode_dispatches_on_is_virtual() {
        let bytes = build_minimal_avi();
        let avi = AviFile::open(Cursor::new(bytes), &NullReporter).unwrap();
        let config = DecodeConfig { is_virtual: true, ..Default::default() };
        let decoded = avi.decode(config, &NullReporter).unwrap();
        assert!(decoded.is_virtual());
    }

    #[test]
    fn probe_reports_headers_without_decoding() {
        let bytes = build_minimal_avi();
        let info = probe(Cursor::new(bytes), &NullReporter).unwrap();
        assert_eq!(info.main_header.total_frames, 2);
        assert_eq!(info.stream_header.stream_kind, *b"vids");
    }

    #[test]
    fn not_an_avi_is_rejected() {
        let err = AviFile::open(Cursor::new(vec![0u8; 32]), &NullReporter).unwrap_err();
        assert!(matches!(err, crate::error::AviError::NotAnAvi));
    }
}
