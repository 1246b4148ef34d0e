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

//! Four-byte ASCII tags used throughout RIFF/AVI for chunk and compression ids.

use std::fmt;
use std::str;

/// A four-character code, stored in on-disk byte order.
pub type FourCC = [u8; 4];

pub const fn fourcc(s: &[u8; 4]) -> FourCC {
    *s
}

pub const RIFF: FourCC = *b"RIFF";
pub const AVI_: FourCC = *b"AVI ";
pub const LIST: FourCC = *b"LIST";
pub const JUNK: FourCC = *b"JUNK";
pub const HDRL: FourCC = *b"hdrl";
pub const AVIH: FourCC = *b"avih";
pub const STRL: FourCC = *b"strl";
pub const STRH: FourCC = *b"strh";
pub const STRF: FourCC = *b"strf";
pub const MOVI: FourCC = *b"movi";
pub const VIDS: FourCC = *b"vids";

/// Reads a [`FourCC`] as UTF-8 when possible, falling back to a hex dump —
/// mirrors the teacher's `format_fourcc` helper in `avi.rs`.
pub fn display(value: FourCC) -> String {
    match str::from_utf8(&value) {
        Ok(s) if s.chars().all(|c| c.is_ascii_graphic() || c == ' ') => s.to_string(),
        _ => format!("{:02x}{:02x}{:02x}{:02x}", value[0], value[1], value[2], value[3]),
    }
}

/// Wrapper used only where a `Display` impl is more convenient than calling
/// [`display`] directly (e.g. inside `#[error(...)]` format strings).
pub struct Fourcc(pub FourCC);

impl fmt::Display for Fourcc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", display(self.0))
    }
}

impl fmt::Debug for Fourcc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", display(self.0))
    }
}

/// Builds the movie-data chunk id `NNdb`/`NNdc` for a given stream number, per
/// §4.4: the two low bytes spell the stream index as ASCII digits, the two
/// high bytes are the literal `db`/`dc` tag.
pub fn stream_chunk_id(stream_number: u32, tag: &[u8; 2]) -> FourCC {
    let tens = b'0' + ((stream_number / 10) % 10) as u8;
    let ones = b'0' + (stream_number % 10) as u8;
    [tens, ones, tag[0], tag[1]]
}
