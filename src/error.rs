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

use crate::fourcc::Fourcc;
use thiserror::Error;

/// Everything that can go wrong while scanning, parsing or decoding an AVI.
#[derive(Debug, Error)]
pub enum AviError {
    #[error("not an AVI file: missing RIFF/AVI header")]
    NotAnAvi,

    #[error("missing required chunk '{0}'")]
    MissingRequiredChunk(Fourcc),

    #[error("unsupported compression '{0}'")]
    UnsupportedCompression(Fourcc),

    #[error("unsupported bit count {bits} for compression '{compression}'")]
    UnsupportedBitCount { bits: u16, compression: Fourcc },

    #[error("unsupported sample size {0} (multi-sample-per-chunk streams are not supported)")]
    UnsupportedMultisample(u32),

    #[error("palette truncated: expected {expected} bytes, found {found}")]
    TruncatedPalette { expected: usize, found: usize },

    #[error("frame truncated: expected at least {expected} bytes, got {got}")]
    TruncatedFrame { expected: u64, got: u64 },

    #[error("unexpected end of file")]
    UnexpectedEof,

    #[error("frame index {0} is out of range")]
    IndexOutOfRange(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AviError>;
