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

//! A RIFF/AVI container parser and uncompressed/packed-YUV video decoder.
//!
//! The pipeline is a chain of small components, each its own module:
//!
//! - [`reader`] — little-endian byte primitives over a seekable source.
//! - [`riff`] — chunk/LIST scanning.
//! - [`header`] — `avih`/`strh`/`strf` and palette parsing.
//! - [`format`] — resolves a `strf` into an immutable [`format::DecodePlan`].
//! - [`movie`] — walks `movi` into a list of frame records.
//! - [`decode`] — turns one frame's bytes into a [`decode::PixelBuffer`].
//! - [`index`] — a lazy, random-access [`index::VirtualIndex`] over frames.
//!
//! [`avi::AviFile`] wires these together behind a single entry point.

pub mod avi;
pub mod config;
pub mod decode;
pub mod error;
pub mod format;
pub mod fourcc;
pub mod header;
pub mod index;
pub mod movie;
pub mod reader;
pub mod riff;
pub mod sink;

pub use avi::{AviFile, AviProbe, Decoded};
pub use config::DecodeConfig;
pub use error::{AviError, Result};
