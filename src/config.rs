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

//! Explicit, immutable decode configuration (§6, design note §9). The
//! teacher's dialog keeps these as process-wide mutable state; here they are
//! passed into the decoder once at construction time and never retained
//! across invocations.

/// Options that shape how an [`crate::avi::AviFile`] enumerates and decodes
/// frames.
#[derive(Debug, Clone)]
pub struct DecodeConfig {
    /// 1-based inclusive start frame (must be `>= 1`).
    pub first_frame_number: u32,
    /// `>0` inclusive end frame; `0` means until EOF; `<0` means
    /// `total_frames + value`.
    pub last_frame_number: i64,
    /// If true, only a [`crate::index::VirtualIndex`] is built; frames are
    /// decoded on demand rather than eagerly.
    pub is_virtual: bool,
    /// Force grayscale output for color sources.
    pub convert_to_gray: bool,
    /// XOR the source's `top_down` flag.
    pub flip_vertical: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            first_frame_number: 1,
            last_frame_number: 0,
            is_virtual: false,
            convert_to_gray: false,
            flip_vertical: false,
        }
    }
}
