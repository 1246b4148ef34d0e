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

//! Format resolver (component D): maps a `BitmapInfo` to a normalized,
//! immutable [`DecodePlan`].

use crate::error::{AviError, Result};
use crate::fourcc::Fourcc;
use crate::header::{BitmapInfo, Palette};

/// The normalized pixel layout a [`DecodePlan`] decodes into. Compression
/// synonyms are folded at plan time so the frame decoder (component F) only
/// ever has to match on this enum, never on a raw FourCC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Rgb,
    IndexedPalette,
    Gray8,
    Gray16,
    Ayuv,
    Uyvy,
    Yuy2,
    Yvyu,
}

/// A frozen decode recipe derived from one `strf` chunk. Everything the
/// frame decoder needs — bit depth, byte layout, orientation, stride and an
/// optional palette — lives here so decoding never re-reads the format
/// header.
#[derive(Debug, Clone)]
pub struct DecodePlan {
    pub bits: u16,
    pub layout: Layout,
    pub top_down: bool,
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub palette: Option<Palette>,
}

impl DecodePlan {
    pub fn resolve(info: &BitmapInfo) -> Result<Self> {
        let compression = info.compression;
        let bits = info.bit_count;

        let (layout, default_top_down) = match (compression_family(compression), bits) {
            (CompressionFamily::Rgb, 8) => (Layout::IndexedPalette, info.height < 0),
            (CompressionFamily::Rgb, 24 | 32) => (Layout::Rgb, info.height < 0),
            (CompressionFamily::Gray8, 8) => (Layout::Gray8, true),
            (CompressionFamily::Gray16, 16) => (Layout::Gray16, info.height < 0),
            (CompressionFamily::Ayuv, 32) => (Layout::Ayuv, info.height < 0),
            (CompressionFamily::Uyvy, 16) => (Layout::Uyvy, true),
            (CompressionFamily::Cyuv, 16) => (Layout::Uyvy, info.height < 0),
            (CompressionFamily::Yuy2, 16) => (Layout::Yuy2, true),
            (CompressionFamily::Yvyu, 16) => (Layout::Yvyu, true),
            (family, bits) => {
                return Err(unsupported(family, compression, bits));
            }
        };

        let width = info.width.unsigned_abs();
        let height = info.height.unsigned_abs();
        let stride = ((width * bits as u32 + 31) / 32) * 4;

        let palette = if layout == Layout::IndexedPalette {
            Some(info.palette.clone().unwrap_or_else(|| Palette {
                r: [0; 256],
                g: [0; 256],
                b: [0; 256],
                len: 1usize << bits,
            }))
        } else {
            None
        };

        Ok(DecodePlan {
            bits,
            layout,
            top_down: default_top_down,
            width,
            height,
            stride,
            palette,
        })
    }
}

enum CompressionFamily {
    Rgb,
    Gray8,
    Gray16,
    Ayuv,
    Uyvy,
    Cyuv,
    Yuy2,
    Yvyu,
    Unknown,
}

fn compression_family(compression: u32) -> CompressionFamily {
    let tag = compression.to_le_bytes();
    match &tag {
        b"\0\0\0\0" | b"RGB " | b"RAW " => CompressionFamily::Rgb,
        b"Y800" | b"Y8  " | b"GREY" => CompressionFamily::Gray8,
        b"Y16 " => CompressionFamily::Gray16,
        b"AYUV" => CompressionFamily::Ayuv,
        b"UYVY" | b"UYNV" => CompressionFamily::Uyvy,
        b"cyuv" | b"V422" => CompressionFamily::Cyuv,
        b"YUY2" | b"YUNV" | b"YUYV" => CompressionFamily::Yuy2,
        b"YVYU" => CompressionFamily::Yvyu,
        _ => CompressionFamily::Unknown,
    }
}

fn unsupported(family: CompressionFamily, compression: u32, bits: u16) -> AviError {
    match family {
        CompressionFamily::Unknown => {
            AviError::UnsupportedCompression(Fourcc(compression.to_le_bytes()))
        }
        _ => AviError::UnsupportedBitCount {
            bits,
            compression: Fourcc(compression.to_le_bytes()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(compression: &[u8; 4], bit_count: u16, width: i32, height: i32) -> BitmapInfo {
        BitmapInfo {
            width,
            height,
            bit_count,
            compression: u32::from_le_bytes(*compression),
            colors_used: 0,
            palette: None,
        }
    }

    #[test]
    fn rgb_8bit_resolves_to_indexed_palette() {
        let plan = DecodePlan::resolve(&info(b"\0\0\0\0", 8, 2, -2)).unwrap();
        assert_eq!(plan.layout, Layout::IndexedPalette);
        assert!(plan.top_down);
        assert_eq!(plan.stride, 4); // ((2*8+31)/32)*4
    }

    #[test]
    fn rgb_24bit_bottom_up_by_default() {
        let plan = DecodePlan::resolve(&info(b"RGB ", 24, 1, 1)).unwrap();
        assert_eq!(plan.layout, Layout::Rgb);
        assert!(!plan.top_down);
        assert_eq!(plan.stride, 4); // ((1*24+31)/32)*4
    }

    #[test]
    fn yuy2_folds_synonyms() {
        for tag in [b"YUY2", b"YUNV", b"YUYV"] {
            let plan = DecodePlan::resolve(&info(tag, 16, 4, 1)).unwrap();
            assert_eq!(plan.layout, Layout::Yuy2);
            assert!(plan.top_down);
        }
    }

    #[test]
    fn uyvy_folds_cyuv_and_v422_with_declared_orientation() {
        let plan = DecodePlan::resolve(&info(b"cyuv", 16, 4, -1)).unwrap();
        assert_eq!(plan.layout, Layout::Uyvy);
        assert!(plan.top_down);

        let plan = DecodePlan::resolve(&info(b"V422", 16, 4, 1)).unwrap();
        assert_eq!(plan.layout, Layout::Uyvy);
        assert!(!plan.top_down);
    }

    #[test]
    fn unsupported_compression_errors() {
        let err = DecodePlan::resolve(&info(b"DIVX", 24, 4, 4)).unwrap_err();
        assert!(matches!(err, AviError::UnsupportedCompression(_)));
    }

    #[test]
    fn unsupported_bit_count_for_known_compression_errors() {
        let err = DecodePlan::resolve(&info(b"YUY2", 8, 4, 4)).unwrap_err();
        assert!(matches!(err, AviError::UnsupportedBitCount { .. }));
    }
}
