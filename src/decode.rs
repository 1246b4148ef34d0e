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

//! Frame decoder (component F): unpacks one frame's raw bytes per a
//! [`DecodePlan`] into 8-bit indexed/gray or 32-bit packed RGBA pixels.

use crate::error::{AviError, Result};
use crate::format::{DecodePlan, Layout};
use crate::header::Palette;

/// Either of the two buffer kinds a host application renders (§6). `Gray8`
/// carries an optional palette rather than resolving it to RGB at decode
/// time — the display collaborator decides how to interpret indexed data.
#[derive(Debug, Clone)]
pub enum PixelBuffer {
    Gray8 {
        width: u32,
        height: u32,
        bytes: Vec<u8>,
        palette: Option<Palette>,
    },
    Rgba32 {
        width: u32,
        height: u32,
        pixels: Vec<u32>,
    },
}

impl PixelBuffer {
    pub fn width(&self) -> u32 {
        match self {
            PixelBuffer::Gray8 { width, .. } => *width,
            PixelBuffer::Rgba32 { width, .. } => *width,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            PixelBuffer::Gray8 { height, .. } => *height,
            PixelBuffer::Rgba32 { height, .. } => *height,
        }
    }
}

fn is_always_gray(layout: Layout) -> bool {
    matches!(layout, Layout::IndexedPalette | Layout::Gray8 | Layout::Gray16)
}

/// Decodes one frame's chunk payload (`data`) according to `plan`.
///
/// `convert_to_gray` forces grayscale output for layouts that would
/// otherwise produce color; `flip_vertical` XORs the plan's `top_down` flag
/// when choosing each row's destination (§4.5).
pub fn decode_frame(
    data: &[u8],
    plan: &DecodePlan,
    convert_to_gray: bool,
    flip_vertical: bool,
) -> Result<PixelBuffer> {
    let stride = plan.stride as u64;
    let needed = stride * plan.height as u64;
    if (data.len() as u64) < needed {
        return Err(AviError::TruncatedFrame {
            expected: needed,
            got: data.len() as u64,
        });
    }

    let width = plan.width as usize;
    let height = plan.height as usize;
    let gray_output = is_always_gray(plan.layout) || convert_to_gray;
    let orient_top_down = plan.top_down ^ flip_vertical;

    if gray_output {
        let mut bytes = vec![0u8; width * height];
        for i in 0..height {
            let row = &data[i * plan.stride as usize..i * plan.stride as usize + plan.stride as usize];
            let dst_row = if orient_top_down { i } else { height - 1 - i };
            let dst = &mut bytes[dst_row * width..dst_row * width + width];
            decode_row_gray(row, plan, dst);
        }
        Ok(PixelBuffer::Gray8 {
            width: plan.width,
            height: plan.height,
            bytes,
            palette: plan.palette.clone(),
        })
    } else {
        let mut pixels = vec![0u32; width * height];
        for i in 0..height {
            let row = &data[i * plan.stride as usize..i * plan.stride as usize + plan.stride as usize];
            let dst_row = if orient_top_down { i } else { height - 1 - i };
            let dst = &mut pixels[dst_row * width..dst_row * width + width];
            decode_row_rgba(row, plan, dst);
        }
        Ok(PixelBuffer::Rgba32 {
            width: plan.width,
            height: plan.height,
            pixels,
        })
    }
}

fn decode_row_gray(row: &[u8], plan: &DecodePlan, dst: &mut [u8]) {
    let width = dst.len();
    match plan.layout {
        Layout::IndexedPalette | Layout::Gray8 => {
            dst.copy_from_slice(&row[..width]);
        }
        Layout::Gray16 => {
            for x in 0..width {
                dst[x] = row[x * 2 + 1]; // MSB of the little-endian 16-bit sample
            }
        }
        Layout::Rgb => {
            let bpp = (plan.bits / 8) as usize;
            for x in 0..width {
                let o = x * bpp;
                let (b, g, r) = (row[o] as u32, row[o + 1] as u32, row[o + 2] as u32);
                dst[x] = ((b * 934 + g * 4809 + r * 2449 + 4096) >> 13) as u8;
            }
        }
        Layout::Yuy2 | Layout::Yvyu => {
            for x in 0..width {
                dst[x] = row[2 * x];
            }
        }
        Layout::Uyvy => {
            for x in 0..width {
                dst[x] = row[2 * x + 1];
            }
        }
        Layout::Ayuv => {
            for x in 0..width {
                dst[x] = row[4 * x + 1];
            }
        }
    }
}

fn decode_row_rgba(row: &[u8], plan: &DecodePlan, dst: &mut [u32]) {
    let width = dst.len();
    match plan.layout {
        Layout::Rgb => {
            let bpp = (plan.bits / 8) as usize;
            for x in 0..width {
                let o = x * bpp;
                let (b, g, r) = (row[o] as u32, row[o + 1] as u32, row[o + 2] as u32);
                dst[x] = 0xff000000 | b | (g << 8) | (r << 16);
            }
        }
        Layout::Yuy2 => {
            for g in 0..width / 2 {
                let o = g * 4;
                let (y0, u, y1, v) = (row[o], row[o + 1], row[o + 2], row[o + 3]);
                dst[2 * g] = yuv_to_rgba(y0, u, v);
                dst[2 * g + 1] = yuv_to_rgba(y1, u, v);
            }
        }
        Layout::Uyvy => {
            for g in 0..width / 2 {
                let o = g * 4;
                let (u, y0, v, y1) = (row[o], row[o + 1], row[o + 2], row[o + 3]);
                dst[2 * g] = yuv_to_rgba(y0, u, v);
                dst[2 * g + 1] = yuv_to_rgba(y1, u, v);
            }
        }
        Layout::Yvyu => {
            for g in 0..width / 2 {
                let o = g * 4;
                let (y0, v, y1, u) = (row[o], row[o + 1], row[o + 2], row[o + 3]);
                dst[2 * g] = yuv_to_rgba(y0, u, v);
                dst[2 * g + 1] = yuv_to_rgba(y1, u, v);
            }
        }
        Layout::Ayuv => {
            for x in 0..width {
                let o = x * 4;
                let (y, v, u) = (row[o + 1], row[o + 2], row[o + 3]);
                dst[x] = yuv_to_rgba(y, u, v);
            }
        }
        Layout::IndexedPalette | Layout::Gray8 | Layout::Gray16 => unreachable!(
            "decode_row_rgba is never called for always-gray layouts"
        ),
    }
}

/// Fixed-point YUV→RGB matching the source's constants verbatim (§4.5,
/// design note §9) — not standard BT.601, kept bit-for-bit compatible.
fn yuv_to_rgba(y: u8, u_byte: u8, v_byte: u8) -> u32 {
    let y = y as i64;
    let u = ((u_byte ^ 0x80) as i8) as i64;
    let v = ((v_byte ^ 0x80) as i8) as i64;

    let r = clamp_u8((9535 * y + 13074 * v - 148464) >> 13);
    let g = clamp_u8((9535 * y - 6660 * v - 3203 * u - 148464) >> 13);
    let b = clamp_u8((9535 * y + 16531 * u - 148464) >> 13);

    0xff000000 | (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
}

fn clamp_u8(v: i64) -> u8 {
    v.clamp(0, 255) as u8
}
