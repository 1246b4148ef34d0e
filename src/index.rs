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

//! Virtual (lazy) frame index (component G): stores `FrameRecord`s in
//! discovery order and decodes on demand, holding the byte source for its
//! whole lifetime (§5's "scoped acquisition").

use std::io::{Read, Seek};

use crate::config::DecodeConfig;
use crate::decode::{decode_frame, PixelBuffer};
use crate::error::{AviError, Result};
use crate::format::DecodePlan;
use crate::movie::FrameRecord;
use crate::reader::ByteReader;

/// Lazily-decoded, random-access view over a stream's frames. Frame numbers
/// are 1-based; deleting an entry preserves the order of the survivors
/// (§3 invariant 4) without renumbering them — `get_processor`/`slice_label`
/// always address the *current* position in `records`.
pub struct VirtualIndex<R> {
    reader: ByteReader<R>,
    plan: DecodePlan,
    config: DecodeConfig,
    records: Vec<FrameRecord>,
}

impl<R: Read + Seek> VirtualIndex<R> {
    pub fn new(reader: ByteReader<R>, plan: DecodePlan, config: DecodeConfig, records: Vec<FrameRecord>) -> Self {
        Self { reader, plan, config, records }
    }

    pub fn size(&self) -> usize {
        self.records.len()
    }

    /// Decodes frame `n` (1-based). Out-of-range `n` is
    /// [`AviError::IndexOutOfRange`] — a programming error, distinct from a
    /// data-read failure.
    pub fn get_processor(&mut self, n: usize) -> Result<PixelBuffer> {
        let record = *self
            .records
            .get(n.wrapping_sub(1))
            .ok_or(AviError::IndexOutOfRange(n))?;

        self.reader.seek(record.file_offset)?;
        let data = self.reader.read_exact(record.byte_size as usize)?;
        decode_frame(&data, &self.plan, self.config.convert_to_gray, self.config.flip_vertical)
    }

    /// Removes frame `n` (1-based) from the index, shifting later frames
    /// down by one but never reordering the survivors.
    pub fn delete(&mut self, n: usize) -> Result<()> {
        if n == 0 || n > self.records.len() {
            return Err(AviError::IndexOutOfRange(n));
        }
        self.records.remove(n - 1);
        Ok(())
    }

    /// `"<seconds, up to 3 decimals> s"`, derived from `timestamp_micros / 1e6`.
    pub fn slice_label(&self, n: usize) -> Result<String> {
        let record = self.records.get(n.wrapping_sub(1)).ok_or(AviError::IndexOutOfRange(n))?;
        Ok(format_seconds(record.timestamp_micros))
    }

    pub fn records(&self) -> &[FrameRecord] {
        &self.records
    }
}

fn format_seconds(timestamp_micros: u64) -> String {
    let seconds = timestamp_micros as f64 / 1_000_000.0;
    let mut formatted = format!("{seconds:.3}");
    if formatted.contains('.') {
        while formatted.ends_with('0') {
            formatted.pop();
        }
        if formatted.ends_with('.') {
            formatted.pop();
        }
    }
    format!("{formatted} s")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Layout;
    use std::io::Cursor;

    fn index_with(records: Vec<FrameRecord>) -> VirtualIndex<Cursor<Vec<u8>>> {
        let reader = ByteReader::new(Cursor::new(vec![0u8; 64])).unwrap();
        let plan = DecodePlan {
            bits: 8,
            layout: Layout::Gray8,
            top_down: true,
            width: 1,
            height: 1,
            stride: 4,
            palette: None,
        };
        VirtualIndex::new(reader, plan, DecodeConfig::default(), records)
    }

    fn record(ts: u64) -> FrameRecord {
        FrameRecord { file_offset: 0, byte_size: 4, timestamp_micros: ts }
    }

    #[test]
    fn slice_labels_match_scenario_s1() {
        let idx = index_with(vec![record(0), record(40_000)]);
        assert_eq!(idx.slice_label(1).unwrap(), "0 s");
        assert_eq!(idx.slice_label(2).unwrap(), "0.04 s");
    }

    #[test]
    fn consecutive_labels_differ_by_frame_period() {
        let idx = index_with(vec![record(40_000), record(80_000)]);
        assert_eq!(idx.slice_label(1).unwrap(), "0.04 s");
        assert_eq!(idx.slice_label(2).unwrap(), "0.08 s");
    }

    #[test]
    fn delete_preserves_order_of_survivors() {
        let mut idx = index_with(vec![record(0), record(1), record(2)]);
        idx.delete(2).unwrap();
        assert_eq!(idx.size(), 2);
        assert_eq!(idx.records()[0].timestamp_micros, 0);
        assert_eq!(idx.records()[1].timestamp_micros, 2);
    }

    #[test]
    fn out_of_range_is_index_out_of_range_error() {
        let mut idx = index_with(vec![record(0)]);
        assert!(matches!(idx.get_processor(2), Err(AviError::IndexOutOfRange(2))));
        assert!(matches!(idx.delete(0), Err(AviError::IndexOutOfRange(0))));
    }
}
