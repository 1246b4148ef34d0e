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

use std::path::PathBuf;

use clap::Parser;

use avi_core::avi::{self, Decoded};
use avi_core::config::DecodeConfig;
use avi_core::fourcc;
use avi_core::sink::TracingReporter;

#[derive(Parser, Debug)]
#[command(name = "avi-inspect")]
#[command(about = "Inspect and decode an AVI file's headers and frames", long_about = None)]
struct Cli {
    /// Input AVI file
    #[arg(value_name = "INPUT.avi")]
    input: PathBuf,

    /// 1-based inclusive start frame
    #[arg(long, default_value_t = 1)]
    first_frame: u32,

    /// Inclusive end frame; 0 means until EOF, negative counts back from the last frame
    #[arg(long, default_value_t = 0)]
    last_frame: i64,

    /// Build a lazily-decoded index instead of decoding every frame up front
    #[arg(long, action = clap::ArgAction::SetTrue)]
    virtual_index: bool,

    /// Force grayscale output
    #[arg(long, action = clap::ArgAction::SetTrue)]
    gray: bool,

    /// Flip every frame vertically
    #[arg(long, action = clap::ArgAction::SetTrue)]
    flip: bool,

    /// Only print headers; never touch `movi`
    #[arg(long, action = clap::ArgAction::SetTrue)]
    probe: bool,
}

fn main() -> avi_core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.probe {
        let info = avi::probe(std::fs::File::open(&cli.input)?, &TracingReporter)?;
        print_headers(&info.main_header, &info.stream_header);
        println!("decode plan: {:?}", info.decode_plan.layout);
        return Ok(());
    }

    let file = avi_core::AviFile::open_path(&cli.input, &TracingReporter)?;
    print_headers(file.main_header(), file.stream_header());

    let config = DecodeConfig {
        first_frame_number: cli.first_frame,
        last_frame_number: cli.last_frame,
        is_virtual: cli.virtual_index,
        convert_to_gray: cli.gray,
        flip_vertical: cli.flip,
    };

    match file.decode(config, &TracingReporter)? {
        Decoded::Eager(frames) => {
            println!("decoded {} frame(s) eagerly", frames.len());
            for (i, frame) in frames.iter().enumerate() {
                println!("  frame {}: {}x{}", i + 1, frame.width(), frame.height());
            }
        }
        Decoded::Virtual(mut index) => {
            println!("built virtual index of {} frame(s)", index.size());
            if index.size() > 0 {
                let label = index.slice_label(1)?;
                let first = index.get_processor(1)?;
                println!("  frame 1 ({label}): {}x{}", first.width(), first.height());
            }
        }
    }

    Ok(())
}

fn print_headers(main_header: &avi_core::header::AviMainHeader, stream_header: &avi_core::header::StreamHeader) {
    println!(
        "{} frame(s), {} us/frame, stream kind '{}', handler '{}'",
        main_header.total_frames,
        main_header.micros_per_frame,
        fourcc::display(stream_header.stream_kind),
        fourcc::display(stream_header.fcc_handler),
    );
}
