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

//! The reporting sink collaborator (§6): structured `log`/`progress` calls
//! emitted during scanning and frame iteration. Kept abstract like the
//! teacher's `Video`/`ImageCodec` traits in `video_format.rs`/`codec.rs` so
//! a host application can plug in its own progress bar or log pane without
//! this crate depending on it.

/// Severity for [`Reporter::log`], mirroring the levels `tracing` already
/// defines so a [`TracingReporter`] can forward them without translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Structured progress/log surface a host application supplies. The default
/// implementations are no-ops, so implementing only one method is enough.
pub trait Reporter {
    fn log(&self, _level: LogLevel, _message: &str) {}
    /// `fraction` is in `[0, 1]`.
    fn progress(&self, _fraction: f64) {}
}

/// A [`Reporter`] that discards everything — the default when a caller
/// doesn't care about scan progress or diagnostics.
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Bridges [`Reporter`] calls into `tracing` events, for callers who'd
/// rather install a global subscriber than hold onto a `&dyn Reporter`.
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Trace => tracing::trace!("{message}"),
            LogLevel::Debug => tracing::debug!("{message}"),
            LogLevel::Info => tracing::info!("{message}"),
            LogLevel::Warn => tracing::warn!("{message}"),
            LogLevel::Error => tracing::error!("{message}"),
        }
    }

    fn progress(&self, fraction: f64) {
        tracing::trace!(fraction, "avi scan progress");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_reporter_accepts_any_call() {
        let r = NullReporter;
        r.log(LogLevel::Info, "hello");
        r.progress(0.5);
    }
}
