//! Archive creation.
//!
//! Sources are walked and classified first; an unsupported node aborts the
//! operation before the output file is created. Entries are then streamed
//! into the format writer.

pub mod compression;
pub mod config;
pub mod report;
pub mod tar;
pub mod walker;
pub mod zip;

pub use config::CreationConfig;
pub use report::CreationReport;

use std::io::Write;

/// A compressor whose trailer must be written explicitly.
pub(crate) trait FinishStream: Write {
    /// The writer underneath the compressor.
    type Inner;

    /// Writes the trailer and returns the inner writer.
    fn finish_stream(self) -> std::io::Result<Self::Inner>;
}

impl<W: Write> FinishStream for flate2::write::GzEncoder<W> {
    type Inner = W;

    fn finish_stream(self) -> std::io::Result<W> {
        self.finish()
    }
}

impl<W: Write> FinishStream for ::zstd::stream::write::Encoder<'_, W> {
    type Inner = W;

    fn finish_stream(self) -> std::io::Result<W> {
        self.finish()
    }
}
