//! Compression stream plumbing shared by the tar codecs.

pub mod pool;

use crate::Result;
use crate::creation::compression::compression_level_to_zstd;
use pool::Pooled;
use std::io::BufRead;
use std::io::Write;
use zstd::zstd_safe::CCtx;
use zstd::zstd_safe::DCtx;

/// Compression context for one tar.zst write, taken from the shared pool.
pub(crate) fn zstd_write_context(level: Option<u8>) -> Result<Pooled<'static, CCtx<'static>>> {
    pool::compression_context(compression_level_to_zstd(level))
}

/// Decompression context for one tar.zst read, taken from the shared pool.
pub(crate) fn zstd_read_context() -> Result<Pooled<'static, DCtx<'static>>> {
    pool::decompression_context()
}

/// Wraps `writer` in a zstd encoder driven by a pooled context.
pub(crate) fn zstd_encoder<'a, W: Write>(
    writer: W,
    ctx: &'a mut CCtx<'static>,
) -> zstd::stream::write::Encoder<'a, W> {
    zstd::stream::write::Encoder::with_context(writer, ctx)
}

/// Wraps `reader` in a zstd decoder driven by a pooled context.
pub(crate) fn zstd_decoder<'a, R: BufRead>(
    reader: R,
    ctx: &'a mut DCtx<'static>,
) -> zstd::stream::read::Decoder<'a, R> {
    zstd::stream::read::Decoder::with_context(reader, ctx)
}
