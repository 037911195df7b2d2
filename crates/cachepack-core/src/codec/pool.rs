//! Reusable codec contexts.
//!
//! zstd compression and decompression contexts are expensive to allocate.
//! [`Pool`] keeps released contexts for the next operation; a [`Pooled`]
//! guard owns its context exclusively and hands it back when dropped, on
//! success and error paths alike.

use crate::Result;
use once_cell::sync::Lazy;
use std::ops::Deref;
use std::ops::DerefMut;
use std::sync::Mutex;
use zstd::zstd_safe;
use zstd::zstd_safe::CCtx;
use zstd::zstd_safe::CParameter;
use zstd::zstd_safe::DCtx;
use zstd::zstd_safe::ResetDirective;

/// Contexts kept per pool. Extra releases are dropped.
const MAX_POOLED: usize = 4;

/// A bounded pool of reusable values.
pub struct Pool<T> {
    items: Mutex<Vec<T>>,
    capacity: usize,
}

impl<T> Pool<T> {
    /// Creates an empty pool retaining at most `capacity` values.
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            capacity,
        }
    }

    /// Takes a pooled value, or builds one with `create` when the pool is
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns whatever `create` returns.
    pub fn acquire<F>(&self, create: F) -> Result<Pooled<'_, T>>
    where
        F: FnOnce() -> Result<T>,
    {
        let reused = self.lock().pop();
        let item = match reused {
            Some(item) => item,
            None => create()?,
        };
        Ok(Pooled {
            pool: self,
            item: Some(item),
        })
    }

    /// Number of idle values currently held.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.lock().len()
    }

    fn release(&self, item: T) {
        let mut items = self.lock();
        if items.len() < self.capacity {
            items.push(item);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<T>> {
        // A panic while holding the lock leaves only a Vec behind.
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Exclusive handle to a pooled value; returns it to the pool on drop.
pub struct Pooled<'a, T> {
    pool: &'a Pool<T>,
    item: Option<T>,
}

impl<T> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // `item` is only taken in `drop`.
        self.item.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl<T> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.item.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl<T> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.release(item);
        }
    }
}

static COMPRESSION_CONTEXTS: Lazy<Pool<CCtx<'static>>> = Lazy::new(|| Pool::new(MAX_POOLED));
static DECOMPRESSION_CONTEXTS: Lazy<Pool<DCtx<'static>>> = Lazy::new(|| Pool::new(MAX_POOLED));

/// Acquires a compression context configured for `level`, with content
/// checksums enabled.
///
/// # Errors
///
/// Returns an error if a context cannot be allocated or configured.
pub fn compression_context(level: i32) -> Result<Pooled<'static, CCtx<'static>>> {
    let mut ctx = COMPRESSION_CONTEXTS.acquire(|| {
        CCtx::try_create().ok_or_else(|| zstd_error("allocate compression context", 0))
    })?;
    ctx.reset(ResetDirective::SessionAndParameters)
        .map_err(|code| zstd_error("reset compression context", code))?;
    ctx.set_parameter(CParameter::CompressionLevel(level))
        .map_err(|code| zstd_error("set compression level", code))?;
    ctx.set_parameter(CParameter::ChecksumFlag(true))
        .map_err(|code| zstd_error("enable checksum", code))?;
    Ok(ctx)
}

/// Acquires a decompression context.
///
/// # Errors
///
/// Returns an error if a context cannot be allocated or reset.
pub fn decompression_context() -> Result<Pooled<'static, DCtx<'static>>> {
    let mut ctx = DECOMPRESSION_CONTEXTS.acquire(|| {
        DCtx::try_create().ok_or_else(|| zstd_error("allocate decompression context", 0))
    })?;
    ctx.reset(ResetDirective::SessionOnly)
        .map_err(|code| zstd_error("reset decompression context", code))?;
    Ok(ctx)
}

fn zstd_error(action: &str, code: usize) -> crate::ArchiveError {
    let detail = if code == 0 {
        "out of memory"
    } else {
        zstd_safe::get_error_name(code)
    };
    crate::ArchiveError::Io(std::io::Error::other(format!(
        "zstd: failed to {action}: {detail}"
    )))
}
