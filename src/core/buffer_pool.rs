//! Reusable byte buffers for record assembly
//!
//! The logger never keeps a buffer past the call that acquired it. It goes
//! through [`PooledBuffer`], which clears the buffer and hands it back to the
//! provider when dropped, so an early return or a panic inside a sink cannot
//! leak one.

use super::config::PoolConfig;
use super::metrics::PoolMetrics;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of scratch buffers.
///
/// Implementations must be safe to call from any number of threads at once.
/// `acquire` must not block indefinitely. Buffers passed to `release` have
/// already been cleared by the caller.
pub trait BufferProvider: Send + Sync {
    fn acquire(&self) -> Vec<u8>;
    fn release(&self, buf: Vec<u8>);
}

/// Scoped lease on a provider buffer.
///
/// Dereferences to `Vec<u8>`; on drop the contents are cleared and the
/// storage goes back to the provider.
pub struct PooledBuffer<'a> {
    buf: Vec<u8>,
    provider: &'a dyn BufferProvider,
}

impl<'a> PooledBuffer<'a> {
    pub fn new(provider: &'a dyn BufferProvider) -> Self {
        Self {
            buf: provider.acquire(),
            provider,
        }
    }
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        let mut buf = std::mem::take(&mut self.buf);
        buf.clear();
        self.provider.release(buf);
    }
}

/// Non-pooled provider: allocates on acquire, frees on release.
///
/// Correct everywhere, just slower than [`ShardedBufferPool`] under load.
#[derive(Debug, Clone)]
pub struct HeapBufferProvider {
    default_buffer_size: usize,
}

impl HeapBufferProvider {
    pub fn new(default_buffer_size: usize) -> Self {
        Self {
            default_buffer_size,
        }
    }
}

impl Default for HeapBufferProvider {
    fn default() -> Self {
        Self::new(PoolConfig::default().default_buffer_size)
    }
}

impl BufferProvider for HeapBufferProvider {
    fn acquire(&self) -> Vec<u8> {
        Vec::with_capacity(self.default_buffer_size)
    }

    fn release(&self, _buf: Vec<u8>) {}
}

/// Next shard hint handed to a thread the first time it touches a pool.
static NEXT_SHARD: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static SHARD_HINT: usize = NEXT_SHARD.fetch_add(1, Ordering::Relaxed);
}

struct Shard {
    free_tx: Sender<Vec<u8>>,
    free_rx: Receiver<Vec<u8>>,
}

/// Buffer pool split into independent lock-free free lists.
///
/// Each thread sticks to one shard (assigned round-robin), which keeps
/// contention low when many threads log at once. A shard holds at most
/// `pool_size / shard_count` idle buffers; extra releases are dropped, as
/// are buffers that grew past `max_buffer_size`.
pub struct ShardedBufferPool {
    shards: Box<[Shard]>,
    default_buffer_size: usize,
    max_buffer_size: usize,
    metrics: PoolMetrics,
}

impl ShardedBufferPool {
    /// Build a pool. Zero sizes are raised to one so construction never fails;
    /// use [`PoolConfig::validate`] to reject them instead.
    pub fn new(config: PoolConfig) -> Self {
        let shard_count = config.shard_count.max(1);
        let per_shard = config.pool_size.div_ceil(shard_count).max(1);

        let shards = (0..shard_count)
            .map(|_| {
                let (free_tx, free_rx) = bounded(per_shard);
                Shard { free_tx, free_rx }
            })
            .collect();

        Self {
            shards,
            default_buffer_size: config.default_buffer_size,
            max_buffer_size: config.max_buffer_size.max(config.default_buffer_size),
            metrics: PoolMetrics::new(),
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Idle buffers currently held across all shards.
    pub fn idle_buffers(&self) -> usize {
        self.shards.iter().map(|s| s.free_rx.len()).sum()
    }

    pub fn metrics(&self) -> &PoolMetrics {
        &self.metrics
    }

    #[inline]
    fn local_shard(&self) -> &Shard {
        let hint = SHARD_HINT.with(|h| *h);
        &self.shards[hint % self.shards.len()]
    }
}

impl Default for ShardedBufferPool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

impl BufferProvider for ShardedBufferPool {
    fn acquire(&self) -> Vec<u8> {
        match self.local_shard().free_rx.try_recv() {
            Ok(buf) => {
                self.metrics.record_reuse();
                buf
            }
            Err(_) => {
                self.metrics.record_allocation();
                Vec::with_capacity(self.default_buffer_size)
            }
        }
    }

    fn release(&self, buf: Vec<u8>) {
        if buf.capacity() > self.max_buffer_size {
            self.metrics.record_discard();
            return;
        }
        match self.local_shard().free_tx.try_send(buf) {
            Ok(()) => self.metrics.record_recycled(),
            Err(_) => self.metrics.record_discard(),
        }
    }
}

impl std::fmt::Debug for ShardedBufferPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedBufferPool")
            .field("shards", &self.shards.len())
            .field("default_buffer_size", &self.default_buffer_size)
            .field("max_buffer_size", &self.max_buffer_size)
            .field("idle_buffers", &self.idle_buffers())
            .finish()
    }
}
