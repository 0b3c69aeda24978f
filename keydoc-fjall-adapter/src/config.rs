use fjall::{CompressionType, Config, PartitionCreateOptions};
use keydoc::common::DEFAULT_CACHE_SIZE;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Fjall keyspace configuration.
///
/// Cloneable and thread-safe: clones share one `Arc<FjallConfigInner>` whose
/// fields are atomics. Values are changed only through
/// [FjallModuleBuilder](crate::FjallModuleBuilder) before the store opens.
#[derive(Clone)]
pub struct FjallConfig {
    inner: Arc<FjallConfigInner>,
}

impl FjallConfig {
    #[inline]
    pub fn new() -> FjallConfig {
        FjallConfig {
            inner: Arc::new(FjallConfigInner::new()),
        }
    }

    /// Translates this configuration into fjall's keyspace config.
    pub(crate) fn keyspace_config(&self) -> Config {
        let mut config = Config::new(self.db_path())
            .cache_size(self.cache_size())
            .temporary(self.temporary());

        if self.fsync_ms() > 0 {
            config = config.fsync_ms(Some(self.fsync_ms()));
        }
        config
    }

    /// Options every namespace partition is created with.
    pub(crate) fn partition_config(&self) -> PartitionCreateOptions {
        let compression = if self.compression() {
            CompressionType::Lz4
        } else {
            CompressionType::None
        };
        PartitionCreateOptions::default().compression(compression)
    }

    #[inline]
    pub fn db_path(&self) -> &str {
        self.inner.db_path.get_or_init(String::new).as_str()
    }

    /// Sets the keyspace directory. Only the first call takes effect.
    #[inline]
    pub(crate) fn set_db_path(&self, db_path: &str) {
        self.inner.db_path.get_or_init(|| db_path.to_string());
    }

    #[inline]
    pub fn create_if_missing(&self) -> bool {
        self.inner.create_if_missing.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_create_if_missing(&self, value: bool) {
        self.inner.create_if_missing.store(value, Ordering::Relaxed)
    }

    #[inline]
    pub fn error_if_exists(&self) -> bool {
        self.inner.error_if_exists.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_error_if_exists(&self, value: bool) {
        self.inner.error_if_exists.store(value, Ordering::Relaxed)
    }

    #[inline]
    pub fn compression(&self) -> bool {
        self.inner.compression.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_compression(&self, value: bool) {
        self.inner.compression.store(value, Ordering::Relaxed)
    }

    #[inline]
    pub fn cache_size(&self) -> u64 {
        self.inner.cache_size.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_cache_size(&self, value: u64) {
        self.inner.cache_size.store(value, Ordering::Relaxed)
    }

    /// Background fsync interval in milliseconds; 0 disables it.
    #[inline]
    pub fn fsync_ms(&self) -> u16 {
        self.inner.fsync_ms.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_fsync_ms(&self, value: u16) {
        self.inner.fsync_ms.store(value, Ordering::Relaxed)
    }

    /// Whether the keyspace directory is deleted when the store is dropped.
    #[inline]
    pub fn temporary(&self) -> bool {
        self.inner.temporary.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_temporary(&self, value: bool) {
        self.inner.temporary.store(value, Ordering::Relaxed)
    }

    #[inline]
    pub fn commit_before_close(&self) -> bool {
        self.inner.commit_before_close.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_commit_before_close(&self, value: bool) {
        self.inner.commit_before_close.store(value, Ordering::Relaxed)
    }
}

impl Default for FjallConfig {
    fn default() -> Self {
        FjallConfig::new()
    }
}

struct FjallConfigInner {
    db_path: OnceLock<String>,
    create_if_missing: AtomicBool,
    error_if_exists: AtomicBool,
    compression: AtomicBool,
    cache_size: AtomicU64,
    fsync_ms: AtomicU16,
    temporary: AtomicBool,
    commit_before_close: AtomicBool,
}

impl FjallConfigInner {
    fn new() -> FjallConfigInner {
        FjallConfigInner {
            db_path: OnceLock::new(),
            create_if_missing: AtomicBool::new(true),
            error_if_exists: AtomicBool::new(false),
            compression: AtomicBool::new(true),
            cache_size: AtomicU64::new(DEFAULT_CACHE_SIZE),
            fsync_ms: AtomicU16::new(0),
            temporary: AtomicBool::new(false),
            commit_before_close: AtomicBool::new(true),
        }
    }
}
