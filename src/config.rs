use crate::error::CacheError;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Validated construction parameters for a [`ByteCache`](crate::ByteCache).
///
/// # Examples
///
/// ```
/// use bytecache::CacheConfig;
///
/// let config = CacheConfig::new(1000)
///     .unwrap()
///     .with_snapshot_path("cache.snap");
/// assert_eq!(config.capacity().get(), 1000);
///
/// // Zero capacity is rejected at configuration time.
/// assert!(CacheConfig::new(0).is_err());
/// ```
#[derive(Clone)]
pub struct CacheConfig {
    pub(crate) capacity: NonZeroUsize,
    pub(crate) snapshot_path: Option<PathBuf>,
}

impl CacheConfig {
    /// Creates a configuration for a cache holding at most `capacity`
    /// entries.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidConfiguration`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<CacheConfig, CacheError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(CacheError::InvalidConfiguration)?;
        Ok(CacheConfig {
            capacity,
            snapshot_path: None,
        })
    }

    /// Sets the file used for warm restarts: restored at construction,
    /// written by `save_snapshot` and at teardown.
    #[must_use]
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> CacheConfig {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Maximum number of entries the cache may hold.
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// The configured snapshot file, if any.
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }
}

impl fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfig")
            .field("capacity", &self.capacity)
            .field("snapshot_path", &self.snapshot_path)
            .finish()
    }
}
