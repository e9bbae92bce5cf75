//! Only construction and the explicit snapshot calls can fail; `get`,
//! `put`, `remove` and `clear` are total over their inputs. Snapshot
//! format and truncation problems surface as `load_snapshot` returning
//! `false`, with the detail carried by
//! [`SnapshotError`](crate::snapshot::SnapshotError) on the codec itself.

use std::io;
use thiserror::Error;

/// Errors surfaced by the public cache API.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The configuration was rejected (zero capacity).
    #[error("invalid configuration: capacity must be greater than zero")]
    InvalidConfiguration,

    /// A snapshot operation was requested but no path was configured.
    #[error("no snapshot path configured")]
    SnapshotPathNotConfigured,

    /// The snapshot sink could not be opened or written.
    #[error("snapshot i/o failed: {0}")]
    SnapshotIo(#[from] io::Error),
}
