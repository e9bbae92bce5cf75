//! # Stream format
//!
//! All integers are little-endian.
//!
//! | field        | type            | notes                      |
//! |--------------|-----------------|----------------------------|
//! | `version`    | u32             | currently `1`              |
//! | `count`      | u32             | number of records          |
//! | repeated `count` times:        |                            |
//! | `key_size`   | u32             |                            |
//! | `key_bytes`  | u8 × key_size   |                            |
//! | `value_size` | u32             |                            |
//! | `value_bytes`| u8 × value_size |                            |
//!
//! Records are written least-recently-used first. Restoring replays them
//! through `put`, which inserts at the front of the recency list, so the
//! reloaded cache ends up in the same recency order it was saved in.
//! Per-entry timestamps and access counters are not persisted; restored
//! entries start fresh.

use crate::engine::LruEngine;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

/// Version tag at the start of every snapshot stream.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Why a snapshot stream could not be restored.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The source could not be opened or read.
    #[error("snapshot i/o failed: {0}")]
    Io(#[from] io::Error),

    /// The stream carries a version this build does not understand.
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    /// The stream ended in the middle of the header or a record.
    #[error("snapshot stream ended mid-record")]
    Truncated,
}

/// Writes the engine's live entries to `writer` in snapshot format.
///
/// The walk must see one consistent state; the façade guarantees that by
/// holding the engine lock in shared mode for the duration of the call.
///
/// # Example
///
/// ```
/// use bytecache::{snapshot, LruEngine};
/// use bytes::Bytes;
/// use std::num::NonZeroUsize;
///
/// let mut engine = LruEngine::new(NonZeroUsize::new(8).unwrap());
/// engine.put(Bytes::from_static(b"k"), Bytes::from_static(b"v"));
///
/// let mut buf = Vec::new();
/// snapshot::write_snapshot(&engine, &mut buf).unwrap();
///
/// let mut restored = LruEngine::new(NonZeroUsize::new(8).unwrap());
/// snapshot::read_snapshot(&mut restored, &buf[..]).unwrap();
/// assert_eq!(restored.get(b"k"), engine.get(b"k"));
/// ```
pub fn write_snapshot<W: Write>(engine: &LruEngine, mut writer: W) -> io::Result<()> {
    let count = u32::try_from(engine.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "too many entries for the snapshot format",
        )
    })?;
    writer.write_u32::<LittleEndian>(SNAPSHOT_VERSION)?;
    writer.write_u32::<LittleEndian>(count)?;
    // Least recent first; see the module docs for why.
    for entry in engine.entries().rev() {
        write_chunk(&mut writer, &entry.key)?;
        write_chunk(&mut writer, &entry.value)?;
    }
    writer.flush()
}

/// Restores `engine` from `reader`, returning how many records were
/// applied.
///
/// The engine is emptied before the header is validated, so a version
/// mismatch leaves it empty. Records beyond the engine's capacity are
/// silently ignored. On truncation the records applied so far are kept
/// (the engine is valid but partially loaded) and
/// [`SnapshotError::Truncated`] is returned.
pub fn read_snapshot<R: Read>(
    engine: &mut LruEngine,
    mut reader: R,
) -> Result<usize, SnapshotError> {
    engine.clear();

    let version = reader
        .read_u32::<LittleEndian>()
        .map_err(eof_is_truncation)?;
    if version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(version));
    }
    let count = reader
        .read_u32::<LittleEndian>()
        .map_err(eof_is_truncation)?;

    let mut applied = 0usize;
    for _ in 0..count {
        if engine.len() == engine.capacity().get() {
            // The stream holds more than this engine fits.
            break;
        }
        let key = read_chunk(&mut reader)?;
        let value = read_chunk(&mut reader)?;
        engine.put(key, value);
        applied += 1;
    }
    Ok(applied)
}

/// Saves `engine` to the file at `path`, replacing any previous snapshot.
pub fn write_to_path(engine: &LruEngine, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_snapshot(engine, BufWriter::new(file))
}

/// Restores `engine` from the file at `path`.
///
/// If the file cannot be opened, the engine is left untouched.
pub fn read_from_path(engine: &mut LruEngine, path: &Path) -> Result<usize, SnapshotError> {
    let file = File::open(path)?;
    read_snapshot(engine, BufReader::new(file))
}

fn write_chunk<W: Write>(writer: &mut W, bytes: &[u8]) -> io::Result<()> {
    let size = u32::try_from(bytes.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "chunk exceeds u32 length"))?;
    writer.write_u32::<LittleEndian>(size)?;
    writer.write_all(bytes)
}

fn read_chunk<R: Read>(reader: &mut R) -> Result<Bytes, SnapshotError> {
    let size = reader
        .read_u32::<LittleEndian>()
        .map_err(eof_is_truncation)? as usize;
    let mut buf = vec![0u8; size];
    reader.read_exact(&mut buf).map_err(eof_is_truncation)?;
    Ok(Bytes::from(buf))
}

fn eof_is_truncation(err: io::Error) -> SnapshotError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        SnapshotError::Truncated
    } else {
        SnapshotError::Io(err)
    }
}
