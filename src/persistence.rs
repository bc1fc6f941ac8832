//! Fixed-layout binary persistence for Q-tables
//!
//! The format is deliberately minimal and matches the table's in-memory
//! layout:
//!
//! ```text
//! offset 0: i32  width        (little-endian)
//! offset 4: i32  height       (little-endian)
//! offset 8: f32[w * h * 4]    Q-values, row-major by state, then by action
//! ```
//!
//! There is no magic number, version field, or checksum. The header is
//! validated against the allowed grid bounds so a corrupt file cannot force
//! a huge allocation, but a file with matching dimensions and a different
//! action count would decode silently; callers are responsible for checking
//! the loaded dimensions against the environment in use.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use crate::{
    error::{Error, Result},
    grid::{ACTIONS, MAX_DIM, MIN_DIM},
    q_table::QTable,
};

const HEADER_BYTES: usize = 8;

fn io_error(operation: impl Into<String>) -> impl FnOnce(std::io::Error) -> Error {
    let operation = operation.into();
    move |source| Error::Io { operation, source }
}

/// Write a table to `path` in the fixed binary layout
pub fn save<P: AsRef<Path>>(path: P, table: &QTable) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(io_error(format!("create {}", path.display())))?;
    let mut writer = BufWriter::new(file);

    let write = io_error(format!("write {}", path.display()));
    let inner = |writer: &mut BufWriter<File>| -> std::io::Result<()> {
        writer.write_all(&(table.width() as i32).to_le_bytes())?;
        writer.write_all(&(table.height() as i32).to_le_bytes())?;
        for value in table.values() {
            writer.write_all(&value.to_le_bytes())?;
        }
        writer.flush()
    };
    inner(&mut writer).map_err(write)
}

/// Read a table from `path`
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be opened or read,
/// [`Error::InvalidTableHeader`] when the header carries dimensions outside
/// the allowed grid bounds, and [`Error::TruncatedTable`] when the file
/// holds fewer bytes than the header declares. Trailing bytes beyond the
/// declared payload are ignored.
pub fn load<P: AsRef<Path>>(path: P) -> Result<QTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(io_error(format!("open {}", path.display())))?;
    let mut reader = BufReader::new(file);

    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(io_error(format!("read {}", path.display())))?;

    if bytes.len() < HEADER_BYTES {
        return Err(Error::TruncatedTable {
            needed: HEADER_BYTES,
            found: bytes.len(),
        });
    }

    let width = i32::from_le_bytes(bytes[0..4].try_into().expect("4-byte slice"));
    let height = i32::from_le_bytes(bytes[4..8].try_into().expect("4-byte slice"));
    let dim_ok = |d: i32| (MIN_DIM as i32..=MAX_DIM as i32).contains(&d);
    if !dim_ok(width) || !dim_ok(height) {
        return Err(Error::InvalidTableHeader { width, height });
    }

    let value_count = (width * height) as usize * ACTIONS;
    let needed = HEADER_BYTES + value_count * 4;
    if bytes.len() < needed {
        return Err(Error::TruncatedTable {
            needed,
            found: bytes.len(),
        });
    }

    let values = bytes[HEADER_BYTES..needed]
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes(chunk.try_into().expect("4-byte chunk")))
        .collect();

    Ok(QTable::from_raw(width as u32, height as u32, values))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::grid::Action;

    fn sample_table() -> QTable {
        let mut table = QTable::new(3, 2);
        table.set(0, Action::Right, 1.25);
        table.set(3, Action::Down, -0.5);
        table.set(5, Action::Left, 9.75);
        table
    }

    #[test]
    fn round_trip_preserves_every_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.bin");

        let table = sample_table();
        save(&path, &table).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, table);
    }

    #[test]
    fn wire_layout_is_little_endian_header_then_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.bin");

        let table = sample_table();
        save(&path, &table).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 8 + 3 * 2 * 4 * 4);
        assert_eq!(&bytes[0..4], &3i32.to_le_bytes());
        assert_eq!(&bytes[4..8], &2i32.to_le_bytes());
        // Slot (0, Right) = slot 1, i.e. bytes 12..16.
        assert_eq!(&bytes[12..16], &1.25f32.to_le_bytes());
    }

    #[test]
    fn load_missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let err = load(dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn load_rejects_truncated_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.bin");
        std::fs::write(&path, [0u8; 5]).unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, Error::TruncatedTable { needed: 8, found: 5 }));
    }

    #[test]
    fn load_rejects_truncated_payload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cut.bin");

        let table = sample_table();
        save(&path, &table).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 1]).unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, Error::TruncatedTable { .. }));
    }

    #[test]
    fn load_rejects_nonsense_dimensions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.bin");

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(-3i32).to_le_bytes());
        bytes.extend_from_slice(&1_000_000i32.to_le_bytes());
        std::fs::write(&path, &bytes).unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidTableHeader { width: -3, .. }));
    }
}
