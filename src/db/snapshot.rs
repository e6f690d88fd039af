use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{AppError, AppResult};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Encoding of a snapshot file's records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Csv,
}

impl SnapshotFormat {
    /// Picks the record format from the file name, ignoring a trailing `.gz`
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let name = name.strip_suffix(".gz").unwrap_or(&name);

        if name.ends_with(".csv") {
            SnapshotFormat::Csv
        } else {
            SnapshotFormat::Json
        }
    }
}

/// Opens a snapshot file for reading
///
/// Gzip-compressed files are detected by their magic bytes and decompressed
/// transparently, so callers deserialize from the returned reader the same
/// way regardless of how the snapshot was stored.
pub fn open_snapshot(path: &Path) -> AppResult<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| load_error(path, e))?;
    let reader = BufReader::new(file);
    decompressing_reader(reader).map_err(|e| load_error(path, e))
}

/// Wraps a buffered reader in a gzip decoder when its content starts with the gzip magic
pub fn decompressing_reader<R: BufRead + 'static>(mut reader: R) -> std::io::Result<Box<dyn Read>> {
    let is_gzip = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    if is_gzip {
        tracing::debug!("Snapshot is gzip-compressed");
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Creates a snapshot file and hands a writer to `write`
///
/// The file handle is flushed and released before returning.
pub fn write_snapshot<F>(path: &Path, compress: bool, write: F) -> AppResult<()>
where
    F: FnOnce(&mut dyn Write) -> AppResult<()>,
{
    let file = File::create(path)
        .map_err(|e| AppError::Internal(format!("{}: {}", path.display(), e)))?;
    let mut buffered = BufWriter::new(file);

    if compress {
        let mut encoder = GzEncoder::new(&mut buffered, Compression::default());
        write(&mut encoder)?;
        encoder
            .finish()
            .map_err(|e| AppError::Internal(format!("{}: {}", path.display(), e)))?;
    } else {
        write(&mut buffered)?;
    }

    buffered
        .flush()
        .map_err(|e| AppError::Internal(format!("{}: {}", path.display(), e)))
}

/// Builds a load error naming the offending snapshot
pub fn load_error(path: &Path, err: impl std::fmt::Display) -> AppError {
    AppError::Load(format!("{}: {}", path.display(), err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            SnapshotFormat::from_path(Path::new("data/movie_list.json")),
            SnapshotFormat::Json
        );
        assert_eq!(
            SnapshotFormat::from_path(Path::new("data/movies.CSV")),
            SnapshotFormat::Csv
        );
        assert_eq!(
            SnapshotFormat::from_path(Path::new("data/movies.csv.gz")),
            SnapshotFormat::Csv
        );
        assert_eq!(
            SnapshotFormat::from_path(Path::new("data/similarity.json.gz")),
            SnapshotFormat::Json
        );
    }

    #[test]
    fn test_plain_reader_passthrough() {
        let mut reader = decompressing_reader(Cursor::new(b"[1, 2]".to_vec())).unwrap();
        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        assert_eq!(out, "[1, 2]");
    }

    #[test]
    fn test_gzip_reader_decompresses() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"[[1.0]]").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut reader = decompressing_reader(Cursor::new(compressed)).unwrap();
        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        assert_eq!(out, "[[1.0]]");
    }

    #[test]
    fn test_empty_input_is_plain() {
        let mut reader = decompressing_reader(Cursor::new(Vec::new())).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let result = open_snapshot(Path::new("/nonexistent/similarity.json.gz"));
        assert!(matches!(result, Err(AppError::Load(_))));
    }

    #[test]
    fn test_write_then_open_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json.gz");

        write_snapshot(&path, true, |w| {
            w.write_all(b"{\"ok\":true}")
                .map_err(|e| AppError::Internal(e.to_string()))
        })
        .unwrap();

        let raw = std::fs::read(&path).unwrap();
        assert!(raw.starts_with(&GZIP_MAGIC));

        let mut out = String::new();
        open_snapshot(&path)
            .unwrap()
            .read_to_string(&mut out)
            .unwrap();
        assert_eq!(out, "{\"ok\":true}");
    }
}
