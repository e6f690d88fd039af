use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;

use crate::{
    db::snapshot::{self, SnapshotFormat},
    error::{AppError, AppResult},
    models::{CatalogEntry, CatalogRecord},
};

/// Ordered, read-only collection of catalog entries
///
/// Entry `i` has `row_index == i`, matching row `i` of the similarity matrix.
/// Titles may repeat; lookups by title resolve to the first entry carrying it.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    entries: Vec<CatalogEntry>,
    first_by_title: HashMap<String, usize>,
}

impl CatalogStore {
    /// Builds a store from snapshot records, assigning row indices by position
    pub fn from_records(records: Vec<CatalogRecord>) -> Self {
        let mut first_by_title = HashMap::with_capacity(records.len());
        let entries: Vec<CatalogEntry> = records
            .into_iter()
            .enumerate()
            .map(|(row_index, record)| {
                first_by_title
                    .entry(record.title.clone())
                    .or_insert(row_index);
                CatalogEntry {
                    title: record.title,
                    external_id: record.movie_id,
                    row_index,
                }
            })
            .collect();

        Self {
            entries,
            first_by_title,
        }
    }

    /// Loads a catalog snapshot from disk
    ///
    /// JSON or CSV is chosen from the file name; gzip is detected from content.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let reader = snapshot::open_snapshot(path)?;
        let store =
            Self::from_reader(reader, SnapshotFormat::from_path(path)).map_err(|e| match e {
                AppError::Load(msg) => snapshot::load_error(path, msg),
                other => other,
            })?;

        tracing::info!(
            path = %path.display(),
            entries = store.len(),
            "Loaded catalog snapshot"
        );

        Ok(store)
    }

    /// Deserializes catalog records from any reader
    pub fn from_reader(reader: impl Read, format: SnapshotFormat) -> AppResult<Self> {
        let records: Vec<CatalogRecord> = match format {
            SnapshotFormat::Json => serde_json::from_reader(reader)
                .map_err(|e| AppError::Load(format!("Invalid catalog JSON: {}", e)))?,
            SnapshotFormat::Csv => csv::Reader::from_reader(reader)
                .deserialize::<CatalogRecord>()
                .collect::<Result<_, _>>()
                .map_err(|e| AppError::Load(format!("Invalid catalog CSV: {}", e)))?,
        };

        Ok(Self::from_records(records))
    }

    /// Serializes the catalog so that `from_reader` restores the same entries
    pub fn write_snapshot(&self, writer: impl Write, format: SnapshotFormat) -> AppResult<()> {
        let records: Vec<CatalogRecord> = self.entries.iter().map(CatalogRecord::from).collect();

        match format {
            SnapshotFormat::Json => serde_json::to_writer(writer, &records)
                .map_err(|e| AppError::Internal(format!("Catalog serialization error: {}", e))),
            SnapshotFormat::Csv => {
                let mut csv_writer = csv::Writer::from_writer(writer);
                for record in &records {
                    csv_writer.serialize(record).map_err(|e| {
                        AppError::Internal(format!("Catalog serialization error: {}", e))
                    })?;
                }
                csv_writer
                    .flush()
                    .map_err(|e| AppError::Internal(format!("Catalog serialization error: {}", e)))
            }
        }
    }

    /// Row index of the first entry whose title matches exactly (case-sensitive)
    pub fn index_of(&self, title: &str) -> AppResult<usize> {
        self.first_by_title
            .get(title)
            .copied()
            .ok_or_else(|| AppError::NotFound(format!("Movie '{}' is not in the catalog", title)))
    }

    pub fn entry_at(&self, row_index: usize) -> AppResult<&CatalogEntry> {
        self.entries
            .get(row_index)
            .ok_or(AppError::IndexOutOfRange {
                index: row_index,
                len: self.entries.len(),
            })
    }

    /// All titles in catalog order, duplicates included
    pub fn all_titles(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.title.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
