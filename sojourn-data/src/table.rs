//! Candidate tables and per-locality snapshots.
//!
//! Tables are JSON arrays of [`CandidateRecord`]s. After enrichment the full
//! table is persisted as [`ALL_SNAPSHOT`] together with one
//! `poi_<locality>_enriched.json` file per municipality.

use std::collections::BTreeMap;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use sojourn_core::CandidateRecord;
use thiserror::Error;

use crate::fs;

/// File name of the snapshot holding every record.
pub const ALL_SNAPSHOT: &str = "poi_all_enriched.json";

/// Locality used for records without a municipality.
pub const UNKNOWN_LOCALITY: &str = "unknown";

/// Errors raised while loading a candidate table.
#[derive(Debug, Error)]
pub enum TableError {
    /// The table file could not be read.
    #[error("failed to read candidate table '{path}': {source}")]
    Io {
        /// Table location.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The table was not a JSON array of records.
    #[error("failed to parse candidate table '{path}': {source}")]
    Json {
        /// Table location.
        path: Utf8PathBuf,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while writing snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// A directory or file could not be written.
    #[error("failed to write snapshot '{path}': {source}")]
    Io {
        /// Snapshot location.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Records could not be serialised.
    #[error("failed to encode snapshot '{path}': {source}")]
    Encode {
        /// Snapshot location.
        path: Utf8PathBuf,
        /// Underlying encode failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Read a JSON array of candidate records.
///
/// # Errors
/// Returns [`TableError`] when the file is unreadable or malformed.
pub fn load_candidate_table(path: &Utf8Path) -> Result<Vec<CandidateRecord>, TableError> {
    let contents = fs::read_utf8_file(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<CandidateRecord> =
        serde_json::from_str(&contents).map_err(|source| TableError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!("loaded {} candidate records from {path}", records.len());
    Ok(records)
}

/// Snapshot file name for one locality.
///
/// Path separators and whitespace are replaced so the name stays inside the
/// snapshot directory.
///
/// # Examples
/// ```
/// use sojourn_data::snapshot_file_name;
///
/// assert_eq!(snapshot_file_name("Sant Feliu"), "poi_Sant_Feliu_enriched.json");
/// assert_eq!(snapshot_file_name(""), "poi_unknown_enriched.json");
/// ```
#[must_use]
pub fn snapshot_file_name(locality: &str) -> String {
    let trimmed = locality.trim();
    let stem: String = if trimmed.is_empty() {
        UNKNOWN_LOCALITY.to_owned()
    } else {
        trimmed
            .chars()
            .map(|c| {
                if c.is_whitespace() || matches!(c, '/' | '\\' | ':') {
                    '_'
                } else {
                    c
                }
            })
            .collect()
    };
    format!("poi_{stem}_enriched.json")
}

/// Persist `records` under `dir` as [`ALL_SNAPSHOT`] plus one file per
/// municipality, returning the written paths with the full snapshot first.
///
/// # Errors
/// Returns [`SnapshotError`] when the directory cannot be created or a file
/// cannot be encoded or written.
pub fn write_locality_snapshots(
    dir: &Utf8Path,
    records: &[CandidateRecord],
) -> Result<Vec<Utf8PathBuf>, SnapshotError> {
    let target = fs::create_dir_all(dir).map_err(|source| SnapshotError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut by_locality: BTreeMap<String, Vec<&CandidateRecord>> = BTreeMap::new();
    for record in records {
        let file_name = snapshot_file_name(record.municipality.as_deref().unwrap_or_default());
        by_locality.entry(file_name).or_default().push(record);
    }

    let mut written = Vec::with_capacity(by_locality.len().saturating_add(1));
    let all: Vec<&CandidateRecord> = records.iter().collect();
    written.push(write_snapshot(&target, dir, ALL_SNAPSHOT, &all)?);
    for (file_name, group) in &by_locality {
        written.push(write_snapshot(&target, dir, file_name, group)?);
    }
    log::debug!(
        "wrote {} snapshots for {} records under {dir}",
        written.len(),
        records.len()
    );
    Ok(written)
}

fn write_snapshot(
    target: &cap_std::fs_utf8::Dir,
    dir: &Utf8Path,
    file_name: &str,
    records: &[&CandidateRecord],
) -> Result<Utf8PathBuf, SnapshotError> {
    let path = dir.join(file_name);
    let body = match serde_json::to_vec_pretty(records) {
        Ok(body) => body,
        Err(source) => return Err(SnapshotError::Encode { path, source }),
    };
    match target.write(file_name, body) {
        Ok(()) => Ok(path),
        Err(source) => Err(SnapshotError::Io { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    fn record(name: &str, municipality: Option<&str>) -> CandidateRecord {
        CandidateRecord {
            name: Some(name.to_owned()),
            municipality: municipality.map(str::to_owned),
            lat: Some(41.98),
            lon: Some(2.82),
            z1: Some(0.3),
            ..CandidateRecord::default()
        }
    }

    #[fixture]
    fn temp() -> TempDir {
        TempDir::new().expect("temp dir")
    }

    fn root(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf-8 temp dir")
    }

    #[rstest]
    #[case("Girona", "poi_Girona_enriched.json")]
    #[case("  L'Escala ", "poi_L'Escala_enriched.json")]
    #[case("a/b", "poi_a_b_enriched.json")]
    #[case("   ", "poi_unknown_enriched.json")]
    fn file_names_stay_flat(#[case] locality: &str, #[case] expected: &str) {
        assert_eq!(snapshot_file_name(locality), expected);
    }

    #[rstest]
    fn snapshots_split_by_locality(temp: TempDir) {
        let dir = root(&temp).join("out");
        let records = vec![
            record("Catedral", Some("Girona")),
            record("Museu Dalí", Some("Figueres")),
            record("Banys Àrabs", Some("Girona")),
            record("Orphan", None),
        ];
        let written = write_locality_snapshots(&dir, &records).expect("snapshots written");
        let names: Vec<&str> = written.iter().filter_map(|path| path.file_name()).collect();
        assert_eq!(
            names,
            vec![
                ALL_SNAPSHOT,
                "poi_Figueres_enriched.json",
                "poi_Girona_enriched.json",
                "poi_unknown_enriched.json",
            ]
        );
        let girona = load_candidate_table(&dir.join("poi_Girona_enriched.json"))
            .expect("snapshot readable");
        assert_eq!(girona.len(), 2);
        let all = load_candidate_table(&dir.join(ALL_SNAPSHOT)).expect("snapshot readable");
        assert_eq!(all, records);
    }

    #[rstest]
    fn missing_table_is_an_io_error(temp: TempDir) {
        let err = load_candidate_table(&root(&temp).join("absent.json")).expect_err("missing");
        assert!(matches!(err, TableError::Io { .. }));
    }

    #[rstest]
    fn malformed_table_is_a_json_error(temp: TempDir) {
        let path = root(&temp).join("table.json");
        std::fs::write(&path, "{\"name\": \"not an array\"}").expect("write fixture");
        let err = load_candidate_table(&path).expect_err("not an array");
        assert!(matches!(err, TableError::Json { .. }));
    }
}
