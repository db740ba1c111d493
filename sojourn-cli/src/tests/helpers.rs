//! Test helpers for writing request files and candidate tables.

use camino::{Utf8Path, Utf8PathBuf};
use sojourn_core::{
    CandidateRecord, CriterionWeights, EngineConfig, TravelerGroup, TravelerProfile,
};
use tempfile::TempDir;

use crate::request::RequestFile;

/// Write `contents` to `path`, creating nothing else.
pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write fixture");
}

/// Temporary directory holding one request and one candidate table.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn request_path(&self) -> Utf8PathBuf {
        self.root.join("request.json")
    }

    pub(super) fn table_path(&self) -> Utf8PathBuf {
        self.root.join("table.json")
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn write_request(&self, request: &RequestFile) {
        let payload = serde_json::to_string_pretty(request).expect("serialise request");
        write_utf8(&self.request_path(), payload.as_bytes());
    }

    pub(super) fn write_table(&self, records: &[CandidateRecord]) {
        let payload = serde_json::to_string_pretty(records).expect("serialise table");
        write_utf8(&self.table_path(), payload.as_bytes());
    }
}

fn record(name: &str, municipality: &str, cost: f64, benefit: f64) -> CandidateRecord {
    CandidateRecord {
        name: Some(name.to_owned()),
        municipality: Some(municipality.to_owned()),
        category: Some("museum".to_owned()),
        lat: Some(41.98),
        lon: Some(2.82),
        z1: Some(cost),
        z2: Some(cost),
        z3: Some(benefit),
        z4: Some(benefit),
        z5: Some(cost),
        z6: Some(benefit),
    }
}

/// Three candidates where each dominates the next on every enriched
/// criterion: Alpha, then Beta, then Gamma.
pub(super) fn ladder() -> Vec<CandidateRecord> {
    vec![
        record("Gamma", "Figueres", 0.9, 0.1),
        record("Alpha", "Girona", 0.1, 0.9),
        record("Beta", "Olot", 0.5, 0.5),
    ]
}

/// A solo traveller with neutral preferences and uniform weights.
pub(super) fn solo_request() -> RequestFile {
    RequestFile {
        travelers: TravelerGroup::solo(TravelerProfile::new()),
        config: EngineConfig::default().with_weights(CriterionWeights::new([1.0; 7])),
    }
}
