//! Fill missing criterion values from an [`EnrichmentService`].
//!
//! Only rows lacking some of `z1`..`z6` are sent to the service, and only the
//! missing values are written back. A failing row is logged and counted; it
//! never aborts the batch.

use sojourn_core::{CandidateRecord, Criterion, EnrichmentQuery, EnrichmentService};

/// Outcome counters for one enrichment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnrichmentReport {
    /// Rows that were complete and left untouched.
    pub complete: usize,
    /// Rows sent to the service.
    pub requested: usize,
    /// Requested rows that received at least one value.
    pub enriched: usize,
    /// Requested rows whose call failed.
    pub failed: usize,
    /// Incomplete rows that could not be described to the service.
    pub skipped: usize,
    /// Individual criterion values written.
    pub values_filled: usize,
    /// Returned values discarded as out of range.
    pub values_rejected: usize,
}

/// Enrich every incomplete record in place.
///
/// # Examples
/// ```
/// use sojourn_core::{CandidateRecord, Criterion, CriterionScores, StubEnrichment};
/// use sojourn_data::enrich_records;
///
/// let service = StubEnrichment::default()
///     .with_scores("Tossa", CriterionScores::from([(Criterion::Crowding, 0.8)]));
/// let mut records = vec![CandidateRecord { name: Some("Tossa".into()), ..Default::default() }];
/// let report = enrich_records(&mut records, &service);
/// assert_eq!(records[0].z2, Some(0.8));
/// assert_eq!(report.values_filled, 1);
/// ```
pub fn enrich_records<S>(records: &mut [CandidateRecord], service: &S) -> EnrichmentReport
where
    S: EnrichmentService + ?Sized,
{
    let mut report = EnrichmentReport::default();
    for (index, record) in records.iter_mut().enumerate() {
        let missing = record.missing_criteria();
        if missing.is_empty() {
            report.complete = report.complete.saturating_add(1);
            continue;
        }
        let Some(query) = EnrichmentQuery::from_record(record) else {
            log::warn!("row {index}: cannot enrich a record without a name");
            report.skipped = report.skipped.saturating_add(1);
            continue;
        };
        report.requested = report.requested.saturating_add(1);
        match service.enrich(&query) {
            Ok(scores) => {
                let (filled, rejected) = fill_missing(record, &missing, |criterion| {
                    scores.get(&criterion).copied()
                });
                report.values_filled = report.values_filled.saturating_add(filled);
                report.values_rejected = report.values_rejected.saturating_add(rejected);
                if filled > 0 {
                    report.enriched = report.enriched.saturating_add(1);
                }
            }
            Err(err) => {
                log::warn!("row {index} ('{}'): {err}", query.name);
                report.failed = report.failed.saturating_add(1);
            }
        }
    }
    log::debug!("enrichment finished: {report:?}");
    report
}

fn fill_missing(
    record: &mut CandidateRecord,
    missing: &[Criterion],
    lookup: impl Fn(Criterion) -> Option<f64>,
) -> (usize, usize) {
    let mut filled = 0_usize;
    let mut rejected = 0_usize;
    for criterion in missing {
        let Some(value) = lookup(*criterion) else {
            continue;
        };
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            record.set_criterion(*criterion, value);
            filled = filled.saturating_add(1);
        } else {
            log::debug!("ignoring {criterion} = {value}: outside [0, 1]");
            rejected = rejected.saturating_add(1);
        }
    }
    (filled, rejected)
}
