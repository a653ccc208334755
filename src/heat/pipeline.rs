//! One full heatmap pass: list uploads, select datasets, score, build.

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use crate::decode::{DecodeError, TableKind, decode_table};
use crate::heat::aggregate::{ColumnSpan, sum_span};
use crate::heat::build::build_layer;
use crate::heat::classify::site_markers;
use crate::heat::normalize::min_max_scale;
use crate::heat::types::{HeatBundle, RowScore, RunReport, SiteFlag, SiteRow};
use crate::select::{SelectionError, SelectionPolicy};
use crate::store::{UploadStore, UploadedTable};

/// Column conventions of the two survey exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub with_span: ColumnSpan,
    pub without_span: ColumnSpan,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            with_span: ColumnSpan::new(31, 7),
            without_span: ColumnSpan::new(18, 7),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("location table {name:?} could not be decoded: {source}")]
    LocationDecode {
        name: String,
        #[source]
        source: DecodeError,
    },

    #[error("upload store failed: {0}")]
    Store(anyhow::Error),

    #[error("scoring worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Runs one heatmap request against the store.
///
/// Row-level problems become drop counts and an unreadable measurement
/// table becomes a zero-filled layer; both land on the bundle's
/// [`RunReport`]. Only a failed selection, an unreadable location table, or
/// a store fault abort the request.
#[tracing::instrument(skip_all)]
pub async fn generate<S, P>(
    store: &S,
    policy: &P,
    config: &PipelineConfig,
) -> Result<HeatBundle, PipelineError>
where
    S: UploadStore + ?Sized,
    P: SelectionPolicy,
{
    let csvs = store
        .list(TableKind::Csv)
        .await
        .map_err(PipelineError::Store)?;
    let excels = store
        .list(TableKind::Excel)
        .await
        .map_err(PipelineError::Store)?;

    let selection = policy.select(&csvs, &excels)?;
    info!(
        locations = %selection.locations.name,
        with_filter = %selection.with_filter.name,
        without_filter = %selection.without_filter.name,
        "Datasets selected"
    );

    let sites = decode_sites(&selection.locations)?;
    let expected_rows = sites.len();

    // The two measurement tables are independent; score them on parallel
    // blocking workers and merge afterwards.
    let with_table = selection.with_filter;
    let without_table = selection.without_filter;
    let (with_span, without_span) = (config.with_span, config.without_span);

    let with_task =
        tokio::task::spawn_blocking(move || score_table(&with_table, with_span, expected_rows));
    let without_task = tokio::task::spawn_blocking(move || {
        score_table(&without_table, without_span, expected_rows)
    });

    let scored_with = with_task.await?;
    let scored_without = without_task.await?;

    let mut with_layer = build_layer(&sites, &scored_with.scores);
    with_layer.zero_filled = scored_with.zero_fill_reason.is_some();

    let mut without_layer = build_layer(&sites, &scored_without.scores);
    without_layer.zero_filled = scored_without.zero_fill_reason.is_some();

    let markers = site_markers(&sites, &without_layer);
    let flagged_markers = markers.iter().filter(|m| m.flag == SiteFlag::Flagged).count();

    let report = RunReport {
        generated_at: Utc::now(),
        site_rows: sites.len(),

        with_rows_scored: scored_with.scores.len(),
        with_points: with_layer.points.len(),
        with_dropped: with_layer.dropped,
        with_unscored: with_layer.unscored,
        with_zero_filled: with_layer.zero_filled,
        with_zero_fill_reason: scored_with.zero_fill_reason,

        without_rows_scored: scored_without.scores.len(),
        without_points: without_layer.points.len(),
        without_dropped: without_layer.dropped,
        without_unscored: without_layer.unscored,
        without_zero_filled: without_layer.zero_filled,
        without_zero_fill_reason: scored_without.zero_fill_reason,

        markers: markers.len(),
        flagged_markers,
    };

    info!(
        sites = report.site_rows,
        with_points = report.with_points,
        without_points = report.without_points,
        dropped = report.with_dropped + report.without_dropped,
        flagged = report.flagged_markers,
        "Heat data assembled"
    );

    Ok(HeatBundle {
        with_filter: with_layer,
        without_filter: without_layer,
        markers,
        report,
    })
}

/// Turns the location table into [`SiteRow`]s. Every line is data: column 0
/// holds the geometry text, column 1 the label.
fn decode_sites(upload: &UploadedTable) -> Result<Vec<SiteRow>, PipelineError> {
    let table =
        decode_table(&upload.bytes, upload.kind).map_err(|source| PipelineError::LocationDecode {
            name: upload.name.clone(),
            source,
        })?;

    Ok(table
        .rows()
        .iter()
        .enumerate()
        .map(|(row, cells)| SiteRow {
            row,
            geometry_text: cells.first().cloned().unwrap_or_default(),
            label: cells.get(1).cloned().unwrap_or_default(),
        })
        .collect())
}

struct ScoredTable {
    scores: Vec<RowScore>,
    zero_fill_reason: Option<String>,
}

impl ScoredTable {
    fn zero_filled(rows: usize, reason: String) -> Self {
        Self {
            scores: (0..rows).map(|row| RowScore { row, value: 0.0 }).collect(),
            zero_fill_reason: Some(reason),
        }
    }
}

/// Decodes, aggregates and normalizes one measurement table.
///
/// An unreadable or too-narrow table zero-fills the expected row count
/// instead of failing the request. Zero-filled scores skip normalization,
/// so the layer renders at intensity 0 rather than the all-equal 50.
fn score_table(table: &UploadedTable, span: ColumnSpan, expected_rows: usize) -> ScoredTable {
    let decoded = match decode_table(&table.bytes, table.kind) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!(table = %table.name, error = %e, "Measurement table unreadable, zero-filling scores");
            return ScoredTable::zero_filled(expected_rows, e.to_string());
        }
    };

    match sum_span(&decoded, span) {
        Ok(scores) => ScoredTable {
            scores: min_max_scale(scores),
            zero_fill_reason: None,
        },
        Err(e) => {
            warn!(table = %table.name, error = %e, "Measurement table too narrow, zero-filling scores");
            ScoredTable::zero_filled(expected_rows, e.to_string())
        }
    }
}
