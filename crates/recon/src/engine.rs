use std::collections::HashSet;

use chrono::NaiveDateTime;

use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::model::{Dataset, Diagnostic, ReconMeta, ReconResult, ReconSummary};

/// Clean the dump against the report. Inputs are never mutated.
///
/// Pipeline: parse timestamps in both datasets (all-or-nothing), derive the
/// horizon from the report, partition the dump around it, drop before-horizon
/// rows whose ParentID the report does not know, then cross-check "change"
/// rows against exact (type, timestamp) pairs from the report. The last stage
/// is skipped, not failed, when either dataset lacks a `Record Type` column.
pub fn reconcile(
    config: &ReconConfig,
    report: &Dataset,
    dump: &Dataset,
) -> Result<ReconResult, ReconError> {
    let col = &config.columns;

    let report_created = report.column_index(&col.created_on);
    let report_parent = report.column_index(&col.parent_id);
    let dump_created = dump.column_index(&col.created_on);
    let dump_parent = dump.column_index(&col.parent_id);

    let (Some(report_created), Some(report_parent), Some(dump_created), Some(dump_parent)) =
        (report_created, report_parent, dump_created, dump_parent)
    else {
        let mut missing = Vec::new();
        for (ds, created, parent) in [
            (report, report_created, report_parent),
            (dump, dump_created, dump_parent),
        ] {
            if created.is_none() {
                missing.push((ds.name.clone(), col.created_on.clone()));
            }
            if parent.is_none() {
                missing.push((ds.name.clone(), col.parent_id.clone()));
            }
        }
        return Err(ReconError::MissingColumns {
            missing,
            report_columns: report.columns.clone(),
            dump_columns: dump.columns.clone(),
        });
    };

    // Stage 1: timestamp normalization. One bad value fails the whole run;
    // silently dropping malformed rows would defeat the point of cleaning.
    let report_ts = parse_timestamps(report, report_created, &config.timestamp_format)?;
    let dump_ts = parse_timestamps(dump, dump_created, &config.timestamp_format)?;

    // Stage 2: the horizon is the latest report timestamp, never anything
    // derived from the dump.
    let horizon = *report_ts.iter().max().ok_or(ReconError::EmptyReport)?;

    let mut diagnostics = vec![Diagnostic::info(format!(
        "report horizon: {}",
        horizon.format(&config.timestamp_format)
    ))];

    // Stage 3: partition the dump. After-horizon rows are genuinely new and
    // the identity filter never applies to them.
    let (before, after): (Vec<usize>, Vec<usize>) =
        (0..dump.len()).partition(|&i| dump_ts[i] <= horizon);
    let new_after_horizon = after.len();

    // Stage 4: before-horizon rows must trace to a ParentID the report
    // knows. A blank ParentID is not evidence of invalidity; keep those.
    let known_parents: HashSet<&str> = (0..report.len())
        .filter_map(|r| report.cell(r, report_parent))
        .collect();

    let mut removed_unmatched_parent = 0;
    let before_kept: Vec<usize> = before
        .into_iter()
        .filter(|&i| match dump.cell(i, dump_parent) {
            None => true,
            Some(id) if known_parents.contains(id) => true,
            Some(_) => {
                removed_unmatched_parent += 1;
                false
            }
        })
        .collect();

    // Stage 5: change rows must correlate 1:1 with a report entry at the
    // same instant, applied over the combined survivors.
    let report_type = report.column_index(&col.record_type);
    let dump_type = dump.column_index(&col.record_type);

    let mut removed_unmatched_change = None;
    let mut kept: Vec<usize> = Vec::with_capacity(before_kept.len() + after.len());

    match (report_type, dump_type) {
        (Some(rt), Some(dt)) => {
            let report_pairs: HashSet<(String, NaiveDateTime)> = (0..report.len())
                .filter_map(|r| report.cell(r, rt).map(|v| (v.to_lowercase(), report_ts[r])))
                .collect();

            let mut removed = 0;
            for &i in before_kept.iter().chain(after.iter()) {
                let is_unmatched_change = dump.cell(i, dt).is_some_and(|v| {
                    let kind = v.to_lowercase();
                    kind == "change" && !report_pairs.contains(&(kind, dump_ts[i]))
                });
                if is_unmatched_change {
                    removed += 1;
                } else {
                    kept.push(i);
                }
            }
            removed_unmatched_change = Some(removed);
        }
        _ => {
            let mut absent = Vec::new();
            if report_type.is_none() {
                absent.push(report.name.as_str());
            }
            if dump_type.is_none() {
                absent.push(dump.name.as_str());
            }
            diagnostics.push(Diagnostic::warning(format!(
                "'{}' column missing from {}; change cross-check skipped",
                col.record_type,
                absent.join(" and "),
            )));
            kept.extend(before_kept.iter().chain(after.iter()).copied());
        }
    }

    let rows: Vec<Vec<String>> = kept.iter().map(|&i| dump.rows[i].clone()).collect();

    Ok(ReconResult {
        meta: ReconMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            horizon,
        },
        summary: ReconSummary {
            dump_rows: dump.len(),
            cleaned_rows: rows.len(),
            removed_unmatched_parent,
            new_after_horizon,
            removed_unmatched_change,
        },
        cleaned: Dataset::new("cleaned", dump.columns.clone(), rows),
        diagnostics,
    })
}

/// Parse every `Created On` cell with the fixed format. Blank cells fail
/// too: a row with no timestamp can never be partitioned.
fn parse_timestamps(
    dataset: &Dataset,
    col: usize,
    format: &str,
) -> Result<Vec<NaiveDateTime>, ReconError> {
    let mut out = Vec::with_capacity(dataset.len());
    for row in 0..dataset.len() {
        let raw = dataset.cell(row, col).unwrap_or("");
        let ts = NaiveDateTime::parse_from_str(raw, format).map_err(|_| {
            ReconError::TimestampParse {
                dataset: dataset.name.clone(),
                row: row + 1,
                value: raw.to_string(),
            }
        })?;
        out.push(ts);
    }
    Ok(out)
}
