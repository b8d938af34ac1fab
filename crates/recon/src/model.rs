use chrono::NaiveDateTime;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// An ordered, in-memory table: one header plus data rows of canonical
/// string cells. The report and the dump are both loaded into this shape.
///
/// A cell is *null* when it is empty or whitespace-only; [`Dataset::cell`]
/// returns `None` for such cells so callers never branch on blank strings.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    /// Name used in error messages ("report", "dump").
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Self {
        Self { name: name.into(), columns, rows }
    }

    /// Index of a column by exact header name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Trimmed cell value, `None` when the cell is blank or the row is
    /// ragged and does not reach `col`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        let value = self.rows.get(row)?.get(col)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Non-fatal messages produced during a run. The engine never prints;
/// callers decide whether and where to render these.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticLevel {
    Info,
    Warning,
}

impl Diagnostic {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: DiagnosticLevel::Info, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: DiagnosticLevel::Warning, message: message.into() }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Cleaned dump plus run counters.
///
/// `cleaned` carries the dump's column schema and only rows that survived
/// filtering: before-horizon survivors first, then after-horizon rows, each
/// partition in its original dump order. No row is fabricated or edited.
#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub cleaned: Dataset,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
    /// Latest `Created On` in the report; partitions the dump.
    pub horizon: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub dump_rows: usize,
    pub cleaned_rows: usize,
    /// Before-horizon rows dropped because their ParentID is unknown
    /// to the report.
    pub removed_unmatched_parent: usize,
    /// Size of the after-horizon partition, counted at partition time.
    /// Change-row removals do not reduce it.
    pub new_after_horizon: usize,
    /// Change rows dropped for lacking an exact (type, timestamp) match
    /// in the report. `None` when the cross-check was skipped because
    /// `Record Type` is missing from either dataset.
    pub removed_unmatched_change: Option<usize>,
}
