use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (blank column name, empty format string).
    ConfigValidation(String),
    /// Required column(s) absent. Carries both datasets' full column lists
    /// so the caller can show what *is* available.
    MissingColumns {
        /// (dataset name, column name) per absence.
        missing: Vec<(String, String)>,
        report_columns: Vec<String>,
        dump_columns: Vec<String>,
    },
    /// Report has no rows, so no horizon exists to partition against.
    EmptyReport,
    /// A `Created On` value does not match the configured format.
    /// `row` is the 1-based data row (header excluded).
    TimestampParse {
        dataset: String,
        row: usize,
        value: String,
    },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumns { missing, report_columns, dump_columns } => {
                let list: Vec<String> = missing
                    .iter()
                    .map(|(dataset, column)| format!("'{column}' in {dataset}"))
                    .collect();
                write!(
                    f,
                    "missing column(s): {}; report columns: {:?}; dump columns: {:?}",
                    list.join(", "),
                    report_columns,
                    dump_columns,
                )
            }
            Self::EmptyReport => {
                write!(f, "report has no rows; cannot derive a horizon timestamp")
            }
            Self::TimestampParse { dataset, row, value } => {
                write!(
                    f,
                    "{dataset}, data row {row}: cannot parse timestamp '{value}'"
                )
            }
        }
    }
}

impl std::error::Error for ReconError {}
