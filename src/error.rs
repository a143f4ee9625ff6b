use std::path::PathBuf;

use thiserror::Error;

/// The input file could not be turned into a table.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed CSV: {0}")]
    Malformed(#[from] csv::Error),

    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Writing chart images or table files failed.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{} is not a writable directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to render {chart}: {message}")]
    Render { chart: &'static str, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Non-fatal: a view had no eligible rows and was rendered as "no data".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no data for {view}")]
pub struct MissingData {
    pub view: String,
}

impl MissingData {
    pub fn new(view: impl Into<String>) -> Self {
        MissingData { view: view.into() }
    }
}
