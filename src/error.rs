use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum MetadataError {
    #[error("input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("failed to read CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("missing required column in {path}: {column}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("empty value for required field {field} in row {row}")]
    EmptyField { field: String, row: usize },

    #[error("expected exactly one row in params CSV, found {0}")]
    ParamsRowCount(usize),

    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    #[error("layout must be SINGLE or PAIRED, got {0:?}")]
    InvalidLayout(String),

    #[error("SAMPLE element #{index} is missing an 'alias' attribute")]
    MissingSampleAlias { index: usize },

    #[error("incomplete row for experiment_alias={experiment_alias}; fill all fields")]
    IncompleteRunRow { experiment_alias: String },

    #[error("XML error: {0}")]
    Xml(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),
}
