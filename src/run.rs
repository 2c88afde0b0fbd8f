use std::path::Path;

use serde::Deserialize;

use crate::domain::{Md5Checksum, RUN_SUFFIX};
use crate::error::MetadataError;
use crate::table;
use crate::xml::Element;

pub const RUN_COLUMNS: [&str; 5] = ["experiment_alias", "fastq_1", "fastq_2", "md5_1", "md5_2"];

#[derive(Debug, Clone, Deserialize)]
pub struct RunMappingRecord {
    pub experiment_alias: Option<String>,
    pub fastq_1: Option<String>,
    pub fastq_2: Option<String>,
    pub md5_1: Option<String>,
    pub md5_2: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFile {
    pub filename: String,
    pub checksum: Md5Checksum,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunEntry {
    pub experiment_alias: String,
    pub files: [RunFile; 2],
}

impl RunEntry {
    pub fn run_alias(&self) -> String {
        format!("{}{RUN_SUFFIX}", self.experiment_alias)
    }
}

impl TryFrom<RunMappingRecord> for RunEntry {
    type Error = MetadataError;

    fn try_from(record: RunMappingRecord) -> Result<Self, Self::Error> {
        let experiment_alias = trimmed(record.experiment_alias);
        let incomplete = || MetadataError::IncompleteRunRow {
            experiment_alias: experiment_alias.clone(),
        };

        let fastq_1 = trimmed(record.fastq_1);
        let fastq_2 = trimmed(record.fastq_2);
        if experiment_alias.is_empty() || fastq_1.is_empty() || fastq_2.is_empty() {
            return Err(incomplete());
        }
        let md5_1: Md5Checksum = trimmed(record.md5_1).parse().map_err(|_| incomplete())?;
        let md5_2: Md5Checksum = trimmed(record.md5_2).parse().map_err(|_| incomplete())?;

        Ok(Self {
            files: [
                RunFile {
                    filename: fastq_1,
                    checksum: md5_1,
                },
                RunFile {
                    filename: fastq_2,
                    checksum: md5_2,
                },
            ],
            experiment_alias,
        })
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|value| value.trim().to_string()).unwrap_or_default()
}

/// Loads and validates every mapping row; the first incomplete row aborts
/// the whole batch.
pub fn read_run_entries(path: &Path) -> Result<Vec<RunEntry>, MetadataError> {
    let records: Vec<RunMappingRecord> = table::read_records(path, &RUN_COLUMNS)?;
    records.into_iter().map(RunEntry::try_from).collect()
}

pub fn build_run(entry: &RunEntry) -> Element {
    let files = entry
        .files
        .iter()
        .fold(Element::new("FILES"), |files, file| {
            files.with_child(
                Element::new("FILE")
                    .with_attr("filename", &file.filename)
                    .with_attr("filetype", "fastq")
                    .with_attr("checksum_method", "MD5")
                    .with_attr("checksum", file.checksum.as_str()),
            )
        });

    tracing::debug!(experiment = %entry.experiment_alias, "mapped run");
    Element::new("RUN")
        .with_attr("alias", entry.run_alias())
        .with_child(Element::new("EXPERIMENT_REF").with_attr("refname", &entry.experiment_alias))
        .with_child(Element::new("DATA_BLOCK").with_child(files))
}

pub fn build_run_set(entries: &[RunEntry]) -> Element {
    entries
        .iter()
        .fold(Element::new("RUN_SET"), |set, entry| set.with_child(build_run(entry)))
}
