use std::path::PathBuf;

use serde::Serialize;

use crate::error::MetadataError;
use crate::experiment::{self, Suffixes};
use crate::run;
use crate::sample;
use crate::xml;

#[derive(Debug, Clone)]
pub struct SampleJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ExperimentJob {
    pub samples: PathBuf,
    pub params: PathBuf,
    pub output: PathBuf,
    pub suffixes: Suffixes,
}

#[derive(Debug, Clone)]
pub struct RunJob {
    pub mapping: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    pub document: String,
    pub inputs: Vec<String>,
    pub output: String,
    pub records: usize,
}

/// `samples.csv` to `SAMPLE_SET`.
pub fn convert_samples(job: &SampleJob) -> Result<ConversionResult, MetadataError> {
    let records = sample::read_samples(&job.input)?;
    let root = sample::build_sample_set(&records);
    xml::write_document(&job.output, &root)?;

    Ok(ConversionResult {
        document: root.name().to_string(),
        inputs: vec![job.input.display().to_string()],
        output: job.output.display().to_string(),
        records: records.len(),
    })
}

/// Params are validated before the sample document is read, so a bad params
/// sheet fails without touching the output path.
pub fn convert_experiments(job: &ExperimentJob) -> Result<ConversionResult, MetadataError> {
    if !job.samples.exists() {
        return Err(MetadataError::InputNotFound(job.samples.clone()));
    }
    let settings = experiment::read_params(&job.params)?;
    let aliases = xml::read_sample_aliases(&job.samples)?;
    let root = experiment::build_experiment_set(&aliases, &settings, &job.suffixes);
    xml::write_document(&job.output, &root)?;

    Ok(ConversionResult {
        document: root.name().to_string(),
        inputs: vec![
            job.samples.display().to_string(),
            job.params.display().to_string(),
        ],
        output: job.output.display().to_string(),
        records: aliases.len(),
    })
}

pub fn convert_runs(job: &RunJob) -> Result<ConversionResult, MetadataError> {
    let entries = run::read_run_entries(&job.mapping)?;
    let root = run::build_run_set(&entries);
    xml::write_document(&job.output, &root)?;

    Ok(ConversionResult {
        document: root.name().to_string(),
        inputs: vec![job.mapping.display().to_string()],
        output: job.output.display().to_string(),
        records: entries.len(),
    })
}
