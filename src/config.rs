use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::{DEFAULT_EXP_SUFFIX, DEFAULT_LIB_NAME_SUFFIX};
use crate::error::MetadataError;

pub const DEFAULT_CONFIG_FILE: &str = "ena-xml.json";
pub const DEFAULT_SAMPLES_CSV: &str = "samples.csv";
pub const DEFAULT_SAMPLES_XML: &str = "samples.xml";
pub const DEFAULT_RUN_XML: &str = "run.xml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub samples: SamplesSection,
    #[serde(default)]
    pub experiments: ExperimentsSection,
    #[serde(default)]
    pub runs: RunsSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct SamplesSection {
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExperimentsSection {
    #[serde(default)]
    pub exp_suffix: Option<String>,
    #[serde(default)]
    pub lib_name_suffix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RunsSection {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub samples_input: PathBuf,
    pub samples_output: PathBuf,
    pub exp_suffix: String,
    pub lib_name_suffix: String,
    pub run_output: PathBuf,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// An explicit path must be readable; the default file is optional and
    /// built-in defaults apply when it is absent.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, MetadataError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Ok(Self::resolve_config(Config::default()));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| MetadataError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| MetadataError::ConfigParse(err.to_string()))?;
        tracing::debug!(path = %config_path.display(), "loaded config");

        Ok(Self::resolve_config(config))
    }

    pub fn resolve_config(config: Config) -> ResolvedConfig {
        ResolvedConfig {
            samples_input: PathBuf::from(
                config
                    .samples
                    .input
                    .unwrap_or_else(|| DEFAULT_SAMPLES_CSV.to_string()),
            ),
            samples_output: PathBuf::from(
                config
                    .samples
                    .output
                    .unwrap_or_else(|| DEFAULT_SAMPLES_XML.to_string()),
            ),
            exp_suffix: config
                .experiments
                .exp_suffix
                .unwrap_or_else(|| DEFAULT_EXP_SUFFIX.to_string()),
            lib_name_suffix: config
                .experiments
                .lib_name_suffix
                .unwrap_or_else(|| DEFAULT_LIB_NAME_SUFFIX.to_string()),
            run_output: PathBuf::from(
                config
                    .runs
                    .output
                    .unwrap_or_else(|| DEFAULT_RUN_XML.to_string()),
            ),
        }
    }
}
