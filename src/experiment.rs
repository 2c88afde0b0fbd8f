use std::path::Path;

use serde::Deserialize;

use crate::domain::{Alias, DEFAULT_EXP_SUFFIX, DEFAULT_LIB_NAME_SUFFIX, Layout};
use crate::error::MetadataError;
use crate::table;
use crate::xml::Element;

pub const PLATFORM: &str = "ILLUMINA";

/// Raw params row. Columns are optional here so that a missing column and a
/// blank value report the same `MissingParameter` error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExperimentParams {
    #[serde(default)]
    pub study_accession: Option<String>,
    #[serde(default)]
    pub instrument_model: Option<String>,
    #[serde(default)]
    pub library_strategy: Option<String>,
    #[serde(default)]
    pub library_source: Option<String>,
    #[serde(default)]
    pub library_selection: Option<String>,
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub nominal_length: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryLayout {
    Single,
    Paired { nominal_length: String },
}

impl LibraryLayout {
    pub fn layout(&self) -> Layout {
        match self {
            LibraryLayout::Single => Layout::Single,
            LibraryLayout::Paired { .. } => Layout::Paired,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentSettings {
    pub study_accession: String,
    pub instrument_model: String,
    pub library_strategy: String,
    pub library_source: String,
    pub library_selection: String,
    pub library_layout: LibraryLayout,
}

impl TryFrom<ExperimentParams> for ExperimentSettings {
    type Error = MetadataError;

    fn try_from(params: ExperimentParams) -> Result<Self, Self::Error> {
        let study_accession = required("study_accession", params.study_accession)?;
        let instrument_model = required("instrument_model", params.instrument_model)?;
        let library_strategy = required("library_strategy", params.library_strategy)?;
        let library_source = required("library_source", params.library_source)?;
        let library_selection = required("library_selection", params.library_selection)?;
        let layout: Layout = required("layout", params.layout)?.parse()?;
        let nominal_length = required("nominal_length", params.nominal_length)?;

        let library_layout = match layout {
            Layout::Single => LibraryLayout::Single,
            Layout::Paired => LibraryLayout::Paired { nominal_length },
        };

        Ok(Self {
            study_accession,
            instrument_model,
            library_strategy,
            library_source,
            library_selection,
            library_layout,
        })
    }
}

fn required(name: &str, value: Option<String>) -> Result<String, MetadataError> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| MetadataError::MissingParameter(name.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suffixes {
    pub experiment: String,
    pub library_name: String,
}

impl Default for Suffixes {
    fn default() -> Self {
        Self {
            experiment: DEFAULT_EXP_SUFFIX.to_string(),
            library_name: DEFAULT_LIB_NAME_SUFFIX.to_string(),
        }
    }
}

pub fn read_params(path: &Path) -> Result<ExperimentSettings, MetadataError> {
    let rows: Vec<ExperimentParams> = table::read_records(path, &[])?;
    settings_from_rows(rows)
}

pub fn settings_from_rows(
    rows: Vec<ExperimentParams>,
) -> Result<ExperimentSettings, MetadataError> {
    let count = rows.len();
    let mut rows = rows.into_iter();
    match (rows.next(), rows.next()) {
        (Some(row), None) => row.try_into(),
        _ => Err(MetadataError::ParamsRowCount(count)),
    }
}

pub fn build_experiment(
    sample: &Alias,
    settings: &ExperimentSettings,
    suffixes: &Suffixes,
) -> Element {
    let reads = settings.library_layout.layout().read_description();

    let layout = match &settings.library_layout {
        LibraryLayout::Paired { nominal_length } => {
            Element::new("PAIRED").with_attr("NOMINAL_LENGTH", nominal_length)
        }
        LibraryLayout::Single => Element::new("SINGLE"),
    };

    let library_name = sample.with_suffix(&suffixes.library_name);
    let library = Element::new("LIBRARY_DESCRIPTOR")
        .with_child(Element::new("LIBRARY_NAME").with_text(library_name))
        .with_child(Element::new("LIBRARY_STRATEGY").with_text(&settings.library_strategy))
        .with_child(Element::new("LIBRARY_SOURCE").with_text(&settings.library_source))
        .with_child(Element::new("LIBRARY_SELECTION").with_text(&settings.library_selection))
        .with_child(Element::new("LIBRARY_LAYOUT").with_child(layout));

    let design = Element::new("DESIGN")
        .with_child(Element::new("DESIGN_DESCRIPTION").with_text(format!(
            "{}-selected transcriptome sequencing ({reads}).",
            settings.library_selection
        )))
        .with_child(Element::new("SAMPLE_DESCRIPTOR").with_attr("refname", sample.as_str()))
        .with_child(library);

    let platform = Element::new("PLATFORM").with_child(
        Element::new(PLATFORM)
            .with_child(Element::new("INSTRUMENT_MODEL").with_text(&settings.instrument_model)),
    );

    tracing::debug!(sample = %sample, "mapped experiment");
    Element::new("EXPERIMENT")
        .with_attr("alias", sample.with_suffix(&suffixes.experiment))
        .with_child(Element::new("TITLE").with_text(format!("{sample} RNA-seq ({reads})")))
        .with_child(Element::new("STUDY_REF").with_attr("accession", &settings.study_accession))
        .with_child(design)
        .with_child(platform)
}

pub fn build_experiment_set(
    samples: &[Alias],
    settings: &ExperimentSettings,
    suffixes: &Suffixes,
) -> Element {
    samples
        .iter()
        .fold(Element::new("EXPERIMENT_SET"), |set, sample| {
            set.with_child(build_experiment(sample, settings, suffixes))
        })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn params(layout: &str) -> ExperimentParams {
        ExperimentParams {
            study_accession: Some("PRJEB1".to_string()),
            instrument_model: Some("Illumina HiSeq".to_string()),
            library_strategy: Some("RNA-Seq".to_string()),
            library_source: Some("TRANSCRIPTOMIC".to_string()),
            library_selection: Some("cDNA".to_string()),
            layout: Some(layout.to_string()),
            nominal_length: Some(" 300 ".to_string()),
        }
    }

    #[test]
    fn paired_layout_carries_nominal_length() {
        let settings = ExperimentSettings::try_from(params("paired")).unwrap();
        assert_eq!(
            settings.library_layout,
            LibraryLayout::Paired {
                nominal_length: "300".to_string()
            }
        );
    }

    #[test]
    fn blank_parameter_is_named() {
        let mut raw = params("PAIRED");
        raw.library_source = Some("   ".to_string());
        let err = ExperimentSettings::try_from(raw).unwrap_err();
        assert_matches!(err, MetadataError::MissingParameter(name) if name == "library_source");
    }

    #[test]
    fn invalid_layout_is_rejected() {
        let err = ExperimentSettings::try_from(params("MATE_PAIR")).unwrap_err();
        assert_matches!(err, MetadataError::InvalidLayout(_));
    }

    #[test]
    fn params_need_exactly_one_row() {
        assert_matches!(
            settings_from_rows(Vec::new()),
            Err(MetadataError::ParamsRowCount(0))
        );
        assert_matches!(
            settings_from_rows(vec![params("SINGLE"), params("SINGLE")]),
            Err(MetadataError::ParamsRowCount(2))
        );
    }

    #[test]
    fn single_layout_experiment() {
        let settings = ExperimentSettings::try_from(params("single")).unwrap();
        let sample: Alias = "S2".parse().unwrap();
        let experiment = build_experiment(&sample, &settings, &Suffixes::default());

        assert_eq!(
            experiment.find("TITLE").and_then(Element::text),
            Some("S2 RNA-seq (single-end)")
        );
        let layout = experiment
            .find_path("DESIGN/LIBRARY_DESCRIPTOR/LIBRARY_LAYOUT")
            .unwrap();
        assert_eq!(layout.children().len(), 1);
        assert_eq!(layout.children()[0].name(), "SINGLE");
        assert!(layout.children()[0].attributes().is_empty());
    }
}
