use std::path::Path;

use serde::Deserialize;

use crate::domain::{Alias, SCIENTIFIC_NAME_HUMAN, TAXON_ID_HUMAN};
use crate::error::MetadataError;
use crate::table;
use crate::xml::Element;

pub const SAMPLE_COLUMNS: [&str; 7] = [
    "alias",
    "center_name",
    "cell_line",
    "stage",
    "oe",
    "genotype",
    "dox",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SampleRecord {
    pub alias: String,
    pub center_name: String,
    pub cell_line: String,
    pub stage: String,
    pub oe: Option<String>,
    pub genotype: Option<String>,
    pub dox: String,
}

impl SampleRecord {
    pub fn doxycycline_treated(&self) -> bool {
        self.dox.to_lowercase() == "yes"
    }
}

pub fn read_samples(path: &Path) -> Result<Vec<SampleRecord>, MetadataError> {
    let records: Vec<SampleRecord> = table::read_records(path, &SAMPLE_COLUMNS)?;
    for (index, record) in records.iter().enumerate() {
        record
            .alias
            .parse::<Alias>()
            .map_err(|_| MetadataError::EmptyField {
                field: "alias".to_string(),
                row: index + 1,
            })?;
    }
    Ok(records)
}

/// Genotype is inserted even when empty, leaving `", , doxycycline"` in the
/// title.
pub fn sample_title(record: &SampleRecord) -> String {
    let overexpression = match non_empty(&record.oe) {
        Some(oe) => format!("{oe} overexpression, "),
        None => String::new(),
    };
    let genotype = non_empty(&record.genotype).unwrap_or_default();
    let treatment = if record.doxycycline_treated() {
        "treated"
    } else {
        "untreated"
    };
    format!(
        "Human cell line {}, {}, {overexpression}{genotype}, doxycycline {treatment}",
        record.cell_line, record.stage
    )
}

pub fn build_sample(record: &SampleRecord) -> Element {
    let name = Element::new("SAMPLE_NAME")
        .with_child(Element::new("TAXON_ID").with_text(TAXON_ID_HUMAN))
        .with_child(Element::new("SCIENTIFIC_NAME").with_text(SCIENTIFIC_NAME_HUMAN));

    let mut attributes = Element::new("SAMPLE_ATTRIBUTES")
        .with_child(sample_attribute("cell_line", &record.cell_line))
        .with_child(sample_attribute("differentiation_stage", &record.stage));
    if let Some(oe) = non_empty(&record.oe) {
        attributes.push(sample_attribute("overexpression", oe));
    }
    if let Some(genotype) = non_empty(&record.genotype) {
        attributes.push(sample_attribute("genotype", genotype));
    }
    attributes.push(sample_attribute("doxycycline_treatment", &record.dox));

    tracing::debug!(alias = %record.alias, "mapped sample");
    Element::new("SAMPLE")
        .with_attr("alias", &record.alias)
        .with_attr("center_name", &record.center_name)
        .with_child(Element::new("TITLE").with_text(sample_title(record)))
        .with_child(name)
        .with_child(attributes)
}

pub fn build_sample_set(records: &[SampleRecord]) -> Element {
    records
        .iter()
        .fold(Element::new("SAMPLE_SET"), |set, record| {
            set.with_child(build_sample(record))
        })
}

fn sample_attribute(tag: &str, value: &str) -> Element {
    Element::new("SAMPLE_ATTRIBUTE")
        .with_child(Element::new("TAG").with_text(tag))
        .with_child(Element::new("VALUE").with_text(value))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(oe: Option<&str>, genotype: Option<&str>, dox: &str) -> SampleRecord {
        SampleRecord {
            alias: "S1".to_string(),
            center_name: "LAB".to_string(),
            cell_line: "H9".to_string(),
            stage: "day 7".to_string(),
            oe: oe.map(str::to_string),
            genotype: genotype.map(str::to_string),
            dox: dox.to_string(),
        }
    }

    fn tags(sample: &Element) -> Vec<&str> {
        sample
            .find("SAMPLE_ATTRIBUTES")
            .unwrap()
            .children()
            .iter()
            .filter_map(|attr| attr.find("TAG").and_then(Element::text))
            .collect()
    }

    #[test]
    fn title_with_all_clauses() {
        let title = sample_title(&record(Some("NGN2"), Some("WT"), "YES"));
        assert_eq!(
            title,
            "Human cell line H9, day 7, NGN2 overexpression, WT, doxycycline treated"
        );
    }

    #[test]
    fn title_keeps_dangling_comma_without_genotype() {
        let title = sample_title(&record(Some("NGN2"), None, "no"));
        assert_eq!(
            title,
            "Human cell line H9, day 7, NGN2 overexpression, , doxycycline untreated"
        );
    }

    #[test]
    fn optional_attributes_follow_source_fields() {
        let full = build_sample(&record(Some("NGN2"), Some("WT"), "yes"));
        assert_eq!(
            tags(&full),
            vec![
                "cell_line",
                "differentiation_stage",
                "overexpression",
                "genotype",
                "doxycycline_treatment"
            ]
        );

        let bare = build_sample(&record(None, Some(""), "yes"));
        assert_eq!(
            tags(&bare),
            vec!["cell_line", "differentiation_stage", "doxycycline_treatment"]
        );
    }

    #[test]
    fn fixed_taxonomy() {
        let sample = build_sample(&record(None, None, "no"));
        assert_eq!(sample.attribute("alias"), Some("S1"));
        assert_eq!(sample.attribute("center_name"), Some("LAB"));
        assert_eq!(
            sample.find_path("SAMPLE_NAME/TAXON_ID").and_then(Element::text),
            Some("9606")
        );
        assert_eq!(
            sample
                .find_path("SAMPLE_NAME/SCIENTIFIC_NAME")
                .and_then(Element::text),
            Some("Homo sapiens")
        );
    }
}
