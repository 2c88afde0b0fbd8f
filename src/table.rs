use std::fs;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::MetadataError;

/// Reads a headered CSV file into typed records.
///
/// Every name in `required` must appear in the header row; the first missing
/// one is reported before any data row is deserialized.
pub fn read_records<T: DeserializeOwned>(
    path: &Path,
    required: &[&str],
) -> Result<Vec<T>, MetadataError> {
    if !path.exists() {
        return Err(MetadataError::InputNotFound(path.to_path_buf()));
    }
    let file = fs::File::open(path)
        .map_err(|err| MetadataError::Filesystem(format!("open {}: {err}", path.display())))?;
    read_records_from_reader(file, path, required)
}

pub fn read_records_from_reader<T: DeserializeOwned, R: io::Read>(
    input: R,
    source: &Path,
    required: &[&str],
) -> Result<Vec<T>, MetadataError> {
    let csv_error = |err: csv::Error| MetadataError::Csv {
        path: source.to_path_buf(),
        message: err.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input);
    let headers = reader.headers().map_err(csv_error)?.clone();
    if let Some(column) = required
        .iter()
        .find(|column| !headers.iter().any(|header| header == **column))
    {
        return Err(MetadataError::MissingColumn {
            path: source.to_path_buf(),
            column: column.to_string(),
        });
    }

    let records = reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(csv_error)?;
    tracing::debug!(path = %source.display(), rows = records.len(), "loaded CSV");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Pair {
        left: String,
        right: Option<String>,
    }

    #[test]
    fn empty_fields_become_none() {
        let data = "left,right\na,\nb,c\n";
        let rows: Vec<Pair> =
            read_records_from_reader(data.as_bytes(), Path::new("pairs.csv"), &["left", "right"])
                .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].left, "a");
        assert_eq!(rows[0].right, None);
        assert_eq!(rows[1].right.as_deref(), Some("c"));
    }

    #[test]
    fn missing_column_is_reported() {
        let data = "left\na\n";
        let err = read_records_from_reader::<Pair, _>(
            data.as_bytes(),
            Path::new("pairs.csv"),
            &["left", "right"],
        )
        .unwrap_err();
        assert_matches!(err, MetadataError::MissingColumn { column, .. } if column == "right");
    }

    #[test]
    fn missing_file() {
        let err = read_records::<Pair>(Path::new("/nonexistent/pairs.csv"), &[]).unwrap_err();
        assert_matches!(err, MetadataError::InputNotFound(_));
    }
}
