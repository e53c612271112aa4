use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::util::trailing_path_segment;

/// Dataset names shipped with the crate, one per line.
const BUNDLED_DATASETS: &str = include_str!("../data/datasets.txt");

/// The set of dataset names accepted as query targets.
///
/// Loaded once and immutable afterwards; the [`Client`](crate::Client) holds a
/// catalog by value, so tests can substitute a fake via
/// [`Catalog::from_names`].
#[derive(Debug, Clone)]
pub struct Catalog {
    names: Vec<String>,
}

impl Catalog {
    /// The catalog bundled with the crate.
    pub fn bundled() -> Self {
        Self::from_lines(BUNDLED_DATASETS)
    }

    /// Loads a catalog from a line-delimited text file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_lines(&text))
    }

    /// Builds a catalog from an explicit list of names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    fn from_lines(text: &str) -> Self {
        let names = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { names }
    }

    pub fn contains(&self, dataset: &str) -> bool {
        self.names.iter().any(|n| n == dataset)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A parsed remote catalog document, indexed by derived dataset name.
///
/// The portal serves `{"dataset": [ {..., "@distribution": [...]}, ... ]}`;
/// each entry's name is the trailing path segment of its first distribution's
/// `accessURL`. Leading `@` is stripped from stored keys.
#[derive(Debug, Clone)]
pub struct RemoteCatalog {
    names: Vec<String>,
    entries: BTreeMap<String, Map<String, Value>>,
}

#[derive(Debug, serde::Deserialize)]
struct CatalogDocument {
    dataset: Vec<Map<String, Value>>,
}

impl RemoteCatalog {
    /// Parses a catalog JSON document.
    ///
    /// Fails if the `dataset` top-level key is absent, or if any entry has an
    /// empty distribution list or a distribution without an `accessURL`.
    pub fn from_json(text: &str) -> Result<Self> {
        let doc: CatalogDocument = serde_json::from_str(text)?;

        let mut names = Vec::with_capacity(doc.dataset.len());
        let mut entries = BTreeMap::new();

        for (i, record) in doc.dataset.into_iter().enumerate() {
            let name = derive_name(&record, i)?;

            let mut cleaned = Map::new();
            for (key, value) in record {
                cleaned.insert(key.trim_start_matches('@').to_string(), value);
            }

            names.push(name.clone());
            entries.insert(name, cleaned);
        }

        Ok(Self { names, entries })
    }

    /// Derived dataset names, in document order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Looks up the full metadata record for a dataset.
    pub fn get(&self, name: &str) -> Option<&Map<String, Value>> {
        self.entries.get(name)
    }

    /// Converts the derived name list into a plain [`Catalog`].
    pub fn to_catalog(&self) -> Catalog {
        Catalog::from_names(self.names.iter().cloned())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn derive_name(record: &Map<String, Value>, index: usize) -> Result<String> {
    let (key, distributions) = record
        .iter()
        .find(|(key, _)| key.contains("distribution"))
        .ok_or_else(|| Error::Catalog(format!("dataset entry {index} has no distribution key")))?;

    let first = distributions
        .as_array()
        .and_then(|list| list.first())
        .ok_or_else(|| {
            Error::Catalog(format!("dataset entry {index} has an empty {key} list"))
        })?;

    let access_url = first
        .get("accessURL")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            Error::Catalog(format!("dataset entry {index} distribution has no accessURL"))
        })?;

    trailing_path_segment(access_url).ok_or_else(|| {
        Error::Catalog(format!(
            "dataset entry {index} accessURL {access_url:?} has no path segment"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_JSON: &str = r#"{
        "dataset": [
            {
                "@id": "1",
                "title": "SORCE Total Solar Irradiance",
                "@distribution": [
                    {"accessURL": "https://lasp.colorado.edu/lisird/latis/dap/sorce_tsi_24hr_l3"}
                ]
            },
            {
                "@id": "2",
                "title": "Composite Lyman-alpha",
                "@distribution": [
                    {"accessURL": "https://lasp.colorado.edu/lisird/latis/dap/composite_lyman_alpha"}
                ]
            }
        ]
    }"#;

    #[test]
    fn bundled_catalog_has_known_datasets() {
        let catalog = Catalog::bundled();
        assert!(!catalog.is_empty());
        assert!(catalog.contains("sorce_tsi_24hr_l3"));
        assert!(!catalog.contains("not_a_dataset"));
    }

    #[test]
    fn from_file_trims_and_skips_blanks() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "  a \n\nb\n \n").unwrap();

        let catalog = Catalog::from_file(file.path()).unwrap();
        assert_eq!(catalog.names(), ["a", "b"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Catalog::from_file("/nonexistent/datasets.txt").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn remote_catalog_derives_names_from_access_urls() {
        let catalog = RemoteCatalog::from_json(CATALOG_JSON).unwrap();
        assert_eq!(
            catalog.names(),
            ["sorce_tsi_24hr_l3", "composite_lyman_alpha"]
        );

        // `@` is stripped from stored keys.
        let entry = catalog.get("sorce_tsi_24hr_l3").unwrap();
        assert_eq!(entry.get("id").and_then(Value::as_str), Some("1"));
        assert!(entry.contains_key("distribution"));

        let plain = catalog.to_catalog();
        assert!(plain.contains("composite_lyman_alpha"));
    }

    #[test]
    fn missing_dataset_key_is_a_json_error() {
        let err = RemoteCatalog::from_json(r#"{"items": []}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn empty_distribution_list_is_rejected() {
        let doc = r#"{"dataset": [{"@distribution": []}]}"#;
        let err = RemoteCatalog::from_json(doc).unwrap_err();
        assert!(matches!(err, Error::Catalog(_)));
        assert!(err.to_string().contains("empty"));
    }
}
