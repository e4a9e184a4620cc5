use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Maps city names to their trip CSV sources.
///
/// Can be loaded from a plain JSON object on disk:
/// ```json
/// {
///   "chicago": "chicago.csv",
///   "new york city": "new_york_city.csv"
/// }
/// ```
/// Relative file names are resolved against the catalog's data directory.
#[derive(Debug, Clone)]
pub struct CityCatalog {
    data_dir: PathBuf,
    entries: BTreeMap<String, String>,
}

impl CityCatalog {
    /// The three cities shipped with the bikeshare data set.
    pub fn builtin(data_dir: impl Into<PathBuf>) -> Self {
        let entries = [
            ("chicago", "chicago.csv"),
            ("new york city", "new_york_city.csv"),
            ("washington", "washington.csv"),
        ]
        .into_iter()
        .map(|(city, file)| (city.to_string(), file.to_string()))
        .collect();

        Self {
            data_dir: data_dir.into(),
            entries,
        }
    }

    /// Loads the catalog from a JSON file at `path`.
    pub fn load(path: &Path, data_dir: impl Into<PathBuf>) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading city catalog '{}'", path.display()))?;
        Self::from_json(&content, data_dir)
    }

    pub fn from_json(content: &str, data_dir: impl Into<PathBuf>) -> Result<Self> {
        let raw: BTreeMap<String, String> =
            serde_json::from_str(content).context("parsing city catalog JSON")?;
        if raw.is_empty() {
            anyhow::bail!("city catalog is empty");
        }

        let entries = raw
            .into_iter()
            .map(|(city, file)| (normalize(&city), file))
            .collect();

        Ok(Self {
            data_dir: data_dir.into(),
            entries,
        })
    }

    /// Returns the catalog key for `city`, matching case-insensitively.
    pub fn lookup(&self, city: &str) -> Option<&str> {
        self.entries
            .get_key_value(&normalize(city))
            .map(|(k, _)| k.as_str())
    }

    /// Returns the path of the CSV source for `city`, if it is configured.
    pub fn source_path(&self, city: &str) -> Option<PathBuf> {
        self.entries
            .get(&normalize(city))
            .map(|file| self.data_dir.join(file))
    }

    /// Iterates over all `(city, path)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, PathBuf)> {
        self.entries
            .iter()
            .map(|(city, file)| (city.as_str(), self.data_dir.join(file)))
    }

    pub fn cities(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}

fn normalize(city: &str) -> String {
    city.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_cities() {
        let catalog = CityCatalog::builtin("data");
        assert_eq!(catalog.cities(), vec!["chicago", "new york city", "washington"]);
        assert_eq!(
            catalog.source_path("New York City"),
            Some(PathBuf::from("data").join("new_york_city.csv"))
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = CityCatalog::builtin(".");
        assert_eq!(catalog.lookup("  WASHINGTON "), Some("washington"));
        assert_eq!(catalog.lookup("boston"), None);
        assert_eq!(catalog.source_path("boston"), None);
    }

    #[test]
    fn test_from_json() {
        let catalog =
            CityCatalog::from_json(r#"{"Boston": "bluebikes.csv"}"#, "/srv/trips").unwrap();
        assert_eq!(catalog.lookup("boston"), Some("boston"));
        assert_eq!(
            catalog.source_path("boston"),
            Some(PathBuf::from("/srv/trips/bluebikes.csv"))
        );
    }

    #[test]
    fn test_empty_or_invalid_json_rejected() {
        assert!(CityCatalog::from_json("{}", ".").is_err());
        assert!(CityCatalog::from_json("[1, 2]", ".").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("bikeshare_explorer_test_catalog.json");
        std::fs::write(&path, r#"{"denver": "denver.csv"}"#).unwrap();

        let catalog = CityCatalog::load(&path, "d").unwrap();
        let entries: Vec<_> = catalog.iter().collect();
        assert_eq!(entries, vec![("denver", PathBuf::from("d/denver.csv"))]);

        std::fs::remove_file(&path).unwrap();
    }
}
