use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use strucflow::core::align::AlignmentScoring;
use strucflow::core::frequency::KeyRule;
use strucflow::core::selection::AtomSelection;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileContactsConfig {
    pub cutoff: Option<f64>,
    pub selection_one: Option<AtomSelection>,
    pub selection_two: Option<AtomSelection>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileFrequencyConfig {
    pub key: Option<KeyRule>,
    pub selection: Option<AtomSelection>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileFragmentsConfig {
    pub length: Option<i64>,
    pub representative_atom: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileQualityConfig {
    pub max_resolution: Option<f64>,
    pub max_r_free: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSimilarityConfig {
    pub reference: Option<String>,
    pub min_similarity: Option<f64>,
    pub scoring: Option<AlignmentScoring>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub contacts: Option<FileContactsConfig>,
    pub frequency: Option<FileFrequencyConfig>,
    pub fragments: Option<FileFragmentsConfig>,
    pub quality: Option<FileQualityConfig>,
    pub similarity: Option<FileSimilarityConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strucflow::core::models::chain::EntityType;

    #[test]
    fn full_file_parses() {
        let config = FileConfig::from_toml(
            r#"
            [contacts]
            cutoff = 3.5

            [contacts.selection-one]
            group-names = ["HIS", "CYS"]

            [contacts.selection-two]
            element-names = ["Zn"]
            group-type = "non-polymer"

            [frequency]
            key = "element"

            [frequency.selection]
            charged = true

            [fragments]
            length = 8
            representative-atom = "P"

            [quality]
            max-resolution = 2.0
            max-r-free = 0.25

            [similarity]
            reference = "MKTAYIAKQR"
            min-similarity = 0.4

            [similarity.scoring]
            gap-open = 10
            "#,
        )
        .unwrap();

        let contacts = config.contacts.unwrap();
        assert_eq!(contacts.cutoff, Some(3.5));
        let two = contacts.selection_two.unwrap();
        assert_eq!(two.group_type, Some(EntityType::NonPolymer));
        assert!(two.element_names.unwrap().contains("Zn"));
        let frequency = config.frequency.unwrap();
        assert_eq!(frequency.key, Some(KeyRule::Element));
        assert!(frequency.selection.unwrap().charged);
        assert_eq!(config.fragments.unwrap().length, Some(8));
        let similarity = config.similarity.unwrap();
        let scoring = similarity.scoring.unwrap();
        assert_eq!(scoring.gap_open, 10);
        assert_eq!(scoring.gap_extend, AlignmentScoring::default().gap_extend);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config = FileConfig::from_toml("").unwrap();
        assert!(config.contacts.is_none());
        assert!(config.similarity.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::from_toml("[contacts]\nradius = 4.0\n").is_err());
        assert!(FileConfig::from_toml("[contacts.selection-one]\nresidues = [\"HIS\"]\n").is_err());
    }
}
