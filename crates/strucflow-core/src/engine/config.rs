use crate::core::align::AlignmentScoring;
use crate::core::frequency::KeyRule;
use crate::core::selection::AtomSelection;
use crate::core::sequence::ProteinSequence;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

pub const DEFAULT_REPRESENTATIVE_ATOM: &str = "CA";

#[derive(Debug, Clone, PartialEq)]
pub struct ContactConfig {
    /// Inclusive distance cutoff in Angstroms.
    pub cutoff: f64,
    pub selection_one: AtomSelection,
    /// Second list for two-list searches. `None` searches `selection_one` against itself.
    pub selection_two: Option<AtomSelection>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrequencyConfig {
    pub selection: AtomSelection,
    pub key: KeyRule,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentConfig {
    /// Window length. `None` or a non-positive value means the whole chain.
    pub length: Option<i64>,
    pub representative_atom: String,
}

impl Default for FragmentConfig {
    fn default() -> Self {
        Self {
            length: None,
            representative_atom: DEFAULT_REPRESENTATIVE_ATOM.to_string(),
        }
    }
}

/// Upper bounds on record quality metrics. Both bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QualityConfig {
    pub max_resolution: Option<f64>,
    pub max_r_free: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityConfig {
    pub reference: String,
    /// Inclusive lower bound on similarity, in `[0, 1]`.
    pub min_similarity: f64,
    pub scoring: AlignmentScoring,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub contacts: ContactConfig,
    pub frequency: FrequencyConfig,
    pub fragments: FragmentConfig,
    pub quality: QualityConfig,
    pub similarity: Option<SimilarityConfig>,
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    contact_cutoff: Option<f64>,
    selection_one: Option<AtomSelection>,
    selection_two: Option<AtomSelection>,
    frequency_selection: Option<AtomSelection>,
    key_rule: Option<KeyRule>,
    fragment_length: Option<i64>,
    representative_atom: Option<String>,
    max_resolution: Option<f64>,
    max_r_free: Option<f64>,
    reference_sequence: Option<String>,
    min_similarity: Option<f64>,
    alignment_scoring: Option<AlignmentScoring>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contact_cutoff(mut self, cutoff: f64) -> Self {
        self.contact_cutoff = Some(cutoff);
        self
    }
    pub fn selection_one(mut self, selection: AtomSelection) -> Self {
        self.selection_one = Some(selection);
        self
    }
    pub fn selection_two(mut self, selection: AtomSelection) -> Self {
        self.selection_two = Some(selection);
        self
    }
    pub fn frequency_selection(mut self, selection: AtomSelection) -> Self {
        self.frequency_selection = Some(selection);
        self
    }
    pub fn key_rule(mut self, rule: KeyRule) -> Self {
        self.key_rule = Some(rule);
        self
    }
    pub fn fragment_length(mut self, length: i64) -> Self {
        self.fragment_length = Some(length);
        self
    }
    pub fn representative_atom(mut self, name: impl Into<String>) -> Self {
        self.representative_atom = Some(name.into());
        self
    }
    pub fn max_resolution(mut self, resolution: f64) -> Self {
        self.max_resolution = Some(resolution);
        self
    }
    pub fn max_r_free(mut self, r_free: f64) -> Self {
        self.max_r_free = Some(r_free);
        self
    }
    pub fn reference_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.reference_sequence = Some(sequence.into());
        self
    }
    pub fn min_similarity(mut self, similarity: f64) -> Self {
        self.min_similarity = Some(similarity);
        self
    }
    pub fn alignment_scoring(mut self, scoring: AlignmentScoring) -> Self {
        self.alignment_scoring = Some(scoring);
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let cutoff = self
            .contact_cutoff
            .ok_or(ConfigError::MissingParameter("contact_cutoff"))?;
        if !(cutoff.is_finite() && cutoff > 0.0) {
            return Err(invalid("contact_cutoff", format!("{cutoff} is not a positive distance")));
        }

        let representative_atom = self
            .representative_atom
            .unwrap_or_else(|| DEFAULT_REPRESENTATIVE_ATOM.to_string());
        if representative_atom.trim().is_empty() {
            return Err(invalid("representative_atom", "must not be empty".to_string()));
        }

        for (name, bound) in [
            ("max_resolution", self.max_resolution),
            ("max_r_free", self.max_r_free),
        ] {
            if let Some(value) = bound {
                if !value.is_finite() {
                    return Err(invalid(name, format!("{value} is not a finite number")));
                }
            }
        }

        let similarity = match (self.reference_sequence, self.min_similarity) {
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::MissingParameter("min_similarity")),
            (None, Some(_)) => return Err(ConfigError::MissingParameter("reference_sequence")),
            (Some(reference), Some(min_similarity)) => {
                ProteinSequence::new(&reference)
                    .map_err(|e| invalid("reference_sequence", e.to_string()))?;
                if !(0.0..=1.0).contains(&min_similarity) {
                    return Err(invalid(
                        "min_similarity",
                        format!("{min_similarity} is outside [0, 1]"),
                    ));
                }
                let scoring = self.alignment_scoring.unwrap_or_default();
                scoring
                    .validate()
                    .map_err(|e| invalid("alignment_scoring", e.to_string()))?;
                Some(SimilarityConfig {
                    reference,
                    min_similarity,
                    scoring,
                })
            }
        };

        Ok(AnalysisConfig {
            contacts: ContactConfig {
                cutoff,
                selection_one: self.selection_one.unwrap_or_default(),
                selection_two: self.selection_two,
            },
            frequency: FrequencyConfig {
                selection: self.frequency_selection.unwrap_or_default(),
                key: self.key_rule.unwrap_or_default(),
            },
            fragments: FragmentConfig {
                length: self.fragment_length,
                representative_atom,
            },
            quality: QualityConfig {
                max_resolution: self.max_resolution,
                max_r_free: self.max_r_free,
            },
            similarity,
        })
    }
}

fn invalid(name: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidParameter { name, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_builder_fills_defaults() {
        let config = AnalysisConfigBuilder::new()
            .contact_cutoff(4.0)
            .build()
            .unwrap();
        assert_eq!(config.contacts.cutoff, 4.0);
        assert!(config.contacts.selection_one.is_unconstrained());
        assert!(config.contacts.selection_two.is_none());
        assert_eq!(config.frequency.key, KeyRule::GroupAtomName);
        assert_eq!(config.fragments, FragmentConfig::default());
        assert_eq!(config.fragments.representative_atom, "CA");
        assert_eq!(config.quality, QualityConfig::default());
        assert!(config.similarity.is_none());
    }

    #[test]
    fn missing_cutoff_is_reported() {
        let err = AnalysisConfigBuilder::new().build().unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("contact_cutoff"));
    }

    #[test]
    fn non_positive_cutoff_is_rejected() {
        for cutoff in [0.0, -2.0, f64::NAN] {
            let err = AnalysisConfigBuilder::new()
                .contact_cutoff(cutoff)
                .build()
                .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidParameter {
                    name: "contact_cutoff",
                    ..
                }
            ));
        }
    }

    #[test]
    fn similarity_needs_both_reference_and_threshold() {
        let err = AnalysisConfigBuilder::new()
            .contact_cutoff(4.0)
            .reference_sequence("MKT")
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("min_similarity"));

        let err = AnalysisConfigBuilder::new()
            .contact_cutoff(4.0)
            .min_similarity(0.5)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("reference_sequence"));
    }

    #[test]
    fn similarity_threshold_must_be_a_fraction() {
        let err = AnalysisConfigBuilder::new()
            .contact_cutoff(4.0)
            .reference_sequence("MKT")
            .min_similarity(1.5)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "min_similarity",
                ..
            }
        ));
    }

    #[test]
    fn malformed_reference_is_rejected() {
        let err = AnalysisConfigBuilder::new()
            .contact_cutoff(4.0)
            .reference_sequence("MK7")
            .min_similarity(0.5)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "reference_sequence",
                ..
            }
        ));
    }

    #[test]
    fn oversized_or_negative_gap_costs_are_rejected() {
        for (gap_open, gap_extend) in [(i32::MAX, 1), (8, 1001), (-8, 1)] {
            let err = AnalysisConfigBuilder::new()
                .contact_cutoff(4.0)
                .reference_sequence("MKT")
                .min_similarity(0.5)
                .alignment_scoring(AlignmentScoring {
                    gap_open,
                    gap_extend,
                    ..Default::default()
                })
                .build()
                .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidParameter {
                    name: "alignment_scoring",
                    ..
                }
            ));
        }
    }

    #[test]
    fn full_builder_carries_every_value() {
        let config = AnalysisConfigBuilder::new()
            .contact_cutoff(5.5)
            .selection_one(AtomSelection::all().with_element_names(["Zn"]))
            .selection_two(AtomSelection::all().with_atom_names(["NE2"]))
            .key_rule(KeyRule::Element)
            .fragment_length(8)
            .representative_atom("CB")
            .max_resolution(2.5)
            .max_r_free(0.3)
            .reference_sequence("MKTAYIAK")
            .min_similarity(0.7)
            .build()
            .unwrap();
        assert!(config.contacts.selection_two.is_some());
        assert_eq!(config.frequency.key, KeyRule::Element);
        assert_eq!(config.fragments.length, Some(8));
        assert_eq!(config.fragments.representative_atom, "CB");
        assert_eq!(config.quality.max_resolution, Some(2.5));
        let similarity = config.similarity.unwrap();
        assert_eq!(similarity.min_similarity, 0.7);
        assert_eq!(similarity.scoring, AlignmentScoring::default());
    }
}
