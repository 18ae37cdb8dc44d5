use std::path::PathBuf;
use strucflow::core::frequency::KeyRule;
use strucflow::engine::config::AnalysisConfig;

pub struct AppConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub core_config: AnalysisConfig,
}

/// Command-line values that take precedence over the file and the defaults.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub contact_cutoff: Option<f64>,
    pub key_rule: Option<KeyRule>,
    pub fragment_length: Option<i64>,
    pub representative_atom: Option<String>,
    pub max_resolution: Option<f64>,
    pub max_r_free: Option<f64>,
    pub reference_sequence: Option<String>,
    pub min_similarity: Option<f64>,
}
