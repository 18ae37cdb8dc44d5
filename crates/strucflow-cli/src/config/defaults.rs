use strucflow::core::frequency::KeyRule;
use strucflow::engine::config::DEFAULT_REPRESENTATIVE_ATOM;

pub struct DefaultsConfig {
    pub contact_cutoff: f64,
    pub key_rule: KeyRule,
    pub representative_atom: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            contact_cutoff: 4.0,
            key_rule: KeyRule::GroupAtomName,
            representative_atom: DEFAULT_REPRESENTATIVE_ATOM.to_string(),
        }
    }
}
