use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{AppConfig, ConfigOverrides};
use crate::cli::CommonArgs;
use crate::error::{CliError, Result};
use std::str::FromStr;
use strucflow::engine::config::AnalysisConfigBuilder;

/// Merges command-line overrides, `--set` values, the config file and the defaults,
/// in that order of precedence.
pub fn build_config(common: &CommonArgs, overrides: &ConfigOverrides) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &common.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let file_config = apply_set_values(file_config, &common.set_values)?;

    let contacts = file_config.contacts.unwrap_or_default();
    let frequency = file_config.frequency.unwrap_or_default();
    let fragments = file_config.fragments.unwrap_or_default();
    let quality = file_config.quality.unwrap_or_default();
    let similarity = file_config.similarity.unwrap_or_default();

    let mut builder = AnalysisConfigBuilder::new()
        .contact_cutoff(
            overrides
                .contact_cutoff
                .or(contacts.cutoff)
                .unwrap_or(defaults.contact_cutoff),
        )
        .key_rule(
            overrides
                .key_rule
                .or(frequency.key)
                .unwrap_or(defaults.key_rule),
        )
        .representative_atom(
            overrides
                .representative_atom
                .clone()
                .or(fragments.representative_atom)
                .unwrap_or(defaults.representative_atom),
        );

    if let Some(selection) = contacts.selection_one {
        builder = builder.selection_one(selection);
    }
    if let Some(selection) = contacts.selection_two {
        builder = builder.selection_two(selection);
    }
    if let Some(selection) = frequency.selection {
        builder = builder.frequency_selection(selection);
    }
    if let Some(length) = overrides.fragment_length.or(fragments.length) {
        builder = builder.fragment_length(length);
    }
    if let Some(bound) = overrides.max_resolution.or(quality.max_resolution) {
        builder = builder.max_resolution(bound);
    }
    if let Some(bound) = overrides.max_r_free.or(quality.max_r_free) {
        builder = builder.max_r_free(bound);
    }
    if let Some(reference) = overrides.reference_sequence.clone().or(similarity.reference) {
        builder = builder.reference_sequence(reference);
    }
    if let Some(min_similarity) = overrides.min_similarity.or(similarity.min_similarity) {
        builder = builder.min_similarity(min_similarity);
    }
    if let Some(scoring) = similarity.scoring {
        builder = builder.alignment_scoring(scoring);
    }

    let core_config = builder.build()?;

    Ok(AppConfig {
        input_path: common.input.clone(),
        output_path: common.output.clone(),
        core_config,
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "contacts.cutoff" => {
                config.contacts.get_or_insert_with(Default::default).cutoff =
                    Some(parse_value(key, value_str, "float")?);
            }
            "frequency.key" => {
                config.frequency.get_or_insert_with(Default::default).key =
                    Some(parse_value(key, value_str, "key rule")?);
            }
            "fragments.length" => {
                config.fragments.get_or_insert_with(Default::default).length =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "fragments.representative-atom" => {
                config
                    .fragments
                    .get_or_insert_with(Default::default)
                    .representative_atom = Some(value_str.to_string());
            }
            "quality.max-resolution" => {
                config
                    .quality
                    .get_or_insert_with(Default::default)
                    .max_resolution = Some(parse_value(key, value_str, "float")?);
            }
            "quality.max-r-free" => {
                config.quality.get_or_insert_with(Default::default).max_r_free =
                    Some(parse_value(key, value_str, "float")?);
            }
            "similarity.reference" => {
                config
                    .similarity
                    .get_or_insert_with(Default::default)
                    .reference = Some(value_str.to_string());
            }
            "similarity.min-similarity" => {
                config
                    .similarity
                    .get_or_insert_with(Default::default)
                    .min_similarity = Some(parse_value(key, value_str, "float")?);
            }
            "similarity.scoring.gap-open" => {
                config
                    .similarity
                    .get_or_insert_with(Default::default)
                    .scoring
                    .get_or_insert_with(Default::default)
                    .gap_open = parse_value(key, value_str, "integer")?;
            }
            "similarity.scoring.gap-extend" => {
                config
                    .similarity
                    .get_or_insert_with(Default::default)
                    .scoring
                    .get_or_insert_with(Default::default)
                    .gap_extend = parse_value(key, value_str, "integer")?;
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
