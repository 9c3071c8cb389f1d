use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

pub const DEFAULT_METADATA_LIST_LIMIT: usize = 50;
pub const DEFAULT_TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub normalizer: NormalizerConfig,
    pub ingest: IngestConfig,
}

/// Bounds applied by the document normalizer.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NormalizerConfig {
    pub metadata_list_limit: usize,
    pub truncation_marker: String,
    pub max_file_size: Option<u64>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            metadata_list_limit: DEFAULT_METADATA_LIST_LIMIT,
            truncation_marker: DEFAULT_TRUNCATION_MARKER.to_string(),
            max_file_size: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IngestConfig {
    pub parse_timeout_secs: u64,
    pub concurrency: usize,
    pub recursive: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            parse_timeout_secs: 120,
            concurrency: 4,
            recursive: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let normalizer_defaults = NormalizerConfig::default();
        let ingest_defaults = IngestConfig::default();

        Self {
            normalizer: NormalizerConfig {
                metadata_list_limit: parse_env_or(
                    "CIVICDOC_METADATA_LIST_LIMIT",
                    normalizer_defaults.metadata_list_limit,
                ),
                truncation_marker: env::var("CIVICDOC_TRUNCATION_MARKER")
                    .unwrap_or(normalizer_defaults.truncation_marker),
                max_file_size: parse_env_opt("CIVICDOC_MAX_FILE_SIZE"),
            },
            ingest: IngestConfig {
                parse_timeout_secs: parse_env_or(
                    "CIVICDOC_PARSE_TIMEOUT_SECS",
                    ingest_defaults.parse_timeout_secs,
                ),
                // Zero would stall the ingestion stream.
                concurrency: parse_env_or("CIVICDOC_INGEST_CONCURRENCY", ingest_defaults.concurrency)
                    .max(1),
                recursive: parse_env_or("CIVICDOC_RECURSIVE", ingest_defaults.recursive),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
