use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Environment variable overriding [`SearchConfig::weight_fts`].
pub const WEIGHT_FTS_ENV: &str = "WEIGHT_FTS";
/// Environment variable overriding [`SearchConfig::weight_vec`].
pub const WEIGHT_VEC_ENV: &str = "WEIGHT_VEC";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {var}: {value:?} is not a number")]
    InvalidEnv { var: &'static str, value: String },

    #[error("invalid search weights fts={fts} vector={vector}: {reason}")]
    InvalidWeights {
        fts: f64,
        vector: f64,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub enrich: EnrichConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Run the vector channel when an embedder is available.
    #[serde(default = "default_true")]
    pub semantic: bool,
    #[serde(default = "default_weight_fts")]
    pub weight_fts: f64,
    #[serde(default = "default_weight_vec")]
    pub weight_vec: f64,
    /// Queries with fewer word characters than this get a demoted vector weight.
    #[serde(default = "default_short_query_min_chars")]
    pub short_query_min_chars: usize,
    #[serde(default = "default_short_query_vec_factor")]
    pub short_query_vec_factor: f64,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Floor for the lexical rank maximum, so all-zero ranks never divide by zero.
    #[serde(default = "default_rank_epsilon")]
    pub rank_epsilon: f64,
    /// Distance spreads at or below this are treated as degenerate.
    #[serde(default = "default_min_distance_spread")]
    pub min_distance_spread: f64,
    /// Query terms at least this long are searched as prefixes.
    #[serde(default = "default_prefix_min_len")]
    pub prefix_min_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            semantic: default_true(),
            weight_fts: default_weight_fts(),
            weight_vec: default_weight_vec(),
            short_query_min_chars: default_short_query_min_chars(),
            short_query_vec_factor: default_short_query_vec_factor(),
            max_results: default_max_results(),
            rank_epsilon: default_rank_epsilon(),
            min_distance_spread: default_min_distance_spread(),
            prefix_min_len: default_prefix_min_len(),
        }
    }
}

impl SearchConfig {
    /// Apply `WEIGHT_FTS` / `WEIGHT_VEC` overrides from `lookup`.
    ///
    /// Blank values are ignored; anything else must parse as a float.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] when a value does not parse.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = parse_env_f64(WEIGHT_FTS_ENV, &lookup)? {
            self.weight_fts = value;
        }
        if let Some(value) = parse_env_f64(WEIGHT_VEC_ENV, &lookup)? {
            self.weight_vec = value;
        }
        Ok(())
    }

    /// Check that the weights keep a fused score within [0, 1].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWeights`] for a non-finite or negative
    /// weight, a weight sum above 1, or a demotion factor outside [0, 1].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason| ConfigError::InvalidWeights {
            fts: self.weight_fts,
            vector: self.weight_vec,
            reason,
        };

        if !self.weight_fts.is_finite() || !self.weight_vec.is_finite() {
            return Err(invalid("weights must be finite"));
        }
        if self.weight_fts < 0.0 || self.weight_vec < 0.0 {
            return Err(invalid("weights must not be negative"));
        }
        // Small tolerance so 0.55 + 0.45 style pairs are not rejected by rounding.
        if self.weight_fts + self.weight_vec > 1.0 + 1e-9 {
            return Err(invalid("weights must sum to at most 1"));
        }
        if !(0.0..=1.0).contains(&self.short_query_vec_factor) {
            return Err(invalid("short query factor must be within [0, 1]"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichConfig {
    /// Bodies longer than this many characters are truncated.
    #[serde(default = "default_max_body_chars")]
    pub max_body_chars: usize,
    #[serde(default = "default_truncation_marker")]
    pub truncation_marker: String,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            max_body_chars: default_max_body_chars(),
            truncation_marker: default_truncation_marker(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub resolved_output: String,
}

/// Read `.scx/config.toml` under `project_root`, or defaults when absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig, ConfigError> {
    let path = project_root.join(".scx/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }
    read_toml(&path)
}

/// # Errors
///
/// Returns an error if the user config file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig, ConfigError> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("scx/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }
    read_toml(&path)
}

/// Load project and user config, apply environment overrides, and validate.
///
/// # Errors
///
/// Returns an error if either config file is malformed, an override does
/// not parse, or the resulting weights are invalid.
pub fn resolve_config(project_root: &Path, cli_json: bool) -> Result<EffectiveConfig, ConfigError> {
    let mut project = load_project_config(project_root)?;
    project.search.apply_overrides(|var| env::var(var).ok())?;
    project.search.validate()?;

    let user = load_user_config()?;

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(cli_json, user.output.clone(), env_format);

    Ok(EffectiveConfig {
        project,
        user,
        resolved_output,
    })
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_env_f64(
    var: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<Option<f64>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidEnv { var, value: raw })
}

fn resolve_output(cli_json: bool, user_output: Option<String>, env_format: Option<String>) -> String {
    fn normalize_output_mode(raw: &str) -> Option<&'static str> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" | "human" => Some("pretty"),
            "text" => Some("text"),
            "json" => Some("json"),
            _ => None,
        }
    }

    if cli_json {
        return "json".to_string();
    }

    if let Some(mode) = env_format.as_deref().and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if let Some(mode) = user_output.as_deref().and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if std::io::stdout().is_terminal() {
        "pretty".to_string()
    } else {
        "text".to_string()
    }
}

const fn default_true() -> bool {
    true
}

const fn default_weight_fts() -> f64 {
    0.55
}

const fn default_weight_vec() -> f64 {
    0.45
}

const fn default_short_query_min_chars() -> usize {
    4
}

const fn default_short_query_vec_factor() -> f64 {
    0.2
}

const fn default_max_results() -> usize {
    50
}

const fn default_rank_epsilon() -> f64 {
    1e-5
}

const fn default_min_distance_spread() -> f64 {
    1e-9
}

const fn default_prefix_min_len() -> usize {
    4
}

const fn default_max_body_chars() -> usize {
    2000
}

fn default_truncation_marker() -> String {
    "…".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_project_config_uses_defaults() {
        let root = tempfile::tempdir().expect("temp dir");
        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert!(cfg.search.semantic);
        assert!((cfg.search.weight_fts - 0.55).abs() < f64::EPSILON);
        assert!((cfg.search.weight_vec - 0.45).abs() < f64::EPSILON);
        assert_eq!(cfg.search.short_query_min_chars, 4);
        assert_eq!(cfg.search.max_results, 50);
        assert_eq!(cfg.enrich.max_body_chars, 2000);
        assert_eq!(cfg.enrich.truncation_marker, "…");
    }

    #[test]
    fn partial_project_config_keeps_other_defaults() {
        let root = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir_all(root.path().join(".scx")).expect("create .scx");
        std::fs::write(
            root.path().join(".scx/config.toml"),
            "[search]\nweight_fts = 0.7\nweight_vec = 0.3\n\n[enrich]\nmax_body_chars = 80\n",
        )
        .expect("write config");

        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert!((cfg.search.weight_fts - 0.7).abs() < f64::EPSILON);
        assert!((cfg.search.weight_vec - 0.3).abs() < f64::EPSILON);
        assert_eq!(cfg.search.max_results, 50);
        assert_eq!(cfg.enrich.max_body_chars, 80);
        assert!(cfg.search.validate().is_ok());
    }

    #[test]
    fn malformed_project_config_is_a_parse_error() {
        let root = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir_all(root.path().join(".scx")).expect("create .scx");
        std::fs::write(root.path().join(".scx/config.toml"), "[search\nweight_fts = ")
            .expect("write config");

        let err = load_project_config(root.path()).expect_err("parse should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn env_overrides_replace_weights() {
        let mut cfg = SearchConfig::default();
        cfg.apply_overrides(lookup_from(&[("WEIGHT_FTS", "0.8"), ("WEIGHT_VEC", " 0.2 ")]))
            .expect("overrides apply");
        assert!((cfg.weight_fts - 0.8).abs() < f64::EPSILON);
        assert!((cfg.weight_vec - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn blank_env_override_is_ignored() {
        let mut cfg = SearchConfig::default();
        cfg.apply_overrides(lookup_from(&[("WEIGHT_FTS", "  ")]))
            .expect("blank is ignored");
        assert!((cfg.weight_fts - 0.55).abs() < f64::EPSILON);
    }

    #[test]
    fn unparseable_env_override_is_rejected() {
        let mut cfg = SearchConfig::default();
        let err = cfg
            .apply_overrides(lookup_from(&[("WEIGHT_VEC", "lots")]))
            .expect_err("must reject");
        assert!(matches!(err, ConfigError::InvalidEnv { var: "WEIGHT_VEC", .. }));
    }

    #[test]
    fn validate_rejects_weights_outside_unit_budget() {
        let over = SearchConfig {
            weight_fts: 0.8,
            weight_vec: 0.5,
            ..SearchConfig::default()
        };
        assert!(over.validate().is_err());

        let negative = SearchConfig {
            weight_fts: -0.1,
            ..SearchConfig::default()
        };
        assert!(negative.validate().is_err());

        let nan = SearchConfig {
            weight_vec: f64::NAN,
            ..SearchConfig::default()
        };
        assert!(nan.validate().is_err());

        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn cli_json_overrides_env_and_config() {
        let output = resolve_output(true, Some("pretty".to_string()), Some("text".to_string()));
        assert_eq!(output, "json");
    }

    #[test]
    fn env_format_beats_user_config() {
        let output = resolve_output(false, Some("json".to_string()), Some("human".to_string()));
        assert_eq!(output, "pretty");
    }

    #[test]
    fn user_config_parses_output() {
        let cfg: UserConfig = toml::from_str("output = \"json\"\n").expect("parse");
        assert_eq!(cfg.output.as_deref(), Some("json"));
    }
}
