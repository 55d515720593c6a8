use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

use shieldguard_providers::GeminiConfig;
use shieldguard_types::{ApiKey, ModelName, UiOptions};

use crate::audit::AuditConfig;

/// Environment variables consulted for the Gemini key, in order, when the
/// config file does not provide one.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Default, Deserialize)]
pub struct ShieldConfig {
    pub audit: Option<AuditSection>,
    pub advisor: Option<AdvisorSection>,
    pub api_keys: Option<ApiKeys>,
    pub ui: Option<UiSection>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AuditSection {
    /// Milliseconds between scan steps. Zero is clamped to 1.
    pub tick_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdvisorSection {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UiSection {
    /// Use ASCII-only glyphs for icons and spinners.
    #[serde(default)]
    pub ascii_only: bool,
    #[serde(default)]
    pub high_contrast: bool,
    /// Freeze spinners and other motion.
    #[serde(default)]
    pub reduced_motion: bool,
}

#[derive(Default, Deserialize)]
pub struct ApiKeys {
    pub google: Option<String>,
}

// Manual Debug impl to prevent leaking API keys in logs.
impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let google = if self.google.is_some() {
            "[REDACTED]"
        } else {
            "None"
        };
        f.debug_struct("ApiKeys").field("google", &google).finish()
    }
}

/// Expand `${VAR}` references from the process environment.
///
/// Unset variables expand to nothing; an unclosed `${` is kept literally.
pub fn expand_env_vars(value: &str) -> String {
    expand_env_vars_with(value, |name| env::var(name).ok())
}

/// [`expand_env_vars`] with an explicit variable lookup.
pub fn expand_env_vars_with(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(open) = rest.find("${") {
        let after = &rest[open + 2..];
        let Some(close) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..open]);
        let name = &after[..close];
        if !name.is_empty()
            && let Some(replacement) = lookup(name)
        {
            out.push_str(&replacement);
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

impl ShieldConfig {
    /// Load `~/.shieldguard/config.toml`. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn audit_config(&self) -> AuditConfig {
        match self.audit.as_ref().and_then(|a| a.tick_ms) {
            Some(ms) => AuditConfig::with_tick_interval(Duration::from_millis(ms)),
            None => AuditConfig::default(),
        }
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.ui
            .as_ref()
            .map(|ui| UiOptions {
                ascii_only: ui.ascii_only,
                high_contrast: ui.high_contrast,
                reduced_motion: ui.reduced_motion,
            })
            .unwrap_or_default()
    }

    /// Gemini key from `[api_keys] google`, falling back to the environment.
    #[must_use]
    pub fn resolve_api_key(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<ApiKey> {
        let configured = self
            .api_keys
            .as_ref()
            .and_then(|keys| keys.google.as_deref())
            .map(|raw| expand_env_vars_with(raw, &lookup))
            .and_then(ApiKey::new);
        if configured.is_some() {
            return configured;
        }

        API_KEY_ENV_VARS
            .iter()
            .find_map(|&name| lookup(name).and_then(ApiKey::new))
    }

    /// Build the advisor client settings, reading keys from the process
    /// environment.
    #[must_use]
    pub fn gemini_config(&self) -> GeminiConfig {
        self.gemini_config_with(|name| env::var(name).ok())
    }

    #[must_use]
    pub fn gemini_config_with(&self, lookup: impl Fn(&str) -> Option<String>) -> GeminiConfig {
        let mut config = GeminiConfig::default().with_api_key(self.resolve_api_key(&lookup));
        let Some(advisor) = self.advisor.as_ref() else {
            return config;
        };

        if let Some(raw) = advisor.model.as_deref() {
            match ModelName::parse(raw) {
                Ok(model) => config.model = model,
                Err(err) => {
                    tracing::warn!("Ignoring advisor model {raw:?}: {err}");
                }
            }
        }
        if let Some(temperature) = advisor.temperature {
            if temperature.is_finite() && (0.0..=2.0).contains(&temperature) {
                config.temperature = temperature;
            } else {
                tracing::warn!("Ignoring advisor temperature {temperature}: expected 0.0..=2.0");
            }
        }
        if let Some(secs) = advisor.timeout_secs {
            config.timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(base_url) = advisor.base_url.as_deref()
            && !base_url.trim().is_empty()
        {
            config.base_url = base_url.trim().trim_end_matches('/').to_string();
        }
        config
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".shieldguard").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn parse(toml: &str) -> ShieldConfig {
        toml::from_str(toml).unwrap()
    }

    // expand_env_vars tests

    #[test]
    fn expand_env_vars_no_vars() {
        assert_eq!(expand_env_vars_with("hello world", vars(&[])), "hello world");
    }

    #[test]
    fn expand_env_vars_single_var() {
        let result = expand_env_vars_with("prefix ${KEY} suffix", vars(&[("KEY", "replaced")]));
        assert_eq!(result, "prefix replaced suffix");
    }

    #[test]
    fn expand_env_vars_missing_var_becomes_empty() {
        assert_eq!(
            expand_env_vars_with("before ${MISSING} after", vars(&[])),
            "before  after"
        );
    }

    #[test]
    fn expand_env_vars_adjacent_vars() {
        let result = expand_env_vars_with("${A}${B}", vars(&[("A", "X"), ("B", "Y")]));
        assert_eq!(result, "XY");
    }

    #[test]
    fn expand_env_vars_unclosed_brace_preserved() {
        assert_eq!(
            expand_env_vars_with("test ${UNCLOSED", vars(&[])),
            "test ${UNCLOSED"
        );
    }

    #[test]
    fn expand_env_vars_empty_var_name_dropped() {
        assert_eq!(expand_env_vars_with("test ${} more", vars(&[])), "test  more");
    }

    #[test]
    fn expand_env_vars_unicode_content() {
        let result = expand_env_vars_with("Hi ${V} ü", vars(&[("V", "🛡")]));
        assert_eq!(result, "Hi 🛡 ü");
    }

    // parsing tests

    #[test]
    fn parse_empty_config() {
        let config = parse("");
        assert!(config.audit.is_none());
        assert!(config.advisor.is_none());
        assert!(config.api_keys.is_none());
        assert_eq!(config.audit_config(), AuditConfig::default());
    }

    #[test]
    fn parse_audit_tick() {
        let config = parse("[audit]\ntick_ms = 250\n");
        assert_eq!(
            config.audit_config().tick_interval,
            Duration::from_millis(250)
        );
    }

    #[test]
    fn zero_tick_is_clamped() {
        let config = parse("[audit]\ntick_ms = 0\n");
        assert_eq!(config.audit_config().tick_interval, Duration::from_millis(1));
    }

    #[test]
    fn parse_advisor_section() {
        let config = parse(
            r#"
[advisor]
model = "gemini-3-pro-preview"
temperature = 0.2
timeout_secs = 15
base_url = "http://localhost:9999/v1beta/"
"#,
        );
        let gemini = config.gemini_config_with(vars(&[]));
        assert_eq!(gemini.model.as_str(), "gemini-3-pro-preview");
        assert!((gemini.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(gemini.timeout, Duration::from_secs(15));
        assert_eq!(gemini.base_url, "http://localhost:9999/v1beta");
    }

    #[test]
    fn invalid_advisor_values_fall_back_to_defaults() {
        let config = parse(
            r#"
[advisor]
model = "gpt-4o"
temperature = 9.5
"#,
        );
        let gemini = config.gemini_config_with(vars(&[]));
        let defaults = GeminiConfig::default();
        assert_eq!(gemini.model, defaults.model);
        assert!((gemini.temperature - defaults.temperature).abs() < f32::EPSILON);
    }

    #[test]
    fn parse_ui_section() {
        let config = parse("[ui]\nascii_only = true\nreduced_motion = true\n");
        assert_eq!(
            config.ui_options(),
            UiOptions {
                ascii_only: true,
                high_contrast: false,
                reduced_motion: true,
            }
        );
        assert_eq!(ShieldConfig::default().ui_options(), UiOptions::default());
    }

    #[test]
    fn api_keys_debug_redacts_values() {
        let config = parse("[api_keys]\ngoogle = \"secret-google-key\"\n");
        let debug = format!("{:?}", config.api_keys.unwrap());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret-google-key"));
    }

    #[test]
    fn api_keys_debug_shows_none() {
        let debug = format!("{:?}", ApiKeys::default());
        assert!(debug.contains("None"));
    }

    // key resolution tests

    #[test]
    fn configured_key_wins_over_environment() {
        let config = parse("[api_keys]\ngoogle = \"from-file\"\n");
        let key = config
            .resolve_api_key(vars(&[("GEMINI_API_KEY", "from-env")]))
            .unwrap();
        assert_eq!(key.as_str(), "from-file");
    }

    #[test]
    fn configured_key_expands_env_reference() {
        let config = parse("[api_keys]\ngoogle = \"${MY_GEMINI}\"\n");
        let key = config
            .resolve_api_key(vars(&[("MY_GEMINI", "expanded")]))
            .unwrap();
        assert_eq!(key.as_str(), "expanded");
    }

    #[test]
    fn blank_configured_key_falls_through_to_environment() {
        let config = parse("[api_keys]\ngoogle = \"${UNSET}\"\n");
        let key = config
            .resolve_api_key(vars(&[("API_KEY", "generic")]))
            .unwrap();
        assert_eq!(key.as_str(), "generic");
    }

    #[test]
    fn gemini_env_var_preferred_over_generic() {
        let key = ShieldConfig::default()
            .resolve_api_key(vars(&[("API_KEY", "generic"), ("GEMINI_API_KEY", "gemini")]))
            .unwrap();
        assert_eq!(key.as_str(), "gemini");
    }

    #[test]
    fn no_key_anywhere_is_none() {
        let config = ShieldConfig::default();
        assert!(config.resolve_api_key(vars(&[])).is_none());
        assert!(config.gemini_config_with(vars(&[])).api_key.is_none());
    }

    // load tests

    #[test]
    fn load_from_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = ShieldConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[audit]\ntick_ms = 100\n").unwrap();

        let config = ShieldConfig::load_from(&path).unwrap().unwrap();
        assert_eq!(
            config.audit_config().tick_interval,
            Duration::from_millis(100)
        );
    }

    #[test]
    fn load_from_reports_parse_error_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "invalid toml [").unwrap();

        let err = ShieldConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), &path);
    }

    #[test]
    fn load_from_directory_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShieldConfig::load_from(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("failed to read config"));
    }

    #[test]
    fn config_path_points_into_shieldguard_dir() {
        if let Some(path) = config_path() {
            assert!(path.ends_with(".shieldguard/config.toml"));
        }
    }
}
