//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.graphchat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ProbePolicy;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GraphchatConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ConnectionConfig {
    /// 0 probes once at startup and never again.
    pub probe_interval_secs: Option<u64>,
    pub probe_timeout_secs: Option<u64>,
    pub probe_policy: Option<ProbePolicy>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    pub default_thread_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UiConfig {
    pub typing_delay_ms: Option<u64>,
    pub error_message: Option<String>,
}

/// Values that came from command-line flags (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub thread_id: Option<String>,
    pub probe_policy: Option<ProbePolicy>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = crate::exchange::http::DEFAULT_BASE_URL;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PROBE_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_TYPING_DELAY_MS: u64 = 0;
pub const DEFAULT_ERROR_MESSAGE: &str = "Sorry, something went wrong. Please try again.";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    /// `None` = probe once only.
    pub probe_interval: Option<Duration>,
    pub probe_timeout: Duration,
    pub probe_policy: ProbePolicy,
    pub thread_id: String,
    pub typing_delay: Duration,
    pub error_message: String,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.graphchat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".graphchat").join("config.toml"))
}

/// Load config from `~/.graphchat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `GraphchatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<GraphchatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(GraphchatConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<GraphchatConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(GraphchatConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: GraphchatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# graphchat configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [backend]
# base_url = "http://localhost:8000"   # Or set GRAPHCHAT_BASE_URL
# request_timeout_secs = 60            # Or set GRAPHCHAT_REQUEST_TIMEOUT_SECS

# [connection]
# probe_interval_secs = 30             # 0 = probe once at startup only
# probe_timeout_secs = 5
# probe_policy = "lenient"             # "lenient" (any response) or "strict" (2xx only)

# [session]
# default_thread_id = "default"        # Or set GRAPHCHAT_THREAD_ID

# [ui]
# typing_delay_ms = 0                  # Pause before showing a reply
# error_message = "Sorry, something went wrong. Please try again."
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_TEMPLATE) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &GraphchatConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("GRAPHCHAT_BASE_URL").ok())
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Request timeout: env → config → default
    let request_timeout_secs = env_u64("GRAPHCHAT_REQUEST_TIMEOUT_SECS")
        .or(config.backend.request_timeout_secs)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    let request_timeout_secs = at_least_one_sec("request_timeout_secs", request_timeout_secs);

    let probe_timeout_secs = config
        .connection
        .probe_timeout_secs
        .unwrap_or(DEFAULT_PROBE_TIMEOUT_SECS);
    let probe_timeout_secs = at_least_one_sec("probe_timeout_secs", probe_timeout_secs);

    // Probe policy: CLI → env → config → default
    let probe_policy = cli
        .probe_policy
        .or_else(|| {
            std::env::var("GRAPHCHAT_PROBE_POLICY")
                .ok()
                .and_then(|s| ProbePolicy::parse(&s))
        })
        .or(config.connection.probe_policy)
        .unwrap_or_default();

    // Thread id: CLI → env → config → default
    let thread_id = cli
        .thread_id
        .clone()
        .or_else(|| std::env::var("GRAPHCHAT_THREAD_ID").ok())
        .or_else(|| config.session.default_thread_id.clone())
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| crate::core::session::DEFAULT_THREAD_ID.to_string());

    let probe_interval_secs = config
        .connection
        .probe_interval_secs
        .unwrap_or(DEFAULT_PROBE_INTERVAL_SECS);

    ResolvedConfig {
        base_url,
        request_timeout: Duration::from_secs(request_timeout_secs),
        probe_interval: (probe_interval_secs > 0).then(|| Duration::from_secs(probe_interval_secs)),
        probe_timeout: Duration::from_secs(probe_timeout_secs),
        probe_policy,
        thread_id,
        typing_delay: Duration::from_millis(
            config.ui.typing_delay_ms.unwrap_or(DEFAULT_TYPING_DELAY_MS),
        ),
        error_message: config
            .ui
            .error_message
            .clone()
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
    }
}

fn env_u64(key: &str) -> Option<u64> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Ignoring {}={:?}: {}", key, raw, e);
            None
        }
    }
}

/// A zero timeout would fail every request instantly.
fn at_least_one_sec(key: &str, secs: u64) -> u64 {
    if secs == 0 {
        warn!("{} = 0 is not usable, using 1", key);
        1
    } else {
        secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = GraphchatConfig::default();
        assert!(config.backend.base_url.is_none());
        assert!(config.connection.probe_policy.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve(&GraphchatConfig::default(), &CliOverrides::default());
        assert_eq!(resolved.probe_interval, Some(Duration::from_secs(DEFAULT_PROBE_INTERVAL_SECS)));
        assert_eq!(resolved.probe_timeout, Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS));
        assert_eq!(resolved.typing_delay, Duration::ZERO);
        assert_eq!(resolved.error_message, DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = GraphchatConfig {
            connection: ConnectionConfig {
                probe_interval_secs: Some(10),
                probe_timeout_secs: Some(2),
                probe_policy: Some(ProbePolicy::Strict),
            },
            ui: UiConfig {
                typing_delay_ms: Some(400),
                error_message: Some("Bir hata oluştu.".to_string()),
            },
            ..Default::default()
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.probe_interval, Some(Duration::from_secs(10)));
        assert_eq!(resolved.probe_timeout, Duration::from_secs(2));
        assert_eq!(resolved.typing_delay, Duration::from_millis(400));
        assert_eq!(resolved.error_message, "Bir hata oluştu.");
    }

    #[test]
    fn test_zero_interval_means_probe_once() {
        let config = GraphchatConfig {
            connection: ConnectionConfig {
                probe_interval_secs: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.probe_interval, None);
    }

    #[test]
    fn test_zero_timeouts_clamp_to_one_second() {
        let config = GraphchatConfig {
            backend: BackendConfig {
                request_timeout_secs: Some(0),
                ..Default::default()
            },
            connection: ConnectionConfig {
                probe_timeout_secs: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.request_timeout, Duration::from_secs(1));
        assert_eq!(resolved.probe_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = GraphchatConfig {
            backend: BackendConfig {
                base_url: Some("http://from-config:8000".to_string()),
                ..Default::default()
            },
            connection: ConnectionConfig {
                probe_policy: Some(ProbePolicy::Lenient),
                ..Default::default()
            },
            session: SessionConfig {
                default_thread_id: Some("from-config".to_string()),
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            base_url: Some("http://from-cli:9000".to_string()),
            thread_id: Some("from-cli".to_string()),
            probe_policy: Some(ProbePolicy::Strict),
        };
        let resolved = resolve(&config, &cli);
        assert_eq!(resolved.base_url, "http://from-cli:9000");
        assert_eq!(resolved.thread_id, "from-cli");
        assert_eq!(resolved.probe_policy, ProbePolicy::Strict);
    }

    #[test]
    fn test_blank_thread_id_falls_back_to_default() {
        let cli = CliOverrides {
            thread_id: Some("   ".to_string()),
            ..Default::default()
        };
        let resolved = resolve(&GraphchatConfig::default(), &cli);
        assert!(!resolved.thread_id.trim().is_empty());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[backend]
base_url = "http://192.168.1.10:8000"
request_timeout_secs = 30

[connection]
probe_interval_secs = 15
probe_policy = "strict"

[session]
default_thread_id = "demo"

[ui]
typing_delay_ms = 250
"#;
        let config: GraphchatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.backend.base_url.as_deref(),
            Some("http://192.168.1.10:8000")
        );
        assert_eq!(config.backend.request_timeout_secs, Some(30));
        assert_eq!(config.connection.probe_interval_secs, Some(15));
        assert_eq!(config.connection.probe_policy, Some(ProbePolicy::Strict));
        assert_eq!(config.session.default_thread_id.as_deref(), Some("demo"));
        assert_eq!(config.ui.typing_delay_ms, Some(250));
        assert!(config.ui.error_message.is_none());
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing, everything else stays default
        let toml_str = r#"
[ui]
typing_delay_ms = 100
"#;
        let config: GraphchatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ui.typing_delay_ms, Some(100));
        assert!(config.backend.base_url.is_none());
        assert!(config.connection.probe_interval_secs.is_none());
    }

    #[test]
    fn test_default_template_is_valid_toml() {
        let config: GraphchatConfig = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert!(config.backend.base_url.is_none());
    }

    #[test]
    fn test_missing_file_generates_template() {
        let dir = std::env::temp_dir().join(format!("graphchat-test-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let config = load_config_from(&path).unwrap();
        assert!(config.ui.typing_delay_ms.is_none());
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("probe_policy"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("graphchat-test-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[backend\nbase_url = ").unwrap();

        let result = load_config_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        let _ = fs::remove_dir_all(&dir);
    }
}
