use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the home directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = ".remote2oss.json";

/// Signing region used when `oss_region` is absent. OSS ignores it for
/// virtual-hosted requests but SigV4 still needs a value.
pub const DEFAULT_REGION: &str = "us-east-1";

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TIMEOUT_SECS: u64 = 3600;

/// Run configuration loaded from `~/.remote2oss.json` (or the path given with `-c`).
#[derive(Clone, Serialize, Deserialize)]
pub struct Remote2OssConfig {
    /// Local download cache directory. Empty means the current directory.
    #[serde(default)]
    pub workspace: PathBuf,
    /// Public base URL objects are reachable under, e.g. `https://bucket.oss-cn-hangzhou.aliyuncs.com`.
    pub oss_public_url: String,
    /// Storage endpoint; `https://` is assumed when no scheme is given.
    pub oss_endpoint: String,
    pub oss_access_key_id: String,
    pub oss_access_key_secret: String,
    pub oss_bucket: String,
    /// Optional SigV4 signing region (default `us-east-1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oss_region: Option<String>,
    /// Address the bucket as `endpoint/bucket` instead of `bucket.endpoint`.
    #[serde(default)]
    pub oss_force_path_style: bool,
    /// HTTP connect timeout in seconds (default 30).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_secs: Option<u64>,
    /// Whole-download timeout in seconds (default 3600).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for Remote2OssConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Remote2OssConfig")
            .field("workspace", &self.workspace)
            .field("oss_public_url", &self.oss_public_url)
            .field("oss_endpoint", &self.oss_endpoint)
            .field("oss_access_key_id", &self.oss_access_key_id)
            .field("oss_access_key_secret", &"<redacted>")
            .field("oss_bucket", &self.oss_bucket)
            .field("oss_region", &self.oss_region)
            .field("oss_force_path_style", &self.oss_force_path_style)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Remote2OssConfig {
    pub fn region(&self) -> &str {
        self.oss_region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_REGION)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Workspace directory, with an empty value meaning the current directory.
    pub fn workspace_dir(&self) -> &Path {
        if self.workspace.as_os_str().is_empty() {
            Path::new(".")
        } else {
            &self.workspace
        }
    }

    /// Checks that every required field is present and usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("oss_public_url", &self.oss_public_url),
            ("oss_endpoint", &self.oss_endpoint),
            ("oss_access_key_id", &self.oss_access_key_id),
            ("oss_access_key_secret", &self.oss_access_key_secret),
            ("oss_bucket", &self.oss_bucket),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be empty".to_string(),
                });
            }
        }
        let public = self.oss_public_url.trim();
        if !(public.starts_with("http://") || public.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "oss_public_url",
                reason: format!("must be an http(s) URL, got {public:?}"),
            });
        }
        let endpoint = crate::upload::endpoint_url(&self.oss_endpoint);
        match url::Url::parse(&endpoint) {
            Ok(u) if matches!(u.scheme(), "http" | "https") && u.host_str().is_some() => {}
            Ok(_) => {
                return Err(ConfigError::Invalid {
                    field: "oss_endpoint",
                    reason: format!("must be an http(s) host, got {endpoint:?}"),
                })
            }
            Err(e) => {
                return Err(ConfigError::Invalid {
                    field: "oss_endpoint",
                    reason: format!("{endpoint:?} is not a valid URL: {e}"),
                })
            }
        }
        if self.connect_timeout_secs == Some(0) || self.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid {
                field: "timeout",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// On-disk format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Default config path: `~/.remote2oss.json`, or `$XDG_CONFIG_HOME/remote2oss/config.toml`
/// when only the latter exists.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let home = std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .ok_or(ConfigError::NoHome)?;
    let primary = home.join(DEFAULT_CONFIG_FILE);
    let xdg_dirs = xdg::BaseDirectories::with_prefix("remote2oss")?;
    Ok(pick_config_path(primary, xdg_dirs.find_config_file("config.toml")))
}

fn pick_config_path(primary: PathBuf, xdg_fallback: Option<PathBuf>) -> PathBuf {
    if primary.exists() {
        return primary;
    }
    xdg_fallback.unwrap_or(primary)
}

/// Parses configuration text in the given format.
pub fn parse(data: &str, format: ConfigFormat, path: &Path) -> Result<Remote2OssConfig, ConfigError> {
    match format {
        ConfigFormat::Json => serde_json::from_str(data).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        }),
        ConfigFormat::Toml => toml::from_str(data).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Load and validate configuration from `path`.
pub fn load(path: &Path) -> Result<Remote2OssConfig, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = parse(&data, ConfigFormat::from_path(path), path)?;
    cfg.validate()?;
    tracing::debug!("loaded config from {}: {:?}", path.display(), cfg);
    Ok(cfg)
}
