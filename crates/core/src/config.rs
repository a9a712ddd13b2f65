use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::fs;

use crate::error::{BoshStatsError, Result};

pub const ENV_DIRECTOR_URL: &str = "BOSH_ENVIRONMENT";
pub const ENV_UAA_URL: &str = "BOSH_UAA_URL";
pub const ENV_CLIENT_ID: &str = "BOSH_CLIENT";
pub const ENV_CLIENT_SECRET: &str = "BOSH_CLIENT_SECRET";
pub const ENV_CA_CERT: &str = "BOSH_CA_CERT";

/// Settings from one source (flags, environment or config file), any of
/// which may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialSettings {
    pub director_url: Option<String>,
    pub uaa_url: Option<String>,
    pub uaa_client_id: Option<String>,
    pub uaa_client_secret: Option<String>,
    pub ca_cert: Option<String>,
}

impl PartialSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            director_url: get(ENV_DIRECTOR_URL),
            uaa_url: get(ENV_UAA_URL),
            uaa_client_id: get(ENV_CLIENT_ID),
            uaa_client_secret: get(ENV_CLIENT_SECRET),
            ca_cert: get(ENV_CA_CERT),
        }
    }

    /// Read a JSON config file. A missing file yields empty settings.
    pub async fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path).await {
            Ok(json_content) => Ok(serde_json::from_str(&json_content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Fill every unset value from `fallback`.
    pub fn or(self, fallback: PartialSettings) -> Self {
        Self {
            director_url: self.director_url.or(fallback.director_url),
            uaa_url: self.uaa_url.or(fallback.uaa_url),
            uaa_client_id: self.uaa_client_id.or(fallback.uaa_client_id),
            uaa_client_secret: self.uaa_client_secret.or(fallback.uaa_client_secret),
            ca_cert: self.ca_cert.or(fallback.ca_cert),
        }
    }
}

/// Default config file location: `<config dir>/bosh-stats/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bosh-stats").join("config.json"))
}

/// Everything needed to reach a director through UAA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorSettings {
    pub director_url: String,
    pub uaa_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub ca_cert: Option<String>,
}

impl DirectorSettings {
    /// Validate that every required value is present.
    pub fn from_partial(partial: PartialSettings) -> Result<Self> {
        fn require(
            value: Option<String>,
            setting: &'static str,
            env_var: &'static str,
        ) -> Result<String> {
            value.ok_or(BoshStatsError::MissingSetting { setting, env_var })
        }

        Ok(Self {
            director_url: require(partial.director_url, "director URL", ENV_DIRECTOR_URL)?,
            uaa_url: require(partial.uaa_url, "UAA URL", ENV_UAA_URL)?,
            client_id: require(partial.uaa_client_id, "UAA client id", ENV_CLIENT_ID)?,
            client_secret: require(
                partial.uaa_client_secret,
                "UAA client secret",
                ENV_CLIENT_SECRET,
            )?,
            ca_cert: partial.ca_cert,
        })
    }

    /// Flags win over the environment, which wins over the config file.
    pub async fn resolve(flags: PartialSettings, config_path: Option<&Path>) -> Result<Self> {
        let file = match config_path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(path) => PartialSettings::load(&path).await?,
            None => PartialSettings::default(),
        };
        Self::from_partial(flags.or(PartialSettings::from_env()).or(file))
    }

    /// CA certificate bytes; the setting holds either PEM text or a file path.
    pub async fn ca_cert_pem(&self) -> Result<Option<Vec<u8>>> {
        match self.ca_cert.as_deref() {
            None => Ok(None),
            Some(pem) if pem.contains("-----BEGIN") => Ok(Some(pem.as_bytes().to_vec())),
            Some(path) => Ok(Some(fs::read(path).await?)),
        }
    }
}
