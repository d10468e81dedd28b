//! Client Configuration Module
//!
//! Connection settings for a Tablestore instance. Loaded from an optional
//! TOML file, overridden by `TABLESTORE_*` environment variables, with
//! `${VAR}` references expanded in string values.

use crate::protocol::{defaults, ENV_PREFIX};
use anyhow::{bail, ensure, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Settings needed to reach and authenticate against one instance
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Base URL, e.g. `https://my-instance.cn-hangzhou.ots.aliyuncs.com`
    pub endpoint: String,
    pub access_key_id: String,
    pub access_key_secret: String,
    pub instance_name: String,

    /// STS session token for temporary credentials
    #[serde(default)]
    pub security_token: Option<String>,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Directory with `.proto` definitions overriding the bundled ones
    #[serde(default)]
    pub schema_dir: Option<PathBuf>,
}

fn default_request_timeout_ms() -> u64 {
    defaults::REQUEST_TIMEOUT_MS
}

fn default_connect_timeout_ms() -> u64 {
    defaults::CONNECT_TIMEOUT_MS
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<redacted>")
            .field(
                "security_token",
                &self.security_token.as_ref().map(|_| "<redacted>"),
            )
            .field("instance_name", &self.instance_name)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("schema_dir", &self.schema_dir)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(
        endpoint: impl Into<String>,
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
        instance_name: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            instance_name: instance_name.into(),
            security_token: None,
            request_timeout_ms: defaults::REQUEST_TIMEOUT_MS,
            connect_timeout_ms: defaults::CONNECT_TIMEOUT_MS,
            schema_dir: None,
        }
    }

    pub fn with_security_token(mut self, token: impl Into<String>) -> Self {
        self.security_token = Some(token.into());
        self
    }

    pub fn with_schema_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.schema_dir = Some(dir.into());
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Load from an optional TOML file with `TABLESTORE_*` overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    /// Load with an explicit environment source
    pub fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading client config: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        // TABLESTORE_ACCESS_KEY_ID -> access_key_id
        builder = builder.add_source(env);

        let config = builder.build().context("Failed to build configuration")?;

        let mut client_config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        client_config.expand_env_vars()?;
        client_config.validate()?;

        debug!(config = ?client_config, "Client configuration loaded");
        Ok(client_config)
    }

    /// Expand `${VAR}` references in string values
    pub fn expand_env_vars(&mut self) -> Result<()> {
        self.endpoint = expand(&self.endpoint, "endpoint")?;
        self.access_key_id = expand(&self.access_key_id, "access_key_id")?;
        self.access_key_secret = expand(&self.access_key_secret, "access_key_secret")?;
        self.instance_name = expand(&self.instance_name, "instance_name")?;

        if let Some(token) = &self.security_token {
            self.security_token = Some(expand(token, "security_token")?);
        }

        if let Some(dir) = &self.schema_dir {
            let expanded = expand(&dir.to_string_lossy(), "schema_dir")?;
            self.schema_dir = Some(PathBuf::from(expanded));
        }

        Ok(())
    }

    /// Reject settings that can never produce a valid request
    pub fn validate(&self) -> Result<()> {
        let host = self
            .endpoint
            .strip_prefix("https://")
            .or_else(|| self.endpoint.strip_prefix("http://"));
        match host {
            Some(host) if !host.trim_end_matches('/').is_empty() => {}
            Some(_) => bail!("endpoint '{}' has no host", self.endpoint),
            None => bail!("endpoint '{}' must start with http:// or https://", self.endpoint),
        }

        ensure!(!self.access_key_id.is_empty(), "access_key_id must not be empty");
        ensure!(!self.access_key_secret.is_empty(), "access_key_secret must not be empty");
        ensure!(!self.instance_name.is_empty(), "instance_name must not be empty");
        ensure!(self.request_timeout_ms > 0, "request_timeout_ms must be positive");
        ensure!(self.connect_timeout_ms > 0, "connect_timeout_ms must be positive");
        Ok(())
    }
}

fn expand(value: &str, field: &str) -> Result<String> {
    let expanded =
        shellexpand::env(value).with_context(|| format!("Failed to expand {field}"))?;
    Ok(expanded.into_owned())
}

/// Convenience function to load configuration from a file and the environment
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig> {
    ClientConfig::load(path)
}
