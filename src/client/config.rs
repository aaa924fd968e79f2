use anyhow::Result;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig, PathSet};

pub const PRODUCTION_SERVER: &str = "https://api.merchdash.io";
pub const LOCAL_SERVER: &str = "http://127.0.0.1:8800";

/// Which deployment this config targets. Drives the default server URL
/// and the misconfiguration guard in [`ClientConfig::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deployment {
    Local,
    #[default]
    Production,
}

impl Deployment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Deployment::Local => "local",
            Deployment::Production => "production",
        }
    }

    pub fn default_server(&self) -> &'static str {
        match self {
            Deployment::Local => LOCAL_SERVER,
            Deployment::Production => PRODUCTION_SERVER,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClientConfig {
    /// Base API URL. Empty means "use the deployment default".
    #[serde(default = "ClientConfig::default_server")]
    pub server: String,

    #[serde(default)]
    pub environment: Deployment,

    #[serde(default = "ClientConfig::default_path")]
    pub token_path: String,

    #[serde(default = "ClientConfig::default_path")]
    pub cookie_path: String,

    #[serde(default = "ClientConfig::default_path")]
    pub user_path: String,
}

impl CommonConfig for ClientConfig {
    fn default() -> Self {
        Self {
            server: Self::default_server(),
            environment: Deployment::default(),
            token_path: Self::default_path(),
            cookie_path: Self::default_path(),
            user_path: Self::default_path(),
        }
    }

    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        // Url validity is checked by Client::new.
        self.server = expandenv("server", &self.server)?;
        self.server = self.server.trim_end_matches('/').to_string();
        if self.server.is_empty() {
            self.server = self.environment.default_server().to_string();
        }

        // A local run must never quietly talk to production. Warn and
        // substitute the local default instead of failing.
        if self.environment == Deployment::Local && self.server == PRODUCTION_SERVER {
            warn!(
                "Config targets a local deployment but points at the production server, using {LOCAL_SERVER} instead"
            );
            self.server = LOCAL_SERVER.to_string();
        }

        self.token_path = expandenv("token_path", &self.token_path)?;
        if self.token_path.is_empty() {
            let path = ps.data_path.join("token");
            self.token_path = format!("{}", path.display());
        }

        self.cookie_path = expandenv("cookie_path", &self.cookie_path)?;
        if self.cookie_path.is_empty() {
            let path = ps.data_path.join("cookies");
            self.cookie_path = format!("{}", path.display());
        }

        self.user_path = expandenv("user_path", &self.user_path)?;
        if self.user_path.is_empty() {
            let path = ps.data_path.join("user.json");
            self.user_path = format!("{}", path.display());
        }

        Ok(())
    }
}

impl ClientConfig {
    pub fn default_server() -> String {
        String::new()
    }

    pub fn default_path() -> String {
        String::new()
    }
}
