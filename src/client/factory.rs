use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::{CommonConfig, PathSet};
use crate::types::user::{LoginRequest, User};

use super::config::ClientConfig;
use super::env::{Environment, FsEnvironment};
use super::token::sync_credentials;
use super::Client;

pub struct ClientFactory {
    cfg: ClientConfig,
    env: Arc<dyn Environment>,
}

impl ClientFactory {
    pub fn load(ps: &PathSet) -> Result<Self> {
        let cfg = ps.load_config("client", ClientConfig::default)?;
        Ok(Self::new(cfg))
    }

    pub fn new(cfg: ClientConfig) -> Self {
        let env: Arc<dyn Environment> = Arc::new(FsEnvironment::new(
            cfg.token_path.clone(),
            cfg.cookie_path.clone(),
            cfg.user_path.clone(),
        ));
        Self { cfg, env }
    }

    pub fn build_client(&self) -> Result<Client> {
        // Both credential slots must agree before any authenticated call
        // goes out. The client itself only reads them.
        sync_credentials(self.env.as_ref()).context("synchronize credential storage")?;
        Client::new(&self.cfg.server, self.env.clone(), self.cfg.environment)
    }

    /// Login against the server and persist the credential into both
    /// storage slots, plus the user blob for offline display.
    pub async fn login(&self, email: String, password: String) -> Result<User> {
        let client = self.build_client()?;
        let resp = client.login(&LoginRequest { email, password }).await?;

        self.env.store_token(&resp.token).context("persist token")?;
        self.env
            .store_cookie_token(&resp.token)
            .context("persist cookie")?;
        let user_json = serde_json::to_string(&resp.user).unwrap();
        self.env.store_user(&user_json).context("persist user")?;

        info!("Logged in to {} as {}", self.cfg.server, resp.user.name);
        Ok(resp.user)
    }

    /// Drop every stored credential. No server call is involved.
    pub fn logout(&self) -> Result<()> {
        self.env.clear_credentials().context("clear credentials")
    }

    /// The user blob cached at the last login, if it is still readable.
    pub fn cached_user(&self) -> Option<User> {
        let raw = self.env.stored_user()?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(_) => {
                warn!("Cached user data is invalid, ignoring it");
                None
            }
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.cfg
    }

    pub fn environment(&self) -> &Arc<dyn Environment> {
        &self.env
    }
}
