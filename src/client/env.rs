use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use console::style;
use log::debug;

use crate::filelock::{read_file_lock, remove_file_lock, write_file_lock};

/// Cookie lifetime written at login, in seconds (7 days).
pub const COOKIE_MAX_AGE: u64 = 7 * 24 * 60 * 60;

/// Ambient capabilities the client needs from its host: credential storage
/// and the "go log in" side effect. Injected so tests and embedders can
/// substitute their own implementation.
pub trait Environment: Send + Sync {
    /// Read the persisted token. Returns None when the token is absent or
    /// the store is unreadable; absence is an expected state, not an error.
    fn stored_token(&self) -> Option<String>;

    /// Read the raw cookie line, like "token=abc; Max-Age=604800; Path=/".
    fn cookie_line(&self) -> Option<String>;

    /// Read the cached user blob as raw JSON.
    fn stored_user(&self) -> Option<String>;

    fn store_token(&self, token: &str) -> Result<()>;

    /// Write the token into the cookie location as a `token=` entry.
    fn store_cookie_token(&self, token: &str) -> Result<()>;

    fn store_user(&self, user_json: &str) -> Result<()>;

    /// Drop every stored credential. Idempotent.
    fn clear_credentials(&self) -> Result<()>;

    /// Point the user at the login flow. Must not block and must not fail.
    fn navigate_login(&self);
}

/// File-backed environment used by the CLI. One file per slot, guarded by
/// file locks so a polling watcher and a login running in another terminal
/// don't tear each other's writes.
pub struct FsEnvironment {
    token_path: String,
    cookie_path: String,
    user_path: String,
}

impl FsEnvironment {
    pub fn new(token_path: String, cookie_path: String, user_path: String) -> Self {
        Self {
            token_path,
            cookie_path,
            user_path,
        }
    }

    fn read_slot(&self, path: &str) -> Option<String> {
        let data = match read_file_lock(path) {
            Ok(Some(data)) => data,
            Ok(None) => return None,
            Err(err) => {
                debug!("Read credential file {path} failed: {err:#}");
                return None;
            }
        };
        let text = String::from_utf8_lossy(&data).trim().to_string();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl Environment for FsEnvironment {
    fn stored_token(&self) -> Option<String> {
        self.read_slot(&self.token_path)
    }

    fn cookie_line(&self) -> Option<String> {
        self.read_slot(&self.cookie_path)
    }

    fn stored_user(&self) -> Option<String> {
        self.read_slot(&self.user_path)
    }

    fn store_token(&self, token: &str) -> Result<()> {
        write_file_lock(&self.token_path, token.as_bytes())
    }

    fn store_cookie_token(&self, token: &str) -> Result<()> {
        let line = format!(
            "token={}; Max-Age={COOKIE_MAX_AGE}; Path=/",
            urlencoding::encode(token)
        );
        write_file_lock(&self.cookie_path, line.as_bytes())
    }

    fn store_user(&self, user_json: &str) -> Result<()> {
        write_file_lock(&self.user_path, user_json.as_bytes())
    }

    fn clear_credentials(&self) -> Result<()> {
        remove_file_lock(&self.token_path)?;
        remove_file_lock(&self.cookie_path)?;
        remove_file_lock(&self.user_path)?;
        Ok(())
    }

    fn navigate_login(&self) {
        eprintln!(
            "{} you are not logged in, run {} first",
            style("note:").yellow().bold(),
            style("merch login").cyan()
        );
    }
}

/// In-memory environment. Lets embedders and tests run the client without
/// touching the filesystem; counts login navigations instead of printing.
#[derive(Default)]
pub struct MemoryEnvironment {
    token: Mutex<Option<String>>,
    cookie: Mutex<Option<String>>,
    user: Mutex<Option<String>>,
    navigations: AtomicUsize,
}

impl MemoryEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let env = Self::default();
        *env.token.lock().unwrap() = Some(token.to_string());
        env
    }

    pub fn with_cookie_line(line: &str) -> Self {
        let env = Self::default();
        *env.cookie.lock().unwrap() = Some(line.to_string());
        env
    }

    /// How many times a missing credential sent the user to login.
    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }
}

impl Environment for MemoryEnvironment {
    fn stored_token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn cookie_line(&self) -> Option<String> {
        self.cookie.lock().unwrap().clone()
    }

    fn stored_user(&self) -> Option<String> {
        self.user.lock().unwrap().clone()
    }

    fn store_token(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn store_cookie_token(&self, token: &str) -> Result<()> {
        let line = format!(
            "token={}; Max-Age={COOKIE_MAX_AGE}; Path=/",
            urlencoding::encode(token)
        );
        *self.cookie.lock().unwrap() = Some(line);
        Ok(())
    }

    fn store_user(&self, user_json: &str) -> Result<()> {
        *self.user.lock().unwrap() = Some(user_json.to_string());
        Ok(())
    }

    fn clear_credentials(&self) -> Result<()> {
        *self.token.lock().unwrap() = None;
        *self.cookie.lock().unwrap() = None;
        *self.user.lock().unwrap() = None;
        Ok(())
    }

    fn navigate_login(&self) {
        self.navigations.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    fn temp_env(name: &str) -> (FsEnvironment, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(format!("_merch_env_{name}"));
        fs::create_dir_all(&dir).unwrap();
        let env = FsEnvironment::new(
            dir.join("token").display().to_string(),
            dir.join("cookies").display().to_string(),
            dir.join("user.json").display().to_string(),
        );
        (env, dir)
    }

    #[test]
    fn test_fs_roundtrip() {
        let (env, dir) = temp_env("roundtrip");

        assert_eq!(env.stored_token(), None);
        env.store_token("tok_123").unwrap();
        assert_eq!(env.stored_token(), Some(String::from("tok_123")));

        env.store_cookie_token("tok 123").unwrap();
        let line = env.cookie_line().unwrap();
        assert!(line.starts_with("token=tok%20123; "));

        env.clear_credentials().unwrap();
        assert_eq!(env.stored_token(), None);
        assert_eq!(env.cookie_line(), None);
        // Clearing twice is fine
        env.clear_credentials().unwrap();

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_memory_navigations() {
        let env = MemoryEnvironment::new();
        assert_eq!(env.navigations(), 0);
        env.navigate_login();
        env.navigate_login();
        assert_eq!(env.navigations(), 2);
    }
}
