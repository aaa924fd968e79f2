use std::path::{Path, PathBuf};
use std::{env, fs, io};

use anyhow::{bail, Context, Result};
use log::warn;
use serde::de::DeserializeOwned;

pub struct PathSet {
    pub config_path: PathBuf,
    pub data_path: PathBuf,
}

impl PathSet {
    pub fn new(config_path: Option<PathBuf>, data_path: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Some(path) = config_path {
            path
        } else if let Ok(path) = env::var("MERCH_CONFIG") {
            PathBuf::from(path)
        } else {
            Self::home_dir()?.join(".config").join("merch")
        };

        let data_path = if let Some(path) = data_path {
            path
        } else if let Ok(path) = env::var("MERCH_DATA") {
            PathBuf::from(path)
        } else {
            Self::home_dir()?.join(".local").join("share").join("merch")
        };

        ensure_dir_exists(&config_path)
            .with_context(|| format!("ensure config directory: {}", config_path.display()))?;
        ensure_dir_exists(&data_path)
            .with_context(|| format!("ensure data directory: {}", data_path.display()))?;

        Ok(Self {
            config_path,
            data_path,
        })
    }

    pub fn load_config<T, F>(&self, name: &str, default_func: F) -> Result<T>
    where
        T: CommonConfig + DeserializeOwned,
        F: FnOnce() -> T,
    {
        let path = self.config_path.join(format!("{name}.toml"));
        let mut cfg: T = match fs::read_to_string(&path) {
            Ok(s) => toml::from_str(&s).context("parse config toml")?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!("Config file for {name} not found, using defaults");
                default_func()
            }
            Err(err) => {
                return Err(err).context(format!("read config file: {}", path.display()));
            }
        };

        cfg.complete(self).context("validate config")?;
        Ok(cfg)
    }

    fn home_dir() -> Result<PathBuf> {
        let dir = std::env::var_os("HOME") // Unix/Linux/macOS
            .or_else(|| std::env::var_os("USERPROFILE")) // Windows
            .map(PathBuf::from);
        match dir {
            Some(dir) => Ok(dir),
            None => {
                bail!("could not determine home directory, please specify config path manually")
            }
        }
    }
}

pub trait CommonConfig {
    fn default() -> Self;
    fn complete(&mut self, ps: &PathSet) -> Result<()>;
}

/// See: [`shellexpand::full`].
pub fn expandenv(name: &str, s: impl AsRef<str>) -> Result<String> {
    let s =
        shellexpand::full(s.as_ref()).with_context(|| format!("expand env value for '{name}'"))?;
    Ok(s.to_string())
}

pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_dir_exists() {
        let base_path = Path::new("_test_config_dirs");
        let nested = base_path.join("a/b/c");
        ensure_dir_exists(&nested).unwrap();
        assert!(nested.is_dir());

        // Existing directory is fine
        ensure_dir_exists(&nested).unwrap();

        fs::remove_dir_all(base_path).unwrap();
    }

    #[test]
    fn test_expandenv() {
        env::set_var("_MERCH_TEST_VALUE", "hello");
        assert_eq!(expandenv("field", "$_MERCH_TEST_VALUE").unwrap(), "hello");
        assert_eq!(expandenv("field", "plain").unwrap(), "plain");
        env::remove_var("_MERCH_TEST_VALUE");
    }
}
