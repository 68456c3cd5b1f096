//! This is the `ConfigFile` struct.
//!
//! This is for finding the right default locations for the configuration files of the
//! `flightmsg` tools.  This is a configuration file/struct neutral loading engine, storing only
//! the base directory and with `load()` read the proper file or fall back to defaults.
//!
//! This encapsulates the configuration file, available with `.inner()` or `.into_inner()`.
//!

use std::fmt::Debug;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use eyre::Result;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, trace};

use crate::makepath;

/// Main name for the directory base
pub const TAG: &str = "flightmsg";

/// Every configuration struct carries a `version` field checked at load time.
///
pub trait Versioned {
    /// Version expected by this build
    const VERSION: usize;

    /// Version found in the file
    fn version(&self) -> usize;
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown config file {0}")]
    MissingConfig(String),
    #[error("Bad file version {found}, expected {expected}")]
    BadFileVersion { found: usize, expected: usize },
    #[error("No HOME directory, can not continue")]
    NoHome,
}

/// Configuration file for a given tool, found either at an explicit path or in the
/// default directory (`$HOME/.config/<tag>`).
///
#[derive(Debug)]
pub struct ConfigFile<T: Debug + DeserializeOwned + Default + Versioned> {
    /// Tag is the project name.
    tag: String,
    /// This is the base directory for all files.
    basedir: PathBuf,
    inner: T,
}

impl<T> ConfigFile<T>
where
    T: Debug + DeserializeOwned + Default + Versioned,
{
    #[tracing::instrument]
    fn new(tag: &str) -> Result<Self> {
        let base = BaseDirs::new().ok_or(ConfigError::NoHome)?;

        #[cfg(unix)]
        let base = base.home_dir().join(".config");

        #[cfg(windows)]
        let base = base.data_local_dir().to_path_buf();

        let basedir = makepath!(base, tag);
        debug!("base = {basedir:?}");

        Ok(ConfigFile {
            tag: String::from(tag),
            basedir,
            inner: T::default(),
        })
    }

    /// Returns the path of the default config directory
    ///
    pub fn config_path(&self) -> PathBuf {
        self.basedir.clone()
    }

    /// Returns the path of the default config file
    ///
    pub fn default_file(&self, name: &str) -> PathBuf {
        let cfg = self.config_path().join(name);
        debug!("default = {cfg:?}");
        cfg
    }

    /// Load the file and return a struct T in the right format.
    ///
    /// Use the following search path:
    /// - file specified on CLI, which must exist
    /// - default file `name` in the base directory, defaults are used if it is not there
    ///
    #[tracing::instrument]
    pub fn load(name: &str, fname: Option<&str>) -> Result<ConfigFile<T>> {
        let mut cfg = ConfigFile::<T>::new(TAG)?;

        let fname = match fname {
            Some(fname) => {
                let fname = PathBuf::from(fname);
                if !fname.exists() {
                    let fname = fname.to_string_lossy().to_string();
                    return Err(ConfigError::MissingConfig(fname).into());
                }
                fname
            }
            None => {
                let def = cfg.default_file(name);
                if !def.exists() {
                    debug!("no {def:?}, using defaults");
                    return Ok(cfg);
                }
                def
            }
        };

        trace!("Loading config file {fname:?} for {}", cfg.tag);

        let data = fs::read_to_string(&fname)?;
        debug!("string data = {data}");

        let data: T = hcl::from_str(&data)?;
        debug!("struct data = {data:?}");

        if data.version() != T::VERSION {
            return Err(ConfigError::BadFileVersion {
                found: data.version(),
                expected: T::VERSION,
            }
            .into());
        }

        cfg.inner = data;
        Ok(cfg)
    }

    /// Return the inner configuration
    ///
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Consume the file and return the configuration
    ///
    pub fn into_inner(self) -> T {
        self.inner
    }
}
