//! Kiosk configuration.
//!
//! Layered, later sources win: built-in defaults, an optional TOML file,
//! `KIOSK_*` variables, the legacy `BASE_DIR`/`FILES_DIR`/`PORT` variables,
//! and finally command-line overrides.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{KioskError, KioskResult};
use crate::scan::DEFAULT_PUBLIC_PREFIX;

static DEFAULT_FILES_DIR: &str = "/mnt/hsf-kiosk-files";
static DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
static DEFAULT_CALENDAR_TIMEOUT: &str = "5s";

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Explicit config file; it must exist.
    pub config_file: Option<PathBuf>,
    pub files_dir: Option<PathBuf>,
    pub port: Option<u16>,
}

#[derive(Deserialize)]
struct RawConfig {
    files_dir: String,
    host: String,
    port: u16,
    public_prefix: String,
    calendar_timeout: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KioskConfig {
    /// Root holding `template.json` and the document directories.
    pub files_dir: PathBuf,
    pub host: String,
    pub port: u16,
    /// URL prefix the static file server exposes `files_dir` under.
    pub public_prefix: String,
    /// Upper bound for fetching a single calendar feed.
    pub calendar_timeout: Duration,
}

impl KioskConfig {
    /// Load configuration from the process environment.
    pub fn load(overrides: &ConfigOverrides) -> KioskResult<Self> {
        Self::load_from(overrides, &std::env::vars().collect())
    }

    /// Load configuration with an explicit set of environment variables.
    pub fn load_from(
        overrides: &ConfigOverrides,
        env: &HashMap<String, String>,
    ) -> KioskResult<Self> {
        let mut builder = Config::builder()
            .set_default("files_dir", DEFAULT_FILES_DIR)
            .and_then(|b| b.set_default("host", DEFAULT_HOST))
            .and_then(|b| b.set_default("port", i64::from(DEFAULT_PORT)))
            .and_then(|b| b.set_default("public_prefix", DEFAULT_PUBLIC_PREFIX))
            .and_then(|b| b.set_default("calendar_timeout", DEFAULT_CALENDAR_TIMEOUT))
            .map_err(|e| KioskError::Config(e.to_string()))?;

        builder = match &overrides.config_file {
            Some(path) => builder.add_source(File::from(path.clone()).required(true)),
            None => match Self::default_config_path() {
                Some(path) => builder.add_source(File::from(path).required(false)),
                None => builder,
            },
        };

        let kiosk_env = env
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<config::Map<String, String>>();

        let legacy = |name: &str| env.get(name).filter(|v| !v.is_empty()).cloned();

        let config = builder
            .add_source(
                Environment::with_prefix("KIOSK")
                    .try_parsing(true)
                    .source(Some(kiosk_env)),
            )
            .set_override_option("files_dir", legacy("BASE_DIR"))
            .and_then(|b| b.set_override_option("files_dir", legacy("FILES_DIR")))
            .and_then(|b| b.set_override_option("port", legacy("PORT")))
            .and_then(|b| {
                b.set_override_option(
                    "files_dir",
                    overrides
                        .files_dir
                        .as_ref()
                        .map(|p| p.to_string_lossy().into_owned()),
                )
            })
            .and_then(|b| b.set_override_option("port", overrides.port.map(i64::from)))
            .and_then(|b| b.build())
            .map_err(|e| KioskError::Config(e.to_string()))?;

        let raw: RawConfig = config
            .try_deserialize()
            .map_err(|e| KioskError::Config(e.to_string()))?;

        let calendar_timeout = humantime::parse_duration(&raw.calendar_timeout).map_err(|e| {
            KioskError::Config(format!(
                "invalid calendar_timeout '{}': {e}",
                raw.calendar_timeout
            ))
        })?;

        Ok(KioskConfig {
            files_dir: PathBuf::from(shellexpand::tilde(&raw.files_dir).into_owned()),
            host: raw.host,
            port: raw.port,
            public_prefix: raw.public_prefix,
            calendar_timeout,
        })
    }

    /// `<config dir>/kiosk/config.toml`, used when no file is given.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kiosk").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn env(vars: &[(&str, &str)]) -> HashMap<String, String> {
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Points at an empty file so a user's own config never leaks in.
    fn isolated(tmp: &TempDir) -> ConfigOverrides {
        let path = tmp.path().join("kiosk.toml");
        std::fs::write(&path, "").unwrap();
        ConfigOverrides {
            config_file: Some(path),
            ..Default::default()
        }
    }

    #[test]
    fn defaults() {
        let tmp = TempDir::new().unwrap();
        let config = KioskConfig::load_from(&isolated(&tmp), &env(&[])).unwrap();

        assert_eq!(config.files_dir, PathBuf::from("/mnt/hsf-kiosk-files"));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.public_prefix, "/docs");
        assert_eq!(config.calendar_timeout, Duration::from_secs(5));
    }

    #[test]
    fn files_dir_is_preferred_over_base_dir() {
        let tmp = TempDir::new().unwrap();

        let config =
            KioskConfig::load_from(&isolated(&tmp), &env(&[("BASE_DIR", "/srv/legacy")])).unwrap();
        assert_eq!(config.files_dir, PathBuf::from("/srv/legacy"));

        let config = KioskConfig::load_from(
            &isolated(&tmp),
            &env(&[("BASE_DIR", "/srv/legacy"), ("FILES_DIR", "/srv/files"), ("PORT", "8080")]),
        )
        .unwrap();
        assert_eq!(config.files_dir, PathBuf::from("/srv/files"));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn prefixed_variables_and_file_are_layered() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("kiosk.toml");
        std::fs::write(
            &path,
            "public_prefix = \"/files\"\ncalendar_timeout = \"1500ms\"\nport = 4000\n",
        )
        .unwrap();
        let overrides = ConfigOverrides {
            config_file: Some(path),
            ..Default::default()
        };

        let config =
            KioskConfig::load_from(&overrides, &env(&[("KIOSK_PORT", "5000")])).unwrap();

        assert_eq!(config.public_prefix, "/files");
        assert_eq!(config.calendar_timeout, Duration::from_millis(1500));
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn command_line_wins() {
        let tmp = TempDir::new().unwrap();
        let overrides = ConfigOverrides {
            files_dir: Some(PathBuf::from("/cli/files")),
            port: Some(9000),
            ..isolated(&tmp)
        };

        let config = KioskConfig::load_from(
            &overrides,
            &env(&[("FILES_DIR", "/srv/files"), ("PORT", "8080")]),
        )
        .unwrap();

        assert_eq!(config.files_dir, PathBuf::from("/cli/files"));
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn invalid_timeout_is_a_config_error() {
        let tmp = TempDir::new().unwrap();
        let err = KioskConfig::load_from(
            &isolated(&tmp),
            &env(&[("KIOSK_CALENDAR_TIMEOUT", "soon")]),
        )
        .unwrap_err();

        assert!(matches!(err, KioskError::Config(_)));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let overrides = ConfigOverrides {
            config_file: Some(PathBuf::from("/definitely/not/here.toml")),
            ..Default::default()
        };
        assert!(KioskConfig::load_from(&overrides, &env(&[])).is_err());
    }
}
