//! Configuration for the civic budget simulator.
//!
//! `~/.civic/config.toml`, every section optional. A missing file means the
//! built-in 2025 Ottawa dataset with default totals and UI options.

use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;

use civic_types::ui::UiOptions;
use civic_types::{LayerMap, RawSector, RegistryError, SectorRegistry, default_raw_sectors};

/// Overrides `storage.data_dir`.
pub const DATA_DIR_ENV: &str = "CIVIC_DATA_DIR";

#[derive(Debug, Default, Deserialize)]
pub struct CivicConfig {
    pub app: Option<AppConfig>,
    pub budget: Option<BudgetConfig>,
    pub storage: Option<StorageConfig>,
    /// Replaces the built-in sector list when non-empty.
    #[serde(default)]
    pub sectors: Vec<RawSector>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid sector list: {0}")]
    Sectors(#[from] RegistryError),
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
}

/// Per-layer budget totals, in millions.
#[derive(Debug, Default, Deserialize)]
pub struct BudgetConfig {
    pub operating_total: Option<f64>,
    pub capital_total: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    /// Directory for `state.json`. `${VAR}` references are expanded.
    pub data_dir: Option<String>,
}

pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(pos) = rest.find("${") {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[pos..]);
            return out;
        };
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

impl CivicConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.app.as_ref().map_or_else(UiOptions::default, |app| UiOptions {
            ascii_only: app.ascii_only,
            high_contrast: app.high_contrast,
        })
    }

    #[must_use]
    pub fn totals(&self) -> LayerMap<f64> {
        let budget = self.budget.as_ref();
        LayerMap::new(
            budget
                .and_then(|b| b.operating_total)
                .unwrap_or(SectorRegistry::DEFAULT_OPERATING_TOTAL),
            budget
                .and_then(|b| b.capital_total)
                .unwrap_or(SectorRegistry::DEFAULT_CAPITAL_TOTAL),
        )
    }

    /// Build the sector registry from `[[sectors]]` (or the built-in list) and
    /// the configured totals.
    pub fn registry(&self) -> Result<SectorRegistry, ConfigError> {
        let registry = if self.sectors.is_empty() {
            SectorRegistry::from_raw(&default_raw_sectors(), self.totals())?
        } else {
            SectorRegistry::from_raw(&self.sectors, self.totals())?
        };
        Ok(registry)
    }

    /// Configured data directory, with `${VAR}` and a leading `~/` expanded.
    #[must_use]
    pub fn configured_data_dir(&self) -> Option<String> {
        self.storage
            .as_ref()
            .and_then(|s| s.data_dir.as_deref())
            .map(expand_env_vars)
            .filter(|dir| !dir.trim().is_empty())
    }
}

/// Everything the session needs from configuration, with failures already
/// folded into defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub registry: SectorRegistry,
    pub ui: UiOptions,
    /// `None` when no home directory can be found and nothing is configured.
    pub data_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registry: SectorRegistry::ottawa_2025(),
            ui: UiOptions::default(),
            data_dir: resolve_data_dir(None, None, dirs::home_dir().as_deref()),
        }
    }
}

impl Settings {
    /// Load `~/.civic/config.toml` and resolve it. Never fails.
    #[must_use]
    pub fn load() -> Self {
        Self::resolve(CivicConfig::load())
    }

    /// Fold a load result into settings. Errors are logged and replaced by
    /// defaults, section by section.
    #[must_use]
    pub fn resolve(loaded: Result<Option<CivicConfig>, ConfigError>) -> Self {
        let config = match loaded {
            Ok(Some(config)) => config,
            Ok(None) => CivicConfig::default(),
            Err(e) => {
                tracing::warn!("{e}; using defaults");
                CivicConfig::default()
            }
        };

        let registry = match config.registry() {
            Ok(registry) => registry,
            Err(e) => {
                tracing::warn!("{e}; using the built-in sectors");
                SectorRegistry::ottawa_2025()
            }
        };
        let override_dir = env::var(DATA_DIR_ENV).ok();
        let data_dir = resolve_data_dir(
            override_dir.as_deref(),
            config.configured_data_dir().as_deref(),
            dirs::home_dir().as_deref(),
        );

        Self {
            registry,
            ui: config.ui_options(),
            data_dir,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".civic").join("config.toml"))
}

/// Pick the data directory: environment override, then config, then `~/.civic`.
#[must_use]
pub fn resolve_data_dir(
    override_dir: Option<&str>,
    configured: Option<&str>,
    home: Option<&Path>,
) -> Option<PathBuf> {
    let chosen = override_dir
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .or(configured);
    match chosen {
        Some(dir) => Some(expand_home(dir, home)),
        None => home.map(|h| h.join(".civic")),
    }
}

fn expand_home(dir: &str, home: Option<&Path>) -> PathBuf {
    match (dir.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(dir),
    }
}

#[cfg(test)]
mod tests {
    use civic_types::Layer;

    use super::*;

    #[test]
    fn empty_config_uses_builtin_dataset() {
        let config = CivicConfig::parse("").unwrap();
        let registry = config.registry().unwrap();
        assert_eq!(registry.len(), 6);
        assert!((registry.total_budget(Layer::Operating) - 5050.0).abs() < f64::EPSILON);
        assert_eq!(config.ui_options(), UiOptions::default());
    }

    #[test]
    fn full_config_parses() {
        let config = CivicConfig::parse(
            r#"
[app]
ascii_only = true
high_contrast = true

[budget]
operating_total = 100.0
capital_total = 50

[storage]
data_dir = "/tmp/civic"

[[sectors]]
id = "roads"
name = "Roads"
icon = "R"
operating = 3
capital = 1

[[sectors]]
id = "libraries"
name = "Libraries"
operating = 1
capital = 1
"#,
        )
        .unwrap();

        assert!(config.ui_options().ascii_only);
        assert!(config.ui_options().high_contrast);
        assert_eq!(config.configured_data_dir().as_deref(), Some("/tmp/civic"));

        let registry = config.registry().unwrap();
        assert_eq!(registry.reference_vector(Layer::Operating), vec![75, 25]);
        assert_eq!(registry.reference_vector(Layer::Capital), vec![50, 50]);
        assert!((registry.total_budget(Layer::Capital) - 50.0).abs() < f64::EPSILON);
        assert_eq!(registry.get(1).unwrap().icon(), "");
    }

    #[test]
    fn invalid_sector_list_is_an_error() {
        let config = CivicConfig::parse(
            r#"
[[sectors]]
id = "a"
name = "A"
operating = -1
"#,
        )
        .unwrap();
        assert!(matches!(config.registry(), Err(ConfigError::Sectors(_))));
    }

    #[test]
    fn resolve_falls_back_on_bad_sectors() {
        let config = CivicConfig::parse(
            r#"
[[sectors]]
id = "a"
name = "A"

[[sectors]]
id = "A"
name = "Again"
"#,
        )
        .unwrap();
        let settings = Settings::resolve(Ok(Some(config)));
        assert_eq!(settings.registry, SectorRegistry::ottawa_2025());
    }

    #[test]
    fn resolve_falls_back_on_load_error() {
        let err = CivicConfig::parse("app = [").unwrap_err();
        let settings = Settings::resolve(Err(ConfigError::Parse {
            path: PathBuf::from("config.toml"),
            source: err,
        }));
        assert_eq!(settings.registry.len(), 6);
        assert_eq!(settings.ui, UiOptions::default());
    }

    #[test]
    fn load_from_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = CivicConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn load_from_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[budget\n").unwrap();
        let err = CivicConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: p, .. } if p == path));
    }

    #[test]
    fn data_dir_precedence() {
        let home = Path::new("/home/user");
        assert_eq!(
            resolve_data_dir(Some("/override"), Some("/configured"), Some(home)),
            Some(PathBuf::from("/override"))
        );
        assert_eq!(
            resolve_data_dir(Some("  "), Some("~/civic-data"), Some(home)),
            Some(PathBuf::from("/home/user/civic-data"))
        );
        assert_eq!(
            resolve_data_dir(None, None, Some(home)),
            Some(PathBuf::from("/home/user/.civic"))
        );
        assert_eq!(resolve_data_dir(None, None, None), None);
    }

    #[test]
    fn expand_env_vars_no_vars() {
        assert_eq!(expand_env_vars("plain/path"), "plain/path");
    }

    #[test]
    fn expand_env_vars_single_var() {
        unsafe {
            env::set_var("CIVIC_TEST_DATA_ROOT", "/srv");
        }
        assert_eq!(expand_env_vars("${CIVIC_TEST_DATA_ROOT}/civic"), "/srv/civic");
        unsafe {
            env::remove_var("CIVIC_TEST_DATA_ROOT");
        }
    }

    #[test]
    fn expand_env_vars_missing_var_becomes_empty() {
        unsafe {
            env::remove_var("CIVIC_TEST_MISSING");
        }
        assert_eq!(expand_env_vars("a${CIVIC_TEST_MISSING}b"), "ab");
    }

    #[test]
    fn expand_env_vars_unclosed_brace_preserved() {
        assert_eq!(expand_env_vars("dir/${UNCLOSED"), "dir/${UNCLOSED");
    }

    #[test]
    fn expand_env_vars_empty_name_dropped() {
        assert_eq!(expand_env_vars("a${}b"), "ab");
    }
}
