//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `<config dir>/llvmlite-build/build.toml` - user-wide defaults
//! - Project: `<ffi dir>/.llvmlite/build.toml` - checkout-specific overrides
//!
//! Project config takes precedence over global config. Environment
//! overrides (`LLVM_CONFIG`, `LLVMLITE_CXX_STATIC_LINK`) take precedence
//! over both, and command-line flags over everything.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::BuildError;
use crate::util::fs::read_to_string;

/// Environment variable overriding the llvm-config path.
pub const LLVM_CONFIG_ENV: &str = "LLVM_CONFIG";

/// Environment variable enabling static linkage of the C++ runtime.
pub const CXX_STATIC_LINK_ENV: &str = "LLVMLITE_CXX_STATIC_LINK";

/// Build configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// LLVM toolchain settings
    pub toolchain: ToolchainSettings,

    /// Native build tools
    pub tools: ToolSettings,

    /// Windows-only settings
    pub windows: WindowsSettings,

    /// Directory layout
    pub paths: PathSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ToolchainSettings {
    /// Path to llvm-config (e.g., /usr/lib/llvm-6.0/bin/llvm-config)
    pub llvm_config: Option<PathBuf>,

    /// Link libstdc++ statically for portability
    pub cxx_static_link: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ToolSettings {
    pub make: Option<PathBuf>,
    pub cmake: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct WindowsSettings {
    /// CMake generators to try, in priority order, before the 64-bit suffix
    /// is applied.
    pub generators: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PathSettings {
    /// Where the built library is installed
    pub target_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.toolchain.llvm_config.is_some() {
            self.toolchain.llvm_config = other.toolchain.llvm_config;
        }
        if other.toolchain.cxx_static_link.is_some() {
            self.toolchain.cxx_static_link = other.toolchain.cxx_static_link;
        }
        if other.tools.make.is_some() {
            self.tools.make = other.tools.make;
        }
        if other.tools.cmake.is_some() {
            self.tools.cmake = other.tools.cmake;
        }
        if !other.windows.generators.is_empty() {
            self.windows.generators = other.windows.generators;
        }
        if other.paths.target_dir.is_some() {
            self.paths.target_dir = other.paths.target_dir;
        }
    }

    /// Apply environment overrides on top of the file configuration.
    pub fn apply_env(&mut self, env: &EnvOverrides) -> Result<(), BuildError> {
        if let Some(ref llvm_config) = env.llvm_config {
            self.toolchain.llvm_config = Some(PathBuf::from(llvm_config));
        }
        if let Some(enabled) = env.cxx_static_link()? {
            self.toolchain.cxx_static_link = Some(enabled);
        }
        Ok(())
    }
}

/// Environment variables the build honours, captured once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub llvm_config: Option<String>,
    pub cxx_static_link: Option<String>,
}

impl EnvOverrides {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        EnvOverrides {
            llvm_config: std::env::var(LLVM_CONFIG_ENV).ok().filter(|v| !v.is_empty()),
            cxx_static_link: std::env::var(CXX_STATIC_LINK_ENV).ok(),
        }
    }

    /// The static-link override, if set.
    pub fn cxx_static_link(&self) -> Result<Option<bool>, BuildError> {
        self.cxx_static_link
            .as_deref()
            .map(|value| parse_flag(CXX_STATIC_LINK_ENV, value))
            .transpose()
    }
}

/// Parse a boolean-valued override.
///
/// Integers follow C truthiness (`0` is off, anything else on); the usual
/// words are accepted too, and an empty value means off.
pub fn parse_flag(name: &str, value: &str) -> Result<bool, BuildError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(false);
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(n != 0);
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => Err(BuildError::InvalidOverride {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "llvmlite", "llvmlite-build")
        .map(|dirs| dirs.config_dir().join("build.toml"))
}

/// Get the project config file path for an FFI directory.
pub fn project_config_path(ffi_dir: &Path) -> PathBuf {
    ffi_dir.join(".llvmlite").join("build.toml")
}

/// Load and merge global and project configuration.
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = global_path
        .map(Config::load_or_default)
        .unwrap_or_default();

    let project = Config::load_or_default(project_path);
    config.merge(project);

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config_file() {
        let config: Config = toml::from_str(
            r#"
            [toolchain]
            llvm-config = "/usr/lib/llvm-6.0/bin/llvm-config"
            cxx-static-link = true

            [tools]
            make = "gmake"

            [windows]
            generators = ["Visual Studio 15 2017", "Visual Studio 14 2015"]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.toolchain.llvm_config,
            Some(PathBuf::from("/usr/lib/llvm-6.0/bin/llvm-config"))
        );
        assert_eq!(config.toolchain.cxx_static_link, Some(true));
        assert_eq!(config.tools.make, Some(PathBuf::from("gmake")));
        assert!(config.tools.cmake.is_none());
        assert_eq!(config.windows.generators.len(), 2);
    }

    #[test]
    fn test_project_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join("ffi/.llvmlite/build.toml");
        std::fs::create_dir_all(project.parent().unwrap()).unwrap();

        std::fs::write(
            &global,
            "[toolchain]\nllvm-config = \"/global/llvm-config\"\n[tools]\ncmake = \"/global/cmake\"\n",
        )
        .unwrap();
        std::fs::write(&project, "[toolchain]\nllvm-config = \"/project/llvm-config\"\n").unwrap();

        let config = load_config(Some(&global), &project);
        assert_eq!(
            config.toolchain.llvm_config,
            Some(PathBuf::from("/project/llvm-config"))
        );
        assert_eq!(config.tools.cmake, Some(PathBuf::from("/global/cmake")));
    }

    #[test]
    fn test_invalid_file_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("build.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        assert_eq!(Config::load_or_default(&path), Config::default());
    }

    #[test]
    fn test_env_overrides_config() {
        let mut config = Config::default();
        config.toolchain.llvm_config = Some(PathBuf::from("/from/file"));
        config.toolchain.cxx_static_link = Some(true);

        let env = EnvOverrides {
            llvm_config: Some("/from/env".to_string()),
            cxx_static_link: Some("0".to_string()),
        };
        config.apply_env(&env).unwrap();

        assert_eq!(config.toolchain.llvm_config, Some(PathBuf::from("/from/env")));
        assert_eq!(config.toolchain.cxx_static_link, Some(false));
    }

    #[test]
    fn test_parse_flag() {
        assert!(!parse_flag(CXX_STATIC_LINK_ENV, "0").unwrap());
        assert!(parse_flag(CXX_STATIC_LINK_ENV, "1").unwrap());
        assert!(parse_flag(CXX_STATIC_LINK_ENV, "2").unwrap());
        assert!(parse_flag(CXX_STATIC_LINK_ENV, "Yes").unwrap());
        assert!(!parse_flag(CXX_STATIC_LINK_ENV, "").unwrap());

        let err = parse_flag(CXX_STATIC_LINK_ENV, "maybe").unwrap_err();
        assert!(matches!(err, BuildError::InvalidOverride { .. }));
    }
}
