//! Plugin identity and descriptor-level settings
//!
//! Values come from a TOML file (usually `mojodesc.toml` next to the build)
//! and can be overridden one by one from the command line.

use crate::descriptor::{Dependency, MojoDescriptor, PluginDescriptor};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "mojodesc.toml";

const MAVEN_PLUGIN_PLUGIN: &str = "maven-plugin-plugin";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Missing required plugin field '{0}'. Set it in the configuration file or pass --{1}")]
    MissingField(&'static str, &'static str),
}

/// Command-line overrides for individual [`PluginMetadata`] fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataOverrides {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub name: Option<String>,
    pub goal_prefix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "group_id")]
    pub group_id: String,
    #[serde(alias = "artifact_id")]
    pub artifact_id: String,
    pub version: String,
    #[serde(alias = "goal_prefix")]
    pub goal_prefix: Option<String>,
    #[serde(alias = "isolated_realm")]
    pub isolated_realm: bool,
    #[serde(alias = "inherited_by_default")]
    pub inherited_by_default: bool,
    #[serde(alias = "required_java_version")]
    pub required_java_version: Option<String>,
    #[serde(alias = "required_maven_version")]
    pub required_maven_version: Option<String>,
    pub dependencies: Vec<Dependency>,
}

impl Default for PluginMetadata {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            group_id: String::new(),
            artifact_id: String::new(),
            version: String::new(),
            goal_prefix: None,
            isolated_realm: false,
            inherited_by_default: true,
            required_java_version: None,
            required_maven_version: None,
            dependencies: Vec::new(),
        }
    }
}

impl PluginMetadata {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn with_overrides(mut self, overrides: MetadataOverrides) -> Self {
        if let Some(group_id) = overrides.group_id {
            self.group_id = group_id;
        }
        if let Some(artifact_id) = overrides.artifact_id {
            self.artifact_id = artifact_id;
        }
        if let Some(version) = overrides.version {
            self.version = version;
        }
        if overrides.name.is_some() {
            self.name = overrides.name;
        }
        if overrides.goal_prefix.is_some() {
            self.goal_prefix = overrides.goal_prefix;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.group_id.trim().is_empty() {
            return Err(ConfigError::MissingField("groupId", "group-id"));
        }
        if self.artifact_id.trim().is_empty() {
            return Err(ConfigError::MissingField("artifactId", "artifact-id"));
        }
        if self.version.trim().is_empty() {
            return Err(ConfigError::MissingField("version", "plugin-version"));
        }
        Ok(())
    }

    /// Explicit goal prefix, or one derived from the artifactId
    pub fn resolved_goal_prefix(&self) -> String {
        self.goal_prefix
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| default_goal_prefix(&self.artifact_id))
    }

    /// Display name, falling back to the artifactId
    pub fn resolved_name(&self) -> String {
        self.name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.artifact_id.clone())
    }

    pub fn into_descriptor(self, mojos: Vec<MojoDescriptor>) -> PluginDescriptor {
        PluginDescriptor {
            name: self.resolved_name(),
            goal_prefix: self.resolved_goal_prefix(),
            description: self.description,
            group_id: self.group_id,
            artifact_id: self.artifact_id,
            version: self.version,
            isolated_realm: self.isolated_realm,
            inherited_by_default: self.inherited_by_default,
            required_java_version: self.required_java_version,
            required_maven_version: self.required_maven_version,
            mojos,
            dependencies: self.dependencies,
        }
    }
}

impl fmt::Display for PluginMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Plugin Metadata:")?;
        writeln!(f, "  Name: {}", self.resolved_name())?;
        writeln!(
            f,
            "  Coordinates: {}:{}:{}",
            self.group_id, self.artifact_id, self.version
        )?;
        writeln!(f, "  Goal Prefix: {}", self.resolved_goal_prefix())?;
        writeln!(f, "  Isolated Realm: {}", self.isolated_realm)?;
        writeln!(f, "  Inherited By Default: {}", self.inherited_by_default)?;
        if let Some(ref version) = self.required_java_version {
            writeln!(f, "  Required Java: {}", version)?;
        }
        if let Some(ref version) = self.required_maven_version {
            writeln!(f, "  Required Maven: {}", version)?;
        }
        writeln!(f, "  Dependencies: {}", self.dependencies.len())?;
        Ok(())
    }
}

/// Goal prefix Maven derives from a plugin artifactId:
/// `maven-foo-plugin` and `foo-maven-plugin` both give `foo`.
pub fn default_goal_prefix(artifact_id: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();

    if artifact_id == MAVEN_PLUGIN_PLUGIN {
        return "plugin".to_string();
    }

    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^(?:maven-)?(.*?)(?:-maven)?(?:-plugin)?$").expect("valid regex")
    });
    pattern
        .captures(artifact_id)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| artifact_id.to_string())
}
