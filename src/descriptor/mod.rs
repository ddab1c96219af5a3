//! Plugin descriptor data structures
//!
//! These mirror the content of a Maven `plugin.xml`: top-level plugin
//! identity, one [`MojoDescriptor`] per goal, and the dependency list copied
//! from the plugin's own build.

pub mod builder;
pub mod writer;
mod xml;

pub use builder::{well_known_expression, DescriptorBuilder, MAVEN_COMPONENTS};
pub use writer::{DescriptorWriter, WriteOutcome};

use serde::{Deserialize, Serialize};

pub const DEFAULT_LANGUAGE: &str = "java";
pub const DEFAULT_DEPENDENCY_TYPE: &str = "jar";

fn default_dependency_type() -> String {
    DEFAULT_DEPENDENCY_TYPE.to_string()
}

/// Runtime dependency of the plugin, passed through to the descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    #[serde(alias = "group_id")]
    pub group_id: String,
    #[serde(alias = "artifact_id")]
    pub artifact_id: String,
    pub version: String,
    #[serde(rename = "type", default = "default_dependency_type")]
    pub dependency_type: String,
}

impl Dependency {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            dependency_type: default_dependency_type(),
        }
    }
}

/// Component requirement injected into a goal field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_hint: Option<String>,
}

/// One configurable parameter or component requirement of a goal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(rename = "type")]
    pub type_name: String,
    pub required: bool,
    pub editable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// `${property}` binding, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirement: Option<Requirement>,
}

impl Parameter {
    /// Whether the parameter contributes to the `<configuration>` section
    pub fn is_configured(&self) -> bool {
        self.requirement.is_none() && (self.default_value.is_some() || self.expression.is_some())
    }
}

/// Descriptor of a single goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MojoDescriptor {
    pub goal: String,
    pub implementation: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execute_phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execute_goal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execute_lifecycle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_dependency_resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_dependency_collection: Option<String>,
    pub requires_direct_invocation: bool,
    pub requires_project: bool,
    pub requires_reports: bool,
    pub aggregator: bool,
    pub requires_online: bool,
    pub inherited_by_default: bool,
    pub thread_safe: bool,
    pub instantiation_strategy: String,
    pub execution_strategy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configurator: Option<String>,
    pub v4_api: bool,
    pub parameters: Vec<Parameter>,
}

impl MojoDescriptor {
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// The whole descriptor document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub goal_prefix: String,
    pub isolated_realm: bool,
    pub inherited_by_default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_java_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_maven_version: Option<String>,
    pub mojos: Vec<MojoDescriptor>,
    pub dependencies: Vec<Dependency>,
}

impl PluginDescriptor {
    pub fn mojo(&self, goal: &str) -> Option<&MojoDescriptor> {
        self.mojos.iter().find(|m| m.goal == goal)
    }
}
