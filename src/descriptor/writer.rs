//! `plugin.xml` rendering and atomic publication

use super::xml::XmlWriter;
use super::{Dependency, MojoDescriptor, Parameter, PluginDescriptor};
use crate::error::{DescriptorError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Result of [`DescriptorWriter::write`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The destination already held the same bytes and was left untouched
    Unchanged,
}

pub struct DescriptorWriter {
    comment: Option<String>,
}

impl Default for DescriptorWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorWriter {
    pub fn new() -> Self {
        Self {
            comment: Some(format!("Generated by {} {}", crate::NAME, crate::VERSION)),
        }
    }

    /// Writer that emits no generator comment
    pub fn without_comment() -> Self {
        Self { comment: None }
    }

    /// Renders the document and checks that it parses back
    pub fn render(&self, plugin: &PluginDescriptor) -> Result<String> {
        let mut xml = XmlWriter::new(self.comment.as_deref());
        write_plugin(&mut xml, plugin);
        let document = xml.finish();

        roxmltree::Document::parse(&document)
            .map_err(|e| DescriptorError::MalformedOutput(e.to_string()))?;

        Ok(document)
    }

    /// Renders `plugin` and publishes it at `path`
    ///
    /// The file is replaced by rename from a temporary file in the same
    /// directory, so readers see either the old or the new document.
    pub fn write(&self, plugin: &PluginDescriptor, path: &Path) -> Result<WriteOutcome> {
        let document = self.render(plugin)?;

        if fs::read(path).is_ok_and(|existing| existing == document.as_bytes()) {
            debug!(path = %path.display(), "Descriptor content unchanged, not rewriting");
            return Ok(WriteOutcome::Unchanged);
        }

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let io_error = |source| DescriptorError::Io {
            path: path.to_path_buf(),
            source,
        };

        fs::create_dir_all(&parent).map_err(io_error)?;
        let mut temp = NamedTempFile::new_in(&parent).map_err(io_error)?;
        temp.write_all(document.as_bytes()).map_err(io_error)?;
        temp.flush().map_err(io_error)?;
        temp.as_file().sync_all().map_err(io_error)?;
        temp.persist(path).map_err(|e| io_error(e.error))?;

        info!(
            path = %path.display(),
            goals = plugin.mojos.len(),
            bytes = document.len(),
            "Plugin descriptor written"
        );
        Ok(WriteOutcome::Written)
    }
}

fn write_plugin(xml: &mut XmlWriter, plugin: &PluginDescriptor) {
    xml.start_element("plugin");

    xml.element("name", &plugin.name);
    xml.element("description", plugin.description.as_deref().unwrap_or_default());
    xml.element("groupId", &plugin.group_id);
    xml.element("artifactId", &plugin.artifact_id);
    xml.element("version", &plugin.version);
    xml.element("goalPrefix", &plugin.goal_prefix);
    xml.element("isolatedRealm", bool_text(plugin.isolated_realm));
    xml.element("inheritedByDefault", bool_text(plugin.inherited_by_default));
    if let Some(version) = non_blank(&plugin.required_java_version) {
        xml.element("requiredJavaVersion", version);
    }
    if let Some(version) = non_blank(&plugin.required_maven_version) {
        xml.element("requiredMavenVersion", version);
    }

    xml.start_element("mojos");
    for mojo in &plugin.mojos {
        write_mojo(xml, mojo);
    }
    xml.end_element();

    xml.start_element("dependencies");
    for dependency in &plugin.dependencies {
        write_dependency(xml, dependency);
    }
    xml.end_element();

    xml.end_element();
}

fn write_mojo(xml: &mut XmlWriter, mojo: &MojoDescriptor) {
    xml.start_element("mojo");

    xml.element("goal", &mojo.goal);
    if let Some(description) = &mojo.description {
        xml.element("description", description);
    }
    if let Some(deprecated) = mojo.deprecated.as_deref().filter(|d| !d.is_empty()) {
        xml.element("deprecated", deprecated);
    }
    if let Some(scope) = &mojo.requires_dependency_resolution {
        xml.element("requiresDependencyResolution", scope);
    }
    if let Some(scope) = &mojo.requires_dependency_collection {
        xml.element("requiresDependencyCollection", scope);
    }
    xml.element("requiresDirectInvocation", bool_text(mojo.requires_direct_invocation));
    xml.element("requiresProject", bool_text(mojo.requires_project));
    xml.element("requiresReports", bool_text(mojo.requires_reports));
    xml.element("aggregator", bool_text(mojo.aggregator));
    xml.element("requiresOnline", bool_text(mojo.requires_online));
    xml.element("inheritedByDefault", bool_text(mojo.inherited_by_default));
    if let Some(phase) = &mojo.phase {
        xml.element("phase", phase);
    }
    if let Some(phase) = &mojo.execute_phase {
        xml.element("executePhase", phase);
    }
    if let Some(goal) = &mojo.execute_goal {
        xml.element("executeGoal", goal);
    }
    if let Some(lifecycle) = &mojo.execute_lifecycle {
        xml.element("executeLifecycle", lifecycle);
    }
    xml.element("implementation", &mojo.implementation);
    xml.element("language", &mojo.language);
    if let Some(configurator) = mojo.configurator.as_deref().filter(|c| !c.is_empty()) {
        xml.element("configurator", configurator);
    }
    xml.element("instantiationStrategy", &mojo.instantiation_strategy);
    xml.element("executionStrategy", &mojo.execution_strategy);
    if let Some(since) = &mojo.since {
        xml.element("since", since);
    }
    xml.element("threadSafe", bool_text(mojo.thread_safe));
    if mojo.v4_api {
        xml.element("v4Api", "true");
    }

    xml.start_element("parameters");
    for parameter in mojo.parameters.iter().filter(|p| p.requirement.is_none()) {
        if mojo.v4_api && !parameter.editable {
            continue;
        }
        write_parameter(xml, parameter);
    }
    xml.end_element();

    let configured: Vec<&Parameter> = mojo.parameters.iter().filter(|p| p.is_configured()).collect();
    if !configured.is_empty() {
        xml.start_element("configuration");
        for parameter in configured {
            xml.start_element(&parameter.name);
            xml.add_attribute("implementation", &parameter.type_name);
            if let Some(default_value) = &parameter.default_value {
                xml.add_attribute("default-value", default_value);
            }
            xml.write_text(parameter.expression.as_deref().unwrap_or_default());
            xml.end_element();
        }
        xml.end_element();
    }

    let requirements: Vec<_> = mojo
        .parameters
        .iter()
        .filter_map(|p| p.requirement.as_ref().map(|r| (p, r)))
        .collect();
    if !requirements.is_empty() {
        xml.start_element("requirements");
        for (parameter, requirement) in requirements {
            xml.start_element("requirement");
            xml.element("role", &requirement.role);
            if let Some(hint) = &requirement.role_hint {
                xml.element("role-hint", hint);
            }
            xml.element("field-name", &parameter.name);
            xml.end_element();
        }
        xml.end_element();
    }

    xml.end_element();
}

fn write_parameter(xml: &mut XmlWriter, parameter: &Parameter) {
    xml.start_element("parameter");
    xml.element("name", &parameter.name);
    if let Some(alias) = &parameter.alias {
        xml.element("alias", alias);
    }
    xml.element("type", &parameter.type_name);
    if let Some(deprecated) = parameter.deprecated.as_deref().filter(|d| !d.is_empty()) {
        xml.element("deprecated", deprecated);
    }
    if let Some(since) = &parameter.since {
        xml.element("since", since);
    }
    xml.element("required", bool_text(parameter.required));
    xml.element("editable", bool_text(parameter.editable));
    xml.element("description", parameter.description.as_deref().unwrap_or_default());
    xml.end_element();
}

fn write_dependency(xml: &mut XmlWriter, dependency: &Dependency) {
    xml.start_element("dependency");
    xml.element("groupId", &dependency.group_id);
    xml.element("artifactId", &dependency.artifact_id);
    xml.element("type", &dependency.dependency_type);
    xml.element("version", &dependency.version);
    xml.end_element();
}

fn bool_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
