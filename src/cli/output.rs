//! Output formatting for `mojodesc inspect`
//!
//! JSON and YAML serialize the goal descriptors as-is; the human format is a
//! compact summary meant for a terminal.

use anyhow::{Context, Result};

use crate::descriptor::{MojoDescriptor, Parameter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    Yaml,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_goals(&self, goals: &[MojoDescriptor]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(goals).context("Failed to serialize goals to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(goals).context("Failed to serialize goals to YAML")
            }
            OutputFormat::Human => Ok(self.format_human(goals)),
        }
    }

    fn format_human(&self, goals: &[MojoDescriptor]) -> String {
        let mut out = String::new();

        if goals.is_empty() {
            out.push_str("No goals found\n");
            return out;
        }

        out.push_str(&format!("Found {} goal(s)\n", goals.len()));
        for goal in goals {
            out.push('\n');
            out.push_str(&format!("{} ({})\n", goal.goal, goal.implementation));
            if let Some(phase) = &goal.phase {
                out.push_str(&format!("  Phase: {}\n", phase));
            }
            if let Some(scope) = &goal.requires_dependency_resolution {
                out.push_str(&format!("  Requires dependency resolution: {}\n", scope));
            }
            let fork: Vec<String> = [
                goal.execute_goal.as_ref().map(|g| format!("goal {}", g)),
                goal.execute_phase.as_ref().map(|p| format!("phase {}", p)),
                goal.execute_lifecycle
                    .as_ref()
                    .map(|l| format!("lifecycle {}", l)),
            ]
            .into_iter()
            .flatten()
            .collect();
            if !fork.is_empty() {
                out.push_str(&format!("  Executes: {}\n", fork.join(", ")));
            }
            if goal.thread_safe {
                out.push_str("  Thread-safe\n");
            }
            if goal.deprecated.is_some() {
                out.push_str("  Deprecated\n");
            }

            if !goal.parameters.is_empty() {
                out.push_str("  Parameters:\n");
                for parameter in &goal.parameters {
                    out.push_str(&format!("    {}\n", describe_parameter(parameter)));
                }
            }
        }

        out
    }
}

fn describe_parameter(parameter: &Parameter) -> String {
    if let Some(requirement) = &parameter.requirement {
        return match &requirement.role_hint {
            Some(hint) => format!("{} <- component {} ({})", parameter.name, requirement.role, hint),
            None => format!("{} <- component {}", parameter.name, requirement.role),
        };
    }

    let mut line = format!("{}: {}", parameter.name, parameter.type_name);
    if parameter.required {
        line.push_str(" [required]");
    }
    if !parameter.editable {
        line.push_str(" [read-only]");
    }
    if let Some(expression) = &parameter.expression {
        line.push_str(&format!(" property={}", expression));
    }
    if let Some(default_value) = &parameter.default_value {
        line.push_str(&format!(" default={}", default_value));
    }
    line
}
