//! Goal descriptor construction from scanned classes

use super::{MojoDescriptor, Parameter, Requirement, DEFAULT_LANGUAGE};
use crate::error::ConfigurationError;
use crate::hierarchy::HierarchyResolver;
use crate::model::{
    AnnotatedClass, ClassIndex, ComponentAnnotation, MojoAnnotation, ParameterAnnotation,
};
use tracing::{debug, warn};

/// Host objects that used to be injected with `@Component` but are really
/// build state, mapped to the expression that yields them.
pub const MAVEN_COMPONENTS: &[(&str, &str)] = &[
    ("org.apache.maven.execution.MavenSession", "${session}"),
    ("org.apache.maven.project.MavenProject", "${project}"),
    ("org.apache.maven.plugin.MojoExecution", "${mojoExecution}"),
    ("org.apache.maven.plugin.descriptor.PluginDescriptor", "${plugin}"),
    ("org.apache.maven.settings.Settings", "${settings}"),
    ("org.apache.maven.api.Session", "${session}"),
    ("org.apache.maven.api.Project", "${project}"),
    ("org.apache.maven.api.MojoExecution", "${mojoExecution}"),
    ("org.apache.maven.api.plugin.descriptor.PluginDescriptor", "${plugin}"),
    ("org.apache.maven.api.settings.Settings", "${settings}"),
];

const FORBIDDEN_PROPERTY_CHARS: [char; 3] = ['$', '{', '}'];

/// Expression for a well-known host-injected role, if `role` is one
pub fn well_known_expression(role: &str) -> Option<&'static str> {
    MAVEN_COMPONENTS
        .iter()
        .find(|(known, _)| *known == role)
        .map(|(_, expression)| *expression)
}

/// Turns the scanned class index into goal descriptors
pub struct DescriptorBuilder<'a> {
    classes: &'a ClassIndex,
    resolver: HierarchyResolver<'a>,
}

impl<'a> DescriptorBuilder<'a> {
    pub fn new(classes: &'a ClassIndex) -> Self {
        Self {
            classes,
            resolver: HierarchyResolver::new(classes),
        }
    }

    /// Builds one descriptor per class declaring `@Mojo`, ordered by goal
    /// name. Fails on the first invalid declaration.
    pub fn build(&self) -> Result<Vec<MojoDescriptor>, ConfigurationError> {
        let mut mojos = Vec::new();
        for class in self.classes.values() {
            if let Some(mojo) = &class.mojo {
                mojos.push(self.build_mojo(class, mojo)?);
            }
        }

        mojos.sort_by(|a, b| a.goal.cmp(&b.goal));
        if let Some(pair) = mojos.windows(2).find(|pair| pair[0].goal == pair[1].goal) {
            return Err(ConfigurationError::DuplicateGoal {
                goal: pair[0].goal.clone(),
                first: pair[0].implementation.clone(),
                second: pair[1].implementation.clone(),
            });
        }

        debug!(goals = mojos.len(), "Built goal descriptors");
        Ok(mojos)
    }

    fn build_mojo(
        &self,
        class: &AnnotatedClass,
        mojo: &MojoAnnotation,
    ) -> Result<MojoDescriptor, ConfigurationError> {
        if mojo.deprecated.is_some() {
            debug!(goal = %mojo.name, class = %class.class_name, "Goal is deprecated");
        }

        let mut descriptor = MojoDescriptor {
            goal: mojo.name.clone(),
            implementation: class.class_name.clone(),
            language: DEFAULT_LANGUAGE.to_string(),
            description: mojo.description.clone(),
            since: mojo.since.clone(),
            deprecated: mojo.deprecated.clone(),
            phase: mojo.default_phase.as_ref().map(|p| p.id().to_string()),
            execute_phase: None,
            execute_goal: None,
            execute_lifecycle: None,
            requires_dependency_resolution: mojo
                .requires_dependency_resolution
                .as_ref()
                .map(|s| s.id().to_string()),
            requires_dependency_collection: mojo
                .requires_dependency_collection
                .as_ref()
                .map(|s| s.id().to_string()),
            requires_direct_invocation: mojo.requires_direct_invocation,
            requires_project: mojo.requires_project,
            requires_reports: mojo.requires_reports,
            aggregator: mojo.aggregator,
            requires_online: mojo.requires_online,
            inherited_by_default: mojo.inherit_by_default,
            thread_safe: mojo.thread_safe,
            instantiation_strategy: mojo.instantiation_strategy.id().to_string(),
            execution_strategy: mojo.execution_strategy.clone(),
            configurator: non_empty(&mojo.configurator),
            v4_api: class.v4_api,
            parameters: Vec::new(),
        };

        if let Some((owner, execute)) = self.resolver.find_execute(&class.class_name) {
            descriptor.execute_goal = execute.goal.clone();
            descriptor.execute_lifecycle = execute.lifecycle.clone();
            descriptor.execute_phase = match (&execute.phase, execute.custom_phase()) {
                (Some(_), Some(_)) => {
                    return Err(ConfigurationError::ConflictingExecutePhase {
                        class_name: owner.class_name.clone(),
                    })
                }
                (Some(phase), None) => phase.id().map(str::to_string),
                (None, Some(custom)) => Some(custom.to_string()),
                (None, None) => None,
            };
        }

        for parameter in self.resolver.parameters(&class.class_name).into_values() {
            descriptor.parameters.push(parameter_entry(parameter)?);
        }
        for component in self.resolver.components(&class.class_name).into_values() {
            descriptor
                .parameters
                .push(component_entry(component, &class.class_name));
        }

        descriptor.parameters.sort_by(|a, b| a.name.cmp(&b.name));
        if let Some(pair) = descriptor
            .parameters
            .windows(2)
            .find(|pair| pair[0].name == pair[1].name)
        {
            return Err(ConfigurationError::DuplicateParameter {
                goal: descriptor.goal.clone(),
                parameter: pair[0].name.clone(),
                class_name: class.class_name.clone(),
            });
        }

        Ok(descriptor)
    }
}

fn parameter_entry(content: &ParameterAnnotation) -> Result<Parameter, ConfigurationError> {
    let name = content.resolved_name().to_string();

    if content.property.contains(FORBIDDEN_PROPERTY_CHARS) {
        return Err(ConfigurationError::InvalidProperty {
            parameter: name,
            property: content.property.clone(),
        });
    }
    if content.deprecated.is_some() {
        debug!(parameter = %name, "Parameter is deprecated");
    }

    Ok(Parameter {
        alias: non_empty(&content.alias),
        type_name: type_descriptor(&content.class_name, &content.type_parameters),
        required: content.required,
        editable: !content.readonly,
        description: content.description.clone(),
        default_value: non_empty(&content.default_value),
        expression: non_empty(&content.property).map(|p| format!("${{{}}}", p)),
        since: content.since.clone(),
        deprecated: content.deprecated.clone(),
        requirement: None,
        name,
    })
}

fn component_entry(content: &ComponentAnnotation, class_name: &str) -> Parameter {
    let mut parameter = Parameter {
        name: content.field_name.clone(),
        editable: false,
        since: content.since.clone(),
        deprecated: content.deprecated.clone(),
        ..Default::default()
    };

    match well_known_expression(&content.role_class_name) {
        Some(expression) => {
            warn!(
                "Deprecated @Component annotation for '{}' field in {}: replace with \
                 @Parameter( defaultValue = \"{}\", readonly = true )",
                parameter.name, class_name, expression
            );
            parameter.default_value = Some(expression.to_string());
            parameter.type_name = content.role_class_name.clone();
            parameter.required = true;
        }
        None => {
            parameter.requirement = Some(Requirement {
                role: content.role_class_name.clone(),
                role_hint: non_empty(&content.hint),
            });
        }
    }

    parameter
}

/// Base type with its generic arguments, e.g. `java.util.Map<java.lang.String, java.io.File>`
fn type_descriptor(base: &str, arguments: &[String]) -> String {
    if arguments.is_empty() {
        base.to_string()
    } else {
        format!("{}<{}>", base, arguments.join(", "))
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
