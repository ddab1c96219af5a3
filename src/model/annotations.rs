//! Annotation contents decoded from class file element values
//!
//! The class file only records elements that were set explicitly, so every
//! content type starts from the defaults of its annotation definition and
//! overwrites what the bytecode provides.

use super::ids::{InstantiationStrategy, LifecyclePhase, ResolutionScope, NONE_CONSTANT};
use crate::classfile::{Annotation, ElementValue};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_EXECUTION_STRATEGY: &str = "once-per-session";

/// Raised when an annotation element holds a value of an unexpected kind
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Invalid value for {annotation}.{element}: expected {expected}")]
pub struct AnnotationError {
    pub annotation: &'static str,
    pub element: String,
    pub expected: &'static str,
}

/// Contents of `@Mojo`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MojoAnnotation {
    pub name: String,
    pub default_phase: Option<LifecyclePhase>,
    pub requires_dependency_resolution: Option<ResolutionScope>,
    pub requires_dependency_collection: Option<ResolutionScope>,
    pub instantiation_strategy: InstantiationStrategy,
    pub execution_strategy: String,
    pub requires_project: bool,
    pub requires_reports: bool,
    pub aggregator: bool,
    pub requires_direct_invocation: bool,
    pub requires_online: bool,
    pub inherit_by_default: bool,
    pub configurator: String,
    pub thread_safe: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl Default for MojoAnnotation {
    fn default() -> Self {
        Self {
            name: String::new(),
            default_phase: None,
            requires_dependency_resolution: None,
            requires_dependency_collection: None,
            instantiation_strategy: InstantiationStrategy::PerLookup,
            execution_strategy: DEFAULT_EXECUTION_STRATEGY.to_string(),
            requires_project: true,
            requires_reports: false,
            aggregator: false,
            requires_direct_invocation: false,
            requires_online: false,
            inherit_by_default: true,
            configurator: String::new(),
            thread_safe: false,
            description: None,
            since: None,
            deprecated: None,
        }
    }
}

impl MojoAnnotation {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn decode(annotation: &Annotation) -> Result<Self, AnnotationError> {
        const NAME: &str = "Mojo";
        let mut mojo = Self::default();

        for (key, value) in &annotation.elements {
            match key.as_str() {
                "name" => mojo.name = string(NAME, key, value)?,
                "defaultPhase" => mojo.default_phase = phase(NAME, key, value)?,
                "requiresDependencyResolution" => {
                    mojo.requires_dependency_resolution = scope(NAME, key, value)?
                }
                "requiresDependencyCollection" => {
                    mojo.requires_dependency_collection = scope(NAME, key, value)?
                }
                "instantiationStrategy" => {
                    let constant = enum_constant(NAME, key, value)?;
                    mojo.instantiation_strategy = InstantiationStrategy::from_constant(constant)
                        .ok_or_else(|| invalid(NAME, key, "an InstantiationStrategy constant"))?;
                }
                "executionStrategy" => mojo.execution_strategy = string(NAME, key, value)?,
                "requiresProject" | "projectRequired" => {
                    mojo.requires_project = boolean(NAME, key, value)?
                }
                "requiresReports" => mojo.requires_reports = boolean(NAME, key, value)?,
                "aggregator" => mojo.aggregator = boolean(NAME, key, value)?,
                "requiresDirectInvocation" => {
                    mojo.requires_direct_invocation = boolean(NAME, key, value)?
                }
                "requiresOnline" | "onlineRequired" => {
                    mojo.requires_online = boolean(NAME, key, value)?
                }
                "inheritByDefault" => mojo.inherit_by_default = boolean(NAME, key, value)?,
                "configurator" => mojo.configurator = string(NAME, key, value)?,
                "threadSafe" => mojo.thread_safe = boolean(NAME, key, value)?,
                other => debug!(element = other, "Ignoring unknown @Mojo element"),
            }
        }

        Ok(mojo)
    }
}

/// `phase` element of `@Execute`
///
/// An explicit `LifecyclePhase.NONE` is kept apart from an absent element:
/// it forks no phase but still conflicts with `customPhase`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutePhase {
    None,
    Phase(LifecyclePhase),
}

impl ExecutePhase {
    pub fn id(&self) -> Option<&str> {
        match self {
            ExecutePhase::None => None,
            ExecutePhase::Phase(phase) => Some(phase.id()),
        }
    }
}

/// Contents of `@Execute`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteAnnotation {
    pub goal: Option<String>,
    pub lifecycle: Option<String>,
    pub phase: Option<ExecutePhase>,
    pub custom_phase: Option<String>,
}

impl ExecuteAnnotation {
    pub fn decode(annotation: &Annotation) -> Result<Self, AnnotationError> {
        const NAME: &str = "Execute";
        let mut execute = Self::default();

        for (key, value) in &annotation.elements {
            match key.as_str() {
                "goal" => execute.goal = Some(string(NAME, key, value)?),
                "lifecycle" => execute.lifecycle = Some(string(NAME, key, value)?),
                "phase" => {
                    execute.phase = Some(
                        phase(NAME, key, value)?.map_or(ExecutePhase::None, ExecutePhase::Phase),
                    )
                }
                "customPhase" => execute.custom_phase = Some(string(NAME, key, value)?),
                other => debug!(element = other, "Ignoring unknown @Execute element"),
            }
        }

        Ok(execute)
    }

    pub fn custom_phase(&self) -> Option<&str> {
        self.custom_phase.as_deref().filter(|p| !p.is_empty())
    }
}

/// Contents of `@Parameter` together with the annotated field's type
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterAnnotation {
    pub field_name: String,
    pub name: String,
    pub alias: String,
    pub property: String,
    pub default_value: String,
    pub required: bool,
    pub readonly: bool,
    /// Declared field type (`java.util.Set`)
    pub class_name: String,
    /// Generic type arguments of the field type (`java.io.File`)
    pub type_parameters: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl ParameterAnnotation {
    pub fn new(field_name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            class_name: class_name.into(),
            ..Default::default()
        }
    }

    pub fn decode(
        annotation: &Annotation,
        field_name: &str,
        class_name: String,
        type_parameters: Vec<String>,
    ) -> Result<Self, AnnotationError> {
        const NAME: &str = "Parameter";
        let mut parameter = Self {
            type_parameters,
            ..Self::new(field_name, class_name)
        };

        for (key, value) in &annotation.elements {
            match key.as_str() {
                "name" => parameter.name = string(NAME, key, value)?,
                "alias" => parameter.alias = string(NAME, key, value)?,
                "property" => parameter.property = string(NAME, key, value)?,
                "defaultValue" => parameter.default_value = string(NAME, key, value)?,
                "required" => parameter.required = boolean(NAME, key, value)?,
                "readonly" => parameter.readonly = boolean(NAME, key, value)?,
                other => debug!(element = other, "Ignoring unknown @Parameter element"),
            }
        }

        Ok(parameter)
    }

    /// Name exposed to users: the explicit name when set, the field name otherwise
    pub fn resolved_name(&self) -> &str {
        if self.name.is_empty() {
            &self.field_name
        } else {
            &self.name
        }
    }
}

/// Contents of `@Component`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentAnnotation {
    pub field_name: String,
    /// Explicit `role` or, when absent, the field type
    pub role_class_name: String,
    pub hint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl ComponentAnnotation {
    pub fn new(field_name: impl Into<String>, role_class_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            role_class_name: role_class_name.into(),
            ..Default::default()
        }
    }

    pub fn decode(
        annotation: &Annotation,
        field_name: &str,
        field_type: String,
    ) -> Result<Self, AnnotationError> {
        const NAME: &str = "Component";
        let mut component = Self::new(field_name, field_type);

        for (key, value) in &annotation.elements {
            match key.as_str() {
                "role" => {
                    component.role_class_name = value
                        .as_class_name()
                        .ok_or_else(|| invalid(NAME, key, "a class literal"))?
                }
                "hint" => component.hint = string(NAME, key, value)?,
                other => debug!(element = other, "Ignoring unknown @Component element"),
            }
        }

        Ok(component)
    }
}

fn invalid(annotation: &'static str, element: &str, expected: &'static str) -> AnnotationError {
    AnnotationError {
        annotation,
        element: element.to_string(),
        expected,
    }
}

fn string(
    annotation: &'static str,
    key: &str,
    value: &ElementValue,
) -> Result<String, AnnotationError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(annotation, key, "a string"))
}

fn boolean(annotation: &'static str, key: &str, value: &ElementValue) -> Result<bool, AnnotationError> {
    value
        .as_bool()
        .ok_or_else(|| invalid(annotation, key, "a boolean"))
}

fn enum_constant<'v>(
    annotation: &'static str,
    key: &str,
    value: &'v ElementValue,
) -> Result<&'v str, AnnotationError> {
    value
        .as_enum_constant()
        .ok_or_else(|| invalid(annotation, key, "an enum constant"))
}

/// Phases come as enum constants from the Maven 3 annotations and as plain
/// strings from the Maven 4 ones.
fn phase(
    annotation: &'static str,
    key: &str,
    value: &ElementValue,
) -> Result<Option<LifecyclePhase>, AnnotationError> {
    match value {
        ElementValue::Enum { constant, .. } if constant == NONE_CONSTANT => Ok(None),
        ElementValue::Enum { constant, .. } => LifecyclePhase::from_constant(constant)
            .map(Some)
            .ok_or_else(|| invalid(annotation, key, "a LifecyclePhase constant")),
        ElementValue::String(id) if id.is_empty() => Ok(None),
        ElementValue::String(id) => Ok(Some(LifecyclePhase::from_id(id))),
        _ => Err(invalid(annotation, key, "a lifecycle phase")),
    }
}

fn scope(
    annotation: &'static str,
    key: &str,
    value: &ElementValue,
) -> Result<Option<ResolutionScope>, AnnotationError> {
    match value {
        ElementValue::Enum { constant, .. } if constant == NONE_CONSTANT => Ok(None),
        ElementValue::Enum { constant, .. } => ResolutionScope::from_constant(constant)
            .map(Some)
            .ok_or_else(|| invalid(annotation, key, "a ResolutionScope constant")),
        ElementValue::String(id) if id.is_empty() => Ok(None),
        ElementValue::String(id) => Ok(Some(ResolutionScope::from_id(id))),
        _ => Err(invalid(annotation, key, "a resolution scope")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation(elements: Vec<(&str, ElementValue)>) -> Annotation {
        Annotation {
            type_descriptor: "Lorg/apache/maven/plugins/annotations/Mojo;".to_string(),
            elements: elements
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    fn enum_value(constant: &str) -> ElementValue {
        ElementValue::Enum {
            type_descriptor: "Lorg/apache/maven/plugins/annotations/LifecyclePhase;".to_string(),
            constant: constant.to_string(),
        }
    }

    #[test]
    fn test_mojo_defaults_when_only_name_is_set() {
        let mojo =
            MojoAnnotation::decode(&annotation(vec![("name", ElementValue::String("compile".into()))]))
                .unwrap();

        assert_eq!(mojo.name, "compile");
        assert_eq!(mojo.default_phase, None);
        assert!(mojo.requires_project);
        assert!(mojo.inherit_by_default);
        assert!(!mojo.thread_safe);
        assert_eq!(mojo.execution_strategy, DEFAULT_EXECUTION_STRATEGY);
        assert_eq!(mojo.instantiation_strategy, InstantiationStrategy::PerLookup);
    }

    #[test]
    fn test_mojo_enum_elements() {
        let mojo = MojoAnnotation::decode(&annotation(vec![
            ("name", ElementValue::String("compile".into())),
            ("defaultPhase", enum_value("GENERATE_SOURCES")),
            ("requiresDependencyResolution", enum_value("COMPILE_PLUS_RUNTIME")),
            ("requiresDependencyCollection", enum_value("NONE")),
            ("threadSafe", ElementValue::Boolean(true)),
        ]))
        .unwrap();

        assert_eq!(mojo.default_phase, Some(LifecyclePhase::GenerateSources));
        assert_eq!(
            mojo.requires_dependency_resolution,
            Some(ResolutionScope::CompilePlusRuntime)
        );
        assert_eq!(mojo.requires_dependency_collection, None);
        assert!(mojo.thread_safe);
    }

    #[test]
    fn test_mojo_rejects_wrong_value_kind() {
        let err = MojoAnnotation::decode(&annotation(vec![("threadSafe", ElementValue::Int(1))]))
            .unwrap_err();
        assert_eq!(err.element, "threadSafe");
        assert_eq!(err.expected, "a boolean");
    }

    #[test]
    fn test_mojo_rejects_unknown_phase_constant() {
        let err = MojoAnnotation::decode(&annotation(vec![("defaultPhase", enum_value("LUNCH"))]))
            .unwrap_err();
        assert_eq!(err.element, "defaultPhase");
    }

    #[test]
    fn test_execute_explicit_none_phase_is_kept() {
        let execute =
            ExecuteAnnotation::decode(&annotation(vec![("phase", enum_value("NONE"))])).unwrap();
        assert_eq!(execute.phase, Some(ExecutePhase::None));
        assert_eq!(execute.phase.as_ref().and_then(ExecutePhase::id), None);

        let execute = ExecuteAnnotation::decode(&annotation(vec![(
            "goal",
            ElementValue::String("prepare".into()),
        )]))
        .unwrap();
        assert_eq!(execute.phase, None);
    }

    #[test]
    fn test_execute_custom_phase_blank_is_absent() {
        let execute = ExecuteAnnotation {
            custom_phase: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(execute.custom_phase(), None);
    }

    #[test]
    fn test_parameter_resolved_name() {
        let mut parameter = ParameterAnnotation::new("outputDirectory", "java.io.File");
        assert_eq!(parameter.resolved_name(), "outputDirectory");

        parameter.name = "output".to_string();
        assert_eq!(parameter.resolved_name(), "output");
    }

    #[test]
    fn test_component_role_defaults_to_field_type() {
        let component = ComponentAnnotation::decode(
            &annotation(vec![("hint", ElementValue::String("zip".into()))]),
            "archiver",
            "org.codehaus.plexus.archiver.Archiver".to_string(),
        )
        .unwrap();
        assert_eq!(component.role_class_name, "org.codehaus.plexus.archiver.Archiver");
        assert_eq!(component.hint, "zip");
    }

    #[test]
    fn test_component_explicit_role() {
        let component = ComponentAnnotation::decode(
            &annotation(vec![(
                "role",
                ElementValue::Class("Lcom/acme/Helper;".to_string()),
            )]),
            "helper",
            "java.lang.Object".to_string(),
        )
        .unwrap();
        assert_eq!(component.role_class_name, "com.acme.Helper");
    }
}
