//! In-memory model of annotated plugin classes
//!
//! One [`AnnotatedClass`] is produced per scanned class that carries at least
//! one plugin annotation. Instances are immutable once the scan completes.

mod annotations;
pub mod ids;
mod index;

pub use annotations::{
    AnnotationError, ComponentAnnotation, ExecuteAnnotation, ExecutePhase, MojoAnnotation,
    ParameterAnnotation, DEFAULT_EXECUTION_STRATEGY,
};
pub use ids::{InstantiationStrategy, LifecyclePhase, ResolutionScope};
pub use index::ClassIndex;

use crate::classfile::{field_type_arguments, field_type_name, RawClass};
use serde::Serialize;
use std::collections::BTreeMap;

const MAVEN3_PACKAGE: &str = "Lorg/apache/maven/plugins/annotations/";
const MAVEN4_PACKAGE: &str = "Lorg/apache/maven/api/plugin/annotations/";
const DEPRECATED: &str = "Ljava/lang/Deprecated;";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PluginAnnotation {
    Mojo,
    Execute,
    Parameter,
    Component,
}

impl PluginAnnotation {
    /// Classifies an annotation descriptor; the flag tells whether it comes
    /// from the Maven 4 API package.
    fn classify(descriptor: &str) -> Option<(Self, bool)> {
        let (simple, v4) = if let Some(rest) = descriptor.strip_prefix(MAVEN3_PACKAGE) {
            (rest, false)
        } else if let Some(rest) = descriptor.strip_prefix(MAVEN4_PACKAGE) {
            (rest, true)
        } else {
            return None;
        };

        let kind = match simple {
            "Mojo;" => Self::Mojo,
            "Execute;" => Self::Execute,
            "Parameter;" => Self::Parameter,
            "Component;" => Self::Component,
            _ => return None,
        };
        Some((kind, v4))
    }
}

/// Plugin annotation content of one compiled class
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedClass {
    pub class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mojo: Option<MojoAnnotation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execute: Option<ExecuteAnnotation>,
    pub parameters: BTreeMap<String, ParameterAnnotation>,
    pub components: BTreeMap<String, ComponentAnnotation>,
    pub v4_api: bool,
}

impl AnnotatedClass {
    pub fn new(class_name: impl Into<String>, super_class_name: Option<&str>) -> Self {
        Self {
            class_name: class_name.into(),
            super_class_name: super_class_name.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn with_mojo(mut self, mojo: MojoAnnotation) -> Self {
        self.mojo = Some(mojo);
        self
    }

    pub fn with_execute(mut self, execute: ExecuteAnnotation) -> Self {
        self.execute = Some(execute);
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterAnnotation) -> Self {
        self.parameters
            .insert(parameter.field_name.clone(), parameter);
        self
    }

    pub fn with_component(mut self, component: ComponentAnnotation) -> Self {
        self.components
            .insert(component.field_name.clone(), component);
        self
    }

    pub fn has_annotations(&self) -> bool {
        self.mojo.is_some()
            || self.execute.is_some()
            || !self.parameters.is_empty()
            || !self.components.is_empty()
    }

    /// Builds the model from raw class metadata
    ///
    /// Returns `Ok(None)` for classes without any plugin annotation.
    pub fn from_raw(raw: &RawClass) -> Result<Option<Self>, ModelError> {
        let mut class = Self::new(raw.name.clone(), raw.super_name.as_deref());
        let class_deprecated = raw.annotations.iter().any(|a| a.type_descriptor == DEPRECATED);

        for annotation in &raw.annotations {
            let Some((kind, v4)) = PluginAnnotation::classify(&annotation.type_descriptor) else {
                continue;
            };
            class.v4_api |= v4;
            match kind {
                PluginAnnotation::Mojo => {
                    let mut mojo = MojoAnnotation::decode(annotation)?;
                    if class_deprecated {
                        mojo.deprecated = Some(String::new());
                    }
                    class.mojo = Some(mojo);
                }
                PluginAnnotation::Execute => {
                    class.execute = Some(ExecuteAnnotation::decode(annotation)?);
                }
                // Field-level annotations on a type are not meaningful
                PluginAnnotation::Parameter | PluginAnnotation::Component => {}
            }
        }

        for field in &raw.fields {
            let deprecated = field
                .annotations
                .iter()
                .any(|a| a.type_descriptor == DEPRECATED)
                .then(String::new);

            for annotation in &field.annotations {
                let Some((kind, v4)) = PluginAnnotation::classify(&annotation.type_descriptor)
                else {
                    continue;
                };
                let field_type = field_type_name(&field.descriptor).map_err(|source| {
                    ModelError::FieldType {
                        field: field.name.clone(),
                        source,
                    }
                })?;

                match kind {
                    PluginAnnotation::Parameter => {
                        let type_parameters = match &field.signature {
                            Some(signature) => field_type_arguments(signature).map_err(
                                |source| ModelError::FieldType {
                                    field: field.name.clone(),
                                    source,
                                },
                            )?,
                            None => Vec::new(),
                        };
                        let mut parameter = ParameterAnnotation::decode(
                            annotation,
                            &field.name,
                            field_type,
                            type_parameters,
                        )?;
                        parameter.deprecated = deprecated.clone();
                        class.parameters.insert(field.name.clone(), parameter);
                    }
                    PluginAnnotation::Component => {
                        let mut component =
                            ComponentAnnotation::decode(annotation, &field.name, field_type)?;
                        component.deprecated = deprecated.clone();
                        class.components.insert(field.name.clone(), component);
                    }
                    PluginAnnotation::Mojo | PluginAnnotation::Execute => continue,
                }
                class.v4_api |= v4;
            }
        }

        Ok(class.has_annotations().then_some(class))
    }
}

/// Errors turning raw class metadata into the model
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ModelError {
    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error("Cannot decode type of field '{field}': {source}")]
    FieldType {
        field: String,
        #[source]
        source: crate::classfile::ClassFileError,
    },
}
