//! Error types for the extraction pipeline
//!
//! Every variant aborts the run: a descriptor covering only part of the
//! plugin's goals is never written.

use crate::classfile::ClassFileError;
use crate::model::ModelError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading the class directories
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Classes directory does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Classes path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to walk classes directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("Failed to read class file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed class file {path}: {source}")]
    MalformedClass {
        path: PathBuf,
        #[source]
        source: ClassFileError,
    },

    #[error("Invalid plugin annotation in {path}: {source}")]
    InvalidAnnotation {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

/// Structurally invalid annotation content found while building descriptors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error(
        "@Execute annotation must only use either 'phase' or 'customPhase' but not both. \
         Both are used though on {class_name}"
    )]
    ConflictingExecutePhase { class_name: String },

    #[error("Invalid property for parameter '{parameter}', forbidden characters ${{}}: {property}")]
    InvalidProperty { parameter: String, property: String },

    #[error("Goal '{goal}' is declared by both {first} and {second}")]
    DuplicateGoal {
        goal: String,
        first: String,
        second: String,
    },

    #[error("Parameter '{parameter}' is declared more than once in goal '{goal}' ({class_name})")]
    DuplicateParameter {
        goal: String,
        parameter: String,
        class_name: String,
    },
}

/// Top-level error of a descriptor extraction run
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Failed to write descriptor {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Rendered descriptor is not well-formed XML: {0}")]
    MalformedOutput(String),
}

pub type Result<T, E = DescriptorError> = std::result::Result<T, E>;
