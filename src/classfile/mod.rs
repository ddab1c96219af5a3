//! Binary metadata reader for compiled JVM classes
//!
//! The scanner only needs a narrow view of a class file: its name, its
//! superclass, and the annotations attached to the class and its fields.
//! [`MetadataReader`] is that boundary; [`ClassFileReader`] implements it by
//! decoding the class file format directly and skipping everything else
//! (methods, code, stack maps, ...).

mod descriptor;
mod reader;

pub use descriptor::{field_type_arguments, field_type_name, internal_to_dotted};
pub use reader::ClassFileReader;

use thiserror::Error;

/// Errors raised while decoding a class file
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClassFileError {
    #[error("Not a class file (bad magic 0x{0:08X})")]
    BadMagic(u32),

    #[error("Unexpected end of class file while reading {0}")]
    Truncated(&'static str),

    #[error("Unknown constant pool tag {tag} at index {index}")]
    UnknownConstantTag { tag: u8, index: u16 },

    #[error("Invalid constant pool reference {index}: expected {expected}")]
    BadConstantReference { index: u16, expected: &'static str },

    #[error("Unknown annotation element tag '{0}'")]
    UnknownElementTag(char),

    #[error("Invalid type descriptor: {0}")]
    BadDescriptor(String),

    #[error("Invalid generic signature: {0}")]
    BadSignature(String),
}

/// A single annotation element value, as stored in the class file
#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    /// `byte`, `short` and `int` constants
    Int(i32),
    Char(char),
    Boolean(bool),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// Enum constant: the enum type descriptor and the constant name
    Enum {
        type_descriptor: String,
        constant: String,
    },
    /// Class literal, kept as its descriptor (`Ljava/lang/String;`)
    Class(String),
    Annotation(Annotation),
    Array(Vec<ElementValue>),
}

impl ElementValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ElementValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ElementValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Enum constant name, ignoring the enum type
    pub fn as_enum_constant(&self) -> Option<&str> {
        match self {
            ElementValue::Enum { constant, .. } => Some(constant),
            _ => None,
        }
    }

    /// Class literal converted to a Java type name
    pub fn as_class_name(&self) -> Option<String> {
        match self {
            ElementValue::Class(descriptor) => field_type_name(descriptor).ok(),
            _ => None,
        }
    }
}

/// An annotation occurrence on a class or field
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Type descriptor, e.g. `Lorg/apache/maven/plugins/annotations/Mojo;`
    pub type_descriptor: String,
    /// Explicitly set elements, in class file order. Defaults declared on the
    /// annotation type are not stored in the class file.
    pub elements: Vec<(String, ElementValue)>,
}

/// A field together with its annotations
#[derive(Debug, Clone, PartialEq)]
pub struct RawField {
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    pub annotations: Vec<Annotation>,
}

/// Everything the scanner reads out of one class file
#[derive(Debug, Clone, PartialEq)]
pub struct RawClass {
    /// Dotted class name (`com.acme.CompileMojo`)
    pub name: String,
    /// Dotted superclass name, absent only for `java.lang.Object` and modules
    pub super_name: Option<String>,
    /// Visible and invisible class annotations
    pub annotations: Vec<Annotation>,
    pub fields: Vec<RawField>,
}

/// Source of per-class annotation metadata
pub trait MetadataReader: Send + Sync {
    fn read_class(&self, bytes: &[u8]) -> Result<RawClass, ClassFileError>;
}
