//! mojodesc - Maven plugin descriptor generation from compiled classes
//!
//! Reads the plugin annotations (`@Mojo`, `@Parameter`, `@Component`,
//! `@Execute`) that javac records in class files and produces the
//! `META-INF/maven/plugin.xml` descriptor Maven needs to load a plugin. No
//! sources, project model or dependency resolution are involved.
//!
//! # Example Usage
//!
//! ```no_run
//! use mojodesc::{DescriptorExtractor, PluginMetadata};
//! use std::path::Path;
//!
//! let metadata = PluginMetadata::from_file(Path::new("mojodesc.toml"))?;
//! metadata.validate()?;
//!
//! let extractor = DescriptorExtractor::new(["target/classes"]);
//! extractor.generate(metadata, Path::new("target/classes/META-INF/maven/plugin.xml"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Project Structure
//!
//! - [`classfile`]: class file reading, just far enough to reach annotations
//! - [`model`]: annotation content per scanned class
//! - [`scanner`]: class directory walk producing the class index
//! - [`hierarchy`]: inherited `@Execute`, parameters and components
//! - [`descriptor`]: goal descriptors and `plugin.xml` rendering

pub mod classfile;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod extractor;
pub mod hierarchy;
pub mod model;
pub mod scanner;
pub mod util;

pub use classfile::{ClassFileError, ClassFileReader, MetadataReader};
pub use config::{ConfigError, MetadataOverrides, PluginMetadata};
pub use descriptor::{
    DescriptorBuilder, DescriptorWriter, MojoDescriptor, PluginDescriptor, WriteOutcome,
};
pub use error::{ConfigurationError, DescriptorError, ScanError};
pub use extractor::DescriptorExtractor;
pub use hierarchy::HierarchyResolver;
pub use model::{AnnotatedClass, ClassIndex};
pub use scanner::MojoScanner;
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
