//! End-to-end extraction: scan, build, render

use crate::classfile::{ClassFileReader, MetadataReader};
use crate::config::PluginMetadata;
use crate::descriptor::{
    DescriptorBuilder, DescriptorWriter, MojoDescriptor, PluginDescriptor, WriteOutcome,
};
use crate::error::Result;
use crate::scanner::MojoScanner;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct DescriptorExtractor<R = ClassFileReader> {
    scanner: MojoScanner<R>,
    writer: DescriptorWriter,
}

impl DescriptorExtractor<ClassFileReader> {
    pub fn new<I, P>(class_dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::with_scanner(MojoScanner::new(class_dirs))
    }
}

impl<R: MetadataReader> DescriptorExtractor<R> {
    pub fn with_scanner(scanner: MojoScanner<R>) -> Self {
        Self {
            scanner,
            writer: DescriptorWriter::new(),
        }
    }

    pub fn with_writer(mut self, writer: DescriptorWriter) -> Self {
        self.writer = writer;
        self
    }

    /// Goal descriptors of every `@Mojo` class under the class directories,
    /// ordered by goal name
    pub fn goals(&self) -> Result<Vec<MojoDescriptor>> {
        let classes = self.scanner.scan()?;
        let mojos = DescriptorBuilder::new(&classes).build()?;
        Ok(mojos)
    }

    pub fn extract(&self, metadata: PluginMetadata) -> Result<PluginDescriptor> {
        let mojos = self.goals()?;
        Ok(metadata.into_descriptor(mojos))
    }

    /// Extracts the descriptor and writes it to `output`
    pub fn generate(&self, metadata: PluginMetadata, output: &Path) -> Result<WriteOutcome> {
        let plugin = self.extract(metadata)?;
        info!(
            plugin = %format!("{}:{}:{}", plugin.group_id, plugin.artifact_id, plugin.version),
            goals = plugin.mojos.len(),
            "Extracted plugin descriptor"
        );
        self.writer.write(&plugin, output)
    }
}
