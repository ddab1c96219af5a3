//! Annotated class scanner
//!
//! Walks one or more directories of compiled classes and builds the
//! [`ClassIndex`] the rest of the pipeline works from. Files are visited in
//! file-name order; the index itself is keyed by class name, so the result
//! does not depend on directory listing order.

use crate::classfile::{ClassFileReader, MetadataReader, RawClass};
use crate::error::ScanError;
use crate::model::{AnnotatedClass, ClassIndex};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

const CLASS_EXTENSION: &str = "class";

pub struct MojoScanner<R = ClassFileReader> {
    roots: Vec<PathBuf>,
    reader: R,
}

impl MojoScanner<ClassFileReader> {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::with_reader(roots, ClassFileReader::new())
    }
}

impl<R: MetadataReader> MojoScanner<R> {
    pub fn with_reader<I, P>(roots: I, reader: R) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            reader,
        }
    }

    /// Scans every root and returns the annotated classes
    ///
    /// The first unreadable directory or malformed class aborts the scan;
    /// a partially populated index would make hierarchy resolution silently
    /// wrong.
    pub fn scan(&self) -> Result<ClassIndex, ScanError> {
        let start = Instant::now();
        let mut classes = ClassIndex::new();
        let mut files_scanned = 0usize;

        for root in &self.roots {
            files_scanned += self.scan_root(root, &mut classes)?;
        }

        info!(
            roots = self.roots.len(),
            files_scanned,
            annotated_classes = classes.len(),
            scan_time_ms = start.elapsed().as_millis() as u64,
            "Class scan completed"
        );

        Ok(classes)
    }

    fn scan_root(&self, root: &Path, classes: &mut ClassIndex) -> Result<usize, ScanError> {
        if !root.exists() {
            return Err(ScanError::PathNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        debug!(root = %root.display(), "Scanning classes directory");

        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut files_scanned = 0;
        for result in walker {
            let entry = result.map_err(|source| ScanError::Walk {
                path: root.to_path_buf(),
                source,
            })?;
            let path = entry.path();

            if !entry.file_type().is_some_and(|t| t.is_file()) || !is_class_file(path) {
                continue;
            }
            files_scanned += 1;

            let (raw, annotated) = self.read_class(path)?;
            let replaced = match annotated {
                Some(class) => {
                    debug!(
                        class = %class.class_name,
                        mojo = class.mojo.as_ref().map(|m| m.name.as_str()),
                        parameters = class.parameters.len(),
                        components = class.components.len(),
                        "Found annotated class"
                    );
                    classes.insert(class)
                }
                None => classes.insert_link(raw.name, raw.super_name.as_deref()),
            };
            if let Some(previous) = replaced {
                warn!(
                    class = %previous.class_name,
                    path = %path.display(),
                    "Class found in more than one classes directory, keeping the last one"
                );
            }
        }

        Ok(files_scanned)
    }

    fn read_class(&self, path: &Path) -> Result<(RawClass, Option<AnnotatedClass>), ScanError> {
        let bytes = fs::read(path).map_err(|source| ScanError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let raw = self
            .reader
            .read_class(&bytes)
            .map_err(|source| ScanError::MalformedClass {
                path: path.to_path_buf(),
                source,
            })?;

        let annotated =
            AnnotatedClass::from_raw(&raw).map_err(|source| ScanError::InvalidAnnotation {
                path: path.to_path_buf(),
                source,
            })?;
        Ok((raw, annotated))
    }
}

fn is_class_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(CLASS_EXTENSION)
}
