use super::AnnotatedClass;
use std::collections::btree_map::{Keys, Values};
use std::collections::BTreeMap;

/// Scanned classes keyed by dotted class name
///
/// Holds the annotated classes plus the superclass link of every scanned
/// class without plugin annotations, so hierarchy walks can pass through an
/// unannotated intermediate class to the annotated ancestors above it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassIndex {
    classes: BTreeMap<String, AnnotatedClass>,
    super_links: BTreeMap<String, String>,
}

impl ClassIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an annotated class, returning the entry it replaces
    pub fn insert(&mut self, class: AnnotatedClass) -> Option<AnnotatedClass> {
        self.super_links.remove(&class.class_name);
        self.classes.insert(class.class_name.clone(), class)
    }

    /// Records the superclass of a class without plugin annotations
    ///
    /// A later unannotated class with the same name replaces an annotated
    /// one, which is returned.
    pub fn insert_link(
        &mut self,
        class_name: impl Into<String>,
        super_class_name: Option<&str>,
    ) -> Option<AnnotatedClass> {
        let class_name = class_name.into();
        let previous = self.classes.remove(&class_name);
        match super_class_name {
            Some(parent) => {
                self.super_links.insert(class_name, parent.to_string());
            }
            None => {
                self.super_links.remove(&class_name);
            }
        }
        previous
    }

    pub fn get(&self, class_name: &str) -> Option<&AnnotatedClass> {
        self.classes.get(class_name)
    }

    pub fn contains_key(&self, class_name: &str) -> bool {
        self.classes.contains_key(class_name)
    }

    /// Superclass of any scanned class, annotated or not
    pub fn super_class_of(&self, class_name: &str) -> Option<&str> {
        match self.classes.get(class_name) {
            Some(class) => class.super_class_name.as_deref(),
            None => self.super_links.get(class_name).map(String::as_str),
        }
    }

    pub fn keys(&self) -> Keys<'_, String, AnnotatedClass> {
        self.classes.keys()
    }

    pub fn values(&self) -> Values<'_, String, AnnotatedClass> {
        self.classes.values()
    }

    /// Number of annotated classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl FromIterator<(String, AnnotatedClass)> for ClassIndex {
    fn from_iter<T: IntoIterator<Item = (String, AnnotatedClass)>>(iter: T) -> Self {
        Self {
            classes: iter.into_iter().collect(),
            super_links: BTreeMap::new(),
        }
    }
}
