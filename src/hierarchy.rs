//! Superclass chain resolution over a scanned [`ClassIndex`]
//!
//! Plugin classes often inherit parameters and `@Execute` from abstract base
//! mojos. The walk goes self → superclass → ... through annotated and
//! unannotated scanned classes alike, and stops at the first class that was
//! not scanned (a library class) or at a class already visited.

use crate::model::{
    AnnotatedClass, ClassIndex, ComponentAnnotation, ExecuteAnnotation, ParameterAnnotation,
};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

pub struct HierarchyResolver<'a> {
    classes: &'a ClassIndex,
}

impl<'a> HierarchyResolver<'a> {
    pub fn new(classes: &'a ClassIndex) -> Self {
        Self { classes }
    }

    /// Annotated classes from `class_name` up to the furthest scanned
    /// ancestor, most derived first. Scanned classes without plugin
    /// annotations are walked through but not returned. Empty when
    /// `class_name` itself was not scanned.
    pub fn ancestry(&self, class_name: &str) -> Vec<&'a AnnotatedClass> {
        let classes = self.classes;
        let mut chain = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = Some(class_name);

        while let Some(name) = current {
            if !visited.insert(name) {
                debug!(
                    class = class_name,
                    cycle_at = name,
                    "Superclass cycle detected, stopping hierarchy walk"
                );
                break;
            }
            if let Some(class) = classes.get(name) {
                chain.push(class);
            }
            current = classes.super_class_of(name);
        }

        chain
    }

    /// Nearest class in the chain (self included) declaring `@Execute`
    pub fn find_execute(
        &self,
        class_name: &str,
    ) -> Option<(&'a AnnotatedClass, &'a ExecuteAnnotation)> {
        self.ancestry(class_name)
            .into_iter()
            .find_map(|class| class.execute.as_ref().map(|execute| (class, execute)))
    }

    /// Parameters of the whole chain keyed by field name; the most derived
    /// declaration of a field wins.
    pub fn parameters(&self, class_name: &str) -> BTreeMap<&'a str, &'a ParameterAnnotation> {
        let mut parameters = BTreeMap::new();
        for class in self.ancestry(class_name) {
            for (field, parameter) in &class.parameters {
                parameters.entry(field.as_str()).or_insert(parameter);
            }
        }
        parameters
    }

    /// Components of the whole chain keyed by field name; the most derived
    /// declaration of a field wins.
    pub fn components(&self, class_name: &str) -> BTreeMap<&'a str, &'a ComponentAnnotation> {
        let mut components = BTreeMap::new();
        for class in self.ancestry(class_name) {
            for (field, component) in &class.components {
                components.entry(field.as_str()).or_insert(component);
            }
        }
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(classes: Vec<AnnotatedClass>) -> ClassIndex {
        classes
            .into_iter()
            .map(|c| (c.class_name.clone(), c))
            .collect()
    }

    fn param(field: &str, default_value: &str) -> ParameterAnnotation {
        ParameterAnnotation {
            default_value: default_value.to_string(),
            ..ParameterAnnotation::new(field, "java.lang.String")
        }
    }

    #[test]
    fn test_ancestry_stops_at_unscanned_parent() {
        let classes = index(vec![
            AnnotatedClass::new("a.Child", Some("a.Base")),
            AnnotatedClass::new("a.Base", Some("org.apache.maven.plugin.AbstractMojo")),
        ]);
        let resolver = HierarchyResolver::new(&classes);

        let names: Vec<_> = resolver
            .ancestry("a.Child")
            .iter()
            .map(|c| c.class_name.as_str())
            .collect();
        assert_eq!(names, vec!["a.Child", "a.Base"]);
        assert!(resolver.ancestry("a.Unknown").is_empty());
    }

    #[test]
    fn test_ancestry_walks_through_unannotated_class() {
        let mut classes = index(vec![
            AnnotatedClass::new("a.LeafMojo", Some("a.Middle")),
            AnnotatedClass::new("a.Base", Some("org.apache.maven.plugin.AbstractMojo"))
                .with_parameter(param("foo", "base"))
                .with_execute(ExecuteAnnotation {
                    goal: Some("prepare".to_string()),
                    ..Default::default()
                }),
        ]);
        classes.insert_link("a.Middle", Some("a.Base"));
        let resolver = HierarchyResolver::new(&classes);

        let names: Vec<_> = resolver
            .ancestry("a.LeafMojo")
            .iter()
            .map(|c| c.class_name.as_str())
            .collect();
        assert_eq!(names, vec!["a.LeafMojo", "a.Base"]);
        assert!(resolver.parameters("a.LeafMojo").contains_key("foo"));
        assert_eq!(resolver.find_execute("a.LeafMojo").unwrap().0.class_name, "a.Base");
    }

    #[test]
    fn test_cycle_through_unannotated_class_terminates() {
        let mut classes = index(vec![AnnotatedClass::new("a.LoopMojo", Some("a.Middle"))]);
        classes.insert_link("a.Middle", Some("a.LoopMojo"));
        let resolver = HierarchyResolver::new(&classes);
        assert_eq!(resolver.ancestry("a.LoopMojo").len(), 1);
    }

    #[test]
    fn test_ancestry_terminates_on_self_cycle() {
        let classes = index(vec![AnnotatedClass::new("a.Loop", Some("a.Loop"))]);
        let resolver = HierarchyResolver::new(&classes);
        assert_eq!(resolver.ancestry("a.Loop").len(), 1);
    }

    #[test]
    fn test_mutual_cycle_best_effort() {
        let classes = index(vec![
            AnnotatedClass::new("a.A", Some("a.B")).with_parameter(param("x", "from-a")),
            AnnotatedClass::new("a.B", Some("a.A"))
                .with_parameter(param("x", "from-b"))
                .with_parameter(param("y", "from-b"))
                .with_execute(ExecuteAnnotation {
                    goal: Some("prepare".to_string()),
                    ..Default::default()
                }),
        ]);
        let resolver = HierarchyResolver::new(&classes);

        let parameters = resolver.parameters("a.A");
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters["x"].default_value, "from-a");
        assert_eq!(parameters["y"].default_value, "from-b");

        let (owner, execute) = resolver.find_execute("a.A").unwrap();
        assert_eq!(owner.class_name, "a.B");
        assert_eq!(execute.goal.as_deref(), Some("prepare"));
    }

    #[test]
    fn test_derived_parameter_shadows_ancestor() {
        let classes = index(vec![
            AnnotatedClass::new("a.Child", Some("a.Middle")).with_parameter(param("alpha", "child")),
            AnnotatedClass::new("a.Middle", Some("a.Root")).with_parameter(param("beta", "middle")),
            AnnotatedClass::new("a.Root", None)
                .with_parameter(param("alpha", "root"))
                .with_parameter(param("gamma", "root")),
        ]);
        let resolver = HierarchyResolver::new(&classes);

        let parameters = resolver.parameters("a.Child");
        assert_eq!(
            parameters.keys().copied().collect::<Vec<_>>(),
            vec!["alpha", "beta", "gamma"]
        );
        assert_eq!(parameters["alpha"].default_value, "child");
    }

    #[test]
    fn test_find_execute_prefers_nearest() {
        let near = ExecuteAnnotation {
            phase: Some(crate::model::ExecutePhase::Phase(
                crate::model::LifecyclePhase::Compile,
            )),
            ..Default::default()
        };
        let far = ExecuteAnnotation {
            goal: Some("far".to_string()),
            ..Default::default()
        };
        let classes = index(vec![
            AnnotatedClass::new("a.Child", Some("a.Middle")),
            AnnotatedClass::new("a.Middle", Some("a.Root")).with_execute(near.clone()),
            AnnotatedClass::new("a.Root", None).with_execute(far),
        ]);
        let resolver = HierarchyResolver::new(&classes);

        let (owner, execute) = resolver.find_execute("a.Child").unwrap();
        assert_eq!(owner.class_name, "a.Middle");
        assert_eq!(execute, &near);
    }

    #[test]
    fn test_components_shadowing() {
        let classes = index(vec![
            AnnotatedClass::new("a.Child", Some("a.Base")).with_component(ComponentAnnotation {
                hint: "child".to_string(),
                ..ComponentAnnotation::new("archiver", "x.Archiver")
            }),
            AnnotatedClass::new("a.Base", None)
                .with_component(ComponentAnnotation::new("archiver", "x.Archiver"))
                .with_component(ComponentAnnotation::new("session", "x.Session")),
        ]);
        let resolver = HierarchyResolver::new(&classes);

        let components = resolver.components("a.Child");
        assert_eq!(components.len(), 2);
        assert_eq!(components["archiver"].hint, "child");
    }
}
