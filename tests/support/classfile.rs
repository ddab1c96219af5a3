//! Assembles minimal class files carrying plugin annotations
//!
//! Only what the reader looks at is emitted: constant pool, class and super
//! class, fields with their `Signature` and annotation attributes, and the
//! class-level annotations. Annotations go to `RuntimeInvisibleAnnotations`,
//! where javac puts CLASS-retention annotations such as the Maven ones.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const MAVEN3: &str = "org/apache/maven/plugins/annotations";
const MAVEN4: &str = "org/apache/maven/api/plugin/annotations";

/// Annotation element value
#[derive(Debug, Clone)]
pub enum Value {
    Str(String),
    Bool(bool),
    Int(i32),
    /// Enum constant of the named annotation enum, e.g. `("LifecyclePhase", "COMPILE")`
    Enum(String, String),
    /// Class literal given in internal form (`com/acme/Helper`)
    Class(String),
    Array(Vec<Value>),
}

impl Value {
    pub fn str(s: &str) -> Self {
        Value::Str(s.to_string())
    }

    pub fn phase(constant: &str) -> Self {
        Value::Enum("LifecyclePhase".to_string(), constant.to_string())
    }

    pub fn scope(constant: &str) -> Self {
        Value::Enum("ResolutionScope".to_string(), constant.to_string())
    }
}

#[derive(Debug, Clone)]
struct AnnotationDef {
    descriptor: String,
    elements: Vec<(String, Value)>,
}

impl AnnotationDef {
    fn plugin(simple: &str, v4: bool, elements: Vec<(&str, Value)>) -> Self {
        let package = if v4 { MAVEN4 } else { MAVEN3 };
        Self {
            descriptor: format!("L{}/{};", package, simple),
            elements: elements
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }
}

pub struct FieldBuilder {
    name: String,
    descriptor: String,
    signature: Option<String>,
    annotations: Vec<AnnotationDef>,
}

impl FieldBuilder {
    pub fn new(name: &str, descriptor: &str) -> Self {
        Self {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: None,
            annotations: Vec::new(),
        }
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    pub fn parameter(mut self, elements: Vec<(&str, Value)>) -> Self {
        self.annotations
            .push(AnnotationDef::plugin("Parameter", false, elements));
        self
    }

    pub fn component(mut self, elements: Vec<(&str, Value)>) -> Self {
        self.annotations
            .push(AnnotationDef::plugin("Component", false, elements));
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.annotations.push(AnnotationDef {
            descriptor: "Ljava/lang/Deprecated;".to_string(),
            elements: Vec::new(),
        });
        self
    }
}

pub struct ClassBuilder {
    name: String,
    super_name: Option<String>,
    v4: bool,
    annotations: Vec<AnnotationDef>,
    fields: Vec<FieldBuilder>,
}

impl ClassBuilder {
    /// Class in internal form, e.g. `com/acme/BuildMojo`
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            super_name: Some("org/apache/maven/plugin/AbstractMojo".to_string()),
            v4: false,
            annotations: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn extends(mut self, super_name: &str) -> Self {
        self.super_name = Some(super_name.to_string());
        self
    }

    pub fn no_super(mut self) -> Self {
        self.super_name = None;
        self
    }

    /// Use the Maven 4 annotation package for class-level annotations
    pub fn v4(mut self) -> Self {
        self.v4 = true;
        self
    }

    pub fn mojo(mut self, name: &str, mut elements: Vec<(&str, Value)>) -> Self {
        elements.insert(0, ("name", Value::str(name)));
        self.annotations
            .push(AnnotationDef::plugin("Mojo", self.v4, elements));
        self
    }

    pub fn execute(mut self, elements: Vec<(&str, Value)>) -> Self {
        self.annotations
            .push(AnnotationDef::plugin("Execute", self.v4, elements));
        self
    }

    pub fn field(mut self, field: FieldBuilder) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pool = ConstantPool::default();
        let mut body = Vec::new();

        u16(&mut body, 0x0021);
        let this_class = pool.class(&self.name);
        u16(&mut body, this_class);
        let super_class = self.super_name.as_deref().map_or(0, |s| pool.class(s));
        u16(&mut body, super_class);
        u16(&mut body, 0);

        u16(&mut body, self.fields.len() as u16);
        for field in &self.fields {
            u16(&mut body, 0x0002);
            let name = pool.utf8(&field.name);
            u16(&mut body, name);
            let descriptor = pool.utf8(&field.descriptor);
            u16(&mut body, descriptor);

            let mut attributes = Vec::new();
            if let Some(signature) = &field.signature {
                let mut info = Vec::new();
                let index = pool.utf8(signature);
                u16(&mut info, index);
                attributes.push(("Signature", info));
            }
            if !field.annotations.is_empty() {
                attributes.push((
                    "RuntimeInvisibleAnnotations",
                    encode_annotations(&mut pool, &field.annotations),
                ));
            }
            write_attributes(&mut body, &mut pool, attributes);
        }

        // methods
        u16(&mut body, 0);

        let mut attributes = Vec::new();
        if !self.annotations.is_empty() {
            attributes.push((
                "RuntimeInvisibleAnnotations",
                encode_annotations(&mut pool, &self.annotations),
            ));
        }
        write_attributes(&mut body, &mut pool, attributes);

        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        u16(&mut out, 0);
        u16(&mut out, 52);
        u16(&mut out, pool.entries.len() as u16 + 1);
        for entry in &pool.entries {
            out.extend_from_slice(entry);
        }
        out.extend_from_slice(&body);
        out
    }

    /// Writes the class under `dir` at its package path and returns the path
    pub fn write_to(&self, dir: &Path) -> PathBuf {
        let path = dir.join(format!("{}.class", self.name));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, self.build()).unwrap();
        path
    }
}

#[derive(Default)]
struct ConstantPool {
    entries: Vec<Vec<u8>>,
    lookup: HashMap<Vec<u8>, u16>,
}

impl ConstantPool {
    fn add(&mut self, entry: Vec<u8>) -> u16 {
        if let Some(index) = self.lookup.get(&entry) {
            return *index;
        }
        self.entries.push(entry.clone());
        let index = self.entries.len() as u16;
        self.lookup.insert(entry, index);
        index
    }

    fn utf8(&mut self, s: &str) -> u16 {
        let mut entry = vec![1];
        u16(&mut entry, s.len() as u16);
        entry.extend_from_slice(s.as_bytes());
        self.add(entry)
    }

    fn integer(&mut self, value: i32) -> u16 {
        let mut entry = vec![3];
        entry.extend_from_slice(&value.to_be_bytes());
        self.add(entry)
    }

    fn class(&mut self, internal_name: &str) -> u16 {
        let name = self.utf8(internal_name);
        let mut entry = vec![7];
        u16(&mut entry, name);
        self.add(entry)
    }
}

fn u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn write_attributes(out: &mut Vec<u8>, pool: &mut ConstantPool, attributes: Vec<(&str, Vec<u8>)>) {
    u16(out, attributes.len() as u16);
    for (name, info) in attributes {
        let name = pool.utf8(name);
        u16(out, name);
        out.extend_from_slice(&(info.len() as u32).to_be_bytes());
        out.extend_from_slice(&info);
    }
}

fn encode_annotations(pool: &mut ConstantPool, annotations: &[AnnotationDef]) -> Vec<u8> {
    let mut out = Vec::new();
    u16(&mut out, annotations.len() as u16);
    for annotation in annotations {
        let descriptor = pool.utf8(&annotation.descriptor);
        u16(&mut out, descriptor);
        u16(&mut out, annotation.elements.len() as u16);
        for (name, value) in &annotation.elements {
            let name = pool.utf8(name);
            u16(&mut out, name);
            encode_value(&mut out, pool, value, &annotation.descriptor);
        }
    }
    out
}

fn encode_value(out: &mut Vec<u8>, pool: &mut ConstantPool, value: &Value, owner: &str) {
    match value {
        Value::Str(s) => {
            out.push(b's');
            let index = pool.utf8(s);
            u16(out, index);
        }
        Value::Bool(b) => {
            out.push(b'Z');
            let index = pool.integer(i32::from(*b));
            u16(out, index);
        }
        Value::Int(i) => {
            out.push(b'I');
            let index = pool.integer(*i);
            u16(out, index);
        }
        Value::Enum(simple, constant) => {
            out.push(b'e');
            // enum lives next to the annotation that uses it
            let package = owner
                .trim_start_matches('L')
                .rsplit_once('/')
                .map_or("", |(p, _)| p);
            let type_index = pool.utf8(&format!("L{}/{};", package, simple));
            u16(out, type_index);
            let constant_index = pool.utf8(constant);
            u16(out, constant_index);
        }
        Value::Class(internal) => {
            out.push(b'c');
            let index = pool.utf8(&format!("L{};", internal));
            u16(out, index);
        }
        Value::Array(values) => {
            out.push(b'[');
            u16(out, values.len() as u16);
            for value in values {
                encode_value(out, pool, value, owner);
            }
        }
    }
}
