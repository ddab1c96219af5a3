#![allow(dead_code)]

pub mod classfile;

pub use classfile::{ClassBuilder, FieldBuilder, Value};

pub fn mojodesc_binary() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_mojodesc"))
}
