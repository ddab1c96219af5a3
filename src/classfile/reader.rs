//! Class file decoding
//!
//! Layout follows the JVM class file format (chapter 4). Only the constant pool,
//! the class header, fields and the annotation/signature attributes are
//! interpreted; every other structure is skipped by length.

use super::{
    internal_to_dotted, Annotation, ClassFileError, ElementValue, MetadataReader, RawClass,
    RawField,
};
use bytes::Buf;

const MAGIC: u32 = 0xCAFE_BABE;

const ATTR_VISIBLE_ANNOTATIONS: &str = "RuntimeVisibleAnnotations";
const ATTR_INVISIBLE_ANNOTATIONS: &str = "RuntimeInvisibleAnnotations";
const ATTR_SIGNATURE: &str = "Signature";

/// Reads annotation metadata straight from class file bytes
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassFileReader;

impl ClassFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataReader for ClassFileReader {
    fn read_class(&self, bytes: &[u8]) -> Result<RawClass, ClassFileError> {
        let mut input = Input::new(bytes);

        let magic = input.u32("magic")?;
        if magic != MAGIC {
            return Err(ClassFileError::BadMagic(magic));
        }
        input.skip(4, "version")?;

        let pool = ConstantPool::read(&mut input)?;

        input.skip(2, "access flags")?;
        let this_class = input.u16("this_class")?;
        let super_class = input.u16("super_class")?;
        let name = internal_to_dotted(pool.class_name(this_class)?);
        let super_name = if super_class == 0 {
            None
        } else {
            Some(internal_to_dotted(pool.class_name(super_class)?))
        };

        let interfaces = input.u16("interfaces count")? as usize;
        input.skip(interfaces * 2, "interfaces")?;

        let field_count = input.u16("fields count")?;
        let mut fields = Vec::with_capacity(field_count as usize);
        for _ in 0..field_count {
            input.skip(2, "field access flags")?;
            let name = pool.utf8(input.u16("field name")?)?.to_string();
            let descriptor = pool.utf8(input.u16("field descriptor")?)?.to_string();
            let attributes = read_attributes(&mut input, &pool)?;
            fields.push(RawField {
                name,
                descriptor,
                signature: attributes.signature,
                annotations: attributes.annotations,
            });
        }

        let method_count = input.u16("methods count")?;
        for _ in 0..method_count {
            input.skip(6, "method header")?;
            skip_attributes(&mut input)?;
        }

        let attributes = read_attributes(&mut input, &pool)?;

        Ok(RawClass {
            name,
            super_name,
            annotations: attributes.annotations,
            fields,
        })
    }
}

/// Bounds-checked wrapper over a byte slice
///
/// `bytes::Buf` accessors panic on underflow, so every read checks the
/// remaining length first and reports what was being read.
struct Input<'a> {
    buf: &'a [u8],
}

impl<'a> Input<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn ensure(&self, len: usize, what: &'static str) -> Result<(), ClassFileError> {
        if self.buf.remaining() < len {
            Err(ClassFileError::Truncated(what))
        } else {
            Ok(())
        }
    }

    fn u8(&mut self, what: &'static str) -> Result<u8, ClassFileError> {
        self.ensure(1, what)?;
        Ok(self.buf.get_u8())
    }

    fn u16(&mut self, what: &'static str) -> Result<u16, ClassFileError> {
        self.ensure(2, what)?;
        Ok(self.buf.get_u16())
    }

    fn u32(&mut self, what: &'static str) -> Result<u32, ClassFileError> {
        self.ensure(4, what)?;
        Ok(self.buf.get_u32())
    }

    fn u64(&mut self, what: &'static str) -> Result<u64, ClassFileError> {
        self.ensure(8, what)?;
        Ok(self.buf.get_u64())
    }

    fn bytes(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], ClassFileError> {
        self.ensure(len, what)?;
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    fn skip(&mut self, len: usize, what: &'static str) -> Result<(), ClassFileError> {
        self.ensure(len, what)?;
        self.buf.advance(len);
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Constant {
    /// Slot 0 and the second slot of long/double entries
    Unusable,
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class(u16),
    Other,
}

struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    fn read(input: &mut Input<'_>) -> Result<Self, ClassFileError> {
        let count = input.u16("constant pool count")?;
        let mut entries = Vec::with_capacity(count as usize);
        entries.push(Constant::Unusable);

        let mut index = 1u16;
        while index < count {
            let tag = input.u8("constant tag")?;
            let entry = match tag {
                1 => {
                    let len = input.u16("utf8 length")? as usize;
                    Constant::Utf8(decode_modified_utf8(input.bytes(len, "utf8 bytes")?))
                }
                3 => Constant::Integer(input.u32("integer constant")? as i32),
                4 => Constant::Float(f32::from_bits(input.u32("float constant")?)),
                5 => Constant::Long(input.u64("long constant")? as i64),
                6 => Constant::Double(f64::from_bits(input.u64("double constant")?)),
                7 => Constant::Class(input.u16("class constant")?),
                8 | 16 | 19 | 20 => {
                    input.skip(2, "constant reference")?;
                    Constant::Other
                }
                15 => {
                    input.skip(3, "method handle")?;
                    Constant::Other
                }
                9 | 10 | 11 | 12 | 17 | 18 => {
                    input.skip(4, "constant reference pair")?;
                    Constant::Other
                }
                _ => return Err(ClassFileError::UnknownConstantTag { tag, index }),
            };

            let wide = matches!(entry, Constant::Long(_) | Constant::Double(_));
            entries.push(entry);
            // index < count, so this cannot overflow
            index += 1;
            if wide {
                // 8-byte constants take two slots; the second must be in the pool
                if index >= count {
                    return Err(ClassFileError::BadConstantReference {
                        index: index - 1,
                        expected: "room for a two-slot constant",
                    });
                }
                entries.push(Constant::Unusable);
                index += 1;
            }
        }

        Ok(Self { entries })
    }

    fn get(&self, index: u16) -> Option<&Constant> {
        self.entries.get(index as usize)
    }

    fn utf8(&self, index: u16) -> Result<&str, ClassFileError> {
        match self.get(index) {
            Some(Constant::Utf8(s)) => Ok(s),
            _ => Err(ClassFileError::BadConstantReference {
                index,
                expected: "Utf8",
            }),
        }
    }

    fn class_name(&self, index: u16) -> Result<&str, ClassFileError> {
        match self.get(index) {
            Some(Constant::Class(name_index)) => self.utf8(*name_index),
            _ => Err(ClassFileError::BadConstantReference {
                index,
                expected: "Class",
            }),
        }
    }

    fn integer(&self, index: u16) -> Result<i32, ClassFileError> {
        match self.get(index) {
            Some(Constant::Integer(value)) => Ok(*value),
            _ => Err(ClassFileError::BadConstantReference {
                index,
                expected: "Integer",
            }),
        }
    }
}

#[derive(Default)]
struct Attributes {
    signature: Option<String>,
    annotations: Vec<Annotation>,
}

fn read_attributes(input: &mut Input<'_>, pool: &ConstantPool) -> Result<Attributes, ClassFileError> {
    let mut attributes = Attributes::default();
    let count = input.u16("attributes count")?;

    for _ in 0..count {
        let name = pool.utf8(input.u16("attribute name")?)?;
        let len = input.u32("attribute length")? as usize;
        let body = input.bytes(len, "attribute body")?;

        match name {
            ATTR_VISIBLE_ANNOTATIONS | ATTR_INVISIBLE_ANNOTATIONS => {
                let mut body = Input::new(body);
                let num = body.u16("annotations count")?;
                for _ in 0..num {
                    attributes.annotations.push(read_annotation(&mut body, pool)?);
                }
            }
            ATTR_SIGNATURE => {
                let mut body = Input::new(body);
                attributes.signature = Some(pool.utf8(body.u16("signature index")?)?.to_string());
            }
            _ => {}
        }
    }

    Ok(attributes)
}

fn skip_attributes(input: &mut Input<'_>) -> Result<(), ClassFileError> {
    let count = input.u16("attributes count")?;
    for _ in 0..count {
        input.skip(2, "attribute name")?;
        let len = input.u32("attribute length")? as usize;
        input.skip(len, "attribute body")?;
    }
    Ok(())
}

fn read_annotation(input: &mut Input<'_>, pool: &ConstantPool) -> Result<Annotation, ClassFileError> {
    let type_descriptor = pool.utf8(input.u16("annotation type")?)?.to_string();
    let pairs = input.u16("element pairs count")?;
    let mut elements = Vec::with_capacity(pairs as usize);
    for _ in 0..pairs {
        let name = pool.utf8(input.u16("element name")?)?.to_string();
        let value = read_element_value(input, pool)?;
        elements.push((name, value));
    }
    Ok(Annotation {
        type_descriptor,
        elements,
    })
}

fn read_element_value(
    input: &mut Input<'_>,
    pool: &ConstantPool,
) -> Result<ElementValue, ClassFileError> {
    let tag = input.u8("element tag")? as char;
    let value = match tag {
        'B' | 'I' | 'S' => ElementValue::Int(pool.integer(input.u16("int element")?)?),
        'C' => {
            let code = pool.integer(input.u16("char element")?)? as u32;
            ElementValue::Char(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
        }
        'Z' => ElementValue::Boolean(pool.integer(input.u16("boolean element")?)? != 0),
        'J' => {
            let index = input.u16("long element")?;
            match pool.get(index) {
                Some(Constant::Long(value)) => ElementValue::Long(*value),
                _ => {
                    return Err(ClassFileError::BadConstantReference {
                        index,
                        expected: "Long",
                    })
                }
            }
        }
        'F' => {
            let index = input.u16("float element")?;
            match pool.get(index) {
                Some(Constant::Float(value)) => ElementValue::Float(*value),
                _ => {
                    return Err(ClassFileError::BadConstantReference {
                        index,
                        expected: "Float",
                    })
                }
            }
        }
        'D' => {
            let index = input.u16("double element")?;
            match pool.get(index) {
                Some(Constant::Double(value)) => ElementValue::Double(*value),
                _ => {
                    return Err(ClassFileError::BadConstantReference {
                        index,
                        expected: "Double",
                    })
                }
            }
        }
        's' => ElementValue::String(pool.utf8(input.u16("string element")?)?.to_string()),
        'e' => {
            let type_descriptor = pool.utf8(input.u16("enum type")?)?.to_string();
            let constant = pool.utf8(input.u16("enum constant")?)?.to_string();
            ElementValue::Enum {
                type_descriptor,
                constant,
            }
        }
        'c' => ElementValue::Class(pool.utf8(input.u16("class element")?)?.to_string()),
        '@' => ElementValue::Annotation(read_annotation(input, pool)?),
        '[' => {
            let count = input.u16("array length")?;
            let mut values = Vec::with_capacity(count as usize);
            for _ in 0..count {
                values.push(read_element_value(input, pool)?);
            }
            ElementValue::Array(values)
        }
        other => return Err(ClassFileError::UnknownElementTag(other)),
    };
    Ok(value)
}

/// Decodes the JVM "modified UTF-8" encoding
///
/// Differs from UTF-8 in encoding NUL as two bytes and supplementary
/// characters as surrogate pairs. Plain ASCII and BMP text, by far the common
/// case, is valid UTF-8 already.
fn decode_modified_utf8(bytes: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b & 0x80 == 0 {
            units.push(b as u16);
            i += 1;
        } else if b & 0xE0 == 0xC0 && i + 1 < bytes.len() {
            units.push((((b & 0x1F) as u16) << 6) | (bytes[i + 1] & 0x3F) as u16);
            i += 2;
        } else if b & 0xF0 == 0xE0 && i + 2 < bytes.len() {
            units.push(
                (((b & 0x0F) as u16) << 12)
                    | (((bytes[i + 1] & 0x3F) as u16) << 6)
                    | (bytes[i + 2] & 0x3F) as u16,
            );
            i += 3;
        } else {
            units.push(0xFFFD);
            i += 1;
        }
    }
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_magic() {
        let err = ClassFileReader::new()
            .read_class(&[0xDE, 0xAD, 0xBE, 0xEF, 0, 0, 0, 52])
            .unwrap_err();
        assert_eq!(err, ClassFileError::BadMagic(0xDEAD_BEEF));
    }

    #[test]
    fn test_rejects_truncated_input() {
        let err = ClassFileReader::new()
            .read_class(&[0xCA, 0xFE, 0xBA, 0xBE, 0, 0])
            .unwrap_err();
        assert!(matches!(err, ClassFileError::Truncated(_)));
    }

    #[test]
    fn test_rejects_unknown_constant_tag() {
        // magic, version, cp count = 2, tag 99
        let bytes = [0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 52, 0, 2, 99];
        let err = ClassFileReader::new().read_class(&bytes).unwrap_err();
        assert_eq!(err, ClassFileError::UnknownConstantTag { tag: 99, index: 1 });
    }

    #[test]
    fn test_rejects_wide_constant_in_last_slot() {
        let mut bytes = vec![0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 52, 0xFF, 0xFF];
        for _ in 1..65534 {
            bytes.extend_from_slice(&[3, 0, 0, 0, 1]);
        }
        bytes.push(5);
        bytes.extend_from_slice(&7u64.to_be_bytes());

        let err = ClassFileReader::new().read_class(&bytes).unwrap_err();
        assert_eq!(
            err,
            ClassFileError::BadConstantReference {
                index: 65534,
                expected: "room for a two-slot constant",
            }
        );
    }

    #[test]
    fn test_wide_constant_occupies_two_slots() {
        // cp count = 3: a long filling slots 1 and 2
        let mut bytes = vec![0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 52, 0, 3, 5];
        bytes.extend_from_slice(&7u64.to_be_bytes());
        // access flags, this_class pointing at the long
        bytes.extend_from_slice(&[0, 0x21, 0, 1]);

        let err = ClassFileReader::new().read_class(&bytes).unwrap_err();
        assert!(matches!(
            err,
            ClassFileError::BadConstantReference { index: 1, .. }
        ));
    }

    #[test]
    fn test_modified_utf8_null_and_supplementary() {
        assert_eq!(decode_modified_utf8(&[0x61, 0xC0, 0x80, 0x62]), "a\u{0}b");
        // U+1F600 as a CESU-8 surrogate pair
        let smiley = [0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80];
        assert_eq!(decode_modified_utf8(&smiley), "\u{1F600}");
    }

    #[test]
    fn test_modified_utf8_plain_ascii() {
        assert_eq!(decode_modified_utf8(b"java/lang/Object"), "java/lang/Object");
    }
}
