//! Field descriptor and generic signature decoding

use super::ClassFileError;

/// Converts an internal class name (`java/util/List`) to its dotted form
pub fn internal_to_dotted(name: &str) -> String {
    name.replace('/', ".")
}

/// Converts a field descriptor to a Java type name
///
/// `I` becomes `int`, `Ljava/io/File;` becomes `java.io.File` and
/// `[Ljava/lang/String;` becomes `java.lang.String[]`.
pub fn field_type_name(descriptor: &str) -> Result<String, ClassFileError> {
    let mut parser = Parser::new(descriptor);
    let name = parser
        .field_type(false)
        .ok_or_else(|| ClassFileError::BadDescriptor(descriptor.to_string()))?;
    if !parser.at_end() {
        return Err(ClassFileError::BadDescriptor(descriptor.to_string()));
    }
    Ok(name.erasure)
}

/// Extracts the top-level type arguments of a field signature
///
/// `Ljava/util/Map<Ljava/lang/String;Ljava/util/List<Ljava/io/File;>;>;`
/// yields `["java.lang.String", "java.util.List"]`. Nested arguments are
/// erased, wildcards render as `?`, `? extends T` and `? super T`, type
/// variables by their name.
pub fn field_type_arguments(signature: &str) -> Result<Vec<String>, ClassFileError> {
    let mut parser = Parser::new(signature);
    let parsed = parser
        .field_type(true)
        .ok_or_else(|| ClassFileError::BadSignature(signature.to_string()))?;
    if !parser.at_end() {
        return Err(ClassFileError::BadSignature(signature.to_string()));
    }
    Ok(parsed.arguments)
}

struct ParsedType {
    erasure: String,
    arguments: Vec<String>,
}

impl ParsedType {
    fn plain(erasure: impl Into<String>) -> Self {
        Self {
            erasure: erasure.into(),
            arguments: Vec::new(),
        }
    }
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos == self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn field_type(&mut self, generic: bool) -> Option<ParsedType> {
        let name = match self.next()? {
            b'B' => "byte",
            b'C' => "char",
            b'D' => "double",
            b'F' => "float",
            b'I' => "int",
            b'J' => "long",
            b'S' => "short",
            b'Z' => "boolean",
            b'L' => return self.class_type(generic),
            b'T' if generic => {
                let name = self.identifier(&[b';'])?;
                self.expect(b';')?;
                return Some(ParsedType::plain(name));
            }
            b'[' => {
                let element = self.field_type(generic)?;
                return Some(ParsedType::plain(format!("{}[]", element.erasure)));
            }
            _ => return None,
        };
        Some(ParsedType::plain(name))
    }

    fn class_type(&mut self, generic: bool) -> Option<ParsedType> {
        let stops: &[u8] = if generic { b";<." } else { b";" };
        let mut erasure = internal_to_dotted(&self.identifier(stops)?);
        let mut arguments = Vec::new();

        loop {
            match self.next()? {
                b';' => break,
                b'<' if generic => arguments = self.type_arguments()?,
                b'.' if generic => {
                    // Inner class of a parameterized outer class; only the
                    // innermost arguments belong to the field type.
                    let inner = self.identifier(stops)?;
                    erasure.push('$');
                    erasure.push_str(&inner);
                    arguments.clear();
                }
                _ => return None,
            }
        }

        Some(ParsedType { erasure, arguments })
    }

    fn type_arguments(&mut self) -> Option<Vec<String>> {
        let mut arguments = Vec::new();
        loop {
            match self.peek()? {
                b'>' => {
                    self.pos += 1;
                    return Some(arguments);
                }
                b'*' => {
                    self.pos += 1;
                    arguments.push("?".to_string());
                }
                b'+' => {
                    self.pos += 1;
                    let bound = self.field_type(true)?;
                    arguments.push(format!("? extends {}", bound.erasure));
                }
                b'-' => {
                    self.pos += 1;
                    let bound = self.field_type(true)?;
                    arguments.push(format!("? super {}", bound.erasure));
                }
                _ => arguments.push(self.field_type(true)?.erasure),
            }
        }
    }

    fn identifier(&mut self, stops: &[u8]) -> Option<String> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if stops.contains(&b) {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        std::str::from_utf8(&self.input[start..self.pos])
            .ok()
            .map(str::to_string)
    }

    fn expect(&mut self, expected: u8) -> Option<()> {
        (self.next()? == expected).then_some(())
    }
}
