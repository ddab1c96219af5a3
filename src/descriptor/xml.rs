//! Minimal pretty-printing XML writer
//!
//! Emits a document element by element into an in-memory buffer with two
//! space indentation. Elements without content are written self-closing.

const INDENT: &str = "  ";

pub struct XmlWriter {
    out: String,
    /// Open elements with a flag telling whether a child element was written
    stack: Vec<(String, bool)>,
    /// Whether the most recent start tag still lacks its closing `>`
    open: bool,
}

impl XmlWriter {
    pub fn new(comment: Option<&str>) -> Self {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        if let Some(comment) = comment {
            out.push_str("\n<!-- ");
            out.push_str(&comment.replace("--", "- -"));
            out.push_str(" -->\n\n");
        }
        Self {
            out,
            stack: Vec::new(),
            open: false,
        }
    }

    pub fn start_element(&mut self, name: &str) {
        self.close_start_tag();
        if let Some((_, has_children)) = self.stack.last_mut() {
            *has_children = true;
            self.out.push('\n');
        }
        self.indent(self.stack.len());
        self.out.push('<');
        self.out.push_str(name);
        self.stack.push((name.to_string(), false));
        self.open = true;
    }

    /// Adds an attribute to the element just started
    pub fn add_attribute(&mut self, name: &str, value: &str) {
        debug_assert!(self.open, "attribute written outside a start tag");
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        escape_into(&mut self.out, value);
        self.out.push('"');
    }

    pub fn write_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.close_start_tag();
        escape_into(&mut self.out, text);
    }

    pub fn end_element(&mut self) {
        let Some((name, has_children)) = self.stack.pop() else {
            return;
        };
        if self.open {
            self.out.push_str("/>");
            self.open = false;
        } else {
            if has_children {
                self.out.push('\n');
                self.indent(self.stack.len());
            }
            self.out.push_str("</");
            self.out.push_str(&name);
            self.out.push('>');
        }
    }

    /// Writes `<name>text</name>` on its own line
    pub fn element(&mut self, name: &str, text: &str) {
        self.start_element(name);
        self.write_text(text);
        self.end_element();
    }

    /// Closes any elements still open and returns the document
    pub fn finish(mut self) -> String {
        while !self.stack.is_empty() {
            self.end_element();
        }
        self.out.push('\n');
        self.out
    }

    fn close_start_tag(&mut self) {
        if self.open {
            self.out.push('>');
            self.open = false;
        }
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
    }
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
}
