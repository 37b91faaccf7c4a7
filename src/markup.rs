//! Markup scanner – reduces rendered catalog markup to blocks of text.
//!
//! This is not an HTML parser. It walks tags just far enough to know where
//! block boundaries are, drops `<head>`, `<style>` and `<script>` content
//! entirely, ignores images, and decodes the common entities.

/// Role of a text block on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading,
    Paragraph,
}

/// A run of text between two block boundaries, whitespace collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub kind: BlockKind,
    pub text: String,
}

const SKIPPED: [&str; 4] = ["head", "style", "script", "title"];

const BLOCKS: [&str; 22] = [
    "html", "body", "div", "p", "section", "header", "footer", "article", "ul", "ol", "li",
    "table", "tr", "td", "th", "h1", "h2", "h3", "h4", "h5", "h6", "br",
];

/// Extract the text blocks of `markup` in document order.
pub fn text_blocks(markup: &str) -> Vec<TextBlock> {
    let mut scanner = Scanner {
        input: markup,
        pos: 0,
        blocks: Vec::new(),
        buffer: String::new(),
        heading_depth: 0,
    };
    scanner.run();
    scanner.blocks
}

struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    blocks: Vec<TextBlock>,
    buffer: String,
    heading_depth: usize,
}

impl<'a> Scanner<'a> {
    fn run(&mut self) {
        while !self.eof() {
            if self.starts_with("<!--") {
                self.skip_past("-->");
            } else if self.starts_with("<!") || self.starts_with("<?") {
                self.skip_past(">");
            } else if self.starts_with("<") {
                self.tag();
            } else {
                self.text();
            }
        }
        self.flush();
    }

    fn text(&mut self) {
        let start = self.pos;
        while !self.eof() && !self.starts_with("<") {
            self.advance_char();
        }
        self.buffer.push_str(&decode_entities(&self.input[start..self.pos]));
    }

    fn tag(&mut self) {
        self.pos += 1; // '<'
        let closing = self.starts_with("/");
        if closing {
            self.pos += 1;
        }
        let name = self.tag_name();
        self.skip_past(">");

        if !closing && SKIPPED.contains(&name.as_str()) {
            self.skip_element(&name);
            return;
        }
        if name == "img" {
            log::debug!("Skipping <img>: images are not rendered");
            return;
        }
        if BLOCKS.contains(&name.as_str()) {
            self.flush();
        }
        if is_heading(&name) {
            if closing {
                self.heading_depth = self.heading_depth.saturating_sub(1);
            } else {
                self.heading_depth += 1;
            }
        }
    }

    fn tag_name(&mut self) -> String {
        let start = self.pos;
        while !self.eof() {
            let c = self.current_char();
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_ascii_lowercase()
    }

    /// Skip everything up to and including `</name ...>`.
    fn skip_element(&mut self, name: &str) {
        let close = format!("</{name}");
        let rest = self.input[self.pos..].to_ascii_lowercase();
        match rest.find(&close) {
            Some(offset) => {
                self.pos += offset;
                self.skip_past(">");
            }
            None => self.pos = self.input.len(),
        }
    }

    fn flush(&mut self) {
        let text = self.buffer.split_whitespace().collect::<Vec<_>>().join(" ");
        self.buffer.clear();
        if text.is_empty() {
            return;
        }
        let kind = if self.heading_depth > 0 {
            BlockKind::Heading
        } else {
            BlockKind::Paragraph
        };
        self.blocks.push(TextBlock { kind, text });
    }

    fn skip_past(&mut self, s: &str) {
        match self.input[self.pos..].find(s) {
            Some(offset) => self.pos += offset + s.len(),
            None => self.pos = self.input.len(),
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn current_char(&self) -> char {
        self.input[self.pos..].chars().next().unwrap_or('\0')
    }

    fn advance_char(&mut self) {
        self.pos += self.current_char().len_utf8();
    }
}

fn is_heading(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Decode named and numeric character references.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest[1..]
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&rest[1..=end]).map(|c| (c, end + 2)));
        match decoded {
            Some((c, len)) => {
                out.push(c);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// `entity` is the text between '&' and ';'.
fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        "euro" => Some('€'),
        _ => {
            let code = entity.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}
