//! Document renderers – turn the assembled catalog markup into an artifact.
//!
//! [`PdfRenderer`] writes each page section as plain text with the builtin
//! Helvetica faces via `printpdf` (v0.8 ops-based API); there is no layout
//! engine, so styling and images are not reproduced. [`HtmlRenderer`] hands
//! the markup back unchanged for print engines that understand the
//! page-break markers.

use printpdf::*;

use crate::assembler::Document;
use crate::markup::{text_blocks, BlockKind, TextBlock};
use crate::pipeline::PipelineConfig;

const PT_TO_MM: f32 = 0.352778;

/// Something that persists a finished [`Document`] as bytes.
pub trait DocumentRenderer {
    /// Short name used in log messages.
    fn name(&self) -> &'static str;

    /// Render the whole document. Errors are reported as plain messages and
    /// surfaced to the caller unchanged.
    fn render(&self, document: &Document) -> Result<Vec<u8>, String>;
}

/// Returns the markup as UTF-8 bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl DocumentRenderer for HtmlRenderer {
    fn name(&self) -> &'static str {
        "html"
    }

    fn render(&self, document: &Document) -> Result<Vec<u8>, String> {
        Ok(document.as_str().as_bytes().to_vec())
    }
}

/// Text-only PDF output, one or more PDF pages per catalog page.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    title: String,
    page_width: f32,
    page_height: f32,
    margin: f32,
}

impl PdfRenderer {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            title: config.title.clone(),
            page_width: config.effective_width(),
            page_height: config.effective_height(),
            margin: config.page_margin,
        }
    }

    fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Lay out one section's blocks top to bottom, starting a new PDF page
    /// whenever the current one is full.
    fn section_pages(&self, blocks: &[TextBlock]) -> Vec<Vec<Op>> {
        let bottom = self.page_height - self.margin;
        let mut pages = Vec::new();
        let mut ops = Vec::new();
        let mut y = self.margin;

        for block in blocks {
            let (size, font) = match block.kind {
                BlockKind::Heading => (16.0, BuiltinFont::HelveticaBold),
                BlockKind::Paragraph => (10.0, BuiltinFont::Helvetica),
            };
            let line_height = size * 1.4;
            // Helvetica averages roughly half an em per glyph.
            let max_chars = ((self.content_width() / (size * 0.5)) as usize).max(1);

            for line in wrap_text(&block.text, max_chars) {
                if y + line_height > bottom && !ops.is_empty() {
                    log::debug!("Catalog page overflows; continuing on a new PDF page");
                    pages.push(std::mem::take(&mut ops));
                    y = self.margin;
                }
                // PDF origin is bottom-left; baseline ≈ top of line + ascender.
                let baseline = self.page_height - y - size * 0.75;
                push_text(&mut ops, self.margin, baseline, size, line_height, font, &line);
                y += line_height;
            }
            y += size * 0.4;
        }

        if !ops.is_empty() || pages.is_empty() {
            pages.push(ops);
        }
        pages
    }

    /// PDF page contents grouped by catalog page.
    fn layout(&self, document: &Document) -> Vec<Vec<Vec<Op>>> {
        document
            .sections()
            .map(|section| self.section_pages(&text_blocks(section)))
            .collect()
    }

    /// Number of PDF pages each catalog page occupies, in order.
    pub fn page_plan(&self, document: &Document) -> Vec<usize> {
        self.layout(document).iter().map(Vec::len).collect()
    }
}

impl DocumentRenderer for PdfRenderer {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, document: &Document) -> Result<Vec<u8>, String> {
        if self.content_width() <= 0.0 || self.page_height <= 2.0 * self.margin {
            return Err(format!(
                "page margin {} pt leaves no room on a {}×{} pt page",
                self.margin, self.page_width, self.page_height
            ));
        }

        let page_w = Mm(self.page_width * PT_TO_MM);
        let page_h = Mm(self.page_height * PT_TO_MM);
        let mut doc = PdfDocument::new(&self.title);

        let mut pages: Vec<PdfPage> = self
            .layout(document)
            .into_iter()
            .flatten()
            .map(|ops| PdfPage::new(page_w, page_h, ops))
            .collect();

        // Ensure at least one page.
        if pages.is_empty() {
            pages.push(PdfPage::new(page_w, page_h, Vec::new()));
        }

        log::debug!("Writing {} PDF pages", pages.len());
        doc.with_pages(pages);
        let mut warnings = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            log::warn!("PDF writer reported {} warnings", warnings.len());
        }
        Ok(bytes)
    }
}

fn push_text(
    ops: &mut Vec<Op>,
    x: f32,
    baseline: f32,
    size: f32,
    line_height: f32,
    font: BuiltinFont,
    text: &str,
) {
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point {
            x: Pt(x),
            y: Pt(baseline),
        },
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(size),
        font,
    });
    ops.push(Op::SetLineHeight {
        lh: Pt(line_height),
    });
    ops.push(Op::SetFillColor {
        col: Color::Rgb(Rgb {
            r: 0.2,
            g: 0.2,
            b: 0.2,
            icc_profile: None,
        }),
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(to_pdf_text(text))],
        font,
    });
    ops.push(Op::EndTextSection);
}

/// Greedy word wrap to at most `max_chars` characters per line. Words longer
/// than a line are split.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > max_chars && current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// Reduce `text` to printable ASCII for the builtin fonts. Common Latin
/// letters lose their accents, currency and typographic marks get an ASCII
/// spelling, anything else becomes '?'.
fn to_pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            if !c.is_ascii_control() {
                out.push(c);
            }
            continue;
        }
        let replacement = match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
            'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "A",
            'ç' => "c",
            'Ç' => "C",
            'è' | 'é' | 'ê' | 'ë' => "e",
            'È' | 'É' | 'Ê' | 'Ë' => "E",
            'ì' | 'í' | 'î' | 'ï' => "i",
            'Ì' | 'Í' | 'Î' | 'Ï' => "I",
            'ñ' => "n",
            'Ñ' => "N",
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
            'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "O",
            'ù' | 'ú' | 'û' | 'ü' => "u",
            'Ù' | 'Ú' | 'Û' | 'Ü' => "U",
            'ý' | 'ÿ' => "y",
            'œ' => "oe",
            'Œ' => "OE",
            'æ' => "ae",
            'Æ' => "AE",
            'ß' => "ss",
            '€' => "EUR",
            '£' => "GBP",
            '°' => " deg",
            '×' => "x",
            '\u{2018}' | '\u{2019}' => "'",
            '\u{201C}' | '\u{201D}' => "\"",
            '\u{2013}' | '\u{2014}' => "-",
            '\u{2026}' => "...",
            '\u{2022}' => "*",
            '\u{00A0}' => " ",
            _ => "?",
        };
        out.push_str(replacement);
    }
    out
}
