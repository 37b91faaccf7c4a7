//! Pipeline – ties together pagination, context building, binding, assembly,
//! and rendering into a single function call.

use crate::assembler::{assemble, Document};
use crate::binder::TemplateBinder;
use crate::context::{build_contexts, PageContext};
use crate::error::{CatalogError, Result};
use crate::pagination::{paginate, DEFAULT_ITEMS_PER_PAGE};
use crate::record::RecordSet;
use crate::render::DocumentRenderer;
use crate::template::CompiledTemplate;

/// Default page margin in points.
pub const PAGE_MARGIN_PT: f32 = 40.0;

/// Page orientation for the generated PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageOrientation {
    /// Portrait mode: height > width (default).
    #[default]
    Portrait,
    /// Landscape mode: width > height.
    Landscape,
}

/// Configuration for a catalog run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Products per catalog page (default: 9).
    pub items_per_page: usize,
    /// Document title embedded in the PDF metadata.
    pub title: String,
    /// Page width in points (default: A4 = 595.28).
    pub page_width: f32,
    /// Page height in points (default: A4 = 841.89).
    pub page_height: f32,
    /// Page margin in points (default: 40).
    pub page_margin: f32,
    /// Page orientation; swaps effective width/height when `Landscape`.
    pub orientation: PageOrientation,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            title: "Product catalog".to_string(),
            page_width: 595.28,
            page_height: 841.89,
            page_margin: PAGE_MARGIN_PT,
            orientation: PageOrientation::Portrait,
        }
    }
}

impl PipelineConfig {
    /// Effective page width after applying orientation.
    pub fn effective_width(&self) -> f32 {
        match self.orientation {
            PageOrientation::Portrait => self.page_width,
            PageOrientation::Landscape => self.page_height,
        }
    }

    /// Effective page height after applying orientation.
    pub fn effective_height(&self) -> f32 {
        match self.orientation {
            PageOrientation::Portrait => self.page_height,
            PageOrientation::Landscape => self.page_width,
        }
    }
}

/// Result of a full catalog run.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub document: Document,
    /// Renderer output; `None` when there were no records to render.
    pub output: Option<Vec<u8>>,
}

/// Records + template → assembled document.
///
/// The template contract and the page capacity are checked before any page
/// is bound; the first failing page aborts the run.
pub fn build_document(
    records: &RecordSet,
    template: &CompiledTemplate,
    items_per_page: usize,
) -> Result<Document> {
    let binder = TemplateBinder::new(template)?;
    let pages = paginate(records.records(), items_per_page)?;
    let fragments = build_contexts(&pages)
        .iter()
        .map(|ctx| binder.bind(ctx))
        .collect::<Result<Vec<_>>>()?;
    Ok(assemble(fragments))
}

/// Page contexts only (no binding) – useful for inspecting a run.
pub fn plan_pages(records: &RecordSet, items_per_page: usize) -> Result<Vec<PageContext<'_>>> {
    let pages = paginate(records.records(), items_per_page)?;
    Ok(build_contexts(&pages))
}

/// Full pipeline: records + template → rendered bytes.
///
/// An empty record set produces an empty document and the renderer is not
/// called.
pub fn generate_catalog(
    records: &RecordSet,
    template: &CompiledTemplate,
    config: &PipelineConfig,
    renderer: &dyn DocumentRenderer,
) -> Result<Catalog> {
    let document = build_document(records, template, config.items_per_page)?;
    if document.is_empty() {
        log::warn!("No products to render; skipping the {} renderer", renderer.name());
        return Ok(Catalog {
            document,
            output: None,
        });
    }

    log::info!(
        "Rendering {} pages with the {} renderer",
        document.page_count(),
        renderer.name()
    );
    let bytes = renderer.render(&document).map_err(CatalogError::Render)?;
    Ok(Catalog {
        document,
        output: Some(bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, REQUIRED_FIELDS};
    use crate::render::HtmlRenderer;
    use crate::templates;

    fn products(n: usize) -> RecordSet {
        let records = (0..n)
            .map(|i| {
                let mut r = Record::new();
                for field in REQUIRED_FIELDS {
                    r.insert(field, format!("{field}-{i}"));
                }
                r
            })
            .collect();
        let columns = REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect();
        RecordSet::new(columns, records).unwrap()
    }

    #[test]
    fn pipeline_basic() {
        let template = CompiledTemplate::compile(templates::minimal_template()).unwrap();
        let catalog =
            generate_catalog(&products(3), &template, &PipelineConfig::default(), &HtmlRenderer)
                .unwrap();
        assert_eq!(catalog.document.page_count(), 1);
        assert!(catalog.output.is_some());
    }

    #[test]
    fn empty_records_skip_rendering() {
        struct Failing;
        impl DocumentRenderer for Failing {
            fn name(&self) -> &'static str {
                "failing"
            }
            fn render(&self, _: &Document) -> std::result::Result<Vec<u8>, String> {
                Err("should not be called".into())
            }
        }
        let template = CompiledTemplate::compile(templates::minimal_template()).unwrap();
        let catalog = generate_catalog(
            &products(0),
            &template,
            &PipelineConfig::default(),
            &Failing,
        )
        .unwrap();
        assert!(catalog.document.is_empty());
        assert!(catalog.output.is_none());
    }

    #[test]
    fn renderer_errors_are_surfaced_verbatim() {
        struct Broken;
        impl DocumentRenderer for Broken {
            fn name(&self) -> &'static str {
                "broken"
            }
            fn render(&self, _: &Document) -> std::result::Result<Vec<u8>, String> {
                Err("disk full".into())
            }
        }
        let template = CompiledTemplate::compile(templates::minimal_template()).unwrap();
        let err = generate_catalog(&products(1), &template, &PipelineConfig::default(), &Broken)
            .unwrap_err();
        assert!(matches!(err, CatalogError::Render(ref m) if m == "disk full"));
    }

    #[test]
    fn landscape_swaps_dimensions() {
        let config = PipelineConfig {
            orientation: PageOrientation::Landscape,
            ..PipelineConfig::default()
        };
        assert!(config.effective_width() > config.effective_height());
    }

    #[test]
    fn plan_reports_every_page() {
        let records = products(19);
        let plan = plan_pages(&records, 9).unwrap();
        let numbers: Vec<&str> = plan.iter().map(|c| c.page_number.as_str()).collect();
        assert_eq!(numbers, vec!["01", "02", "03"]);
        assert_eq!(plan[2].items.len(), 1);
    }
}
