//! # catalog-forge – template-driven product catalogs
//!
//! This crate turns an ordered list of product records into one paginated
//! catalog document. The pipeline stages are:
//!
//! 1. **Load** – spreadsheet / CSV / JSON → validated [`RecordSet`] ([`source`], [`record`])
//! 2. **Compile** – template markup → [`CompiledTemplate`] ([`template`])
//! 3. **Paginate** – records → fixed-capacity pages ([`pagination`])
//! 4. **Bind** – page + metadata → rendered fragment ([`context`], [`binder`])
//! 5. **Assemble** – fragments → one document with page breaks ([`assembler`])
//! 6. **Render** – document → PDF or HTML bytes ([`render`])

pub mod assembler;
pub mod binder;
pub mod context;
pub mod error;
pub mod markup;
pub mod pagination;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod source;
pub mod template;
pub mod templates;

// Re-exports for convenience
pub use assembler::{Document, PAGE_BREAK};
pub use error::{CatalogError, ErrorKind, Result};
pub use pipeline::{build_document, generate_catalog, PageOrientation, PipelineConfig};
pub use record::{Record, RecordSet, Value};
pub use template::CompiledTemplate;
