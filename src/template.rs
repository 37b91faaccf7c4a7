//! Template compiler – wraps a Jinja page template in a reusable environment.
//!
//! Templates use the Jinja syntax handled by `minijinja`: `{{ item.name }}`,
//! `{% for item in items %}`, `{% if item.ribbon_flag %}` and so on. The
//! environment is configured once:
//! - HTML auto-escaping for every substituted value
//! - semi-strict undefined handling, so printing a missing field fails while
//!   testing it in `{% if %}` is simply false
//!
//! The compiled template is immutable and can be rendered any number of times.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use minijinja::{AutoEscape, Environment, Template, UndefinedBehavior};

use crate::error::{CatalogError, Result};

const TEMPLATE_NAME: &str = "catalog.html";

/// Names the template engine provides on its own; never reported as free.
const ENGINE_GLOBALS: [&str; 5] = ["range", "dict", "namespace", "debug", "loop"];

/// A parsed template, ready to be bound against page contexts.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    env: Environment<'static>,
    source: String,
}

impl CompiledTemplate {
    /// Compile template source held in memory.
    pub fn compile(source: &str) -> Result<Self> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::SemiStrict);
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.set_keep_trailing_newline(true);
        env.add_template_owned(TEMPLATE_NAME, source.to_owned())
            .map_err(|e| syntax_error(&e))?;
        log::debug!("Compiled template ({} bytes)", source.len());
        Ok(Self {
            env,
            source: source.to_owned(),
        })
    }

    /// Read and compile a template file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Reading template: {}", path.display());
        let source = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::compile(&source)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Variables the template reads without declaring them, as dotted paths
    /// (`page_number`, `items`, `total_pages.x`). Loop variables are declared
    /// by their loop and do not appear.
    pub fn free_variables(&self) -> Result<BTreeSet<String>> {
        let paths = self.template()?.undeclared_variables(true);
        Ok(paths
            .into_iter()
            .filter(|p| !ENGINE_GLOBALS.contains(&root_of(p)))
            .collect())
    }

    /// Trimmed text of a 1-based source line.
    pub fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.source.lines().nth(i))
            .map(str::trim)
    }

    pub(crate) fn template(&self) -> Result<Template<'_, '_>> {
        self.env.get_template(TEMPLATE_NAME).map_err(|e| syntax_error(&e))
    }
}

/// First segment of a dotted path.
pub fn root_of(path: &str) -> &str {
    path.split_once('.').map_or(path, |(root, _)| root)
}

/// Human-readable reason carried by a template engine error.
pub(crate) fn describe(err: &minijinja::Error) -> String {
    match err.detail() {
        Some(detail) => format!("{}: {detail}", err.kind()),
        None => err.kind().to_string(),
    }
}

fn syntax_error(err: &minijinja::Error) -> CatalogError {
    CatalogError::TemplateSyntax {
        line: err.line().unwrap_or(0),
        message: describe(err),
    }
}
