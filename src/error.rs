//! Error types for the catalog pipeline.
//!
//! Every failure aborts the whole run; there is no per-page recovery. Each
//! variant belongs to one [`ErrorKind`] so callers can tell a bad data file
//! from a bad template without string matching.

use std::path::PathBuf;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Broad category of a [`CatalogError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The record set does not satisfy the required schema.
    DataValidation,
    /// Page capacity or template do not satisfy the pipeline's contract.
    Configuration,
    /// A substitution could not be resolved while binding a page.
    Binding,
    /// The tabular source could not be read.
    Source,
    /// The downstream renderer reported a failure.
    Render,
    /// File-system failure.
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("record set is missing required fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<String> },

    #[error("record {record} has no value for column '{field}'")]
    IncompleteRecord { record: usize, field: String },

    #[error("items per page must be a positive integer, got {capacity}")]
    InvalidCapacity { capacity: i64 },

    #[error("template syntax error on line {line}: {message}")]
    TemplateSyntax { line: usize, message: String },

    #[error("template is missing substitution points: {}", .missing.join(", "))]
    TemplateContract { missing: Vec<String> },

    #[error("template references unknown variables: {}", .names.join(", "))]
    UnknownVariables { names: Vec<String> },

    #[error("cannot bind page {page} at template line {line} `{excerpt}`: {reason}")]
    Binding {
        page: usize,
        line: usize,
        excerpt: String,
        reason: String,
    },

    #[error("failed to read records from {}: {message}", .path.display())]
    Source { path: PathBuf, message: String },

    #[error("renderer failed: {0}")]
    Render(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingFields { .. } | Self::IncompleteRecord { .. } => ErrorKind::DataValidation,
            Self::InvalidCapacity { .. }
            | Self::TemplateSyntax { .. }
            | Self::TemplateContract { .. }
            | Self::UnknownVariables { .. } => ErrorKind::Configuration,
            Self::Binding { .. } => ErrorKind::Binding,
            Self::Source { .. } => ErrorKind::Source,
            Self::Render(_) => ErrorKind::Render,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Name of the pipeline stage that raised the error.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::MissingFields { .. } | Self::IncompleteRecord { .. } => "validate",
            Self::InvalidCapacity { .. } => "paginate",
            Self::TemplateSyntax { .. } => "compile",
            Self::TemplateContract { .. } | Self::UnknownVariables { .. } | Self::Binding { .. } => {
                "bind"
            }
            Self::Source { .. } => "load",
            Self::Render(_) => "render",
            Self::Io { .. } => "io",
        }
    }

    /// Process exit code for the `catalog` binary.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::DataValidation => 65,
            ErrorKind::Configuration => 78,
            ErrorKind::Binding => 70,
            ErrorKind::Source => 66,
            ErrorKind::Render => 71,
            ErrorKind::Io => 74,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_message_names_every_field() {
        let err = CatalogError::MissingFields {
            fields: vec!["price".into(), "ref".into()],
        };
        assert_eq!(
            err.to_string(),
            "record set is missing required fields: price, ref"
        );
        assert_eq!(err.kind(), ErrorKind::DataValidation);
    }

    #[test]
    fn binding_message_includes_page_and_template_line() {
        let err = CatalogError::Binding {
            page: 2,
            line: 4,
            excerpt: "{{ item.price }}".into(),
            reason: "undefined value".into(),
        };
        assert_eq!(
            err.to_string(),
            "cannot bind page 2 at template line 4 `{{ item.price }}`: undefined value"
        );
        assert_eq!(err.stage(), "bind");
    }

    #[test]
    fn configuration_and_data_errors_are_distinguishable() {
        let config = CatalogError::TemplateContract {
            missing: vec!["{{ page_number }}".into()],
        };
        let data = CatalogError::MissingFields {
            fields: vec!["name".into()],
        };
        assert_ne!(config.kind(), data.kind());
        assert_ne!(config.exit_code(), data.exit_code());
    }
}
