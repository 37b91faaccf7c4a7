//! Command-line arguments for the `catalog` binary.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use catalog_forge::pagination::{capacity_from, DEFAULT_ITEMS_PER_PAGE};
use catalog_forge::{PageOrientation, PipelineConfig, Result};

/// Generate a paginated PDF catalog from tabular product data.
///
/// Products are read in order, split into pages of `--items-per-page`, and
/// each page is rendered through the same template.
#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(version)]
#[command(about = "Generate a paginated product catalog from spreadsheet data", long_about = None)]
pub struct Cli {
    /// Product data (xlsx, xls, ods, csv or json)
    #[arg(long, alias = "excel", value_name = "FILE", required_unless_present = "print_template")]
    pub data: Option<PathBuf>,

    /// Page template with {{ page_number }}, {{ total_pages }} and a
    /// {% for item in items %} region
    #[arg(long, value_name = "FILE", required_unless_present = "print_template")]
    pub template: Option<PathBuf>,

    /// Number of products per page
    #[arg(long, default_value_t = DEFAULT_ITEMS_PER_PAGE as i64, allow_negative_numbers = true)]
    pub items_per_page: i64,

    /// Output file
    #[arg(short, long, value_name = "FILE", required_unless_present = "print_template")]
    pub output: Option<PathBuf>,

    /// Output format (default: from the output extension, else pdf)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Document title embedded in PDF metadata (default: output file stem)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Use landscape page orientation
    #[arg(short, long)]
    pub landscape: bool,

    /// Also write the assembled HTML to this file
    #[arg(long, value_name = "FILE")]
    pub html_preview: Option<PathBuf>,

    /// Write the per-page contexts as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub dump_contexts: Option<PathBuf>,

    /// Print the bundled sample template and exit
    #[arg(long)]
    pub print_template: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pdf,
    Html,
}

impl Cli {
    /// Format requested explicitly, or inferred from the output path.
    pub fn output_format(&self, output: &Path) -> OutputFormat {
        self.format.unwrap_or_else(|| {
            match output.extension().and_then(|e| e.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm") => {
                    OutputFormat::Html
                }
                _ => OutputFormat::Pdf,
            }
        })
    }

    /// Build the pipeline configuration; rejects a non-positive page size.
    pub fn to_config(&self, output: &Path) -> Result<PipelineConfig> {
        let title = self.title.clone().unwrap_or_else(|| {
            output
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Product catalog")
                .to_string()
        });
        Ok(PipelineConfig {
            items_per_page: capacity_from(self.items_per_page)?,
            title,
            orientation: if self.landscape {
                PageOrientation::Landscape
            } else {
                PageOrientation::Portrait
            },
            ..PipelineConfig::default()
        })
    }
}
