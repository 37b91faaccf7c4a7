//! catalog – command-line product catalog generator.
//!
//! Usage:
//!   catalog --data products.xlsx --template page.html --output catalog.pdf [--items-per-page 9]
//!
//! The template is compiled once and reused for every page; the assembled
//! document is rendered to PDF (or written as HTML when the output ends in
//! `.html` or `--format html` is given).

mod cli;

use std::fs;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use catalog_forge::pipeline::{generate_catalog, plan_pages};
use catalog_forge::render::{DocumentRenderer, HtmlRenderer, PdfRenderer};
use catalog_forge::{source, templates, CatalogError, CompiledTemplate};

use crate::cli::{Cli, OutputFormat};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(err) = run(&cli) {
        log::error!("Catalog generation failed: {err:#}");
        let code = err
            .downcast_ref::<CatalogError>()
            .map(CatalogError::exit_code)
            .unwrap_or(1);
        process::exit(code);
    }
}

fn run(cli: &Cli) -> Result<()> {
    if cli.print_template {
        print!("{}", templates::catalog_template());
        return Ok(());
    }

    // clap enforces these unless --print-template is given.
    let (Some(data), Some(template_path), Some(output)) = (&cli.data, &cli.template, &cli.output)
    else {
        anyhow::bail!("--data, --template and --output are required");
    };

    let config = cli.to_config(output)?;
    let records = source::load_records(data)?;
    let template = CompiledTemplate::from_file(template_path)?;

    if let Some(path) = &cli.dump_contexts {
        let plan = plan_pages(&records, config.items_per_page)?;
        let json = serde_json::to_string_pretty(&plan).context("serialising page contexts")?;
        write_output(path, json.as_bytes())?;
        log::info!("Page contexts written: {}", path.display());
    }

    let renderer: Box<dyn DocumentRenderer> = match cli.output_format(output) {
        OutputFormat::Pdf => Box::new(PdfRenderer::new(&config)),
        OutputFormat::Html => Box::new(HtmlRenderer),
    };

    let catalog = generate_catalog(&records, &template, &config, renderer.as_ref())?;

    if let Some(path) = &cli.html_preview {
        write_output(path, catalog.document.as_str().as_bytes())?;
        log::info!("HTML preview: {}", path.display());
    }

    match catalog.output {
        Some(bytes) => {
            write_output(output, &bytes)?;
            let pages = catalog.document.page_count();
            log::info!(
                "Wrote '{}' ({} bytes, {} page{})",
                output.display(),
                bytes.len(),
                pages,
                if pages == 1 { "" } else { "s" }
            );
        }
        None => log::warn!("No products found; '{}' was not written", output.display()),
    }

    log::info!("Catalog generation completed successfully");
    Ok(())
}

/// Write `bytes` to `path`, creating the parent directory if necessary.
fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory '{}'", parent.display()))?;
        }
    }
    fs::write(path, bytes).with_context(|| format!("writing '{}'", path.display()))
}
