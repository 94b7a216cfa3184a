//! Main entry point for the notepluck CLI.
//!
//! This binary extracts attachments (audio recordings, images, PDFs) from
//! note-taking app containers, from both local files and remote HTTP URLs.

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notepluck::attach::{ExtractOptions, Registry, Session, SourceArchive, extract};
use notepluck::save::{SaveOutcome, save_attachment};
use notepluck::{Cli, HttpRangeReader, LocalFileReader, ReadAt, logging};

/// Application entry point.
///
/// Parses command-line arguments, opens every submitted container (local
/// path or HTTP URL), runs the extraction pipeline, and either lists the
/// results or saves them.
#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    // Open each container in submission order. A URL gets a Range reader,
    // anything else is treated as a local path.
    let mut sources = Vec::with_capacity(cli.files.len());
    for file in &cli.files {
        let reader: Arc<dyn ReadAt> = if is_http_url(file) {
            Arc::new(HttpRangeReader::new(file.clone()).await?)
        } else {
            Arc::new(LocalFileReader::new(Path::new(file))?)
        };
        sources.push(SourceArchive::new(source_display_name(file), reader));
    }

    let options = ExtractOptions {
        assume_audio: !cli.strict,
    };
    let results = extract(&sources, &options).await?;

    // No attachments (or none accepted) is a normal outcome, not an error.
    if results.is_empty() {
        if !cli.is_quiet() {
            println!(
                "No attachments found in {} container{}",
                cli.files.len(),
                if cli.files.len() > 1 { "s" } else { "" }
            );
        }
        return Ok(());
    }

    let mut session = Session::new()?;
    session.replace(results)?;

    if cli.list || cli.verbose {
        list_attachments(session.registry(), cli.verbose);
        return Ok(());
    }

    save_attachments(session.registry(), &cli).await;
    Ok(())
}

/// List extracted attachments.
///
/// Short format (`-l`) prints one suggested filename per line; verbose
/// format (`-v`) prints a table of rank, type, category, size, and source.
fn list_attachments(registry: &Registry, verbose: bool) {
    if !verbose {
        for attachment in registry.all() {
            println!("{}", attachment.download_name());
        }
        return;
    }

    println!(
        "{:>4}  {:<4}  {:<8}  {:>10}  Source",
        "Rank", "Type", "Category", "Size"
    );
    println!("{}", "-".repeat(60));

    let mut total_size = 0u64;
    for attachment in registry.all() {
        println!(
            "{:>4}  {:<4}  {:<8}  {:>10}  {}",
            attachment.rank,
            attachment.kind.extension,
            attachment.kind.category.as_str(),
            format_size(attachment.size),
            attachment.source
        );
        total_size += attachment.size;
    }

    println!("{}", "-".repeat(60));
    println!(
        "{:>4}  {:<4}  {:<8}  {:>10}  {} attachments",
        "",
        "",
        "",
        format_size(total_size),
        registry.len()
    );
}

/// Save every extracted attachment, sequentially, spaced by the configured
/// delay.
///
/// Existing files are skipped unless `-o` was given (`-n` skips without the
/// overwrite hint). A failed save is reported and does not stop the batch.
async fn save_attachments(registry: &Registry, cli: &Cli) {
    let dir = PathBuf::from(cli.extract_dir.as_deref().unwrap_or("."));
    let delay = Duration::from_millis(cli.delay_ms);

    let mut saved = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;
    let mut first = true;

    for attachment in registry.all() {
        if !first {
            tokio::time::sleep(delay).await;
        }
        first = false;

        match save_attachment(attachment, &dir, cli.overwrite).await {
            Ok(SaveOutcome::Saved(path)) => {
                saved += 1;
                if !cli.is_quiet() {
                    println!("   saving: {}", path.display());
                }
            }
            Ok(SaveOutcome::Skipped(_)) => {
                skipped += 1;
                if !cli.is_quiet() {
                    if cli.never_overwrite {
                        eprintln!("Skipping: {} (file exists)", attachment.download_name());
                    } else {
                        eprintln!(
                            "Skipping: {} (use -o to overwrite)",
                            attachment.download_name()
                        );
                    }
                }
            }
            Err(err) => {
                failed += 1;
                eprintln!("Failed: {}: {}", attachment.download_name(), err);
            }
        }
    }

    if !cli.is_quiet() {
        println!("\n{} saved, {} skipped, {} failed", saved, skipped, failed);
    }
}

/// Check whether a container argument refers to a remote source.
fn is_http_url(file: &str) -> bool {
    file.starts_with("http://") || file.starts_with("https://")
}

/// Derive a container's display name from its path or URL: the final
/// component, query string dropped for URLs.
fn source_display_name(file: &str) -> String {
    let trimmed = if is_http_url(file) {
        file.split(['?', '#']).next().unwrap_or(file)
    } else {
        file
    };
    trimmed
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(trimmed)
        .to_string()
}

/// Format a byte size into a human-readable string.
///
/// Automatically selects the appropriate unit (bytes, KB, MB, GB) based on
/// the size magnitude.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
