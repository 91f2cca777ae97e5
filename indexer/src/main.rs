use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use inkpost_core::{ContentIndex, DirSource, Document};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "inkpost-indexer")]
#[command(about = "Validate and export a directory of markdown posts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse every post and report the ones that would be skipped
    Check {
        /// Content directory
        #[arg(long, default_value = "./content")]
        content: PathBuf,
        /// Exit with an error if any post was skipped or shadowed
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Write the parsed index as JSON
    Export {
        /// Content directory
        #[arg(long, default_value = "./content")]
        content: PathBuf,
        /// Output file; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct ExportFile<'a> {
    generated_at: String,
    count: usize,
    posts: &'a [Document],
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { content, strict } => check(&content, strict),
        Commands::Export { content, output } => export(&content, output.as_deref()),
    }
}

fn check(content: &Path, strict: bool) -> Result<()> {
    let source = DirSource::new(content);
    let (_index, report) = ContentIndex::build_with_report(&source)
        .with_context(|| format!("loading posts from {}", content.display()))?;

    for skipped in &report.skipped {
        println!("skipped {}: {}", skipped.name, skipped.reason);
    }
    for slug in &report.collisions {
        println!("duplicate slug {slug}: earlier post replaced");
    }
    println!(
        "{} loaded, {} skipped, {} duplicate slugs",
        report.loaded,
        report.skipped.len(),
        report.collisions.len()
    );

    if strict && !report.is_clean() {
        bail!("content check failed");
    }
    Ok(())
}

fn export(content: &Path, output: Option<&Path>) -> Result<()> {
    let source = DirSource::new(content);
    let index = ContentIndex::build(&source)
        .with_context(|| format!("loading posts from {}", content.display()))?;

    let generated_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .context("formatting export timestamp")?;
    let file = ExportFile {
        generated_at,
        count: index.len(),
        posts: index.list(),
    };

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    serde_json::to_writer_pretty(&mut writer, &file)?;
    writeln!(writer)?;
    writer.flush()?;

    if let Some(path) = output {
        tracing::info!(count = file.count, output = %path.display(), "export complete");
    }
    Ok(())
}
