//! apidoc — build the documentation site's `config.json` from the API doc
//! comments of every library package.
//!
//! Reads the table of contents from `documentation.yml`, runs the
//! documentation extractor on each package's entry file one at a time, and
//! writes the normalized module tree to `docs/config.json`. Run from the
//! repository root with no arguments, or point the flags elsewhere:
//!
//! `apidoc -C ../turf -o site/config.json --keep-going`

mod error;
mod extract;
mod logger;
mod manifest;
mod metadata;
mod normalize;
mod output;
mod packages;
mod render;
mod sequence;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "apidoc",
    about = "Generate the documentation site config from API doc comments"
)]
struct Cli {
    /// Base directory for every relative path below
    #[arg(short = 'C', long, default_value = ".")]
    root: PathBuf,

    /// Table-of-contents manifest (YAML)
    #[arg(short = 'm', long, default_value = "documentation.yml")]
    manifest: PathBuf,

    /// Glob matching every package descriptor
    #[arg(short = 'p', long, default_value = "packages/turf-*/package.json")]
    packages: String,

    /// Entry file name next to each package descriptor
    #[arg(short = 'e', long, default_value = "index.js")]
    entry: String,

    /// Output config file
    #[arg(short = 'o', long, default_value = "docs/config.json")]
    output: PathBuf,

    /// Extractor command; the entry file is appended as the last argument
    #[arg(
        short = 'x',
        long,
        default_value = "npx documentation build --shallow --format json"
    )]
    extractor: String,

    /// Skip packages whose extraction fails instead of aborting
    #[arg(long)]
    keep_going: bool,

    /// Debug logging
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Only log errors
    #[arg(short = 'q', long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose, cli.quiet);
    build(&cli)
}

fn build(cli: &Cli) -> Result<()> {
    let manifest = manifest::Manifest::load(&cli.root.join(&cli.manifest))?;
    let mut site = manifest.skeleton()?;
    let links = manifest.links();
    info!(
        "{} groups, {} modules, {} link paths in manifest",
        site.modules.len(),
        site.entries().count(),
        links.len()
    );

    let pattern = cli.root.join(&cli.packages);
    let packages = packages::discover(&pattern.to_string_lossy(), &cli.entry)?;
    info!("documenting {} packages", packages.len());

    let mut extractor = extract::CommandExtractor::parse(&cli.extractor)?;
    let normalizer = normalize::Normalizer::new(&links);
    let policy = if cli.keep_going {
        sequence::FailurePolicy::KeepGoing
    } else {
        sequence::FailurePolicy::Abort
    };
    let summary = sequence::run(&packages, &mut extractor, &mut site, &normalizer, policy)
        .context("documentation extraction failed; no output written")?;

    let undocumented: Vec<&str> = site
        .entries()
        .filter(|entry| entry.docs.is_none())
        .map(|entry| entry.name.as_str())
        .collect();
    if !undocumented.is_empty() {
        info!("no documentation found for: {}", undocumented.join(", "));
    }

    let out_path = cli.root.join(&cli.output);
    output::write(&site, &out_path)?;
    info!(
        "wrote {} ({} modules documented from {} packages, {} skipped)",
        out_path.display(),
        summary.documented,
        summary.processed,
        summary.skipped
    );
    Ok(())
}
