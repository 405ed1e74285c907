use std::path::PathBuf;

use clap::Args;

use crate::catalog::genes::GeneCatalog;
use crate::cli::{parse_category, OutputFormat};
use crate::core::gene::GeneCatalogEntry;
use crate::core::types::{Category, InheritanceMode, NOT_AVAILABLE};

#[derive(Args)]
pub struct CatalogArgs {
    /// Gene catalog file (JSON document or recommendation-list CSV)
    #[arg(required_unless_present = "category")]
    pub catalog: Option<PathBuf>,

    /// Category whose default catalog to list (with --categories-dir)
    #[arg(long, value_parser = parse_category, conflicts_with = "catalog")]
    pub category: Option<Category>,

    /// Directory holding the per-category catalogs
    #[arg(long, default_value = "categories")]
    pub categories_dir: PathBuf,

    /// Only list genes with this inheritance mode (AD, SD, XL, AR)
    #[arg(long)]
    pub inheritance: Option<String>,
}

/// Execute catalog subcommand
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the filter is invalid.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CatalogArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let path = match (&args.catalog, args.category) {
        (Some(path), _) => path.clone(),
        (None, Some(Category::Pharmacogenomic)) => {
            anyhow::bail!("The pharmacogenomic category has a variant catalog, not a gene catalog")
        }
        (None, Some(category)) => GeneCatalog::default_path(&args.categories_dir, category),
        (None, None) => anyhow::bail!("Either a catalog file or --category is required"),
    };

    let filter = match &args.inheritance {
        Some(mode) => Some(
            InheritanceMode::parse(mode)
                .ok_or_else(|| anyhow::anyhow!("Unknown inheritance mode '{mode}'"))?,
        ),
        None => None,
    };

    let catalog = GeneCatalog::load_from_file(&path)?;
    let entries: Vec<&GeneCatalogEntry> = catalog
        .entries()
        .filter(|e| filter.map_or(true, |mode| e.inheritance == mode))
        .collect();

    match format {
        OutputFormat::Text => print_text(&catalog, &entries, verbose),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Tsv => print_tsv(&entries),
    }
    Ok(())
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_AVAILABLE
    } else {
        value
    }
}

fn print_text(catalog: &GeneCatalog, entries: &[&GeneCatalogEntry], verbose: bool) {
    if !catalog.category.is_empty() {
        println!("Category: {}", catalog.category);
    }
    println!("{} genes\n", entries.len());
    println!("{:<12} {:<4} {:<12} Phenotype", "Gene", "Mode", "Disorder");
    println!("{}", "-".repeat(60));
    for entry in entries {
        println!(
            "{:<12} {:<4} {:<12} {}",
            entry.gene_symbol,
            entry.inheritance,
            or_na(&entry.disorder_reference),
            or_na(&entry.phenotype)
        );
        if verbose && !entry.reporting_note.is_empty() {
            println!("{:>18} {}", "report:", entry.reporting_note);
        }
    }
}

fn print_tsv(entries: &[&GeneCatalogEntry]) {
    println!("gene\tinheritance\tphenotype\tdisorder\tlist_version\tvariants_to_report");
    for entry in entries {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            entry.gene_symbol,
            entry.inheritance,
            or_na(&entry.phenotype),
            or_na(&entry.disorder_reference),
            entry.list_version.as_deref().unwrap_or(NOT_AVAILABLE),
            or_na(&entry.reporting_note)
        );
    }
}
