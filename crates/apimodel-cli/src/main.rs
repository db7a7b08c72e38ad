//! apimodel CLI
//!
//! - `model`: generate Swagger definitions for one table of a catalog
//! - `catalog`: print the entity catalog derived from SQL DDL

use anyhow::{Context, Result};
use apimodel_core::{create_api_model, GenerateOptions, RelationshipMode, SwaggerRegistry};
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod input;

#[derive(Parser)]
#[command(name = "apimodel")]
#[command(
    author,
    version,
    about = "API model schemas from relational table metadata"
)]
struct Cli {
    /// Increase log verbosity (`-v` for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Swagger definitions for a table (input: `.sql` DDL or `.json` catalog)
    Model(ModelArgs),

    /// Print the entity catalog derived from SQL DDL as JSON
    Catalog {
        /// Input SQL file
        input: PathBuf,
        /// Output JSON (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ModelArgs {
    /// Input `.sql` DDL or `.json` catalog
    input: PathBuf,
    /// Table to generate the model for
    #[arg(long)]
    table: String,
    /// Registered model name (default: capitalized table name)
    #[arg(long)]
    name: Option<String>,
    /// Column allow-list; relationships are not expanded when set
    #[arg(long, value_delimiter = ',')]
    fields: Option<Vec<String>>,
    /// Attributes forced read-only
    #[arg(long, value_delimiter = ',')]
    readonly: Vec<String>,
    /// Primary keys shown as regular fields
    #[arg(long, value_delimiter = ',')]
    show: Vec<String>,
    /// Attributes left out entirely
    #[arg(long, value_delimiter = ',')]
    ignore: Vec<String>,
    /// camelCase output names
    #[arg(long)]
    camel_case: bool,
    /// Expand relationships into nested models
    #[arg(long)]
    nested: bool,
    /// Bound on nested expansion depth
    #[arg(long)]
    max_depth: Option<usize>,
    /// JSON file with generation options; flags are applied on top
    #[arg(long)]
    options: Option<PathBuf>,
    /// Output JSON (stdout when omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

impl ModelArgs {
    fn generate_options(&self) -> Result<GenerateOptions> {
        let base = match &self.options {
            Some(path) => input::load_options(path)?,
            None => GenerateOptions::default(),
        };
        Ok(self.overlay(base))
    }

    fn overlay(&self, mut opts: GenerateOptions) -> GenerateOptions {
        if let Some(name) = &self.name {
            opts.name = Some(name.clone());
        }
        if let Some(fields) = &self.fields {
            opts.fields = Some(fields.clone());
        }
        opts.readonly.extend(self.readonly.iter().cloned());
        opts.show.extend(self.show.iter().cloned());
        opts.ignore.extend(self.ignore.iter().cloned());
        opts.camel_case |= self.camel_case;
        if self.nested {
            opts.relationships = RelationshipMode::Nested;
        }
        if let Some(depth) = self.max_depth {
            opts.max_depth = depth;
        }
        opts
    }
}

fn init_tracing(verbose: u8) {
    let level = if verbose > 0 { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Model(args) => cmd_model(&args),
        Commands::Catalog { input, out } => cmd_catalog(&input, out.as_deref()),
    }
}

fn cmd_model(args: &ModelArgs) -> Result<()> {
    eprintln!(
        "{} model for {} from {}",
        "Generating".green().bold(),
        args.table.bold(),
        args.input.display()
    );

    let options = args.generate_options()?;
    let catalog = input::load_catalog(&args.input)?;

    let mut registry = SwaggerRegistry::new();
    let model = create_api_model(&mut registry, &catalog, &args.table, &options)
        .with_context(|| format!("generating model for table `{}`", args.table))?;

    let doc = json!({ "definitions": registry.definitions() });
    emit(&serde_json::to_string_pretty(&doc)?, args.out.as_deref())?;
    eprintln!(
        "  {} {} ({} definitions)",
        "→".cyan(),
        model.name.bold(),
        registry.len()
    );
    Ok(())
}

fn cmd_catalog(input: &Path, out: Option<&Path>) -> Result<()> {
    eprintln!("{} SQL schema {}", "Ingesting".green().bold(), input.display());

    let text = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let catalog = apimodel_ingest_sql::parse_sql_ddl(&text)?;

    emit(&serde_json::to_string_pretty(&catalog)?, out)?;
    let relationships: usize = catalog.entities.iter().map(|e| e.relationships.len()).sum();
    eprintln!(
        "  {} {} tables, {} relationships",
        "→".yellow(),
        catalog.entities.len(),
        relationships
    );
    Ok(())
}

fn emit(json: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("{} {}", "wrote".green().bold(), path.display().to_string().bold());
        }
        None => println!("{json}"),
    }
    Ok(())
}
