//! formscope CLI - resolve tables and compile OData queries offline
//!
//! Usage:
//!   formscope resolve <table> [--catalog <catalog.json>]
//!   formscope attributes <table> [--catalog <catalog.json>]
//!   formscope compile <query.json> [--table <table>] [--catalog <catalog.json>]
//!
//! Examples:
//!   formscope resolve accounts --catalog ./catalog.json
//!   formscope compile filters.json --table accounts --diagnostics

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use formscope::config::Settings;
use formscope::metadata::{AttributeMetadataResolver, CatalogProvider};
use formscope::odata::{ODataQueryCompiler, QueryDefinition};

#[derive(Parser)]
#[command(name = "formscope")]
#[command(about = "formscope - metadata-aware OData query compiler")]
#[command(version)]
struct Cli {
    /// Metadata catalog (overrides the config file)
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    /// Config file (defaults to the standard search locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a table identifier to its canonical names
    Resolve {
        /// Collection name or logical name
        table: String,
    },

    /// Print the attribute type map of a table as JSON
    Attributes {
        /// Collection name or logical name
        table: String,
    },

    /// Compile a JSON query definition to an OData query string
    Compile {
        /// Path to the query definition
        file: PathBuf,

        /// Table whose attribute metadata drives type resolution
        #[arg(short, long)]
        table: Option<String>,

        /// Also list conditions that were dropped
        #[arg(short, long)]
        diagnostics: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    }
    .map_err(|e| e.to_string())?;

    match cli.command {
        Commands::Resolve { table } => {
            let resolver = open_resolver(&settings, cli.catalog).await?;
            let entity = resolver.resolve(&table).await.map_err(|e| e.to_string())?;
            println!("logical name: {}", entity.logical_name);
            println!("entity set:   {}", entity.entity_set);
            Ok(())
        }
        Commands::Attributes { table } => {
            let resolver = open_resolver(&settings, cli.catalog).await?;
            let entity = resolver.resolve(&table).await.map_err(|e| e.to_string())?;
            let attrs = resolver
                .get_attr_map(&entity.logical_name)
                .await
                .map_err(|e| e.to_string())?;

            // Sorted for stable output
            let sorted: std::collections::BTreeMap<_, _> = attrs.iter().collect();
            let json = serde_json::to_string_pretty(&sorted).map_err(|e| e.to_string())?;
            println!("{}", json);
            Ok(())
        }
        Commands::Compile {
            file,
            table,
            diagnostics,
        } => {
            let source = tokio::fs::read_to_string(&file)
                .await
                .map_err(|e| format!("reading '{}': {}", file.display(), e))?;
            let mut query: QueryDefinition =
                serde_json::from_str(&source).map_err(|e| format!("parsing query: {}", e))?;

            if let Some(table) = table {
                let resolver = open_resolver(&settings, cli.catalog).await?;
                let entity = resolver.resolve(&table).await.map_err(|e| e.to_string())?;
                let attrs = resolver
                    .get_attr_map(&entity.logical_name)
                    .await
                    .map_err(|e| e.to_string())?;
                query = query.with_attr_map(attrs);
            }

            let compiler = ODataQueryCompiler::new(settings.compile_options());
            let compiled = compiler.compile_with_diagnostics(&query);
            println!("{}", compiled.query);

            if diagnostics {
                for clause in &compiled.dropped {
                    eprintln!(
                        "dropped: group {} condition {}: {} {} ({})",
                        clause.group, clause.condition, clause.attr, clause.op, clause.reason
                    );
                }
            }
            Ok(())
        }
    }
}

async fn open_resolver(
    settings: &Settings,
    catalog: Option<PathBuf>,
) -> Result<AttributeMetadataResolver<CatalogProvider>, String> {
    let path = match catalog {
        Some(path) => path,
        None => settings
            .catalog_path()
            .map_err(|e| e.to_string())?
            .ok_or("no catalog given (use --catalog or [catalog] path in the config file)")?,
    };

    let provider = CatalogProvider::load(&path)
        .await
        .map_err(|e| format!("loading catalog '{}': {}", path.display(), e))?;

    Ok(AttributeMetadataResolver::new(Arc::new(provider)).with_options(settings.resolver_options()))
}
