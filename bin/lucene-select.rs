use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lucene_select::{
    CompilerConfig, QueryParser, SchemaDocument, SelectBuilder, Selection, SqlDialect, SqlRenderer,
};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Parameterized SQL followed by the bound parameters
    Sql,
    /// The statement descriptor as JSON
    Json,
}

#[derive(Parser)]
#[command(name = "lucene-select")]
#[command(about = "Compile Lucene-style queries into SQL SELECT statements", long_about = None)]
struct Args {
    /// Schema document (models, root model, relationship map)
    #[arg(long, env = "LUCENE_SELECT_SCHEMA")]
    schema: PathBuf,

    /// Query tree in the JSON query DSL; omit to select everything
    #[arg(long, env = "LUCENE_SELECT_QUERY")]
    query: Option<String>,

    /// Compiler configuration file (JSON)
    #[arg(long, env = "LUCENE_SELECT_CONFIG")]
    config: Option<PathBuf>,

    /// SQL dialect profile (sqlite, postgres, mysql)
    #[arg(long, env = "LUCENE_SELECT_DIALECT")]
    dialect: Option<SqlDialect>,

    /// Output format
    #[arg(long, env = "LUCENE_SELECT_FORMAT", value_enum, default_value = "sql")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();
    info!("lucene-select v{}", lucene_select::VERSION);

    let schema = SchemaDocument::from_file(&args.schema)
        .and_then(SchemaDocument::load)
        .with_context(|| format!("loading schema {}", args.schema.display()))?;
    debug!(root = %schema.root.name, models = schema.catalog.len(), "Schema loaded");

    let mut config = match &args.config {
        Some(path) => CompilerConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CompilerConfig::default(),
    };
    if let Some(dialect) = args.dialect {
        config = config.with_dialect(dialect);
    }

    let builder = SelectBuilder::new(schema.root)
        .with_relationships(schema.relationships)
        .with_config(config.clone());

    let tree = match args.query.as_deref().map(str::trim) {
        Some(query) if !query.is_empty() => {
            Some(QueryParser::parse_str(query).context("parsing query")?)
        }
        _ => None,
    };

    let statement = builder
        .build(tree.as_ref(), Selection::AllColumns)
        .context("compiling query")?;

    match args.format {
        OutputFormat::Sql => {
            let rendered = SqlRenderer::from_config(&config).render(&statement);
            println!("{}", rendered.sql);
            for (i, param) in rendered.params.iter().enumerate() {
                println!("-- ${} = {}", i + 1, param);
            }
        }
        OutputFormat::Json => println!("{}", statement.to_json()?),
    }

    Ok(())
}
