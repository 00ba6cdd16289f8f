use std::{
    collections::BTreeMap,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rowquery::*;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

const ENV_LOG: &str = "ROWQUERY_LOG";
const DEFAULT_CONFIG_FILE: &str = "rowquery.toml";

/// Build table SQL and filter strings from JSON descriptions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults to ./rowquery.toml when present.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the select, count or delete statement of a table page
    Rows(RowsArgs),
    /// Build a statement from a JSON statement description
    Query(QueryArgs),
    /// Encode active filters to a filter string
    Encode(EncodeArgs),
    /// Decode a filter string to JSON
    Decode(DecodeArgs),
    /// Flatten facet counts to per value totals
    Facets(FacetsArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RowsOperation {
    Select,
    Count,
    Delete,
}

impl From<RowsOperation> for OperationKind {
    fn from(op: RowsOperation) -> Self {
        match op {
            RowsOperation::Select => OperationKind::Select,
            RowsOperation::Count => OperationKind::Count,
            RowsOperation::Delete => OperationKind::Delete,
        }
    }
}

#[derive(Debug, Args)]
struct RowsArgs {
    #[arg(value_enum)]
    operation: RowsOperation,
    /// Path to the table description JSON file
    #[arg(short, long)]
    table: PathBuf,
    /// Path to the request JSON file. If empty, stdin will be used.
    request: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct QueryArgs {
    /// Table name
    #[arg(short, long)]
    table: String,
    /// Schema name. Defaults to the configured default schema.
    #[arg(short, long)]
    schema: Option<String>,
    /// Path to the statement description JSON file. If empty, stdin will be used.
    description: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct EncodeArgs {
    /// Path to the filter fields JSON file
    #[arg(short, long)]
    fields: PathBuf,
    /// Path to a JSON array of `{id, value}` filters. If empty, stdin will be used.
    filters: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct DecodeArgs {
    /// Path to the filter fields JSON file
    #[arg(short, long)]
    fields: PathBuf,
    /// The filter string. If empty, stdin will be used.
    input: Option<String>,
}

#[derive(Debug, Args)]
struct FacetsArgs {
    /// Path to a JSON array of `{value, total}` rows. If empty, stdin will be used.
    facets: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
enum StatementDescription {
    Select {
        #[serde(default = "all_columns")]
        columns: String,
    },
    Count,
    Delete {
        #[serde(default)]
        returning: ReturningOptions,
    },
    Insert {
        rows: Vec<Row>,
        #[serde(default)]
        returning: ReturningOptions,
    },
    Update {
        row: Row,
        #[serde(default)]
        returning: ReturningOptions,
    },
    Truncate {
        #[serde(default)]
        cascade: bool,
    },
}

fn all_columns() -> String {
    "*".to_string()
}

#[derive(Debug, Deserialize)]
struct QueryDescription {
    #[serde(flatten)]
    statement: StatementDescription,
    #[serde(default)]
    filters: Vec<Filter>,
    #[serde(default)]
    sorts: Vec<Sort>,
    /// Inclusive `[from, to]` row window.
    #[serde(default)]
    range: Option<(u64, u64)>,
}

fn init_logging() {
    let filter = std::env::var(ENV_LOG)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string());

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(io::stderr)
        .compact()
        .with_env_filter(filter)
        .init();
}

fn get_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
    Ok(buffer)
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    path.map_or_else(get_stdin, read_file)
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    let path = match path {
        Some(path) => path,
        None if default_path.exists() => default_path,
        None => return Ok(Config::default()),
    };
    debug!(path = %path.display(), "loading configuration");
    toml::from_str(&read_file(path)?)
        .with_context(|| format!("Invalid configuration in {}", path.display()))
}

fn rows(args: RowsArgs, options: &Options) -> Result<String> {
    let table = Table::from_json_in(&read_file(&args.table)?, &options.default_schema)?;
    let request: RowsRequest =
        serde_json::from_str(&read_input(args.request.as_deref())?).context("Invalid request JSON")?;
    Ok(RowQuery::new(&table, options).build(args.operation.into(), &request)?)
}

fn query(args: QueryArgs, options: &Options) -> Result<String> {
    let description: QueryDescription =
        serde_json::from_str(&read_input(args.description.as_deref())?)
            .context("Invalid statement description JSON")?;
    let schema = args.schema.unwrap_or_else(|| options.default_schema.clone());
    let action = Query::from(args.table, schema);
    let filter = match description.statement {
        StatementDescription::Select { columns } => action.select(columns),
        StatementDescription::Count => action.count(),
        StatementDescription::Delete { returning } => action.delete(returning),
        StatementDescription::Insert { rows, returning } => action.insert(rows, returning),
        StatementDescription::Update { row, returning } => action.update(row, returning),
        StatementDescription::Truncate { cascade } => action.truncate(cascade),
    }
    .filters(description.filters)
    .sorts(description.sorts);
    let dialect = options.dialect.as_ref();
    let sql = match description.range {
        Some((from, to)) => filter.range(from, to)?.to_sql(dialect)?,
        None => filter.to_sql(dialect)?,
    };
    Ok(sql)
}

fn codec(fields: &Path, options: &Options) -> Result<FilterCodec> {
    Ok(FilterCodec::from_json(&read_file(fields)?, options.delimiters)?)
}

fn encode(args: EncodeArgs, options: &Options) -> Result<String> {
    let codec = codec(&args.fields, options)?;
    let filters: Vec<ColumnFilter> = serde_json::from_str(&read_input(args.filters.as_deref())?)
        .context("Invalid filters JSON")?;
    Ok(codec.encode(&filters).trim_end().to_string())
}

fn decode(args: DecodeArgs, options: &Options) -> Result<String> {
    let codec = codec(&args.fields, options)?;
    let input = match args.input {
        Some(input) => input,
        None => get_stdin()?,
    };
    Ok(serde_json::to_string_pretty(&codec.decode(&input))?)
}

/// Facet values are compared by their JSON text, so `1` and `"1"` stay distinct.
fn facet_label(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn facet_totals(input: &str) -> Result<BTreeMap<String, u64>> {
    let rows: Vec<FacetRow<Value>> = serde_json::from_str(input).context("Invalid facets JSON")?;
    let entries = rows.into_iter().map(|row| {
        let key = match row.value {
            FacetKey::One(v) => FacetKey::One(facet_label(v)),
            FacetKey::Many(vs) => FacetKey::Many(vs.into_iter().map(facet_label).collect()),
        };
        (key, row.total)
    });
    Ok(aggregate_facets(entries).into_iter().collect())
}

fn facets(args: FacetsArgs) -> Result<String> {
    let totals = facet_totals(&read_input(args.facets.as_deref())?)?;
    Ok(serde_json::to_string_pretty(&totals)?)
}

fn run(cli: Cli) -> Result<String> {
    let config = load_config(cli.config.as_deref())?;
    let options = Options::try_from(config)?;
    match cli.command {
        Command::Rows(args) => rows(args, &options),
        Command::Query(args) => query(args, &options),
        Command::Encode(args) => encode(args, &options),
        Command::Decode(args) => decode(args, &options),
        Command::Facets(args) => facets(args),
    }
}

fn main() -> Result<()> {
    init_logging();
    let output = run(Cli::parse())?;
    println!("{output}");
    Ok(())
}
