//! Exemplar CLI - compile query-by-example grids to SQL
//!
//! Usage:
//!   exemplar compile <rows.json> --catalog <catalog.json>
//!   exemplar validate <rows.json>
//!
//! Examples:
//!   exemplar compile demos/books.rows.json --catalog demos/books.catalog.json
//!   exemplar compile rows.json --catalog catalog.json --output json

use clap::{Parser, Subcommand, ValueEnum};
use exemplar::catalog::StaticCatalog;
use exemplar::compiler::{compile, QueryPlan};
use exemplar::criteria::Criteria;
use exemplar::row::{canonical_model, Row, SortDir};
use exemplar::sql::{render_with, EmptyWhere};
use exemplar::validation::validate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "exemplar")]
#[command(about = "Exemplar - compile query-by-example grids to parameterized SQL")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a grid of rows to SQL
    Compile {
        /// Path to the rows JSON file
        rows: PathBuf,

        /// Path to the catalog snapshot JSON file
        #[arg(short, long)]
        catalog: PathBuf,

        /// What to emit when no predicates survive compilation
        #[arg(long, default_value = "omit")]
        empty_where: EmptyWhereArg,

        /// Output format
        #[arg(short, long, default_value = "sql")]
        output: OutputFormat,
    },

    /// Validate a grid without generating SQL
    Validate {
        /// Path to the rows JSON file
        rows: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EmptyWhereArg {
    Omit,
    Tautology,
}

impl From<EmptyWhereArg> for EmptyWhere {
    fn from(arg: EmptyWhereArg) -> Self {
        match arg {
            EmptyWhereArg::Omit => EmptyWhere::Omit,
            EmptyWhereArg::Tautology => EmptyWhere::Tautology,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// The SQL text, with params on a trailing comment line
    Sql,
    /// The full rendered query as a JSON document
    Json,
}

/// One grid row as the widget layer submits it: `criteria` is the raw
/// textual expression, cleaned into a typed pair while loading.
#[derive(Deserialize)]
struct RawRow {
    model: String,
    field: String,
    #[serde(default)]
    show: bool,
    #[serde(default)]
    criteria: Option<String>,
    #[serde(default)]
    sort: SortDir,
}

impl From<RawRow> for Row {
    fn from(raw: RawRow) -> Self {
        Row {
            model: canonical_model(&raw.model),
            field: raw.field,
            show: raw.show,
            criteria: raw.criteria.as_deref().and_then(Criteria::parse),
            sort: raw.sort,
        }
    }
}

fn load_rows(path: &Path) -> Result<Vec<Row>, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let raw: Vec<RawRow> = serde_json::from_str(&text)
        .map_err(|e| format!("invalid rows file {}: {}", path.display(), e))?;
    Ok(raw.into_iter().map(Row::from).collect())
}

fn load_catalog(path: &Path) -> Result<StaticCatalog, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&text)
        .map_err(|e| format!("invalid catalog file {}: {}", path.display(), e))
}

fn report_warnings(plan: &QueryPlan) {
    for warning in &plan.warnings {
        eprintln!("warning: {}", warning);
    }
}

fn cmd_compile(
    rows: &Path,
    catalog: &Path,
    empty_where: EmptyWhere,
    output: OutputFormat,
) -> Result<(), String> {
    let rows = load_rows(rows)?;
    let catalog = load_catalog(catalog)?;

    validate(&rows).map_err(|e| e.to_string())?;
    let plan = compile(&rows, &catalog).map_err(|e| e.to_string())?;
    report_warnings(&plan);
    let rendered = render_with(&plan, empty_where);

    match output {
        OutputFormat::Sql => {
            println!("{}", rendered.sql);
            if !rendered.params.is_empty() {
                let params = serde_json::to_string(&rendered.params)
                    .map_err(|e| format!("cannot serialize params: {}", e))?;
                println!("-- params: {}", params);
            }
        }
        OutputFormat::Json => {
            let doc = serde_json::to_string_pretty(&rendered)
                .map_err(|e| format!("cannot serialize query: {}", e))?;
            println!("{}", doc);
        }
    }
    Ok(())
}

fn cmd_validate(rows: &Path) -> Result<(), String> {
    let rows = load_rows(rows)?;
    validate(&rows).map_err(|e| e.to_string())?;
    let shown = rows.iter().filter(|r| r.show).count();
    println!("OK: {} rows, {} shown", rows.len(), shown);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            rows,
            catalog,
            empty_where,
            output,
        } => cmd_compile(&rows, &catalog, empty_where.into(), output),
        Commands::Validate { rows } => cmd_validate(&rows),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}
