mod config;
mod logging;
mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use openmock_core::{Error as CoreError, HttpMethod};
use openmock_correlate::CorrelationEngine;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use config::{ConfigOverrides, OpenmockConfig};
use logging::{LogFormat, init_logging};
use session::Session;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("not found: {0}")]
    NotFound(String),
}

#[derive(Parser, Debug)]
#[command(name = "openmock", version, about = "OpenAPI mock data and correlation CLI")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Path to openmock.toml.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Directory scanned for OpenAPI documents.
    #[arg(long, global = true, value_name = "DIR")]
    specs_dir: Option<PathBuf>,
    /// Seed for reproducible records.
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Records generated per schema.
    #[arg(long, global = true, value_name = "N")]
    count: Option<usize>,
    /// Log output format on stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List parsed contracts.
    Contracts {
        #[arg(long)]
        category: Option<String>,
    },
    /// Distinct contract categories.
    Categories,
    /// Show one contract in full.
    Contract { name: String },
    /// Records stored for a contract, as searched by `correlate`.
    Data { contract: String },
    /// Stored records of one contract schema.
    Mock {
        contract: String,
        #[arg(long)]
        schema: String,
    },
    /// Print the correlation graph and rules.
    Graph,
    /// Rules touching a contract.
    Rules { contract: String },
    /// Shortest rule chain between two contracts.
    Chain { start: String, end: String },
    /// Records correlated with the first record whose FIELD equals VALUE.
    Correlate {
        contract: String,
        field: String,
        value: String,
    },
    /// Mocked response for one contract endpoint.
    Query {
        contract: String,
        #[arg(value_parser = parse_method)]
        method: HttpMethod,
        path: String,
    },
}

fn parse_method(value: &str) -> Result<HttpMethod, String> {
    HttpMethod::parse(value).ok_or_else(|| format!("unsupported HTTP method '{value}'"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    init_logging(cli.global.log_format)?;

    let overrides = ConfigOverrides {
        specs_dir: cli.global.specs_dir.clone(),
        records_per_schema: cli.global.count,
        seed: cli.global.seed,
    };
    let config = OpenmockConfig::load(cli.global.config.as_deref())?.apply(&overrides);

    match cli.command {
        Command::Contracts { category } => {
            let session = Session::open(config)?;
            print_json(&session.summaries(category.as_deref()))
        }
        Command::Categories => {
            let session = Session::open(config)?;
            print_json(&session.categories())
        }
        Command::Contract { name } => {
            let session = Session::open(config)?;
            print_json(session.find_contract(&name)?)
        }
        Command::Data { contract } => {
            let mut session = Session::open(config)?;
            print_json(session.data(&contract)?)
        }
        Command::Mock { contract, schema } => {
            let mut session = Session::open(config)?;
            let records = session.mock(&contract, &schema)?;
            print_json(&records)
        }
        Command::Graph => {
            let rules = config.rule_set()?;
            let engine = CorrelationEngine::new(rules);
            print_json(&json!({
                "graph": engine.correlation_graph(),
                "rules": engine.rules().as_slice(),
            }))
        }
        Command::Rules { contract } => {
            let engine = CorrelationEngine::new(config.rule_set()?);
            print_json(&engine.rules_for_contract(&contract))
        }
        Command::Chain { start, end } => {
            let engine = CorrelationEngine::new(config.rule_set()?);
            let chain = engine.correlation_chain(&start, &end).ok_or_else(|| {
                CliError::NotFound(format!("correlation chain from '{start}' to '{end}'"))
            })?;
            print_json(&chain)
        }
        Command::Correlate {
            contract,
            field,
            value,
        } => {
            let mut session = Session::open(config)?;
            print_json(&session.correlate(&contract, &field, &value)?)
        }
        Command::Query {
            contract,
            method,
            path,
        } => {
            let mut session = Session::open(config)?;
            print_json(&session.query(&contract, method, &path)?)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
