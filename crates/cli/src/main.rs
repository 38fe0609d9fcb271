use crate::{env::EnvManager, error::CliError};
use clap::Parser;
use commands::Commands;
use grid_filter::{CompilerConfig, CompoundKey, GridQueryCompiler, GridRequest};
use model::{core::data_type::SqlDialect, schema::ClassSchema};
use std::io::Read;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod env;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "gridsql",
    version = "0.1.0",
    about = "Compile grid filter and sort requests into SQL"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Log debug output")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Compile {
            schema,
            request,
            config,
            env_file,
            dialect,
            language,
            timezone,
            output,
            json,
        } => {
            let mut config = load_config(config.as_deref(), env_file.as_deref())?;
            if let Some(dialect) = dialect {
                config.dialect = dialect
                    .parse::<SqlDialect>()
                    .map_err(|e| CliError::Config(e.to_string()))?;
            }
            if let Some(language) = language {
                config.default_language = Some(language);
            }
            if let Some(timezone) = timezone {
                config.timezone = timezone;
            }
            debug!("Effective compiler config: {:?}", config);

            let schema = ClassSchema::from_json(&std::fs::read_to_string(&schema)?)?;
            let request = GridRequest::from_json(&read_input(&request)?)?;

            let compiler = GridQueryCompiler::new(config)?;
            let compiled = compiler.compile(&schema, &request)?;
            info!(
                "Compiled request with {} join(s), sorted: {}",
                compiled.joins.len(),
                compiled.sort.is_some()
            );

            match output {
                Some(path) => output::write_compiled(&compiled, json, &path)?,
                None => output::print_compiled(&compiled, json)?,
            }
        }
        Commands::ParseKey { key } => {
            let parsed = CompoundKey::parse(&key)?;
            println!("{}", output::to_json(&parsed)?);
        }
    }

    Ok(())
}

/// Settings file first, then `GRIDSQL_*` variables from the environment and
/// the optional .env file.
fn load_config(path: Option<&str>, env_file: Option<&str>) -> Result<CompilerConfig, CliError> {
    let config = match path {
        Some(path) => CompilerConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => CompilerConfig::default(),
    };

    let mut env = EnvManager::new();
    if let Some(env_file) = env_file {
        env.load_from_file(env_file)?;
    }
    env.apply(config)
}

fn read_input(path: &str) -> Result<String, CliError> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}
