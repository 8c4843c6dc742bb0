//! Command-line entry point.
//!
//! Argument handling mirrors the tool's operations one to one: search and
//! listing flags, export, root probe, and the default request flow. All
//! real work happens in the library; this binary only parses arguments,
//! initializes logging, and maps errors to a non-zero exit.

use clap::{CommandFactory, Parser};
use rtr::collection::Collection;
use rtr::commands::{self, CommandError};
use rtr::config::Config;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "rtr", about = "REST Tester", version)]
struct Cli {
    /// Find APIs by the name.
    #[arg(short = 'n', long)]
    name: bool,

    /// Find APIs by the name and request the first match.
    #[arg(long, visible_alias = "nr")]
    name_request: bool,

    /// Find APIs by the name and export the body sample of the first match.
    #[arg(long, visible_alias = "ne")]
    name_export: bool,

    /// Find APIs by the URI.
    #[arg(short = 'u', long)]
    uri: bool,

    /// Find APIs by all items (URI, name, body sample, folder).
    #[arg(short = 'a', long)]
    all: bool,

    /// Show all APIs.
    #[arg(short = 'l', long)]
    list: bool,

    /// Export the request body sample by index.
    #[arg(short = 'e', long)]
    export: bool,

    /// Request the endpoint root.
    #[arg(short = 'r', long)]
    root: bool,

    /// Request as multipart with the given part title.
    #[arg(short = 'm', long, value_name = "TITLE")]
    multipart: Option<String>,

    /// Show request and response headers.
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Configuration file to use.
    #[arg(short = 'c', long, value_name = "PATH", default_value = "config.yaml")]
    config: PathBuf,

    /// [index] | [keyword] [path_var1 path_var2 ...] [query_params] [request_file]
    #[arg(value_name = "parameter")]
    parameters: Vec<String>,
}

fn first_parameter(cli: &Cli) -> Result<&str, CommandError> {
    cli.parameters
        .first()
        .map(String::as_str)
        .ok_or_else(|| CommandError::BadArgument("A search keyword is required".to_string()))
}

fn run(cli: &Cli) -> Result<(), CommandError> {
    let config = Config::load(&cli.config)?;
    let collection = Collection::load(&config.postman_file)?;
    let multipart = cli.multipart.as_deref();

    if cli.name {
        for line in commands::find_by_name(&collection, &config, first_parameter(cli)?)? {
            println!("{}", line);
        }
    } else if cli.name_request {
        commands::run_request_by_name(
            &collection,
            &config,
            first_parameter(cli)?,
            &cli.parameters[1..],
            multipart,
            cli.verbose,
        )?;
    } else if cli.name_export {
        let key = first_parameter(cli)?;
        let index = commands::find_index_by_name(&collection, key)?
            .ok_or_else(|| CommandError::NotFound(key.to_string()))?;
        println!("{}", commands::export_sample(&collection, index as i64)?);
    } else if cli.uri {
        for line in commands::find_by_uri(&collection, &config, first_parameter(cli)?)? {
            println!("{}", line);
        }
    } else if cli.all {
        for line in commands::find_by_all(&collection, &config, first_parameter(cli)?)? {
            println!("{}", line);
        }
    } else if cli.list {
        for line in commands::list_apis(&collection, &config)? {
            println!("{}", line);
        }
    } else if cli.export {
        let index: i64 = first_parameter(cli)?
            .parse()
            .map_err(|_| CommandError::BadArgument("Export takes an API index".to_string()))?;
        println!("{}", commands::export_sample(&collection, index)?);
    } else if cli.root {
        commands::request_root(&config, cli.verbose)?;
    } else {
        commands::run_request(
            &collection,
            &config,
            &cli.parameters,
            multipart,
            cli.verbose,
        )?;
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    // No operation selected and nothing to request: show usage.
    let wants_something = cli.name
        || cli.name_request
        || cli.name_export
        || cli.uri
        || cli.all
        || cli.list
        || cli.export
        || cli.root
        || !cli.parameters.is_empty();
    if !wants_something {
        let _ = Cli::command().print_help();
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
