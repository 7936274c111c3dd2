//! `unity-bridge`: run tool methods against an in-process editor host

use anyhow::{Context, Result};
use bridge_methods::prelude::*;
use bridge_methods::{load_config, logging};
use clap::{Arg, ArgMatches, Command};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs, process};

fn cli() -> Command {
    Command::new("unity-bridge")
        .version(bridge_methods::VERSION)
        .about("Declarative tool dispatch for editor automation")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .subcommand(Command::new("list").about("List registered tools"))
        .subcommand(
            Command::new("describe")
                .about("Print a tool's decision tree and parameters")
                .arg(Arg::new("tool").required(true).help("Tool name")),
        )
        .subcommand(
            Command::new("exec")
                .about("Execute one tool call")
                .arg(Arg::new("tool").required(true).help("Tool name"))
                .arg(Arg::new("args").help("Arguments as a JSON object")),
        )
        .subcommand(
            Command::new("batch")
                .about("Execute a JSON array of {func, args} calls in order")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Batch file"),
                ),
        )
}

fn load(matches: &ArgMatches) -> Result<BridgeConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => load_config(path).with_context(|| format!("loading {}", path.display())),
        None => Ok(BridgeConfig::default()),
    }
}

fn read_batch(path: &Path) -> Result<Vec<BatchCall>> {
    let content = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing batch file {}", path.display()))
}

fn print(response: &Response) -> Result<bool> {
    println!("{}", serde_json::to_string_pretty(&response.to_json())?);
    Ok(response.success)
}

fn run(matches: &ArgMatches) -> Result<bool> {
    let config = load(matches)?;
    logging::init(&config.logging);

    let host = Arc::new(EditorHost::from_config(&config));
    let registry = MethodRegistry::with_builtins(&host, &config.tools);
    tracing::debug!(tools = registry.len(), "registry ready");

    match matches.subcommand() {
        Some(("list", _)) => {
            for name in registry.names() {
                println!("{name}");
            }
            Ok(true)
        }
        Some(("describe", args)) => {
            let tool = args.get_one::<String>("tool").map_or("", String::as_str);
            println!("{}", registry.describe(tool)?);
            Ok(true)
        }
        Some(("exec", args)) => {
            let tool = args.get_one::<String>("tool").map_or("", String::as_str);
            let value = match args.get_one::<String>("args") {
                Some(raw) => serde_json::from_str(raw).context("arguments must be valid JSON")?,
                None => Value::Null,
            };
            print(&registry.execute_value(tool, value))
        }
        Some(("batch", args)) => {
            let path = args
                .get_one::<PathBuf>("file")
                .context("batch file is required")?;
            let calls = read_batch(path)?;
            print(&registry.execute_batch(&calls))
        }
        _ => Ok(true),
    }
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    let ok = run(&matches)?;
    if !ok {
        process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn exec_parses_tool_and_args() {
        let matches = cli()
            .try_get_matches_from(["unity-bridge", "exec", "manage_editor", r#"{"action":"play"}"#])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "exec");
        assert_eq!(args.get_one::<String>("tool").unwrap(), "manage_editor");
    }

    #[test]
    fn config_flag_is_global() {
        let matches = cli()
            .try_get_matches_from(["unity-bridge", "list", "--config", "bridge.toml"])
            .unwrap();
        assert_eq!(matches.get_one::<PathBuf>("config").unwrap(), &PathBuf::from("bridge.toml"));
    }
}
