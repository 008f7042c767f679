//! Command-line interface for calcparse
//! Parses a calculator program, printing the parser trace followed by the tree.
//!
//! Usage:
//!   calcparse `<path>` [--format `<format>`] [--no-trace] [--no-tree]   - Parse a file (`-` reads stdin)
//!   calcparse `<path>` --config `<file>`                              - Layer a config file over the defaults
//!   calcparse --list-formats                                        - List all available output formats
//!
//! Exit status is 0 unless `--fail-on-error` is set and syntax errors were
//! reported (1). Unreadable input or configuration exits with 2.

use std::io::{self, Read, Write};
use std::process;

use calcparse::calc::config::{CalcConfig, Loader};
use calcparse::calc::diagnostics::{NullSink, TraceSink, WriteSink};
use calcparse::calc::processor::{
    available_formats, process_source_with, ProcessedOutput, ProcessingSpec,
};
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Picked up from the working directory when present
const LOCAL_CONFIG: &str = "calcparse.toml";

fn main() {
    init_tracing();

    let matches = Command::new("calcparse")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Table-driven LL(1) parser for the calculator language")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the program, or '-' to read stdin")
                .required_unless_present("list-formats")
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format (e.g., 'tree-sexpr', 'tree-json', 'token-simple')"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("no-trace")
                .long("no-trace")
                .help("Do not print predict/matched/error lines")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-tree")
                .long("no-tree")
                .help("Do not print the parsed tree")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("fail-on-error")
                .long("fail-on-error")
                .help("Exit with status 1 when syntax errors were reported")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load configuration: {}", e);
            process::exit(2);
        }
    };

    let path = matches
        .get_one::<String>("path")
        .expect("path is required unless listing formats");
    let code = handle_parse_command(path, &config);
    process::exit(code);
}

/// Diagnostics go to stderr so stdout only carries the trace and the tree
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<CalcConfig, config::ConfigError> {
    let mut loader = match matches.get_one::<String>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };

    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader.set_override("output.format", format.as_str())?;
    }
    if matches.get_flag("no-trace") {
        loader = loader.set_override("output.trace", false)?;
    }
    if matches.get_flag("no-tree") {
        loader = loader.set_override("output.tree", false)?;
    }
    if matches.get_flag("fail-on-error") {
        loader = loader.set_override("diagnostics.fail_on_error", true)?;
    }

    loader.build()
}

/// Handle the parse command, returning the exit status
fn handle_parse_command(path: &str, config: &CalcConfig) -> i32 {
    let spec = match ProcessingSpec::from_string(&config.output.format) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Available formats: {}", available_formats().join(", "));
            return 2;
        }
    };

    let source = match read_input(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: failed to read {}: {}", path, e);
            return 2;
        }
    };

    // Trace lines stream to stdout while parsing; the tree follows them
    let processed = if config.output.trace {
        let sink = WriteSink::new(io::stdout().lock());
        let (processed, sink) = match run(&source, &spec, sink) {
            Ok(result) => result,
            Err(code) => return code,
        };
        if let Err(e) = sink.finish() {
            eprintln!("Error: failed to write trace: {}", e);
            return 2;
        }
        processed
    } else {
        match run(&source, &spec, NullSink) {
            Ok((processed, _)) => processed,
            Err(code) => return code,
        }
    };

    tracing::info!(path, format = %spec, errors = processed.error_count, "processed");

    if config.output.tree {
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "{}", processed.output).and_then(|_| out.flush()) {
            eprintln!("Error: failed to write output: {}", e);
            return 2;
        }
    }

    if config.diagnostics.fail_on_error && processed.error_count > 0 {
        1
    } else {
        0
    }
}

fn run<K: TraceSink>(
    source: &str,
    spec: &ProcessingSpec,
    sink: K,
) -> Result<(ProcessedOutput, K), i32> {
    process_source_with(source, spec, sink).map_err(|e| {
        eprintln!("Error: {}", e);
        2
    })
}

fn read_input(path: &str) -> io::Result<String> {
    if path == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        std::fs::read_to_string(path)
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available formats:\n");
    for format in available_formats() {
        println!("  {}", format);
    }
}
