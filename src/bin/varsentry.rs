use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;
use varsentry::{CheckReport, Checker, Error, Schema};

const STDIN_PATH: &str = "-";

/// Lint `.env` files and validate them against a schema.
#[derive(Parser, Debug)]
#[command(name = "varsentry", version, about)]
struct Cli {
    /// Env file to check. `-` reads standard input.
    #[arg(short, long, default_value = ".env", env = "VARSENTRY_FILE")]
    file: PathBuf,

    /// JSON or YAML schema to validate against.
    #[arg(short, long, env = "VARSENTRY_SCHEMA")]
    schema: Option<PathBuf>,

    /// Report variables the schema does not declare.
    #[arg(long, requires = "schema")]
    strict: bool,

    /// Print the full report as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Disable logging.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Exit codes outside the ones [`CheckReport::exit_code`] produces.
mod exit {
    pub const CLEAN: i32 = 0;
    /// Missing env or schema file, unreadable input, or a malformed schema.
    pub const INPUT: i32 = 2;
    pub const USAGE: i32 = 3;
}

fn main() {
    process::exit(run(std::env::args_os()));
}

fn run(args: impl IntoIterator<Item = OsString>) -> i32 {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                exit::USAGE
            } else {
                exit::CLEAN
            };
        }
    };

    if !cli.quiet {
        init_logging(cli.verbose);
    }

    match check(&cli) {
        Ok(report) => {
            if cli.json {
                print_json(&report);
            } else {
                print_text(&report);
            }
            report.exit_code()
        }
        Err(err) => {
            tracing::debug!(error = ?err, "check aborted");
            eprintln!("varsentry: {err}");
            exit::INPUT
        }
    }
}

fn check(cli: &Cli) -> Result<CheckReport, Error> {
    let mut checker = Checker::new().path(&cli.file).strict(cli.strict);
    if let Some(path) = &cli.schema {
        checker = checker.schema(Schema::from_path(path)?);
    }

    if cli.file == Path::new(STDIN_PATH) {
        checker.check_reader(std::io::stdin().lock())
    } else {
        checker.check()
    }
}

fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env("VARSENTRY_LOG")
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none())
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_json(report: &CheckReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("varsentry: failed to render JSON: {err}"),
    }
}

fn print_text(report: &CheckReport) {
    if report.has_parse_errors() {
        eprintln!("{}", render_parse_errors(report));
    } else {
        println!("varsentry: no parse errors detected.");
    }

    let Some(validation) = &report.validation else {
        return;
    };
    if validation.is_clean() {
        println!("varsentry: validation passed.");
    } else {
        eprintln!("{}", render_validation_errors(report));
    }
}

fn render_parse_errors(report: &CheckReport) -> String {
    let mut out = String::from("varsentry: parse errors detected\n\n");
    for err in &report.parse.errors {
        out.push_str(&format!(
            "Line {}: {}\n  {}\n\n",
            err.line.unwrap_or_default(),
            err.message,
            err.raw.as_deref().unwrap_or_default()
        ));
    }
    out.push_str(&format!("{} error(s) found.", report.parse.errors.len()));
    out
}

fn render_validation_errors(report: &CheckReport) -> String {
    let errors = report
        .validation
        .as_ref()
        .map(|validation| validation.errors.as_slice())
        .unwrap_or_default();

    let mut out = String::from("varsentry: validation errors detected\n\n");
    for err in errors {
        let key = err.key.as_deref().unwrap_or_default();
        match err.raw.as_deref() {
            Some(raw) => out.push_str(&format!("  {key}: {} (value: {raw:?})\n", err.message)),
            None => out.push_str(&format!("  {key}: {}\n", err.message)),
        }
    }
    out.push_str(&format!("\n{} error(s) found.", errors.len()));
    out
}
