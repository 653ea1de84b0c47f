//! Purpose: `planar` CLI entry point and command dispatch.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
use std::io::{self, IsTerminal, Read};
use std::net::SocketAddr;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};

mod serve;

use planar::api::{Error, ErrorKind, dispatch, fastpath, to_exit_code};
use serve::ServeConfig;

const DEFAULT_BIND: &str = "127.0.0.1:5173";
const DEFAULT_MAX_BODY_BYTES: u64 = 1024 * 1024;

#[derive(Parser)]
#[command(
    name = "planar",
    version,
    about = "Small HTTP JSON API for invoices, prices, and shape areas"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "Serve the JSON API over HTTP (loopback by default)",
        after_help = r#"EXAMPLES
  $ planar serve
  $ planar serve --bind 127.0.0.1:8080
  $ planar serve --bind 0.0.0.0:5173 --allow-non-loopback"#
    )]
    Serve(ServeArgs),
    #[command(
        about = "Compute the area of one shape envelope",
        after_help = r#"EXAMPLES
  $ planar area '{"$kind":"circle","radius":2}'
  $ echo '{"$kind":"rect","width":3,"height":4}' | planar area"#
    )]
    Area(AreaArgs),
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
struct ServeArgs {
    #[arg(
        long,
        default_value = DEFAULT_BIND,
        help = "Bind address",
        help_heading = "Connection"
    )]
    bind: String,
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_BODY_BYTES,
        help = "Max request body size in bytes",
        help_heading = "Safety"
    )]
    max_body_bytes: u64,
    #[arg(
        long,
        help = "Allow non-loopback binds",
        help_heading = "Safety"
    )]
    allow_non_loopback: bool,
}

#[derive(Args)]
struct AreaArgs {
    #[arg(value_name = "JSON", help = "Shape envelope; reads stdin when omitted")]
    json: Option<String>,
}

fn main() {
    let exit_code = match run() {
        Ok(()) => 0,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<(), Error> {
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => run_serve(args),
        Command::Area(args) => run_area(args),
        Command::Completions { shell } => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::aot::generate(shell, &mut command, name, &mut io::stdout());
            Ok(())
        }
    }
}

fn run_serve(args: ServeArgs) -> Result<(), Error> {
    let bind: SocketAddr = args.bind.parse().map_err(|_| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("invalid bind address: {}", args.bind))
            .with_hint("Use host:port, e.g. 127.0.0.1:5173.")
    })?;
    let config = ServeConfig {
        bind,
        max_body_bytes: args.max_body_bytes,
        allow_non_loopback: args.allow_non_loopback,
    };
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("failed to start runtime")
                .with_source(err)
        })?;
    runtime.block_on(serve::serve(config))
}

fn run_area(args: AreaArgs) -> Result<(), Error> {
    let payload = match args.json {
        Some(text) => text.into_bytes(),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to read stdin")
                    .with_source(err)
            })?;
            buf
        }
    };
    let shape = fastpath::decode_shape(&payload)?;
    let result = dispatch(&shape);
    let bytes = fastpath::encode_result(&result)?;
    println!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}

fn emit_error(err: &Error) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("error: {}", error_message(err));
        if let Some(hint) = err.hint() {
            eprintln!("hint: {hint}");
        }
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    err.message()
        .map(str::to_string)
        .unwrap_or_else(|| format!("{:?}", err.kind()))
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }
    causes
}
