use std::fs;
use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{anyhow, Context as _};
use clap::{Arg, ArgAction, ArgMatches, Command};
use parking_lot::Mutex;

use crate::internal::config::AppConfig;
use crate::internal::debug::{DebugBuffer, DEFAULT_TEMPLATE};
use crate::internal::global;
use crate::internal::router::{
    Context, ContextValue, Dispatch, Level, LogRouter, Logger, Operation,
};

pub fn build_cli() -> Command {
    // Leak the version string to get a 'static lifetime
    let version: &'static str =
        Box::leak(crate::internal::config::get_version_info().into_boxed_str());

    Command::new("tg-log")
        .version(version)
        .about("Route bot log messages and redact captured debug traces")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to config file (default: ./tg-log.yaml)"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("Tracing filter, e.g. debug or tg_log=trace"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Disable ANSI colors on the console"),
        )
        .subcommand(
            Command::new("log")
                .about("Route one message through the configured loggers")
                .arg(
                    Arg::new("operation")
                        .required(true)
                        .value_parser(Operation::ALL.map(|op| op.as_str()))
                        .help("Log operation (emergency|alert|critical|error|warning|notice|info|debug|update)"),
                )
                .arg(
                    Arg::new("message")
                        .required(true)
                        .help("Message, may contain {key} placeholders"),
                )
                .arg(
                    Arg::new("context")
                        .long("context")
                        .short('c')
                        .action(ArgAction::Append)
                        .value_name("KEY=VALUE")
                        .help("Context entry; VALUE is parsed as JSON when possible"),
                ),
        )
        .subcommand(
            Command::new("redact")
                .about("Capture a trace into the debug buffer and print it redacted")
                .arg(Arg::new("file").help("Trace file to read (default: stdin)"))
                .arg(
                    Arg::new("template")
                        .long("template")
                        .short('t')
                        .default_value(DEFAULT_TEMPLATE)
                        .help("Output template; %s marks where the trace goes"),
                )
                .arg(
                    Arg::new("keep-token")
                        .long("keep-token")
                        .action(ArgAction::SetTrue)
                        .help("Do not redact bot tokens"),
                ),
        )
}

pub fn run(matches: &ArgMatches, config: &AppConfig) -> anyhow::Result<()> {
    global::configure(&config.facade);

    match matches.subcommand() {
        Some(("log", sub)) => run_log(sub, &global::router()).map(|_| ()),
        Some(("redact", sub)) => run_redact(sub, config, &mut io::stdout().lock()),
        Some((other, _)) => Err(anyhow!("unknown command: {}", other)),
        None => Err(anyhow!("no command given")),
    }
}

fn run_log(matches: &ArgMatches, router: &LogRouter) -> anyhow::Result<Dispatch> {
    let operation = matches
        .get_one::<String>("operation")
        .ok_or_else(|| anyhow!("operation is required"))?;
    let message = matches
        .get_one::<String>("message")
        .ok_or_else(|| anyhow!("message is required"))?;

    let context = matches
        .get_many::<String>("context")
        .into_iter()
        .flatten()
        .map(|entry| parse_context_entry(entry))
        .collect::<anyhow::Result<Vec<_>>>()?
        .into_iter()
        .collect::<Context>();

    let dispatch = router.log_named(operation, message, &context)?;
    tracing::debug!(?dispatch, "routed {}", operation);
    Ok(dispatch)
}

/// Capture the trace into a debug buffer, finalize it and write the result
/// to `out`.
fn run_redact(
    matches: &ArgMatches,
    config: &AppConfig,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let template = matches
        .get_one::<String>("template")
        .map(String::as_str)
        .unwrap_or(DEFAULT_TEMPLATE);
    let remove_token = config.facade.remove_bot_token && !matches.get_flag("keep-token");

    let buffer = DebugBuffer::new().with_redaction(remove_token);
    let mut stream = buffer
        .acquire()
        .ok_or_else(|| anyhow!("debug stream unavailable"))?;
    match matches.get_one::<String>("file") {
        Some(path) => {
            let mut file =
                fs::File::open(path).with_context(|| format!("failed to open {}", path))?;
            io::copy(&mut file, &mut stream)?;
        }
        None => {
            io::copy(&mut io::stdin().lock(), &mut stream)?;
        }
    }

    // The finalized trace goes to `out`, not to the tracing subscriber.
    let captured = CapturedMessages::default();
    let router = LogRouter::new(Some(Arc::new(captured.clone())), None);
    buffer.finalize(&router, template);

    for message in captured.take() {
        writeln!(out, "{}", message)?;
    }
    out.flush()?;
    Ok(())
}

/// Parse `key=value`; the value is JSON if it parses, otherwise a string.
fn parse_context_entry(entry: &str) -> anyhow::Result<(String, ContextValue)> {
    let (key, raw) = entry
        .split_once('=')
        .ok_or_else(|| anyhow!("context entry must be KEY=VALUE: {}", entry))?;

    if key.is_empty() {
        return Err(anyhow!("context key must not be empty: {}", entry));
    }

    let value = serde_json::from_str::<serde_json::Value>(raw)
        .map(ContextValue::Json)
        .unwrap_or_else(|_| ContextValue::from(raw));

    Ok((key.to_string(), value))
}

#[derive(Clone, Default)]
struct CapturedMessages {
    messages: Arc<Mutex<Vec<String>>>,
}

impl CapturedMessages {
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock())
    }
}

impl Logger for CapturedMessages {
    fn log(&self, _level: Level, message: &str, _context: &Context) {
        self.messages.lock().push(message.to_string());
    }
}
