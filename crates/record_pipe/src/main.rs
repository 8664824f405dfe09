use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use record_ingest::{
    aggregate, decode_stdin, AggregatingProcessor, DecodeConfig, DecodeOutcome, JsonSink,
    RawTextAggregator,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Mode {
    /// Newline-delimited JSON objects; other lines are logged and skipped.
    #[default]
    Json,
    /// Unstructured text; indented lines continue the previous record.
    Raw,
}

#[derive(Debug, Parser)]
#[command(name = "record_pipe")]
#[command(about = "Normalize stdin into newline-delimited JSON records on stdout")]
struct Cli {
    #[arg(long, value_enum, default_value_t = Mode::Json)]
    mode: Mode,

    /// Skip JSON lines longer than this many bytes.
    #[arg(long)]
    max_line_bytes: Option<usize>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn no_input() -> ExitCode {
    eprintln!("No input");
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let mut sink = JsonSink::new(io::stdout().lock());
    match cli.mode {
        Mode::Json => {
            let mut config = DecodeConfig::default();
            config.limits.max_line_bytes = cli.max_line_bytes;
            match decode_stdin(&mut sink, config) {
                DecodeOutcome::NoInput => return no_input(),
                DecodeOutcome::Completed(summary) => {
                    debug!(?summary, "json input done");
                }
            }
            sink.flush();
        }
        Mode::Raw => {
            let stdin = io::stdin().lock();
            if stdin.is_terminal() {
                return no_input();
            }
            let mut aggregator = RawTextAggregator::new(sink);
            let summary = aggregate(stdin, &mut aggregator);
            debug!(?summary, "raw input done");
            aggregator.flush_all();
            sink = aggregator.finish();
        }
    }

    info!(written = sink.written(), failed = sink.failed(), "done");
    if let Err(err) = sink.into_inner().flush() {
        eprintln!("failed to flush stdout: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
