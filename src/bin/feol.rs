use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use eol_rs::common::rng::Rng;
use eol_rs::common::{io_error_msg, reset_sigpipe, tool_name};
use eol_rs::eol::{self, Classified, EolConfig, Inspection};

#[derive(Parser)]
#[command(
    name = "eol",
    version,
    about = "Report the end-of-line convention and unusual bytes of each FILE",
    after_help = "Output is a +-separated list of tags, e.g. LONG+8BIT+TAB+CRLF.\n\
                  With no FILE, or when FILE is -, read standard input."
)]
struct Cli {
    /// Quick check: sample 1024-byte windows instead of reading everything
    #[arg(short = 'q', long = "quick")]
    quick: bool,

    /// Bytes per sampling window (0 reads the whole file)
    #[arg(long = "sample-size", value_name = "BYTES")]
    sample_size: Option<u64>,

    /// Report the locations of the first 16 NUL bytes of each file
    #[arg(short = '0', long = "nulls")]
    nulls: bool,

    /// Display counts for tabs, NULs, 8-bit and control bytes
    #[arg(short = 'c', long = "counts")]
    counts: bool,

    /// Display the maximum line width after LONG/WIDE
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Report longest word and identifier lengths
    #[arg(short = 'w', long = "words")]
    words: bool,

    /// Same as -c -v
    #[arg(short = 'a', long = "all")]
    all: bool,

    /// Trace which parts of each file are sampled (to stderr)
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Seed sample offsets from the first bytes of FILE
    #[arg(long = "random-source", value_name = "FILE")]
    random_source: Option<PathBuf>,

    /// Files to inspect (reads stdin if none given)
    files: Vec<String>,
}

impl Cli {
    fn config(&self) -> EolConfig {
        let sample_size = match self.sample_size {
            Some(n) => n,
            None if self.quick => eol::QUICK_SAMPLE_SIZE,
            None => 0,
        };
        EolConfig {
            sample_size,
            null_report_limit: if self.nulls {
                eol::MAX_REPORTED_NULLS
            } else {
                0
            },
            verbose: self.verbose || self.all,
            counts: self.counts || self.all,
            word_lengths: self.words,
        }
    }
}

fn init_tracing(debug: bool) {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    let env_filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn make_rng(random_source: Option<&Path>) -> Result<Rng> {
    match random_source {
        Some(path) => Rng::from_file(path)
            .with_context(|| format!("random source {}", path.display())),
        None => Ok(Rng::from_entropy()),
    }
}

/// Write NUL locations (if any) followed by the summary line.
fn emit(out: &mut impl Write, name: Option<&str>, result: &Classified) -> io::Result<()> {
    for site in &result.state.null_sites {
        writeln!(out, "Null in column {} on line {}", site.column, site.line)?;
    }
    match name {
        Some(name) => writeln!(out, "{} {}", name, result.summary),
        None => writeln!(out, "{}", result.summary),
    }
}

fn main() {
    reset_sigpipe();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let prog = std::env::args()
        .next()
        .and_then(|a| {
            Path::new(&a)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "feol".to_string());
    let name = tool_name(&prog).to_string();

    let config = cli.config();
    debug!(?config, "starting");

    let mut rng = match make_rng(cli.random_source.as_deref()) {
        Ok(rng) => rng,
        Err(e) => {
            eprintln!("{}: {:#}", name, e);
            process::exit(1);
        }
    };

    let files: Vec<String> = if cli.files.is_empty() {
        vec!["-".to_string()]
    } else {
        cli.files
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut errors: u32 = 0;

    for filename in &files {
        let written = if filename == "-" {
            match eol::classify_reader(io::stdin().lock(), &config) {
                Ok(result) => emit(&mut out, None, &result),
                Err(e) => {
                    eprintln!("{}: standard input: {}", name, io_error_msg(&e));
                    errors += 1;
                    continue;
                }
            }
        } else {
            match eol::inspect_path(Path::new(filename), &config, &mut rng) {
                Ok(Inspection::Classified(result)) => emit(&mut out, Some(filename), &result),
                Ok(Inspection::Directory) => writeln!(out, "{} DIRECTORY", filename),
                Err(e) => {
                    let _ = out.flush();
                    eprintln!("{}: {}", name, e);
                    errors += 1;
                    continue;
                }
            }
        };

        if let Err(e) = written {
            if e.kind() == io::ErrorKind::BrokenPipe {
                process::exit(0);
            }
            eprintln!("{}: write error: {}", name, io_error_msg(&e));
            process::exit(1);
        }
    }

    if let Err(e) = out.flush()
        && e.kind() != io::ErrorKind::BrokenPipe
    {
        eprintln!("{}: write error: {}", name, io_error_msg(&e));
        process::exit(1);
    }

    process::exit(errors.min(255) as i32);
}
