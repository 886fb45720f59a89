use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::info;

use tally_rs::common::{TOOL_NAME, logging, reset_sigpipe};
use tally_rs::tally::{self, LineRule, RemainderPolicy, ScanOptions, Tally};
use tally_rs::Error;

#[derive(Parser)]
#[command(
    name = "ftally",
    about = "Count lines, words, vowels and punctuation of FILE, scanning CHUNKS pieces in parallel"
)]
struct Cli {
    /// How newline bytes become line counts: 'feed' or 'line-start'
    #[arg(long = "lines-rule", value_name = "RULE", default_value = "feed")]
    lines_rule: LineRule,

    /// What to do with the bytes left over after equal division: 'last' or 'drop'
    #[arg(long = "remainder", value_name = "POLICY", default_value = "last")]
    remainder: RemainderPolicy,

    /// Log chunk dispatch and collection to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// File to scan
    file: PathBuf,

    /// Number of chunks (prompted for when omitted)
    #[arg(allow_negative_numbers = true)]
    chunks: Option<String>,
}

fn main() {
    reset_sigpipe();
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", TOOL_NAME, e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let num_chunks = match cli.chunks {
        Some(ref s) => tally::parse_chunk_count(s)?,
        None => prompt_chunk_count()?,
    };

    let options = ScanOptions {
        line_rule: cli.lines_rule,
        remainder: cli.remainder,
    };

    let start = Instant::now();
    let total = tally::count_file(&cli.file, num_chunks, &options)?;
    let elapsed = start.elapsed();
    info!(
        file = %cli.file.display(),
        num_chunks,
        line_rule = %options.line_rule,
        remainder = %options.remainder,
        ?elapsed,
        "scan complete"
    );

    let mut out = BufWriter::new(io::stdout().lock());
    print_report(&mut out, &total, elapsed)?;
    out.flush()?;
    Ok(())
}

/// Ask for the chunk count on stdin when it was not given on the command line.
fn prompt_chunk_count() -> anyhow::Result<usize> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "Enter the number of chunks: ")?;
    stdout.flush()?;
    drop(stdout);

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(Error::InvalidArgument("no number of chunks given".to_string()).into());
    }
    Ok(tally::parse_chunk_count(&line)?)
}

fn print_report(out: &mut impl Write, total: &Tally, elapsed: Duration) -> io::Result<()> {
    writeln!(out, "Number of lines: {}", total.lines)?;
    writeln!(out, "Number of words: {}", total.words)?;
    writeln!(out, "Number of vowels: {}", total.vowels)?;
    writeln!(out, "Number of punctuation: {}", total.punctuation)?;
    writeln!(out, "Run Time: {:?}", elapsed)
}
