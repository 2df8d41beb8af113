//! hxdump - Canonical hex dump for pipes
//!
//! Read-only companion to hxpatch: prints the same dump without opening anything for writing.

use std::fs::File;
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use hxpatch::app::parse_offset;
use hxpatch::buffer::DumpReader;
use hxpatch::logging;

/// Canonical hex dump for pipes
#[derive(Parser, Debug)]
#[command(name = "hxdump")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Start at this offset ("32", "0x20" or "20h")
    #[arg(short, long, value_parser = parse_offset)]
    skip: Option<u64>,

    /// Number addresses from the start of the input instead of from --skip
    #[arg(short, long)]
    absolute: bool,

    /// Log verbosity on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let skip = args.skip.unwrap_or(0);
    let base = if args.absolute { skip } else { 0 };
    let stdout = io::stdout().lock();

    let result = match args.input {
        Some(ref path) => {
            let mut file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            file.seek(SeekFrom::Start(skip))?;
            dump(file, base, stdout)
        }
        None => {
            let mut stdin = io::stdin().lock();
            // stdin はシークできないので読み捨てる
            io::copy(&mut (&mut stdin).take(skip), &mut io::sink())?;
            dump(stdin, base, stdout)
        }
    };

    match result {
        // `| head` などで出力先が閉じられた
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other.context("failed to dump input"),
    }
}

fn dump<R: Read, W: Write>(source: R, base: u64, mut out: W) -> io::Result<()> {
    let mut reader = DumpReader::with_base_offset(source, base);
    io::copy(&mut reader, &mut out)?;
    out.flush()?;
    debug!(bytes = reader.offset() - base, "dump finished");
    Ok(())
}
