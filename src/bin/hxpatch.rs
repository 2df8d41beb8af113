//! hxpatch - Interactive byte patcher
//!
//! Shows the file as a canonical hex dump and overwrites bytes at the offset you pick.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use hxpatch::app::App;
use hxpatch::buffer::{OffsetBase, PatchStream};
use hxpatch::logging;

/// Patch a file in place through its hex dump
#[derive(Parser, Debug)]
#[command(name = "hxpatch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to patch
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Show addresses from the start of the file instead of from the read position
    #[arg(short, long)]
    absolute: bool,

    /// Log verbosity on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(&args.file)
        .with_context(|| format!("failed to open {}", args.file.display()))?;
    info!(path = %args.file.display(), "opened file");

    let base = if args.absolute {
        OffsetBase::Absolute
    } else {
        OffsetBase::Relative
    };
    let mut app = App::new(PatchStream::new(file).offset_base(base));

    app.run(io::stdin().lock(), io::stdout().lock())
}
