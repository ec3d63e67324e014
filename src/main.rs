//! # tweetpack CLI
//!
//! Command-line interface for the tweetpack library.

use std::io::{self, Write};
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing::{info, warn};

use tweetpack::cli::Args;
use tweetpack::inputs::expand_inputs;
use tweetpack::logging::init_tracing;
use tweetpack::pipeline::Pipeline;
use tweetpack::{Result, TweetpackError};

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let start = Instant::now();
    let args = <Args as ClapParser>::parse();

    if let Err(e) = init_tracing(args.verbose, args.log_json) {
        eprintln!("⚠️  Logging disabled: {}", e);
    }

    let config = args.to_config();
    info!(
        output_root = %config.output_root.display(),
        link_prefix = %config.link_prefix,
        time_zone = %config.time_zone,
        "starting"
    );

    let archives = expand_inputs(&args.archives)?;
    if archives.is_empty() {
        warn!(patterns = ?args.archives, "no archives matched");
    }

    let mut pipeline = Pipeline::new(config)?;
    for archive in &archives {
        pipeline.process_archive(archive)?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    pipeline.write_index(&mut out)?;
    out.flush().map_err(TweetpackError::Io)?;

    let summary = pipeline.summary();
    info!(
        archives = summary.archives,
        records = summary.records_written,
        duplicates = summary.duplicates_skipped,
        documents = summary.documents_created,
        elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "done"
    );
    Ok(())
}
