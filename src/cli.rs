//! Command-line interface definition using clap.
//!
//! [`Args`] is converted into a [`PipelineConfig`] with [`Args::to_config`],
//! so the binary never builds configuration by hand.

use clap::Parser;

use crate::config::{PipelineConfig, TimeZoneSetting};

/// Turn Twitter archive exports into per-day Markdown documents.
///
/// Tweets are written to `<dir>/YYYY/MM/DD.md`; a year/month index of all
/// written days is printed to stdout.
#[derive(Parser, Debug, Clone)]
#[command(name = "tweetpack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    tweetpack twitter-2021.zip > index.md
    tweetpack -d journal -b journal 'exports/*.zip' > README.md
    tweetpack --utc-offset +09:00 old.zip new.zip")]
pub struct Args {
    /// Archive paths or glob patterns, processed in order
    #[arg(required = true, value_name = "ARCHIVE")]
    pub archives: Vec<String>,

    /// Directory to write YYYY/MM/DD.md documents under
    #[arg(short = 'd', long = "dir", default_value = ".", value_name = "DIR")]
    pub output_dir: String,

    /// Prefix for links in the printed index
    #[arg(short = 'b', long = "base", default_value = ".", value_name = "PREFIX")]
    pub link_prefix: String,

    /// Zone used to assign tweets to days: local, UTC or an offset like +09:00
    #[arg(long, value_name = "OFFSET", allow_hyphen_values = true)]
    pub utc_offset: Option<TimeZoneSetting>,

    /// Log progress to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl Args {
    /// Builds the pipeline configuration from parsed arguments.
    pub fn to_config(&self) -> PipelineConfig {
        PipelineConfig::new()
            .with_output_root(&self.output_dir)
            .with_link_prefix(&self.link_prefix)
            .with_time_zone(self.utc_offset.unwrap_or_default())
    }
}
