use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::analytics::AnalyticsSummary;
use crate::config::{CLAUDE_DIR_ENV, CODEX_DIR_ENV, CURSOR_DIR_ENV, SourceConfig};
use crate::models::Platform;
use crate::schema::profile_schema;
use crate::store::{AnalyticsStore, compute_fingerprint};
use crate::utils::{format_path_with_tilde, single_line};

const TOP_TOOLS_IN_STATS: usize = 10;

#[derive(Parser)]
#[command(name = "agent-log-analytics")]
#[command(version)]
#[command(
    about = "Usage analytics over Claude Code, Codex, and Cursor transcripts",
    long_about = None
)]
pub struct Cli {
    /// Claude Code data directory
    #[arg(long, global = true, env = CLAUDE_DIR_ENV)]
    pub claude_dir: Option<PathBuf>,

    /// Codex data directory
    #[arg(long, global = true, env = CODEX_DIR_ENV)]
    pub codex_dir: Option<PathBuf>,

    /// Cursor data directory
    #[arg(long, global = true, env = CURSOR_DIR_ENV)]
    pub cursor_dir: Option<PathBuf>,

    /// Log progress at info level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Only load transcripts from this source
    #[arg(long, value_enum)]
    pub source: Option<Platform>,

    /// Print JSON on a single line
    #[arg(long)]
    pub compact: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the analytics summary as JSON
    Summary(OutputArgs),
    /// Print the per-source field profile as JSON
    Schema(OutputArgs),
    /// Print the change-detection fingerprint of the source trees
    Fingerprint {
        #[arg(long, value_enum)]
        source: Option<Platform>,
    },
    /// Show a human-readable overview
    Stats {
        #[arg(long, value_enum)]
        source: Option<Platform>,
    },
}

impl Cli {
    /// Source roots: flags and their environment variables win over home defaults
    pub fn source_config(&self, source: Option<Platform>) -> Result<SourceConfig> {
        let mut config = SourceConfig::from_env()?;
        if let Some(dir) = &self.claude_dir {
            config.claude_dir = dir.clone();
        }
        if let Some(dir) = &self.codex_dir {
            config.codex_dir = dir.clone();
        }
        if let Some(dir) = &self.cursor_dir {
            config.cursor_dir = dir.clone();
        }
        Ok(match source {
            Some(platform) => config.only(platform),
            None => config,
        })
    }
}

pub fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Summary(args)) => {
            let store = AnalyticsStore::new(cli.source_config(args.source)?);
            let generation = store.get_or_build()?;
            write_json(&generation.summary, args.compact)?;
        }
        Some(Commands::Schema(args)) => {
            let store = AnalyticsStore::new(cli.source_config(args.source)?);
            let generation = store.get_or_build()?;
            write_json(&profile_schema(&generation.conversations), args.compact)?;
        }
        Some(Commands::Fingerprint { source }) => {
            let fingerprint = compute_fingerprint(&cli.source_config(*source)?)?;
            println!("{}", fingerprint);
        }
        Some(Commands::Stats { source }) => {
            let store = AnalyticsStore::new(cli.source_config(*source)?);
            let generation = store.get_or_build()?;
            show_stats(store.config(), &generation.summary)?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn write_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if compact {
        serde_json::to_writer(&mut out, value)
    } else {
        serde_json::to_writer_pretty(&mut out, value)
    }
    .context("Failed to write JSON output")?;
    writeln!(out).context("Failed to write JSON output")?;
    Ok(())
}

fn show_stats(config: &SourceConfig, summary: &AnalyticsSummary) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_stats(&mut out, config, summary).context("Failed to write stats")
}

pub(crate) fn render_stats(
    out: &mut impl Write,
    config: &SourceConfig,
    summary: &AnalyticsSummary,
) -> io::Result<()> {
    let overview = &summary.overview;

    writeln!(out, "Assistant Usage Statistics")?;
    writeln!(out, "==========================")?;
    writeln!(
        out,
        "Conversations: {} ({} sessions, {} subagent runs)",
        overview.total_conversations, overview.main_sessions, overview.subagent_runs
    )?;
    for (platform, count) in &overview.by_platform {
        writeln!(out, "  {}: {}", platform, count)?;
    }
    writeln!(
        out,
        "Messages: {} ({} user, {} assistant)",
        overview.total_messages, overview.user_messages, overview.assistant_messages
    )?;
    writeln!(out, "Tool uses: {} across {} tools", overview.tool_uses, overview.unique_tools)?;
    writeln!(out, "Projects: {}", overview.unique_projects)?;
    if let (Some(first), Some(last)) = (overview.first_activity, overview.last_activity) {
        writeln!(
            out,
            "Active: {} to {}",
            first.format("%Y-%m-%d %H:%M:%S"),
            last.format("%Y-%m-%d %H:%M:%S")
        )?;
    }

    if !summary.tool_usage.ranked.is_empty() {
        writeln!(out)?;
        writeln!(out, "Top tools:")?;
        for tool in summary.tool_usage.ranked.iter().take(TOP_TOOLS_IN_STATS) {
            writeln!(out, "  {:<20} {}", single_line(&tool.name), tool.count)?;
        }
    }

    let prompting = &summary.prompting_patterns;
    if prompting.total_prompts > 0 {
        writeln!(out)?;
        writeln!(out, "Prompts: {} (average {} chars)", prompting.total_prompts, prompting.average_length)?;
        for (label, bucket) in [
            ("short", &prompting.distribution.short),
            ("medium", &prompting.distribution.medium),
            ("long", &prompting.distribution.long),
        ] {
            writeln!(out, "  {:<7} {} ({}%)", label, bucket.count, bucket.percentage)?;
            if let Some(example) = bucket.examples.first() {
                writeln!(out, "          e.g. \"{}\"", single_line(example))?;
            }
        }
    }

    if !summary.recommendations.is_empty() {
        writeln!(out)?;
        writeln!(out, "Recommendations:")?;
        for recommendation in &summary.recommendations {
            writeln!(out, "  [{}] {}", recommendation.priority.as_str(), recommendation.title)?;
        }
    }

    writeln!(out)?;
    for platform in config.enabled_platforms() {
        writeln!(out, "{} directory: {}", platform, format_path_with_tilde(config.root(platform)))?;
    }

    Ok(())
}
