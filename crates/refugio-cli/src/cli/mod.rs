//! CLI for Refugio.

mod commands;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use refugio_core::config;
use std::path::PathBuf;

use commands::{run_completions, run_generate, run_share, run_styles, run_verse};

/// Top-level CLI for the Refugio wallpaper generator.
#[derive(Debug, Parser)]
#[command(name = "refugio")]
#[command(about = "Refugio: AI wallpapers with a daily verse", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List the available wallpaper styles.
    Styles,

    /// Show today's verse in the anchored timezone.
    Verse {
        /// Keep running and print every recomputation.
        #[arg(long)]
        watch: bool,
        /// With --watch, stop after N updates (default: run until Ctrl-C).
        #[arg(long, value_name = "N", requires = "watch")]
        ticks: Option<u32>,
        /// Evaluate at this instant instead of now (RFC 3339, e.g. 2026-10-20T03:30:00Z).
        #[arg(long, value_name = "INSTANT")]
        at: Option<DateTime<Utc>>,
    },

    /// Print today's verse as share text ("<text> - <reference>").
    Share {
        /// Evaluate at this instant instead of now (RFC 3339).
        #[arg(long, value_name = "INSTANT")]
        at: Option<DateTime<Utc>>,
    },

    /// Generate a wallpaper for a style and save it as PNG.
    Generate {
        /// Style id (see `refugio styles`).
        style: String,
        /// Output file (default: refugio-<style>-<YYYYMMDD>.png in the current directory).
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Styles => run_styles(),
            CliCommand::Verse { watch, ticks, at } => {
                run_verse(&load_config()?, watch, ticks, at).await?
            }
            CliCommand::Share { at } => run_share(&load_config()?, at)?,
            CliCommand::Generate { style, output } => {
                run_generate(&load_config()?, &style, output.as_deref()).await?
            }
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

fn load_config() -> Result<config::RefugioConfig> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", redacted(&cfg));
    Ok(cfg)
}

/// Config with the API key masked, for debug logging.
fn redacted(cfg: &config::RefugioConfig) -> config::RefugioConfig {
    let mut cfg = cfg.clone();
    if cfg.imagen.api_key.is_some() {
        cfg.imagen.api_key = Some("***".to_string());
    }
    cfg
}

#[cfg(test)]
mod tests;
