//! Command-line argument definitions.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "svein", version, about = "Svein trick-card game tools")]
pub struct SveinCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deal one round from a fresh deck and print every hand
    Deal {
        /// Number of hands to deal
        #[arg(long, value_parser = clap::value_parser!(u8).range(2..=26))]
        players: Option<u8>,
        /// Cards per hand
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=26))]
        cards: Option<u8>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play complete bot-only games
    Sim {
        #[arg(long)]
        games: Option<u32>,
        #[arg(long)]
        players: Option<usize>,
        #[arg(long)]
        rounds: Option<u32>,
        /// Base seed; game `i` uses `seed + i`
        #[arg(long)]
        seed: Option<u64>,
        /// Bot seated in every chair
        #[arg(long)]
        bot: Option<String>,
        /// Append one JSON record per game to this file
        #[arg(long)]
        output: Option<String>,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}
