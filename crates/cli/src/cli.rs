use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Collaboration graph analytics for team chat.
///
/// Reads a JSON snapshot of chat events, builds the weighted interaction
/// graph and prints metrics, insights or a digest as JSON.
#[derive(Parser, Debug)]
#[command(name = "orgpulse", version, about)]
pub struct CliArgs {
    /// Event snapshot file [default: EVENTS_PATH or data/events.json]
    #[arg(long, global = true)]
    pub events: Option<PathBuf>,

    /// Fixed seed for community detection and demo data.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Replace user ids with `user_N` labels in every output.
    #[arg(long, global = true)]
    pub anonymize: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Graph nodes, edges and aggregate stats.
    Analyze,
    /// Stats plus rule-based insights.
    Insights,
    /// Weekly org health digest.
    Digest,
    /// Short text snapshot, as posted to a chat channel.
    Snapshot,
    /// Generate a demo scenario (healthy, siloed, overloaded) and analyze it.
    Demo {
        scenario: String,
        /// Write the generated events to the snapshot file.
        #[arg(long)]
        save: bool,
    },
    /// Normalize webhook payloads and add them to the snapshot file.
    Ingest {
        /// JSON file with one payload or an array of payloads.
        payloads: PathBuf,
    },
}
