//! CLI module for TheHaloMod
//!
//! Provides subcommands for running the calculator service:
//! - `serve`: run the HTTP API server (default)

pub mod serve;

use clap::{Parser, Subcommand};

/// TheHaloMod - web front-end for halo-model calculations
#[derive(Parser)]
#[command(name = "thehalomod")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,
}
