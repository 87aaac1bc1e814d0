//! CLI module for the mentorship API
//!
//! Provides subcommands for running the backend:
//! - `serve`: HTTP API server (default)

pub mod serve;

use clap::{Parser, Subcommand};

/// Mentorship program registration backend
#[derive(Parser)]
#[command(name = "mentorship-api")]
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
