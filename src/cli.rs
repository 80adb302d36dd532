//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for placepin using clap's derive macros.

use clap::{Parser, Subcommand};

/// Placepin - Backend API for a social place-sharing app
#[derive(Parser)]
#[command(name = "placepin")]
#[command(version)]
#[command(about = "Backend API for a social place-sharing app", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default when no command is given)
    Serve,

    /// Run database migrations and exit
    Migrate,

    /// Create a staff account (or promote an existing one)
    CreateStaff {
        /// Account email
        email: String,

        /// Account password
        password: String,

        /// Display nickname
        nickname: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,
    },
}
