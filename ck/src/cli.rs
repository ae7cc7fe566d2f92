//! CLI argument parsing for cwkeyer

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cwk")]
#[command(author, version, about = "Send text as Morse code (CW)", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Key a message and exit when it has been sent
    Send {
        /// Words of the message, joined with spaces
        #[arg(required = true)]
        text: Vec<String>,

        /// Sending speed in words per minute
        #[arg(short, long)]
        wpm: Option<u32>,
    },

    /// Key lines from stdin as they are typed
    ///
    /// Commands: /wpm N, /stop, /status, /quit
    Interactive {
        /// Initial sending speed in words per minute
        #[arg(short, long)]
        wpm: Option<u32>,
    },

    /// Show the Morse rendering of text and report unsupported characters
    Check {
        /// Text to check
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Show event durations at a speed
    Timing {
        /// Speed in words per minute
        #[arg(short, long)]
        wpm: Option<u32>,
    },

    /// Print the effective configuration, or write it out with --init
    Config {
        /// Write the configuration to --config or the user config directory
        #[arg(long)]
        init: bool,

        /// Overwrite an existing file
        #[arg(long, requires = "init")]
        force: bool,
    },
}
