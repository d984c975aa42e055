//! # Prattle CLI Module
//!
//! This module implements the CLI interface for Prattle.
//!
//! ## Available Commands
//!
//! - `init` - Create a new dialogue file
//! - `status` - Show dialogue status
//! - `add` - Add a sentence node
//! - `remove` - Remove a sentence node
//! - `set` - Edit an existing sentence
//! - `link` - Add a response from one node to another
//! - `unlink` - Remove a response by index
//! - `validate` - Run structural checks on the whole graph
//! - `play` - Play the dialogue interactively
//! - `export` - Export dialogue to file (binary or JSON)
//! - `import` - Import dialogue from file

mod commands;

use clap::{Parser, Subcommand};
use prattle_core::DialogueError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Prattle - Dialogue Engine
///
/// A deterministic, branching dialogue graph with caller-driven playback.
/// Sentences are nodes; responses are the edges a player walks.
#[derive(Parser, Debug)]
#[command(name = "prattle")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the dialogue file
    #[arg(short = 'D', long, global = true, default_value = "dialogue.prtl")]
    pub file: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new dialogue file with a Start sentence
    Init {
        /// Dialogue title
        #[arg(short, long, default_value = "Untitled")]
        title: String,

        /// Force initialization even if the file exists
        #[arg(short, long)]
        force: bool,
    },

    /// Show dialogue status
    Status,

    /// Add a sentence node
    Add {
        /// Sentence text
        text: String,

        /// Speaking actor's name
        #[arg(short, long)]
        actor: Option<String>,
    },

    /// Remove a sentence node (responses pointing at it are swept)
    Remove {
        /// Node id to remove
        id: usize,
    },

    /// Edit an existing sentence
    Set {
        /// Node id to edit
        id: usize,

        /// Replace the sentence text
        #[arg(short, long)]
        text: Option<String>,

        /// Change the variant (default, start, end)
        #[arg(long)]
        variant: Option<String>,

        /// Replace the speaking actor
        #[arg(short, long)]
        actor: Option<String>,

        /// Actor expression index
        #[arg(short, long)]
        expression: Option<usize>,

        /// Append an entry trigger
        #[arg(long)]
        add_trigger: Option<String>,

        /// Remove all entry triggers
        #[arg(long)]
        clear_triggers: bool,
    },

    /// Add a response from one node to another
    Link {
        /// Source node id
        #[arg(short, long)]
        from: usize,

        /// Target node id
        #[arg(short, long)]
        to: usize,

        /// Choice text (omit for an auto-advance link)
        #[arg(long)]
        text: Option<String>,

        /// Trigger fired when this response is chosen
        #[arg(long)]
        trigger: Option<String>,

        /// Host-interpreted availability condition
        #[arg(long)]
        condition: Option<String>,
    },

    /// Remove a response by display index
    Unlink {
        /// Source node id
        #[arg(short, long)]
        from: usize,

        /// Response index on the source node
        #[arg(short, long)]
        index: usize,
    },

    /// Run structural checks on the whole graph
    Validate,

    /// Play the dialogue interactively in the terminal
    Play,

    /// Export dialogue to file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (binary, json)
        #[arg(short = 't', long, default_value = "binary")]
        format: String,
    },

    /// Import dialogue from file (binary or JSON, detected by content)
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), DialogueError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Init { title, force }) => cmd_init(&cli.file, &title, force),
        Some(Commands::Status) => cmd_status(&cli.file, json_mode),
        Some(Commands::Add { text, actor }) => {
            cmd_add(&cli.file, json_mode, &text, actor.as_deref())
        }
        Some(Commands::Remove { id }) => cmd_remove(&cli.file, id),
        Some(Commands::Set {
            id,
            text,
            variant,
            actor,
            expression,
            add_trigger,
            clear_triggers,
        }) => cmd_set(
            &cli.file,
            id,
            text.as_deref(),
            variant.as_deref(),
            actor.as_deref(),
            expression,
            add_trigger.as_deref(),
            clear_triggers,
        ),
        Some(Commands::Link {
            from,
            to,
            text,
            trigger,
            condition,
        }) => cmd_link(
            &cli.file,
            from,
            to,
            text.as_deref(),
            trigger.as_deref(),
            condition.as_deref(),
        ),
        Some(Commands::Unlink { from, index }) => cmd_unlink(&cli.file, from, index),
        Some(Commands::Validate) => cmd_validate(&cli.file, json_mode),
        Some(Commands::Play) => cmd_play(&cli.file),
        Some(Commands::Export { output, format }) => cmd_export(&cli.file, &output, &format),
        Some(Commands::Import { input }) => cmd_import(&cli.file, &input),
        None => {
            // No subcommand - show status by default
            cmd_status(&cli.file, json_mode)
        }
    }
}
