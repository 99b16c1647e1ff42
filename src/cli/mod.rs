//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Plugin preset CLI - manage, export and import preset files.
///
/// Robot Mode: Use --robot or --format=json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "presets", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "PRESETS_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose output (show debug information)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Preset directory (defaults to the user data dir)
    #[arg(long, short = 'd', global = true, env = "PRESETS_DIR")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List presets in the preset directory
    List(ListArgs),

    /// Show one preset's captured state
    Show(ShowArgs),

    /// Encode a preset to a copy-pasteable code
    Export(ExportArgs),

    /// Decode a preset code and save it as a new preset file
    Import(ImportArgs),

    /// Delete a preset file
    Delete(DeleteArgs),

    /// Rename a preset
    Rename(RenameArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show extended preset information
    #[arg(long, short = 'l')]
    pub long: bool,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Preset name
    pub name: String,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Preset name
    pub name: String,
}

#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// Preset code (reads stdin when omitted)
    pub code: Option<String>,

    /// Override the imported preset's name
    #[arg(long, short = 'n')]
    pub name: Option<String>,
}

#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Preset name
    pub name: String,
}

#[derive(Parser, Debug)]
pub struct RenameArgs {
    /// Current preset name
    pub name: String,

    /// New preset name
    pub new_name: String,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
