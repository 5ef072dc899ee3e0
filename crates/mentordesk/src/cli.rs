//! Clap derive structures for the `mentordesk` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// mentordesk -- admin console for a mentoring program
#[derive(Debug, Parser)]
#[command(
    name = "mentordesk",
    version,
    about = "Administer a mentoring program from the command line",
    long_about = "Manage mentees and announcements of a mentoring program.\n\n\
        Uses the session saved by the web login; every command is gated by\n\
        the same role rules as the admin console.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "MENTORDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 'u', env = "MENTORDESK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Session file written by the login flow (overrides profile)
    #[arg(long, env = "MENTORDESK_SESSION_FILE", global = true)]
    pub session_file: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MENTORDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "MENTORDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect or clear the saved session
    #[command(alias = "s")]
    Session(SessionArgs),

    /// Manage mentees
    #[command(alias = "m")]
    Mentees(MenteesArgs),

    /// Manage announcements
    #[command(alias = "a", alias = "ann")]
    Announcements(AnnouncementsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Pagination and search arguments shared by list commands.
#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page to show (1-based)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Free-text search
    #[arg(long, short = 's')]
    pub search: Option<String>,
}

/// Arguments for deleting rows of one page.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Ids to delete; they must be on the given page
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<u64>,

    /// Page the ids are listed on
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Resolve the saved session and show who is signed in
    Status,

    /// Clear the saved session
    Logout,
}

// ── Mentees ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MenteesArgs {
    #[command(subcommand)]
    pub command: MenteesCommand,
}

#[derive(Debug, Subcommand)]
pub enum MenteesCommand {
    /// List one page of mentees
    #[command(alias = "ls")]
    List(MenteeListArgs),

    /// Show mentee statistics
    Stats,

    /// Delete mentees by id
    #[command(alias = "rm")]
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
pub struct MenteeListArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// Filter by gender
    #[arg(long, value_parser = ["male", "female"])]
    pub gender: Option<String>,

    /// Filter by status
    #[arg(long, value_parser = ["active", "inactive", "graduated"])]
    pub status: Option<String>,

    /// Filter by assigned mentor id
    #[arg(long)]
    pub mentor_id: Option<u64>,
}

// ── Announcements ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AnnouncementsArgs {
    #[command(subcommand)]
    pub command: AnnouncementsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AnnouncementsCommand {
    /// List one page of announcements
    #[command(alias = "ls")]
    List(AnnouncementListArgs),

    /// Show announcement statistics
    Stats,

    /// Delete announcements by id
    #[command(alias = "rm")]
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
pub struct AnnouncementListArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// Filter by category
    #[arg(long, value_parser = ["general", "event", "urgent"])]
    pub category: Option<String>,

    /// Filter by status
    #[arg(long, value_parser = ["draft", "published"])]
    pub status: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles (default marked with *)
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Add or replace a profile
    AddProfile {
        /// Profile name
        name: String,

        /// API base URL
        #[arg(long)]
        api_url: String,

        /// Session file for this profile
        #[arg(long)]
        session_file: Option<PathBuf>,

        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
