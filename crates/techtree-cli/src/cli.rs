//! Command line definition.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use techtree_logic::SummaryMode;

use crate::config::{Settings, GAME_DATA_ENV, STATE_DIR_ENV};

/// Browse a research tree, track known techs and pinned goals.
#[derive(Debug, Parser)]
#[command(name = "techtree", version, propagate_version = true)]
pub struct Cli {
    /// Game data directory holding Templates/ and Localization/ [default: ./game-data]
    #[arg(long, env = GAME_DATA_ENV, global = true)]
    pub game_data: Option<PathBuf>,

    /// Directory for pinned.json and known.json [default: ./.techtree]
    #[arg(long, env = STATE_DIR_ENV, global = true)]
    pub state_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn settings(&self) -> Settings {
        let defaults = Settings::default();
        Settings {
            game_data: self.game_data.clone().unwrap_or(defaults.game_data),
            state_dir: self.state_dir.clone().unwrap_or(defaults.state_dir),
            json: self.json,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the distinct roles
    Roles {
        /// Only consider nodes matching this search
        #[arg(long)]
        search: Option<String>,
    },
    /// List the techs and projects of a role, cheapest to finish first
    Role {
        role: String,
        /// Only consider nodes matching this search
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one technology or project
    Show { id: String },
    /// Search display names (at least 3 characters)
    Search { query: String },
    /// Known-state commands
    Known {
        #[command(subcommand)]
        action: KnownCommand,
    },
    /// Pin a research goal
    Pin { id: String },
    /// Unpin a research goal, or every goal with --all
    Unpin {
        #[arg(required_unless_present = "all")]
        id: Option<String>,
        /// Clear the whole pinned list
        #[arg(long, conflicts_with = "id")]
        all: bool,
    },
    /// Move a pinned goal to a drop slot (0 = before the first goal)
    Move { id: String, slot: usize },
    /// Show pinned goals and what they cost
    Pinned {
        #[arg(long, value_enum, default_value_t = ModeArg::Direct)]
        mode: ModeArg,
    },
    /// Load and validate the game data
    Validate,
}

#[derive(Debug, Subcommand)]
pub enum KnownCommand {
    /// List known nodes by name
    List,
    /// Flip the known flag of a node
    Toggle { id: String },
    /// Forget every known flag
    Clear,
    /// Mark the finished research of a save file as known
    Import { save: PathBuf },
}

/// Summary mode as a command line value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Own cost of each pinned goal
    Direct,
    /// Every unknown requirement, counted once
    Recursive,
}

impl From<ModeArg> for SummaryMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Direct => SummaryMode::Direct,
            ModeArg::Recursive => SummaryMode::Recursive,
        }
    }
}
