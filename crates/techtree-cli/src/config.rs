//! Runtime settings for the `techtree` binary.
//!
//! Settings are plain data with defaults; `main` fills them from command
//! line flags and environment variables.

use std::path::PathBuf;

/// Environment variable overriding the game data directory.
pub const GAME_DATA_ENV: &str = "TECHTREE_GAME_DATA";
/// Environment variable overriding the state directory.
pub const STATE_DIR_ENV: &str = "TECHTREE_STATE_DIR";

const PINNED_FILE: &str = "pinned.json";
const KNOWN_FILE: &str = "known.json";
const BENEFITS_FILE: &str = "tech_benefits.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root holding `Templates/` and `Localization/en/`.
    pub game_data: PathBuf,
    /// Where the pinned list and known ids are persisted.
    pub state_dir: PathBuf,
    /// Print JSON instead of text.
    pub json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game_data: PathBuf::from("./game-data"),
            state_dir: PathBuf::from("./.techtree"),
            json: false,
        }
    }
}

impl Settings {
    pub fn template_path(&self, name: &str) -> PathBuf {
        self.game_data.join("Templates").join(format!("{name}.json"))
    }

    pub fn localization_path(&self, name: &str) -> PathBuf {
        self.game_data
            .join("Localization")
            .join("en")
            .join(format!("{name}.en"))
    }

    pub fn benefits_path(&self) -> PathBuf {
        self.game_data.join(BENEFITS_FILE)
    }

    pub fn pinned_path(&self) -> PathBuf {
        self.state_dir.join(PINNED_FILE)
    }

    pub fn known_path(&self) -> PathBuf {
        self.state_dir.join(KNOWN_FILE)
    }
}
