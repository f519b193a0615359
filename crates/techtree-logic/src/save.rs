//! Finished research extracted from a game save.
//!
//! A save is a JSON document whose `gamestates` object maps fully-qualified
//! state type names to arrays of `{ "Key": {...}, "Value": {...} }` entries.
//! Only three state types matter here: the player state (to find the human
//! faction), the global research state (finished technologies) and the
//! faction states (finished projects, per faction).

use serde::{Deserialize, Serialize};
use serde_json::Value;

const PLAYER_STATE: &str = "PavonisInteractive.TerraInvicta.TIPlayerState";
const RESEARCH_STATE: &str = "PavonisInteractive.TerraInvicta.TIGlobalResearchState";
const FACTION_STATE: &str = "PavonisInteractive.TerraInvicta.TIFactionState";

/// Errors raised while reading a save snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("save is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save is missing {0}")]
    Missing(&'static str),
}

/// Ids of everything the player has finished researching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishedResearch {
    pub technologies: Vec<String>,
    pub projects: Vec<String>,
}

impl FinishedResearch {
    /// Parse the decompressed text of a save file.
    ///
    /// Saves may contain the bare token `Infinity`, which is not valid JSON.
    /// None of the fields read here use it, so it is replaced by `1` before
    /// parsing.
    pub fn from_save_json(text: &str) -> Result<Self, SaveError> {
        let save: Value = serde_json::from_str(&text.replace("Infinity", "1"))?;
        Self::from_save(&save)
    }

    /// Extract finished research from an already-parsed save.
    pub fn from_save(save: &Value) -> Result<Self, SaveError> {
        let states = save
            .get("gamestates")
            .ok_or(SaveError::Missing("gamestates"))?;

        let player_faction = states
            .get(PLAYER_STATE)
            .and_then(Value::as_array)
            .ok_or(SaveError::Missing("player states"))?
            .iter()
            .find(|state| !state["Value"]["isAI"].as_bool().unwrap_or(false))
            .map(|state| &state["Key"]["value"])
            .ok_or(SaveError::Missing("a human player"))?;

        let technologies = states
            .get(RESEARCH_STATE)
            .and_then(Value::as_array)
            .and_then(|entries| entries.first())
            .map(|state| &state["Value"]["finishedTechsNames"])
            .and_then(string_list)
            .ok_or(SaveError::Missing("finished technologies"))?;

        let projects = states
            .get(FACTION_STATE)
            .and_then(Value::as_array)
            .ok_or(SaveError::Missing("faction states"))?
            .iter()
            .find(|state| &state["Value"]["player"]["value"] == player_faction)
            .map(|state| &state["Value"]["finishedProjectNames"])
            .and_then(string_list)
            .ok_or(SaveError::Missing("the player faction's finished projects"))?;

        Ok(Self {
            technologies,
            projects,
        })
    }

    /// Technologies first, then projects.
    pub fn all(&self) -> impl Iterator<Item = &str> + '_ {
        self.technologies
            .iter()
            .chain(self.projects.iter())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.technologies.len() + self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_save() -> String {
        r#"{
            "gamestates": {
                "PavonisInteractive.TerraInvicta.TIPlayerState": [
                    {"Key": {"value": 10}, "Value": {"isAI": true}},
                    {"Key": {"value": 11}, "Value": {"isAI": false}}
                ],
                "PavonisInteractive.TerraInvicta.TIGlobalResearchState": [
                    {"Key": {"value": 1}, "Value": {"finishedTechsNames": ["A", "B"], "decay": Infinity}}
                ],
                "PavonisInteractive.TerraInvicta.TIFactionState": [
                    {"Key": {"value": 20}, "Value": {"player": {"value": 10}, "finishedProjectNames": ["Project_X"]}},
                    {"Key": {"value": 21}, "Value": {"player": {"value": 11}, "finishedProjectNames": ["Project_Y"]}}
                ]
            }
        }"#
        .to_string()
    }

    #[test]
    fn test_extracts_player_research() {
        let finished = FinishedResearch::from_save_json(&sample_save()).unwrap();
        assert_eq!(finished.technologies, vec!["A", "B"]);
        assert_eq!(finished.projects, vec!["Project_Y"]);
        assert_eq!(finished.len(), 3);
        let all: Vec<&str> = finished.all().collect();
        assert_eq!(all, vec!["A", "B", "Project_Y"]);
    }

    #[test]
    fn test_missing_gamestates() {
        let err = FinishedResearch::from_save_json("{}").unwrap_err();
        assert!(matches!(err, SaveError::Missing("gamestates")));
    }

    #[test]
    fn test_no_human_player() {
        let save = sample_save().replace("\"isAI\": false", "\"isAI\": true");
        let err = FinishedResearch::from_save_json(&save).unwrap_err();
        assert!(matches!(err, SaveError::Missing("a human player")));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            FinishedResearch::from_save_json("not json"),
            Err(SaveError::Json(_))
        ));
    }
}
