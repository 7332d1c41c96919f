//! The game's session record and the handler that advances it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::Error;
use crate::chem::{self, LipinskiReport, Molecule, MolecularGraph};
use crate::config::{GameSettings, Substituent};

pub const MSG_GROUP_ADDED: &str = "Group added successfully!";
pub const MSG_INVALID_MODIFICATION: &str = "Invalid modification!";
pub const MSG_CURRENT_INVALID: &str = "Current molecule is invalid!";
pub const MSG_SMILES_UPDATED: &str = "SMILES updated successfully!";
pub const MSG_INVALID_SMILES: &str = "Invalid SMILES!";
pub const MSG_TIME_UP: &str = "Time's up!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    #[serde(rename = "tutorial")]
    Tutorial,
    #[serde(rename = "design challenge")]
    DesignChallenge,
    #[serde(rename = "fix-it mode")]
    FixIt,
    #[serde(rename = "time trial")]
    TimeTrial,
}

impl GameMode {
    pub const ALL: [GameMode; 4] = [
        GameMode::Tutorial,
        GameMode::DesignChallenge,
        GameMode::FixIt,
        GameMode::TimeTrial,
    ];

    /// Whether compliant molecules earn points in this mode.
    pub fn scores(&self) -> bool {
        *self != GameMode::Tutorial
    }

    pub fn briefing(&self) -> &'static str {
        match self {
            GameMode::Tutorial => {
                "Start with ethane (CC) and add functional groups one at a time; one rule violation is allowed."
            }
            GameMode::DesignChallenge => {
                "Design drug-like molecules that follow the Rule of 5: +1 point for each compliant molecule."
            }
            GameMode::FixIt => "Optimize non-compliant molecules until they pass.",
            GameMode::TimeTrial => {
                "Create as many compliant molecules as possible before the clock runs out."
            }
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameMode::Tutorial => "tutorial",
            GameMode::DesignChallenge => "design challenge",
            GameMode::FixIt => "fix-it mode",
            GameMode::TimeTrial => "time trial",
        };
        f.write_str(s)
    }
}

impl FromStr for GameMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match norm.as_str() {
            "tutorial" => Ok(GameMode::Tutorial),
            "design" | "design challenge" => Ok(GameMode::DesignChallenge),
            "fix it" | "fix it mode" | "fixit" => Ok(GameMode::FixIt),
            "time trial" | "trial" => Ok(GameMode::TimeTrial),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }
}

/// Everything the game remembers between interactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub score: u32,
    pub current_smiles: String,
    pub mode: GameMode,
    /// Unix seconds when the current time trial began.
    #[serde(default)]
    pub started_at: Option<u64>,
    /// Set once the current molecule has been scored.
    #[serde(default)]
    pub submitted: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub view_3d: bool,
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self::new("CC")
    }
}

impl SessionRecord {
    pub fn new(start_smiles: impl Into<String>) -> Self {
        Self {
            score: 0,
            current_smiles: start_smiles.into(),
            mode: GameMode::Tutorial,
            started_at: None,
            submitted: false,
            message: String::new(),
            view_3d: false,
        }
    }

    /// Seconds left in a time trial; `None` in other modes or before start.
    pub fn remaining_seconds(&self, now_secs: u64, limit_s: u64) -> Option<i64> {
        if self.mode != GameMode::TimeTrial {
            return None;
        }
        let started = self.started_at?;
        Some(limit_s as i64 - now_secs.saturating_sub(started) as i64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Re-evaluate the current molecule without editing it.
    Refresh,
    SetMode(GameMode),
    /// Attach a fragment SMILES with a `*` attachment point.
    AddGroup(String),
    SetSmiles(String),
    ToggleView(bool),
}

/// The record after an action plus what the player should be shown.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub record: SessionRecord,
    /// Rule-of-5 evaluation of the current molecule, if it parses.
    pub report: Option<LipinskiReport>,
    pub remaining_s: Option<i64>,
    pub time_up: bool,
}

/// Game rules: start molecule, time limit and functional-group library.
#[derive(Debug, Clone)]
pub struct Game {
    settings: GameSettings,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameSettings::default())
    }
}

impl Game {
    pub fn new(settings: GameSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// A fresh session at the start molecule in tutorial mode.
    pub fn new_session(&self) -> SessionRecord {
        SessionRecord::new(self.settings.start_smiles.clone())
    }

    pub fn substituent(&self, name: &str) -> Result<&Substituent, Error> {
        self.settings
            .substituent(name)
            .ok_or_else(|| Error::UnknownSubstituent(name.to_string()))
    }

    /// Applies one action and scores the resulting molecule.
    ///
    /// A mode change always goes through and resets the session. Once a
    /// time trial's clock has run out every other action is ignored.
    /// Points are only awarded outside tutorial mode, once per molecule.
    pub fn handle(&self, mut record: SessionRecord, action: Action, now_secs: u64) -> Turn {
        if let Action::SetMode(mode) = &action {
            if *mode != record.mode {
                record.mode = *mode;
                record.current_smiles = self.settings.start_smiles.clone();
                record.score = 0;
                record.submitted = false;
                record.started_at = (*mode == GameMode::TimeTrial).then_some(now_secs);
                debug!(mode = %mode, "switched game mode");
            }
        }
        if record.mode == GameMode::TimeTrial && record.started_at.is_none() {
            record.started_at = Some(now_secs);
        }

        let remaining_s = record.remaining_seconds(now_secs, self.settings.time_limit_s);
        let time_up = remaining_s.is_some_and(|r| r <= 0);
        if time_up {
            record.message = MSG_TIME_UP.to_string();
            return Turn {
                record,
                report: None,
                remaining_s,
                time_up,
            };
        }

        match action {
            Action::Refresh | Action::SetMode(_) => {}
            Action::ToggleView(on) => record.view_3d = on,
            Action::AddGroup(fragment) => add_group(&mut record, &fragment),
            Action::SetSmiles(smiles) => set_smiles(&mut record, &smiles),
        }

        let report = chem::lipinski_profile(&record.current_smiles).ok();
        if let Some(report) = &report {
            if report.compliant && record.mode.scores() && !record.submitted {
                record.score += 1;
                record.submitted = true;
                debug!(score = record.score, smiles = %record.current_smiles, "scored molecule");
            }
        }

        Turn {
            record,
            report,
            remaining_s,
            time_up,
        }
    }
}

fn add_group(record: &mut SessionRecord, fragment: &str) {
    let Ok(base) = Molecule::parse(&record.current_smiles) else {
        record.message = MSG_CURRENT_INVALID.to_string();
        return;
    };
    match chem::attach_functional_group(&base, fragment) {
        Ok(product) => {
            record.current_smiles = product.to_smiles();
            record.message = MSG_GROUP_ADDED.to_string();
            record.submitted = false;
        }
        Err(_) => record.message = MSG_INVALID_MODIFICATION.to_string(),
    }
}

fn set_smiles(record: &mut SessionRecord, smiles: &str) {
    if smiles == record.current_smiles {
        return;
    }
    if Molecule::parse(smiles).is_ok() {
        record.current_smiles = smiles.to_string();
        record.message = MSG_SMILES_UPDATED.to_string();
        record.submitted = false;
    } else {
        record.message = MSG_INVALID_SMILES.to_string();
    }
}

/// Applies `action` with the default game rules and returns the new record.
pub fn handle(record: SessionRecord, action: Action, now_secs: u64) -> SessionRecord {
    Game::default().handle(record, action, now_secs).record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn design() -> SessionRecord {
        handle(SessionRecord::default(), Action::SetMode(GameMode::DesignChallenge), 0)
    }

    #[test]
    fn tutorial_never_scores() {
        let r = handle(SessionRecord::default(), Action::Refresh, 0);
        assert_eq!(r.score, 0);
        assert!(!r.submitted);
    }

    #[test]
    fn compliant_molecule_scores_once() {
        let r = design();
        assert_eq!(r.score, 1);
        assert!(r.submitted);
        let r = handle(r, Action::Refresh, 1);
        assert_eq!(r.score, 1);
    }

    #[test]
    fn editing_rearms_scoring() {
        let r = handle(design(), Action::AddGroup("[*:1]O".into()), 1);
        assert_eq!(r.current_smiles, "CCO");
        assert_eq!(r.message, MSG_GROUP_ADDED);
        assert_eq!(r.score, 2);
    }

    #[test]
    fn invalid_smiles_keeps_previous_molecule() {
        let r = handle(design(), Action::SetSmiles("C1CC".into()), 1);
        assert_eq!(r.current_smiles, "CC");
        assert_eq!(r.message, MSG_INVALID_SMILES);
        assert_eq!(r.score, 1);
    }

    #[test]
    fn impossible_edit_reports_invalid_modification() {
        let r = handle(design(), Action::SetSmiles("FC(F)(F)F".into()), 1);
        assert_eq!(r.message, MSG_SMILES_UPDATED);
        let r = handle(r, Action::AddGroup("[*:1]C".into()), 2);
        assert_eq!(r.current_smiles, "FC(F)(F)F");
        assert_eq!(r.message, MSG_INVALID_MODIFICATION);
    }

    #[test]
    fn corrupt_current_molecule_is_reported() {
        let mut r = SessionRecord::default();
        r.current_smiles = "C((".into();
        let r = handle(r, Action::AddGroup("[*:1]C".into()), 0);
        assert_eq!(r.message, MSG_CURRENT_INVALID);
    }

    #[test]
    fn mode_change_resets_session() {
        let r = handle(design(), Action::SetSmiles("CCCC".into()), 1);
        let r = handle(r, Action::SetMode(GameMode::TimeTrial), 100);
        assert_eq!(r.current_smiles, "CC");
        assert_eq!(r.started_at, Some(100));
        assert_eq!(r.score, 1);
        let r = handle(r, Action::SetMode(GameMode::FixIt), 120);
        assert_eq!(r.started_at, None);
    }

    #[test]
    fn time_trial_expires() {
        let game = Game::default();
        let turn = game.handle(SessionRecord::default(), Action::SetMode(GameMode::TimeTrial), 1000);
        assert_eq!(turn.remaining_s, Some(60));
        let turn = game.handle(turn.record, Action::SetSmiles("CCO".into()), 1030);
        assert_eq!(turn.remaining_s, Some(30));
        assert_eq!(turn.record.current_smiles, "CCO");

        let late = game.handle(turn.record, Action::SetSmiles("CCN".into()), 1060);
        assert!(late.time_up);
        assert_eq!(late.record.current_smiles, "CCO");
        assert_eq!(late.record.message, MSG_TIME_UP);
        assert!(late.report.is_none());
    }

    #[test]
    fn record_round_trips_through_json() {
        let r = design();
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"design challenge\""));
        let back: SessionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn modes_parse_from_cli_spellings() {
        assert_eq!("fix-it".parse::<GameMode>().unwrap(), GameMode::FixIt);
        assert_eq!("time_trial".parse::<GameMode>().unwrap(), GameMode::TimeTrial);
        assert!("arcade".parse::<GameMode>().is_err());
        assert!(Game::default().substituent("nitro").is_err());
    }
}
