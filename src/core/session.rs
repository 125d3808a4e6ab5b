use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    core::{store::MatchStore, undo::UndoLog},
    op::UndoEntry,
    persist::{PersistError, StoreSink},
    record::{AutoSection, Counters, Record, RobotCoords, TeleopSection, truncate_comment},
    types::{Alliance, ClimbState, MatchId, Phase, YesNo},
};

/// Side length of the starting-position marker.
pub const MARKER_SIZE: f64 = 40.0;
/// Top-left corner where the marker first appears.
pub const MARKER_ORIGIN: f64 = 10.0;

/// Capture stage, in strict forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    MatchSelect,
    TeamSetup,
    StartingPosition,
    AutoPhase,
    TeleopPhase,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MatchSelect => "match select",
            Self::TeamSetup => "team setup",
            Self::StartingPosition => "starting position",
            Self::AutoPhase => "auto phase",
            Self::TeleopPhase => "teleop phase",
        };
        f.write_str(name)
    }
}

/// How `start` treats an empty team number or a missing alliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Accept whatever the form holds.
    #[default]
    Permissive,
    /// Refuse to start without a team number and an alliance.
    Strict,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("cannot {action} during {from}")]
    InvalidTransition { from: Stage, action: &'static str },
    #[error("team and alliance are locked; edit the saved match first")]
    Locked,
    #[error("Unknown Field: {0}")]
    UnknownField(String),
    #[error("validation failed: {0}")]
    Validation(&'static str),
    #[error("no match selected")]
    NoMatchSelected,
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// What selecting a match found in the store.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchView {
    /// No stored record; a fresh draft begins.
    Draft,
    /// Stored record, shown read-only until [`Session::edit`].
    Saved(Record),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub validation: ValidationPolicy,
    pub field_width: f64,
    pub field_height: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            validation: ValidationPolicy::Permissive,
            field_width: 600.0,
            field_height: 259.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct PhaseDraft {
    counters: Counters,
    comment: String,
    undo: UndoLog,
}

/// The in-progress capture for one match.
///
/// Owns every draft field and both undo logs. Nothing is written to the store
/// until [`Session::commit`].
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    stage: Stage,
    match_id: Option<MatchId>,
    team_number: String,
    scouter_name: Option<String>,
    alliance: Option<Alliance>,
    locked: bool,
    robot_coords: Option<RobotCoords>,
    moved_state: YesNo,
    climb_state: ClimbState,
    broken_state: YesNo,
    auto: PhaseDraft,
    teleop: PhaseDraft,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            stage: Stage::MatchSelect,
            match_id: None,
            team_number: String::new(),
            scouter_name: None,
            alliance: None,
            locked: false,
            robot_coords: None,
            moved_state: YesNo::No,
            climb_state: ClimbState::NoBarge,
            broken_state: YesNo::No,
            auto: PhaseDraft::default(),
            teleop: PhaseDraft::default(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn match_id(&self) -> Option<&MatchId> {
        self.match_id.as_ref()
    }

    pub fn team_number(&self) -> &str {
        &self.team_number
    }

    pub fn scouter_name(&self) -> Option<&str> {
        self.scouter_name.as_deref()
    }

    pub fn alliance(&self) -> Option<Alliance> {
        self.alliance
    }

    /// True while a saved match is shown and not yet reopened with [`Session::edit`].
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn robot_coords(&self) -> Option<RobotCoords> {
        self.robot_coords
    }

    pub fn moved_state(&self) -> YesNo {
        self.moved_state
    }

    pub fn climb_state(&self) -> ClimbState {
        self.climb_state
    }

    pub fn broken_state(&self) -> YesNo {
        self.broken_state
    }

    /// Phase whose counters and undo log are live, if any.
    pub fn current_phase(&self) -> Option<Phase> {
        match self.stage {
            Stage::AutoPhase => Some(Phase::Auto),
            Stage::TeleopPhase => Some(Phase::Teleop),
            _ => None,
        }
    }

    pub fn counter(&self, phase: Phase, key: &str) -> Option<i64> {
        self.phase(phase).counters.get(key)
    }

    pub fn comment(&self, phase: Phase) -> &str {
        &self.phase(phase).comment
    }

    pub fn undo_len(&self, phase: Phase) -> usize {
        self.phase(phase).undo.len()
    }

    /// The background is drawn mirrored for the blue alliance.
    pub fn field_mirrored(&self) -> bool {
        self.alliance == Some(Alliance::Blue)
    }

    /// Opens `id`: a fresh draft, or the stored record with team and alliance locked.
    pub fn select_match(
        &mut self,
        store: &MatchStore,
        id: MatchId,
    ) -> Result<MatchView, SessionError> {
        self.expect_stage(&[Stage::MatchSelect, Stage::TeamSetup], "select a match")?;
        self.clear_draft();

        let view = match store.get(&id) {
            Some(saved) => {
                self.load_saved(saved);
                MatchView::Saved(saved.clone())
            }
            None => MatchView::Draft,
        };
        debug!(match_id = %id, saved = matches!(view, MatchView::Saved(_)), "match selected");
        self.match_id = Some(id);
        self.stage = Stage::TeamSetup;
        Ok(view)
    }

    /// Unlocks team and alliance of a saved match.
    pub fn edit(&mut self) -> Result<(), SessionError> {
        self.expect_stage(&[Stage::TeamSetup], "edit")?;
        self.locked = false;
        Ok(())
    }

    pub fn set_team_number(&mut self, text: &str) -> Result<(), SessionError> {
        self.expect_unlocked_setup("set the team number")?;
        self.team_number = text.to_string();
        Ok(())
    }

    pub fn set_alliance(&mut self, alliance: Alliance) -> Result<(), SessionError> {
        self.expect_unlocked_setup("set the alliance")?;
        self.alliance = Some(alliance);
        Ok(())
    }

    /// Blank names clear the field.
    pub fn set_scouter_name(&mut self, text: &str) -> Result<(), SessionError> {
        self.expect_stage(&[Stage::TeamSetup], "set the scouter name")?;
        let name = text.trim();
        self.scouter_name = (!name.is_empty()).then(|| name.to_string());
        Ok(())
    }

    /// Leaves team setup with whatever the form holds.
    ///
    /// Under [`ValidationPolicy::Strict`] an empty team number or a missing
    /// alliance is refused instead.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.expect_stage(&[Stage::TeamSetup], "start")?;
        let team = self.team_number.trim().to_string();
        if self.config.validation == ValidationPolicy::Strict {
            if team.is_empty() {
                return Err(SessionError::Validation("team number is required"));
            }
            if self.alliance.is_none() {
                return Err(SessionError::Validation("alliance is required"));
            }
        }
        self.team_number = team;
        if self.robot_coords.is_none() {
            self.robot_coords = Some(self.default_marker());
        }
        self.stage = Stage::StartingPosition;
        debug!(team = %self.team_number, "starting position");
        Ok(())
    }

    /// Drags the marker by `(dx, dy)`, stopping at the field edges.
    pub fn move_marker(&mut self, dx: f64, dy: f64) -> Result<RobotCoords, SessionError> {
        self.expect_stage(&[Stage::StartingPosition], "move the marker")?;
        let current = self.robot_coords.unwrap_or_else(|| self.default_marker());
        let moved =
            current.translate_clamped(dx, dy, self.config.field_width, self.config.field_height);
        self.robot_coords = Some(moved);
        Ok(moved)
    }

    /// Drops the marker at `coords`, shifted back inside the field if needed.
    pub fn place_marker(&mut self, coords: RobotCoords) -> Result<RobotCoords, SessionError> {
        self.expect_stage(&[Stage::StartingPosition], "place the marker")?;
        let placed = coords.clamped_into(self.config.field_width, self.config.field_height);
        self.robot_coords = Some(placed);
        Ok(placed)
    }

    pub fn begin_auto(&mut self) -> Result<(), SessionError> {
        self.expect_stage(&[Stage::StartingPosition], "begin auto")?;
        self.stage = Stage::AutoPhase;
        debug!(coords = ?self.robot_coords, "auto phase");
        Ok(())
    }

    pub fn begin_teleop(&mut self) -> Result<(), SessionError> {
        self.expect_stage(&[Stage::AutoPhase], "begin teleop")?;
        self.stage = Stage::TeleopPhase;
        debug!("teleop phase");
        Ok(())
    }

    pub fn increment(&mut self, key: &str) -> Result<i64, SessionError> {
        self.bump(key, 1, "increment")
    }

    pub fn decrement(&mut self, key: &str) -> Result<i64, SessionError> {
        self.bump(key, -1, "decrement")
    }

    /// Flips the auto moved state.
    pub fn toggle_moved(&mut self) -> Result<YesNo, SessionError> {
        self.expect_stage(&[Stage::AutoPhase], "toggle moved")?;
        let previous = self.moved_state;
        self.moved_state = previous.flipped();
        self.auto.undo.push(UndoEntry::Toggle { previous });
        Ok(self.moved_state)
    }

    /// Flips the teleop broken state. Reversible like every other toggle.
    pub fn toggle_broken(&mut self) -> Result<YesNo, SessionError> {
        self.expect_stage(&[Stage::TeleopPhase], "toggle broken")?;
        let previous = self.broken_state;
        self.broken_state = previous.flipped();
        self.teleop.undo.push(UndoEntry::Broken { previous });
        Ok(self.broken_state)
    }

    /// Not undo-logged; the selector always shows one current value.
    pub fn set_climb_state(&mut self, state: ClimbState) -> Result<(), SessionError> {
        self.expect_stage(&[Stage::TeleopPhase], "set the climb state")?;
        self.climb_state = state;
        Ok(())
    }

    /// Stores the raw comment for the current phase; truncation happens on materialization.
    pub fn set_comment(&mut self, text: &str) -> Result<(), SessionError> {
        let phase = self.require_phase("set a comment")?;
        self.phase_mut(phase).comment = text.to_string();
        Ok(())
    }

    /// Reverts the newest logged action of the current phase.
    ///
    /// Returns `None` when the log is empty.
    pub fn undo(&mut self) -> Result<Option<UndoEntry>, SessionError> {
        let phase = self.require_phase("undo")?;
        let Some(entry) = self.phase_mut(phase).undo.pop() else {
            return Ok(None);
        };

        match &entry {
            UndoEntry::Counter { key, previous } => {
                self.phase_mut(phase).counters.set(key, *previous);
            }
            UndoEntry::Toggle { previous } => self.moved_state = *previous,
            UndoEntry::Broken { previous } => self.broken_state = *previous,
        }
        Ok(Some(entry))
    }

    /// Materializes the draft as a record without storing it.
    pub fn snapshot(&self) -> Result<Record, SessionError> {
        let match_number = self.match_id.clone().ok_or(SessionError::NoMatchSelected)?;
        Ok(Record {
            match_number,
            team_number: self.team_number.trim().to_string(),
            alliance: self.alliance,
            scouter_name: self.scouter_name.clone(),
            auto: AutoSection {
                counters: self.auto.counters.clone(),
                moved_state: self.moved_state,
                robot_coords: self.robot_coords,
                comment: truncate_comment(&self.auto.comment),
            },
            teleop: TeleopSection {
                counters: self.teleop.counters.clone(),
                climb_state: self.climb_state,
                teleop_broken_state: self.broken_state,
                comment: truncate_comment(&self.teleop.comment),
            },
        })
    }

    /// Ends the match: stores the record, rewrites the store, and returns to match select.
    ///
    /// When the rewrite fails the record stays in `store`, the error is
    /// returned, and the session remains in the teleop phase.
    pub fn commit(
        &mut self,
        store: &mut MatchStore,
        sink: &mut dyn StoreSink,
    ) -> Result<Record, SessionError> {
        self.expect_stage(&[Stage::TeleopPhase], "commit")?;
        let record = self.snapshot()?;
        let replaced = store.upsert(record.clone()).is_some();
        sink.write_all(store)?;
        info!(
            match_id = %record.match_number,
            team = %record.team_number,
            replaced,
            "match committed"
        );
        self.reset();
        Ok(record)
    }

    /// Discards the draft and returns to match select.
    pub fn reset(&mut self) {
        self.clear_draft();
        self.match_id = None;
        self.stage = Stage::MatchSelect;
    }

    pub fn counter_label(&self, phase: Phase, key: &str) -> Option<String> {
        self.counter(phase, key).map(|v| format!("{key}: {v}"))
    }

    pub fn moved_label(&self) -> String {
        format!("Moved away from middle: {}", self.moved_state.as_str())
    }

    pub fn broken_label(&self) -> String {
        format!("Broken: {}", self.broken_state.as_str())
    }

    fn bump(&mut self, key: &str, delta: i64, action: &'static str) -> Result<i64, SessionError> {
        let phase = self.require_phase(action)?;
        let draft = self.phase_mut(phase);
        let previous = draft
            .counters
            .get(key)
            .ok_or_else(|| SessionError::UnknownField(key.to_string()))?;
        let next = previous + delta;
        draft.counters.set(key, next);
        draft.undo.push(UndoEntry::Counter {
            key: key.to_string(),
            previous,
        });
        Ok(next)
    }

    fn load_saved(&mut self, saved: &Record) {
        self.team_number = saved.team_number.clone();
        self.alliance = saved.alliance;
        self.scouter_name = saved.scouter_name.clone();
        self.robot_coords = saved.auto.robot_coords;
        self.moved_state = saved.auto.moved_state;
        self.climb_state = saved.teleop.climb_state;
        self.broken_state = saved.teleop.teleop_broken_state;
        self.auto.counters = saved.auto.counters.clone();
        self.auto.comment = saved.auto.comment.clone();
        self.teleop.counters = saved.teleop.counters.clone();
        self.teleop.comment = saved.teleop.comment.clone();
        self.locked = true;
    }

    fn clear_draft(&mut self) {
        *self = Self::new(self.config);
    }

    fn default_marker(&self) -> RobotCoords {
        RobotCoords::new(
            MARKER_ORIGIN,
            MARKER_ORIGIN,
            MARKER_ORIGIN + MARKER_SIZE,
            MARKER_ORIGIN + MARKER_SIZE,
        )
    }

    fn phase(&self, phase: Phase) -> &PhaseDraft {
        match phase {
            Phase::Auto => &self.auto,
            Phase::Teleop => &self.teleop,
        }
    }

    fn phase_mut(&mut self, phase: Phase) -> &mut PhaseDraft {
        match phase {
            Phase::Auto => &mut self.auto,
            Phase::Teleop => &mut self.teleop,
        }
    }

    fn require_phase(&self, action: &'static str) -> Result<Phase, SessionError> {
        self.current_phase().ok_or(SessionError::InvalidTransition {
            from: self.stage,
            action,
        })
    }

    fn expect_stage(&self, allowed: &[Stage], action: &'static str) -> Result<(), SessionError> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                from: self.stage,
                action,
            })
        }
    }

    fn expect_unlocked_setup(&self, action: &'static str) -> Result<(), SessionError> {
        self.expect_stage(&[Stage::TeamSetup], action)?;
        if self.locked {
            return Err(SessionError::Locked);
        }
        Ok(())
    }
}
