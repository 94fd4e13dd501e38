//! Scene state machine.
//!
//! Scenes are a closed set; every move goes through [`Scene::next`], which only
//! accepts the triggers listed in its transition table.

use thiserror::Error;

use crate::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scene {
    #[default]
    Intro,
    Debrief,
    Revenue,
    Blind,
    Adjust,
    Compare,
}

/// What caused a scene change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneTrigger {
    /// User: start from the intro.
    Start,
    /// User: continue to the next scene.
    Continue,
    /// User: skip the revenue explorer.
    Skip,
    /// User: jump back to the debrief panel.
    OpenDebrief,
    /// System: both layers have a blind submission.
    BlindComplete,
    /// System: an adjusted allocation was submitted.
    AdjustedSubmitted,
    /// User: throw everything away.
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{trigger:?} is not allowed from the {from:?} scene")]
pub struct TransitionError {
    pub from: Scene,
    pub trigger: SceneTrigger,
}

impl Scene {
    pub const ALL: [Scene; 6] = [
        Scene::Intro,
        Scene::Debrief,
        Scene::Revenue,
        Scene::Blind,
        Scene::Adjust,
        Scene::Compare,
    ];

    pub fn next(self, trigger: SceneTrigger) -> Result<Scene, TransitionError> {
        use Scene::{Adjust, Blind, Compare, Debrief, Intro, Revenue};
        use SceneTrigger::{
            AdjustedSubmitted, BlindComplete, Continue, OpenDebrief, Restart, Skip, Start,
        };

        let to = match (self, trigger) {
            (Intro, Start) | (_, OpenDebrief) => Debrief,
            (Debrief, Continue) => Revenue,
            (Debrief, Skip) | (Revenue, Continue) => Blind,
            (Blind, BlindComplete) => Adjust,
            (Adjust, AdjustedSubmitted) => Compare,
            (_, Restart) => Intro,
            (from, trigger) => return Err(TransitionError { from, trigger }),
        };
        Ok(to)
    }

    /// The allocation phase edited in this scene, if any.
    #[must_use]
    pub const fn phase(self) -> Option<Phase> {
        match self {
            Scene::Blind => Some(Phase::Blind),
            Scene::Adjust => Some(Phase::Adjusted),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_editing(self) -> bool {
        self.phase().is_some()
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Scene::Intro => "Welcome",
            Scene::Debrief => "Debrief",
            Scene::Revenue => "Where the money goes",
            Scene::Blind => "Blind allocation",
            Scene::Adjust => "Adjust with context",
            Scene::Compare => "Results",
        }
    }

    /// Advisor line for the scene. `total_millions` is the active layer's budget.
    #[must_use]
    pub fn advisor(self, total_millions: f64) -> String {
        match self {
            Scene::Intro => "Welcome. You will help decide how Ottawa allocates its budget. Press Enter to begin.".to_string(),
            Scene::Debrief => format!(
                "You have ${} to distribute. Think about services that affect daily life: transit, housing, safety, and the environment.",
                format_millions(total_millions)
            ),
            Scene::Revenue => "This shows where the city spends its money. Select a slice to learn more about each sector.".to_string(),
            Scene::Blind => "Trust your instincts. Move the sliders to make your ideal city. The labels are minimal to avoid bias.".to_string(),
            Scene::Adjust => "Here are the city's shares for each sector. Adjust your allocations with this new information.".to_string(),
            Scene::Compare => "Here are your results and how they compare to the City of Ottawa budgets.".to_string(),
        }
    }
}

/// `5050.0` -> `"5050M"`, `1471.282` -> `"1471.282M"`.
#[must_use]
pub fn format_millions(total: f64) -> String {
    if total.fract().abs() < f64::EPSILON {
        format!("{total:.0}M")
    } else {
        let s = format!("{total:.3}");
        let s = s.trim_end_matches('0').trim_end_matches('.');
        format!("{s}M")
    }
}
