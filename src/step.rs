//! Canonical CBT diary step sequence.
//!
//! The diary walks nine fixed steps in a single linear order. `FlowPosition`
//! adds the terminal `Complete` pseudo-state, which sorts after every step.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the nine fixed diary steps.
///
/// The derived `Ord` follows declaration order, which is the canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CbtStepId {
    Situation,
    Emotions,
    Thoughts,
    CoreBelief,
    ChallengeQuestions,
    RationalThoughts,
    SchemaModes,
    Actions,
    FinalEmotions,
}

impl CbtStepId {
    /// All steps in canonical order.
    pub const ALL: [CbtStepId; 9] = [
        CbtStepId::Situation,
        CbtStepId::Emotions,
        CbtStepId::Thoughts,
        CbtStepId::CoreBelief,
        CbtStepId::ChallengeQuestions,
        CbtStepId::RationalThoughts,
        CbtStepId::SchemaModes,
        CbtStepId::Actions,
        CbtStepId::FinalEmotions,
    ];

    /// Zero-based position in the canonical sequence.
    pub fn order(self) -> usize {
        match self {
            CbtStepId::Situation => 0,
            CbtStepId::Emotions => 1,
            CbtStepId::Thoughts => 2,
            CbtStepId::CoreBelief => 3,
            CbtStepId::ChallengeQuestions => 4,
            CbtStepId::RationalThoughts => 5,
            CbtStepId::SchemaModes => 6,
            CbtStepId::Actions => 7,
            CbtStepId::FinalEmotions => 8,
        }
    }

    /// One-based step number for progress display.
    pub fn ordinal(self) -> u8 {
        // order() is at most 8
        self.order() as u8 + 1
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        let index = usize::from(ordinal).checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    /// The position after this step; `Complete` after `FinalEmotions`.
    pub fn next(self) -> FlowPosition {
        match Self::ALL.get(self.order() + 1) {
            Some(step) => FlowPosition::Step(*step),
            None => FlowPosition::Complete,
        }
    }

    pub fn previous(self) -> Option<Self> {
        self.order().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Whether the step's payload is a list that must be non-empty.
    pub fn is_list_step(self) -> bool {
        matches!(
            self,
            CbtStepId::Thoughts
                | CbtStepId::ChallengeQuestions
                | CbtStepId::RationalThoughts
                | CbtStepId::SchemaModes
        )
    }

    /// Kebab-case identifier, as used on the wire and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            CbtStepId::Situation => "situation",
            CbtStepId::Emotions => "emotions",
            CbtStepId::Thoughts => "thoughts",
            CbtStepId::CoreBelief => "core-belief",
            CbtStepId::ChallengeQuestions => "challenge-questions",
            CbtStepId::RationalThoughts => "rational-thoughts",
            CbtStepId::SchemaModes => "schema-modes",
            CbtStepId::Actions => "actions",
            CbtStepId::FinalEmotions => "final-emotions",
        }
    }

    /// Title shown to the user for this step.
    pub fn label(self) -> &'static str {
        match self {
            CbtStepId::Situation => "Situation",
            CbtStepId::Emotions => "Emotions",
            CbtStepId::Thoughts => "Automatic Thoughts",
            CbtStepId::CoreBelief => "Core Belief",
            CbtStepId::ChallengeQuestions => "Challenge Questions",
            CbtStepId::RationalThoughts => "Rational Thoughts",
            CbtStepId::SchemaModes => "Schema Modes",
            CbtStepId::Actions => "Action Plan",
            CbtStepId::FinalEmotions => "Final Emotions",
        }
    }
}

impl fmt::Display for CbtStepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CbtStepId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown CBT step '{}'", s))
    }
}

/// Where the flow currently stands: on a step, or finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowPosition {
    Step(CbtStepId),
    Complete,
}

impl FlowPosition {
    /// The first position of every fresh flow.
    pub const START: FlowPosition = FlowPosition::Step(CbtStepId::Situation);

    /// Zero-based order; `Complete` is 9, after every step.
    pub fn order(self) -> usize {
        match self {
            FlowPosition::Step(step) => step.order(),
            FlowPosition::Complete => CbtStepId::ALL.len(),
        }
    }

    /// One-based step number; `Complete` is 10.
    pub fn ordinal(self) -> u8 {
        match self {
            FlowPosition::Step(step) => step.ordinal(),
            FlowPosition::Complete => CbtStepId::ALL.len() as u8 + 1,
        }
    }

    /// Inverse of [`FlowPosition::ordinal`]; out-of-range numbers map to `None`.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        if ordinal == CbtStepId::ALL.len() as u8 + 1 {
            return Some(FlowPosition::Complete);
        }
        CbtStepId::from_ordinal(ordinal).map(FlowPosition::Step)
    }

    pub fn step(self) -> Option<CbtStepId> {
        match self {
            FlowPosition::Step(step) => Some(step),
            FlowPosition::Complete => None,
        }
    }

    pub fn is_complete(self) -> bool {
        self == FlowPosition::Complete
    }

    /// Whether `step` lies strictly before this position.
    pub fn is_past(self, step: CbtStepId) -> bool {
        step.order() < self.order()
    }
}

impl fmt::Display for FlowPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowPosition::Step(step) => write!(f, "{}", step),
            FlowPosition::Complete => write!(f, "complete"),
        }
    }
}
