//! Captured diary data: one optional payload per step.
//!
//! Field names follow the camelCase shape the diary UI stores, so a draft
//! written by the web client deserializes here unchanged. Every field carries
//! `#[serde(default)]`: missing fields read as "not filled", never as errors.

use crate::step::CbtStepId;
use serde::{Deserialize, Serialize};

/// Intensity (0-10) for each named emotion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmotionScores {
    pub fear: u8,
    pub anger: u8,
    pub sadness: u8,
    pub joy: u8,
    pub anxiety: u8,
    pub shame: u8,
    pub guilt: u8,
    /// Free-text emotion not covered by the fixed set.
    pub other: Option<String>,
    pub other_intensity: Option<u8>,
}

impl EmotionScores {
    /// Named emotions paired with their intensity, in display order.
    pub fn named(&self) -> [(&'static str, u8); 7] {
        [
            ("fear", self.fear),
            ("anger", self.anger),
            ("sadness", self.sadness),
            ("joy", self.joy),
            ("anxiety", self.anxiety),
            ("shame", self.shame),
            ("guilt", self.guilt),
        ]
    }

    /// True when any emotion has a non-zero intensity or `other` has text.
    pub fn has_any(&self) -> bool {
        self.named().iter().any(|(_, v)| *v > 0)
            || self.other.as_deref().is_some_and(|o| !o.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SituationData {
    pub situation: String,
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThoughtEntry {
    pub thought: String,
    /// How strongly the thought is believed, 0-10.
    pub credibility: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoreBeliefData {
    pub core_belief_text: String,
    pub core_belief_credibility: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChallengeQuestion {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RationalThought {
    pub thought: String,
    pub confidence: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaMode {
    pub id: String,
    pub name: String,
    pub description: String,
    pub selected: bool,
    pub intensity: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionPlanData {
    pub final_emotions: EmotionScores,
    pub original_thought_credibility: Option<u8>,
    pub new_behaviors: String,
}

/// Payload for a single step. One variant per step, so a payload can never
/// be attached to the wrong step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", content = "data", rename_all = "kebab-case")]
pub enum StepData {
    Situation(SituationData),
    Emotions(EmotionScores),
    Thoughts(Vec<ThoughtEntry>),
    CoreBelief(CoreBeliefData),
    ChallengeQuestions(Vec<ChallengeQuestion>),
    RationalThoughts(Vec<RationalThought>),
    SchemaModes(Vec<SchemaMode>),
    Actions(ActionPlanData),
    FinalEmotions(EmotionScores),
}

impl StepData {
    pub fn step(&self) -> CbtStepId {
        match self {
            StepData::Situation(_) => CbtStepId::Situation,
            StepData::Emotions(_) => CbtStepId::Emotions,
            StepData::Thoughts(_) => CbtStepId::Thoughts,
            StepData::CoreBelief(_) => CbtStepId::CoreBelief,
            StepData::ChallengeQuestions(_) => CbtStepId::ChallengeQuestions,
            StepData::RationalThoughts(_) => CbtStepId::RationalThoughts,
            StepData::SchemaModes(_) => CbtStepId::SchemaModes,
            StepData::Actions(_) => CbtStepId::Actions,
            StepData::FinalEmotions(_) => CbtStepId::FinalEmotions,
        }
    }

    /// Builds the payload for `step` from its bare JSON body.
    pub fn from_json(step: CbtStepId, value: serde_json::Value) -> serde_json::Result<Self> {
        let data = match step {
            CbtStepId::Situation => StepData::Situation(serde_json::from_value(value)?),
            CbtStepId::Emotions => StepData::Emotions(serde_json::from_value(value)?),
            CbtStepId::Thoughts => StepData::Thoughts(serde_json::from_value(value)?),
            CbtStepId::CoreBelief => StepData::CoreBelief(serde_json::from_value(value)?),
            CbtStepId::ChallengeQuestions => {
                StepData::ChallengeQuestions(serde_json::from_value(value)?)
            }
            CbtStepId::RationalThoughts => {
                StepData::RationalThoughts(serde_json::from_value(value)?)
            }
            CbtStepId::SchemaModes => StepData::SchemaModes(serde_json::from_value(value)?),
            CbtStepId::Actions => StepData::Actions(serde_json::from_value(value)?),
            CbtStepId::FinalEmotions => StepData::FinalEmotions(serde_json::from_value(value)?),
        };
        Ok(data)
    }
}

/// The accumulated diary data bag. Partial until every step is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CbtSessionData {
    pub situation: Option<SituationData>,
    pub emotions: Option<EmotionScores>,
    pub thoughts: Option<Vec<ThoughtEntry>>,
    pub core_belief: Option<CoreBeliefData>,
    pub challenge_questions: Option<Vec<ChallengeQuestion>>,
    pub rational_thoughts: Option<Vec<RationalThought>>,
    pub schema_modes: Option<Vec<SchemaMode>>,
    pub actions: Option<ActionPlanData>,
    pub final_emotions: Option<EmotionScores>,
}

impl CbtSessionData {
    /// Stores `data` in its step's slot, leaving every other step untouched.
    pub fn apply(&mut self, data: StepData) {
        match data {
            StepData::Situation(d) => self.situation = Some(d),
            StepData::Emotions(d) => self.emotions = Some(d),
            StepData::Thoughts(d) => self.thoughts = Some(d),
            StepData::CoreBelief(d) => self.core_belief = Some(d),
            StepData::ChallengeQuestions(d) => self.challenge_questions = Some(d),
            StepData::RationalThoughts(d) => self.rational_thoughts = Some(d),
            StepData::SchemaModes(d) => self.schema_modes = Some(d),
            StepData::Actions(d) => self.actions = Some(d),
            StepData::FinalEmotions(d) => self.final_emotions = Some(d),
        }
    }

    pub fn get(&self, step: CbtStepId) -> Option<StepData> {
        match step {
            CbtStepId::Situation => self.situation.clone().map(StepData::Situation),
            CbtStepId::Emotions => self.emotions.clone().map(StepData::Emotions),
            CbtStepId::Thoughts => self.thoughts.clone().map(StepData::Thoughts),
            CbtStepId::CoreBelief => self.core_belief.clone().map(StepData::CoreBelief),
            CbtStepId::ChallengeQuestions => self
                .challenge_questions
                .clone()
                .map(StepData::ChallengeQuestions),
            CbtStepId::RationalThoughts => {
                self.rational_thoughts.clone().map(StepData::RationalThoughts)
            }
            CbtStepId::SchemaModes => self.schema_modes.clone().map(StepData::SchemaModes),
            CbtStepId::Actions => self.actions.clone().map(StepData::Actions),
            CbtStepId::FinalEmotions => self.final_emotions.clone().map(StepData::FinalEmotions),
        }
    }

    pub fn clear(&mut self, step: CbtStepId) {
        match step {
            CbtStepId::Situation => self.situation = None,
            CbtStepId::Emotions => self.emotions = None,
            CbtStepId::Thoughts => self.thoughts = None,
            CbtStepId::CoreBelief => self.core_belief = None,
            CbtStepId::ChallengeQuestions => self.challenge_questions = None,
            CbtStepId::RationalThoughts => self.rational_thoughts = None,
            CbtStepId::SchemaModes => self.schema_modes = None,
            CbtStepId::Actions => self.actions = None,
            CbtStepId::FinalEmotions => self.final_emotions = None,
        }
    }
}
