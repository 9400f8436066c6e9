//! Shared fixtures for unit tests.

use crate::session_data::{
    ActionPlanData, CbtSessionData, ChallengeQuestion, CoreBeliefData, EmotionScores,
    RationalThought, SchemaMode, SituationData, StepData, ThoughtEntry,
};
use crate::step::CbtStepId;

/// A minimal filled payload for `step`.
pub fn sample_step(step: CbtStepId) -> StepData {
    match step {
        CbtStepId::Situation => StepData::Situation(SituationData {
            situation: "Presentation went badly".to_string(),
            date: "2026-10-01".to_string(),
        }),
        CbtStepId::Emotions => StepData::Emotions(EmotionScores {
            anxiety: 8,
            shame: 5,
            ..Default::default()
        }),
        CbtStepId::Thoughts => StepData::Thoughts(vec![ThoughtEntry {
            thought: "Everyone thinks I'm incompetent".to_string(),
            credibility: 8,
        }]),
        CbtStepId::CoreBelief => StepData::CoreBelief(CoreBeliefData {
            core_belief_text: "I am not good enough".to_string(),
            core_belief_credibility: Some(7),
        }),
        CbtStepId::ChallengeQuestions => StepData::ChallengeQuestions(vec![ChallengeQuestion {
            question: "What evidence supports this?".to_string(),
            answer: "One person looked bored".to_string(),
        }]),
        CbtStepId::RationalThoughts => StepData::RationalThoughts(vec![RationalThought {
            thought: "Most people were engaged".to_string(),
            confidence: 6,
        }]),
        CbtStepId::SchemaModes => StepData::SchemaModes(vec![SchemaMode {
            id: "punitive-critic".to_string(),
            name: "Punitive Critic".to_string(),
            description: "Harsh inner voice".to_string(),
            selected: true,
            intensity: Some(7),
        }]),
        CbtStepId::Actions => StepData::Actions(ActionPlanData {
            final_emotions: EmotionScores {
                anxiety: 4,
                ..Default::default()
            },
            original_thought_credibility: Some(4),
            new_behaviors: "Ask a colleague for feedback".to_string(),
        }),
        CbtStepId::FinalEmotions => StepData::FinalEmotions(EmotionScores {
            anxiety: 3,
            joy: 2,
            ..Default::default()
        }),
    }
}

/// A bag with the given steps filled.
pub fn data_with(steps: &[CbtStepId]) -> CbtSessionData {
    let mut data = CbtSessionData::default();
    for step in steps {
        data.apply(sample_step(*step));
    }
    data
}

/// A bag with every step filled.
pub fn complete_data() -> CbtSessionData {
    data_with(&CbtStepId::ALL)
}

/// Storage whose every operation fails.
#[derive(Debug, Default)]
pub struct FailingStorage;

impl crate::storage::DraftStorage for FailingStorage {
    fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
        anyhow::bail!("storage unavailable")
    }

    fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        anyhow::bail!("quota exceeded")
    }

    fn remove(&self, _key: &str) -> anyhow::Result<()> {
        anyhow::bail!("storage unavailable")
    }
}
