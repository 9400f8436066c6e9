//! Fill predicates: has a step's data been meaningfully entered?

use crate::session_data::{ActionPlanData, CbtSessionData, CoreBeliefData, SituationData};
use crate::step::CbtStepId;

fn has_text(s: &str) -> bool {
    !s.trim().is_empty()
}

fn non_empty<T>(list: &Option<Vec<T>>) -> bool {
    list.as_ref().is_some_and(|items| !items.is_empty())
}

fn situation_filled(s: &SituationData) -> bool {
    has_text(&s.situation) || has_text(&s.date)
}

/// A present credibility counts even with empty text.
fn core_belief_filled(c: &CoreBeliefData) -> bool {
    has_text(&c.core_belief_text) || c.core_belief_credibility.is_some()
}

fn actions_filled(a: &ActionPlanData) -> bool {
    has_text(&a.new_behaviors)
        || a.original_thought_credibility.is_some()
        || a.final_emotions.has_any()
}

/// Whether `step` holds meaningfully filled data in `data`.
///
/// List steps need at least one entry. Object steps need at least one
/// non-blank text field, a non-zero intensity, or a present rating. A missing
/// payload is never filled.
pub fn is_step_filled(data: &CbtSessionData, step: CbtStepId) -> bool {
    match step {
        CbtStepId::Situation => data.situation.as_ref().is_some_and(situation_filled),
        CbtStepId::Emotions => data.emotions.as_ref().is_some_and(|e| e.has_any()),
        CbtStepId::Thoughts => non_empty(&data.thoughts),
        CbtStepId::CoreBelief => data.core_belief.as_ref().is_some_and(core_belief_filled),
        CbtStepId::ChallengeQuestions => non_empty(&data.challenge_questions),
        CbtStepId::RationalThoughts => non_empty(&data.rational_thoughts),
        CbtStepId::SchemaModes => non_empty(&data.schema_modes),
        CbtStepId::Actions => data.actions.as_ref().is_some_and(actions_filled),
        CbtStepId::FinalEmotions => data.final_emotions.as_ref().is_some_and(|e| e.has_any()),
    }
}

/// Order-independent existence check: is any step filled at all?
pub fn is_any_step_filled(data: &CbtSessionData) -> bool {
    CbtStepId::ALL
        .iter()
        .any(|step| is_step_filled(data, *step))
}

/// All filled steps, in canonical order, regardless of gaps.
pub fn filled_steps(data: &CbtSessionData) -> Vec<CbtStepId> {
    CbtStepId::ALL
        .iter()
        .copied()
        .filter(|step| is_step_filled(data, *step))
        .collect()
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
