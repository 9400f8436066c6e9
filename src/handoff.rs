//! Hand-off of a finished diary to the chat collaborator.

use crate::draft::CbtDraft;
use crate::registry::is_step_filled;
use crate::session::DiarySession;
use crate::session_data::{
    ActionPlanData, CbtSessionData, ChallengeQuestion, CoreBeliefData, EmotionScores,
    RationalThought, SchemaMode, SituationData, StepData, ThoughtEntry,
};
use crate::step::CbtStepId;
use crate::storage::DraftStorage;
use async_trait::async_trait;
use std::fmt::{Display, Formatter, Write};

/// Outcome reported by the chat collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResult {
    pub success: bool,
    pub error: Option<String>,
}

impl ChatResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Receives the finished diary as a chat message.
#[async_trait]
pub trait ChatBridge: Send + Sync {
    async fn add_message(&self, session_id: &str, content: &str) -> ChatResult;
}

/// Renders a data bag into the message sent to chat.
pub trait MessageFormatter: Send + Sync {
    fn format(&self, data: &CbtSessionData) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandoffError {
    /// The flow has not reached `complete`.
    NotComplete,
    /// The chat collaborator refused the message.
    Rejected(String),
    /// No chat session to send to.
    NoSession,
}

impl Display for HandoffError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotComplete => write!(f, "diary is not complete yet"),
            Self::Rejected(reason) => write!(f, "chat rejected the diary: {}", reason),
            Self::NoSession => write!(f, "no chat session to send the diary to"),
        }
    }
}

impl std::error::Error for HandoffError {}

/// Markdown rendering with one section per step.
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormatter {
    /// Render a placeholder section for steps without data.
    pub include_empty_steps: bool,
}

impl MarkdownFormatter {
    pub fn new(include_empty_steps: bool) -> Self {
        Self {
            include_empty_steps,
        }
    }
}

impl MessageFormatter for MarkdownFormatter {
    fn format(&self, data: &CbtSessionData) -> String {
        let mut out = String::from("# CBT Diary Entry\n");
        for step in CbtStepId::ALL {
            let body = match data.get(step) {
                Some(payload) if is_step_filled(data, step) => render_step(&payload),
                _ if self.include_empty_steps => "_No entry._\n".to_string(),
                _ => continue,
            };
            let _ = write!(out, "\n## {}. {}\n\n{}", step.ordinal(), step.label(), body);
        }
        out
    }
}

fn render_step(payload: &StepData) -> String {
    match payload {
        StepData::Situation(s) => render_situation(s),
        StepData::Emotions(e) | StepData::FinalEmotions(e) => render_emotions(e),
        StepData::Thoughts(t) => render_thoughts(t),
        StepData::CoreBelief(c) => render_core_belief(c),
        StepData::ChallengeQuestions(q) => render_questions(q),
        StepData::RationalThoughts(r) => render_rational(r),
        StepData::SchemaModes(m) => render_schema_modes(m),
        StepData::Actions(a) => render_actions(a),
    }
}

fn render_situation(s: &SituationData) -> String {
    let mut out = String::new();
    if !s.date.trim().is_empty() {
        let _ = writeln!(out, "**Date:** {}\n", s.date.trim());
    }
    if !s.situation.trim().is_empty() {
        let _ = writeln!(out, "{}", s.situation.trim());
    }
    out
}

fn render_emotions(e: &EmotionScores) -> String {
    let mut out = String::new();
    for (name, intensity) in e.named() {
        if intensity > 0 {
            let _ = writeln!(out, "- {}: {}/10", name, intensity);
        }
    }
    if let Some(other) = e.other.as_deref().filter(|o| !o.trim().is_empty()) {
        match e.other_intensity {
            Some(intensity) => {
                let _ = writeln!(out, "- {}: {}/10", other.trim(), intensity);
            }
            None => {
                let _ = writeln!(out, "- {}", other.trim());
            }
        }
    }
    out
}

fn render_thoughts(thoughts: &[ThoughtEntry]) -> String {
    let mut out = String::new();
    for t in thoughts {
        let _ = writeln!(out, "- {} (credibility {}/10)", t.thought, t.credibility);
    }
    out
}

fn render_core_belief(c: &CoreBeliefData) -> String {
    let mut out = String::new();
    if !c.core_belief_text.trim().is_empty() {
        let _ = writeln!(out, "{}", c.core_belief_text.trim());
    }
    if let Some(credibility) = c.core_belief_credibility {
        let _ = writeln!(out, "\nCredibility: {}/10", credibility);
    }
    out
}

fn render_questions(questions: &[ChallengeQuestion]) -> String {
    let mut out = String::new();
    for q in questions {
        let _ = writeln!(out, "**Q:** {}\n**A:** {}\n", q.question, q.answer);
    }
    out
}

fn render_rational(thoughts: &[RationalThought]) -> String {
    let mut out = String::new();
    for t in thoughts {
        let _ = writeln!(out, "- {} (confidence {}/10)", t.thought, t.confidence);
    }
    out
}

fn render_schema_modes(modes: &[SchemaMode]) -> String {
    let mut out = String::new();
    for mode in modes.iter().filter(|m| m.selected) {
        match mode.intensity {
            Some(intensity) => {
                let _ = writeln!(out, "- {} ({}/10)", mode.name, intensity);
            }
            None => {
                let _ = writeln!(out, "- {}", mode.name);
            }
        }
    }
    if out.is_empty() {
        out.push_str("- none selected\n");
    }
    out
}

fn render_actions(a: &ActionPlanData) -> String {
    let mut out = String::new();
    if !a.new_behaviors.trim().is_empty() {
        let _ = writeln!(out, "**New behaviors:** {}\n", a.new_behaviors.trim());
    }
    if let Some(credibility) = a.original_thought_credibility {
        let _ = writeln!(
            out,
            "**Original thought credibility now:** {}/10\n",
            credibility
        );
    }
    out.push_str(&render_emotions(&a.final_emotions));
    out
}

/// Sends a completed diary to chat.
///
/// The target is `chat_session_id` if given, else the session's own id. On
/// success the draft is marked complete and the current slot is cleared.
/// On rejection nothing changes, so the entry can be retried.
pub async fn finalize<S: DraftStorage>(
    session: &mut DiarySession<S>,
    formatter: &dyn MessageFormatter,
    bridge: &dyn ChatBridge,
    chat_session_id: Option<&str>,
) -> Result<CbtDraft, HandoffError> {
    if !session.state().is_complete() {
        return Err(HandoffError::NotComplete);
    }
    let target = chat_session_id
        .map(str::to_string)
        .or_else(|| session.state().session_id.clone())
        .filter(|id| !id.trim().is_empty())
        .ok_or(HandoffError::NoSession)?;

    let content = formatter.format(&session.state().data);
    let result = bridge.add_message(&target, &content).await;

    if let Some(logger) = session.logger() {
        logger.log_handoff(&target, result.success, result.error.as_deref());
    }

    if !result.success {
        let reason = result
            .error
            .unwrap_or_else(|| "no reason given".to_string());
        tracing::warn!("Chat hand-off to {} failed: {}", target, reason);
        return Err(HandoffError::Rejected(reason));
    }

    tracing::debug!("Diary handed off to chat session {}", target);
    Ok(session.complete())
}

#[cfg(test)]
#[path = "tests/handoff_tests.rs"]
mod tests;
