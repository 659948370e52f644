//! Assessment session records and lifecycle.
//!
//! A session pins its question list at creation; answers upsert by question
//! id so a learner can change their mind without the response list ever
//! holding duplicates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::answer::Selection;
use crate::error::{EngineError, Result};
use crate::types::{ExamDomain, Question};

/// Kind of assessment; drives the pass threshold and retake rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentType {
    ModuleQuiz,
    PracticeTest,
    MockExam,
}

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Paused,
    Completed,
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self::InProgress
    }
}

/// Parameters a session was built with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentConfig {
    pub assessment_type: AssessmentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_filter: Option<ExamDomain>,
    pub question_count: usize,
    pub time_limit_minutes: u32,
}

/// Recorded answer to one session question.
///
/// Correctness is decided when the answer lands and travels with it, so
/// scoring never re-derives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub question_id: String,
    pub selection: Selection,
    pub is_correct: bool,
    pub time_spent_secs: u32,
    pub timestamp: DateTime<Utc>,
}

/// One assessment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSession {
    pub id: String,
    pub config: AssessmentConfig,
    pub questions: Vec<Question>,
    pub responses: Vec<QuestionResponse>,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub status: SessionStatus,
}

impl AssessmentSession {
    /// Open a session over a fixed question set.
    pub fn new(
        id: String,
        config: AssessmentConfig,
        questions: Vec<Question>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            config,
            questions,
            responses: Vec::new(),
            start_time,
            end_time: None,
            status: SessionStatus::InProgress,
        }
    }

    /// Upsert a response by question id.
    ///
    /// Re-answering replaces the earlier response in place. Answering a
    /// question that is not part of this session is a caller bug.
    pub fn record_response(&mut self, response: QuestionResponse) -> Result<()> {
        if !self.questions.iter().any(|q| q.id == response.question_id) {
            return Err(EngineError::UnknownQuestion {
                question_id: response.question_id,
            });
        }

        match self
            .responses
            .iter_mut()
            .find(|r| r.question_id == response.question_id)
        {
            Some(existing) => *existing = response,
            None => self.responses.push(response),
        }
        Ok(())
    }

    /// Response recorded for a question, if any.
    pub fn response_for(&self, question_id: &str) -> Option<&QuestionResponse> {
        self.responses.iter().find(|r| r.question_id == question_id)
    }

    /// Close the session for scoring.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.status = SessionStatus::Completed;
        self.end_time = Some(now);
    }
}
