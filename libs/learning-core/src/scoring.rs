//! Assessment scoring: overall and per-domain/objective breakdowns,
//! pass/fail, performance metrics, and remediation planning.
//!
//! Scoring trusts the `is_correct` flag recorded at answer time and never
//! re-derives it. A question with no response, or an explicitly skipped
//! one, counts as incorrect and stays in the denominator. All percentages
//! finalize through the single crate rounding policy.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::rounding::percentage;
use crate::session::{AssessmentSession, AssessmentType, QuestionResponse};
use crate::types::ExamDomain;

/// Retake floor for mock exams; scoring under this locks the retake.
const RETAKE_FLOOR: u8 = 60;
/// Hours a locked mock exam waits before the next attempt.
const RETAKE_WAIT_HOURS: u32 = 24;
/// Attempt cap surfaced on failed plans.
const RETAKE_MAX_ATTEMPTS: u32 = 3;
/// Fixed study cost per missed objective, in minutes.
const STUDY_MINUTES_PER_OBJECTIVE: u32 = 30;

/// Pass threshold for an assessment type, in percent.
///
/// A fixed table rather than a per-call parameter, so every caller in the
/// application agrees on what passing means. Mock exams mirror the real
/// certification's 70% bar.
pub fn pass_threshold(assessment_type: AssessmentType) -> u8 {
    match assessment_type {
        AssessmentType::ModuleQuiz => 70,
        AssessmentType::PracticeTest => 60,
        AssessmentType::MockExam => 70,
    }
}

/// Correct/total tally with its finalized percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub score: u8,
    pub correct: usize,
    pub total: usize,
}

/// Pacing and difficulty signals for the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Expected seconds-per-question over actual mean seconds-per-question.
    /// Above 1.0 means faster than the time limit expects; 1.0 when no
    /// response carried a positive time (no pacing signal either way).
    pub time_efficiency: f64,
    /// Fraction of correct answers that came from advanced or expert
    /// questions; 0.0 when nothing was answered correctly.
    pub difficulty_consistency: f64,
}

/// Mastery band for one objective's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryLevel {
    Mastery,
    Proficient,
    Developing,
    NeedsWork,
}

impl MasteryLevel {
    /// Band for a 0-100 objective score.
    pub fn from_score(score: u8) -> Self {
        if score >= 90 {
            Self::Mastery
        } else if score >= 80 {
            Self::Proficient
        } else if score >= 60 {
            Self::Developing
        } else {
            Self::NeedsWork
        }
    }
}

/// One objective the learner should revisit, with where it sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityObjective {
    pub objective_id: String,
    pub domain: ExamDomain,
    pub score: u8,
    pub mastery: MasteryLevel,
}

/// Follow-up plan attached to failed results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationPlan {
    /// Objectives below the pass bar, weakest first; ties go to the
    /// domain carrying more exam weight.
    pub priority_objectives: Vec<PriorityObjective>,
    pub estimated_study_time_minutes: u32,
    pub can_retake: bool,
    /// Cooldown before the next attempt, present only when the retake is
    /// locked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retake_wait_hours: Option<u32>,
    pub max_attempts: u32,
}

/// Scored outcome of a completed session. Immutable once produced;
/// recomputing from the same session snapshot yields the same result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub session_id: String,
    pub assessment_type: AssessmentType,
    pub overall_score: u8,
    pub correct_answers: usize,
    pub incorrect_answers: usize,
    pub total_questions: usize,
    pub domain_breakdown: BTreeMap<ExamDomain, ScoreBreakdown>,
    pub objective_breakdown: BTreeMap<String, ScoreBreakdown>,
    pub performance_metrics: PerformanceMetrics,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<RemediationPlan>,
    pub total_time_secs: u64,
    pub completed_at: DateTime<Utc>,
}

/// Score a session snapshot.
///
/// `now` stands in for a missing `end_time` so a session abandoned without
/// submitting still scores, and so rescoring a stored snapshot is
/// reproducible. Fails fast on malformed response lists; degenerate but
/// legal sessions (no questions, nothing answered) score normally.
pub fn score(session: &AssessmentSession, now: DateTime<Utc>) -> Result<AssessmentResult> {
    let responses = index_responses(session)?;

    let total_questions = session.questions.len();
    let correct_answers = session
        .questions
        .iter()
        .filter(|q| is_correct(&responses, &q.id))
        .count();
    let overall_score = percentage(correct_answers, total_questions);
    let passed = overall_score >= pass_threshold(session.config.assessment_type);

    let domain_breakdown = domain_breakdown(session, &responses);
    let objective_breakdown = objective_breakdown(session, &responses);

    let remediation = if passed {
        None
    } else {
        Some(remediation_plan(session, overall_score, &objective_breakdown))
    };

    let completed_at = session.end_time.unwrap_or(now);
    let total_time_secs = (completed_at - session.start_time).num_seconds().max(0) as u64;

    Ok(AssessmentResult {
        session_id: session.id.clone(),
        assessment_type: session.config.assessment_type,
        overall_score,
        correct_answers,
        incorrect_answers: total_questions - correct_answers,
        total_questions,
        domain_breakdown,
        objective_breakdown,
        performance_metrics: performance_metrics(session, &responses, correct_answers),
        passed,
        remediation,
        total_time_secs,
        completed_at,
    })
}

/// Responses keyed by question id. A duplicate id or a response for a
/// question outside the session means the snapshot was assembled by hand
/// and cannot be trusted.
fn index_responses<'a>(
    session: &'a AssessmentSession,
) -> Result<BTreeMap<&'a str, &'a QuestionResponse>> {
    let mut by_id = BTreeMap::new();
    for response in &session.responses {
        if !session.questions.iter().any(|q| q.id == response.question_id) {
            return Err(EngineError::UnknownQuestion {
                question_id: response.question_id.clone(),
            });
        }
        match by_id.entry(response.question_id.as_str()) {
            Entry::Vacant(slot) => {
                slot.insert(response);
            }
            Entry::Occupied(_) => {
                return Err(EngineError::DuplicateResponse {
                    question_id: response.question_id.clone(),
                });
            }
        }
    }
    Ok(by_id)
}

fn is_correct(responses: &BTreeMap<&str, &QuestionResponse>, question_id: &str) -> bool {
    responses.get(question_id).is_some_and(|r| r.is_correct)
}

fn domain_breakdown(
    session: &AssessmentSession,
    responses: &BTreeMap<&str, &QuestionResponse>,
) -> BTreeMap<ExamDomain, ScoreBreakdown> {
    let mut tallies: BTreeMap<ExamDomain, (usize, usize)> = BTreeMap::new();
    for question in &session.questions {
        let (correct, total) = tallies.entry(question.domain).or_insert((0, 0));
        *total += 1;
        if is_correct(responses, &question.id) {
            *correct += 1;
        }
    }
    finalize(tallies)
}

/// Per-objective tallies. Questions without objective metadata are left
/// out of this map only; they still count toward the overall score.
fn objective_breakdown(
    session: &AssessmentSession,
    responses: &BTreeMap<&str, &QuestionResponse>,
) -> BTreeMap<String, ScoreBreakdown> {
    let mut tallies: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for question in &session.questions {
        let Some(objective_id) = &question.objective_id else {
            continue;
        };
        let (correct, total) = tallies.entry(objective_id.clone()).or_insert((0, 0));
        *total += 1;
        if is_correct(responses, &question.id) {
            *correct += 1;
        }
    }
    finalize(tallies)
}

fn finalize<K: Ord>(tallies: BTreeMap<K, (usize, usize)>) -> BTreeMap<K, ScoreBreakdown> {
    tallies
        .into_iter()
        .map(|(key, (correct, total))| {
            (
                key,
                ScoreBreakdown {
                    score: percentage(correct, total),
                    correct,
                    total,
                },
            )
        })
        .collect()
}

fn performance_metrics(
    session: &AssessmentSession,
    responses: &BTreeMap<&str, &QuestionResponse>,
    correct_answers: usize,
) -> PerformanceMetrics {
    PerformanceMetrics {
        time_efficiency: time_efficiency(session),
        difficulty_consistency: difficulty_consistency(session, responses, correct_answers),
    }
}

fn time_efficiency(session: &AssessmentSession) -> f64 {
    let timed: Vec<f64> = session
        .responses
        .iter()
        .filter(|r| r.time_spent_secs > 0)
        .map(|r| f64::from(r.time_spent_secs))
        .collect();
    if timed.is_empty() || session.questions.is_empty() {
        return 1.0;
    }

    let expected_secs = f64::from(session.config.time_limit_minutes) * 60.0
        / session.questions.len() as f64;
    let actual_mean = timed.iter().sum::<f64>() / timed.len() as f64;
    (expected_secs / actual_mean).max(0.0)
}

fn difficulty_consistency(
    session: &AssessmentSession,
    responses: &BTreeMap<&str, &QuestionResponse>,
    correct_answers: usize,
) -> f64 {
    if correct_answers == 0 {
        return 0.0;
    }
    let higher_correct = session
        .questions
        .iter()
        .filter(|q| q.difficulty.is_higher() && is_correct(responses, &q.id))
        .count();
    higher_correct as f64 / correct_answers as f64
}

/// Plan for a failed session: objectives under the pass bar, weakest
/// first (exam weight breaking ties), a fixed per-objective study cost,
/// and the retake gate for high-stakes mock exams.
fn remediation_plan(
    session: &AssessmentSession,
    overall_score: u8,
    objective_breakdown: &BTreeMap<String, ScoreBreakdown>,
) -> RemediationPlan {
    let threshold = pass_threshold(session.config.assessment_type);

    let mut priority_objectives: Vec<PriorityObjective> = objective_breakdown
        .iter()
        .filter(|(_, breakdown)| breakdown.score < threshold)
        .filter_map(|(objective_id, breakdown)| {
            objective_domain(session, objective_id).map(|domain| PriorityObjective {
                objective_id: objective_id.clone(),
                domain,
                score: breakdown.score,
                mastery: MasteryLevel::from_score(breakdown.score),
            })
        })
        .collect();
    // Stable sort over the BTreeMap's id order keeps full ties
    // deterministic.
    priority_objectives
        .sort_by_key(|obj| (obj.score, std::cmp::Reverse(obj.domain.exam_weight())));

    let can_retake = !(session.config.assessment_type == AssessmentType::MockExam
        && overall_score < RETAKE_FLOOR);

    RemediationPlan {
        estimated_study_time_minutes: STUDY_MINUTES_PER_OBJECTIVE
            * priority_objectives.len() as u32,
        priority_objectives,
        can_retake,
        retake_wait_hours: (!can_retake).then_some(RETAKE_WAIT_HOURS),
        max_attempts: RETAKE_MAX_ATTEMPTS,
    }
}

fn objective_domain(session: &AssessmentSession, objective_id: &str) -> Option<ExamDomain> {
    session
        .questions
        .iter()
        .find(|q| q.objective_id.as_deref() == Some(objective_id))
        .map(|q| q.domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::Selection;
    use crate::session::{AssessmentConfig, SessionStatus};
    use crate::types::{Choice, Difficulty, Question};
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn question(id: &str, domain: ExamDomain, objective: Option<&str>) -> Question {
        Question {
            id: id.into(),
            domain,
            difficulty: Difficulty::Intermediate,
            category: "console".into(),
            tags: Vec::new(),
            objective_id: objective.map(String::from),
            correct_answer_ids: vec!["a".into()],
            choices: vec![
                Choice {
                    id: "a".into(),
                    text: "Right".into(),
                },
                Choice {
                    id: "b".into(),
                    text: "Wrong".into(),
                },
            ],
        }
    }

    fn response(question_id: &str, is_correct: bool, time_spent_secs: u32) -> QuestionResponse {
        QuestionResponse {
            question_id: question_id.into(),
            selection: if is_correct {
                Selection::Choice("a".into())
            } else {
                Selection::Choice("b".into())
            },
            is_correct,
            time_spent_secs,
            timestamp: Utc::now(),
        }
    }

    fn session(
        assessment_type: AssessmentType,
        questions: Vec<Question>,
        responses: Vec<QuestionResponse>,
    ) -> AssessmentSession {
        let start = Utc::now() - Duration::minutes(10);
        AssessmentSession {
            id: "s-1".into(),
            config: AssessmentConfig {
                assessment_type,
                module_id: None,
                domain_filter: None,
                question_count: questions.len(),
                time_limit_minutes: 10,
            },
            questions,
            responses,
            start_time: start,
            end_time: Some(start + Duration::minutes(8)),
            status: SessionStatus::Completed,
        }
    }

    #[test]
    fn empty_session_scores_zero_without_failing() {
        let result = score(
            &session(AssessmentType::ModuleQuiz, Vec::new(), Vec::new()),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(result.overall_score, 0);
        assert!(!result.passed);
        assert_eq!(result.total_questions, 0);
        assert_eq!(result.incorrect_answers, 0);
        assert!(result.domain_breakdown.is_empty());
        let plan = result.remediation.unwrap();
        assert!(plan.priority_objectives.is_empty());
        assert_eq!(plan.estimated_study_time_minutes, 0);
    }

    #[test]
    fn all_correct_passes_every_assessment_type() {
        for assessment_type in [
            AssessmentType::ModuleQuiz,
            AssessmentType::PracticeTest,
            AssessmentType::MockExam,
        ] {
            let questions = vec![
                question("q-1", ExamDomain::AskingQuestions, None),
                question("q-2", ExamDomain::TakingAction, None),
            ];
            let responses = vec![response("q-1", true, 30), response("q-2", true, 30)];

            let result = score(&session(assessment_type, questions, responses), Utc::now()).unwrap();
            assert_eq!(result.overall_score, 100);
            assert!(result.passed);
            assert_eq!(result.remediation, None);
        }
    }

    #[test]
    fn unanswered_questions_count_as_incorrect() {
        let questions = vec![
            question("q-1", ExamDomain::AskingQuestions, None),
            question("q-2", ExamDomain::AskingQuestions, None),
            question("q-3", ExamDomain::AskingQuestions, None),
        ];
        let responses = vec![response("q-1", true, 20)];

        let result = score(
            &session(AssessmentType::ModuleQuiz, questions, responses),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(result.overall_score, 33);
        assert_eq!(result.correct_answers, 1);
        assert_eq!(result.incorrect_answers, 2);
    }

    #[test]
    fn skipped_responses_count_as_incorrect() {
        let questions = vec![
            question("q-1", ExamDomain::AskingQuestions, None),
            question("q-2", ExamDomain::AskingQuestions, None),
        ];
        let responses = vec![
            response("q-1", true, 20),
            QuestionResponse {
                question_id: "q-2".into(),
                selection: Selection::Skipped,
                is_correct: false,
                time_spent_secs: 5,
                timestamp: Utc::now(),
            },
        ];

        let result = score(
            &session(AssessmentType::ModuleQuiz, questions, responses),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(result.overall_score, 50);
        assert_eq!(result.incorrect_answers, 1);
    }

    #[test]
    fn pass_thresholds_differ_by_assessment_type() {
        assert_eq!(pass_threshold(AssessmentType::ModuleQuiz), 70);
        assert_eq!(pass_threshold(AssessmentType::PracticeTest), 60);
        assert_eq!(pass_threshold(AssessmentType::MockExam), 70);

        // 7/10 passes a quiz; 6/10 fails it but passes a practice test.
        let questions: Vec<Question> = (0..10)
            .map(|n| question(&format!("q-{n}"), ExamDomain::AskingQuestions, None))
            .collect();
        let responses: Vec<QuestionResponse> = (0..6)
            .map(|n| response(&format!("q-{n}"), true, 10))
            .collect();

        let quiz = score(
            &session(AssessmentType::ModuleQuiz, questions.clone(), responses.clone()),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(quiz.overall_score, 60);
        assert!(!quiz.passed);

        let practice = score(
            &session(AssessmentType::PracticeTest, questions, responses),
            Utc::now(),
        )
        .unwrap();
        assert!(practice.passed);
    }

    #[test]
    fn domain_breakdown_scores_each_domain_independently() {
        let questions = vec![
            question("aq-1", ExamDomain::AskingQuestions, None),
            question("aq-2", ExamDomain::AskingQuestions, None),
            question("ta-1", ExamDomain::TakingAction, None),
        ];
        let responses = vec![
            response("aq-1", true, 10),
            response("aq-2", false, 10),
            response("ta-1", true, 10),
        ];

        let result = score(
            &session(AssessmentType::ModuleQuiz, questions, responses),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(
            result.domain_breakdown.get(&ExamDomain::AskingQuestions),
            Some(&ScoreBreakdown {
                score: 50,
                correct: 1,
                total: 2
            })
        );
        assert_eq!(
            result.domain_breakdown.get(&ExamDomain::TakingAction),
            Some(&ScoreBreakdown {
                score: 100,
                correct: 1,
                total: 1
            })
        );
        assert_eq!(result.domain_breakdown.len(), 2);
    }

    #[test]
    fn questions_without_objectives_stay_out_of_that_map_only() {
        let questions = vec![
            question("q-1", ExamDomain::AskingQuestions, Some("obj-sensors")),
            question("q-2", ExamDomain::AskingQuestions, None),
        ];
        let responses = vec![response("q-1", true, 10), response("q-2", false, 10)];

        let result = score(
            &session(AssessmentType::ModuleQuiz, questions, responses),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(result.total_questions, 2);
        assert_eq!(result.overall_score, 50);
        assert_eq!(result.objective_breakdown.len(), 1);
        assert_eq!(
            result.objective_breakdown.get("obj-sensors").unwrap().score,
            100
        );
    }

    #[test]
    fn score_finalizes_with_banker_rounding() {
        // 1 of 8 correct: 12.5% ties down to 12.
        let questions: Vec<Question> = (0..8)
            .map(|n| question(&format!("q-{n}"), ExamDomain::AskingQuestions, None))
            .collect();
        let responses = vec![response("q-0", true, 10)];

        let result = score(
            &session(AssessmentType::ModuleQuiz, questions, responses),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(result.overall_score, 12);
    }

    #[test]
    fn duplicate_response_fails_fast() {
        let questions = vec![question("q-1", ExamDomain::AskingQuestions, None)];
        let responses = vec![response("q-1", false, 10), response("q-1", true, 12)];

        let err = score(
            &session(AssessmentType::ModuleQuiz, questions, responses),
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::DuplicateResponse {
                question_id: "q-1".into()
            }
        );
    }

    #[test]
    fn response_outside_the_session_fails_fast() {
        let questions = vec![question("q-1", ExamDomain::AskingQuestions, None)];
        let responses = vec![response("q-9", true, 10)];

        let err = score(
            &session(AssessmentType::ModuleQuiz, questions, responses),
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownQuestion {
                question_id: "q-9".into()
            }
        );
    }

    #[test]
    fn time_efficiency_compares_expected_to_actual_pace() {
        // 10-minute limit over 4 questions expects 150s each; answering in
        // a mean of 75s doubles the expected pace.
        let questions: Vec<Question> = (0..4)
            .map(|n| question(&format!("q-{n}"), ExamDomain::AskingQuestions, None))
            .collect();
        let responses: Vec<QuestionResponse> = (0..4)
            .map(|n| response(&format!("q-{n}"), true, 75))
            .collect();

        let result = score(
            &session(AssessmentType::ModuleQuiz, questions, responses),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(result.performance_metrics.time_efficiency, 2.0);
    }

    #[test]
    fn time_efficiency_is_neutral_without_timing_data() {
        let questions = vec![question("q-1", ExamDomain::AskingQuestions, None)];
        let responses = vec![response("q-1", true, 0)];

        let result = score(
            &session(AssessmentType::ModuleQuiz, questions, responses),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(result.performance_metrics.time_efficiency, 1.0);
    }

    #[test]
    fn difficulty_consistency_tracks_harder_questions() {
        let mut easy = question("easy", ExamDomain::AskingQuestions, None);
        easy.difficulty = Difficulty::Beginner;
        let mut hard = question("hard", ExamDomain::AskingQuestions, None);
        hard.difficulty = Difficulty::Expert;
        let mut hard_missed = question("hard-missed", ExamDomain::AskingQuestions, None);
        hard_missed.difficulty = Difficulty::Advanced;

        let responses = vec![
            response("easy", true, 10),
            response("hard", true, 10),
            response("hard-missed", false, 10),
        ];

        let result = score(
            &session(
                AssessmentType::ModuleQuiz,
                vec![easy, hard, hard_missed],
                responses,
            ),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(result.performance_metrics.difficulty_consistency, 0.5);
    }

    #[test]
    fn difficulty_consistency_is_zero_with_no_correct_answers() {
        let questions = vec![question("q-1", ExamDomain::AskingQuestions, None)];
        let responses = vec![response("q-1", false, 10)];

        let result = score(
            &session(AssessmentType::ModuleQuiz, questions, responses),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(result.performance_metrics.difficulty_consistency, 0.0);
    }

    #[test]
    fn remediation_ranks_weakest_objectives_first() {
        // obj-a 0%, obj-b 50%: ascending score order regardless of domain.
        let questions = vec![
            question("q-1", ExamDomain::TakingAction, Some("obj-a")),
            question("q-2", ExamDomain::AskingQuestions, Some("obj-b")),
            question("q-3", ExamDomain::AskingQuestions, Some("obj-b")),
        ];
        let responses = vec![
            response("q-1", false, 10),
            response("q-2", true, 10),
            response("q-3", false, 10),
        ];

        let result = score(
            &session(AssessmentType::ModuleQuiz, questions, responses),
            Utc::now(),
        )
        .unwrap();

        let plan = result.remediation.unwrap();
        let ids: Vec<&str> = plan
            .priority_objectives
            .iter()
            .map(|o| o.objective_id.as_str())
            .collect();
        assert_eq!(ids, vec!["obj-a", "obj-b"]);
        assert_eq!(plan.estimated_study_time_minutes, 60);
        assert_eq!(plan.priority_objectives[0].mastery, MasteryLevel::NeedsWork);
        assert!(plan.can_retake);
    }

    #[test]
    fn remediation_ties_break_toward_heavier_domains() {
        // Both objectives at 0%; refining-questions carries 23% exam
        // weight against taking-action's 15%, so it leads.
        let questions = vec![
            question("q-1", ExamDomain::TakingAction, Some("obj-action")),
            question("q-2", ExamDomain::RefiningQuestions, Some("obj-refine")),
        ];
        let responses = vec![response("q-1", false, 10), response("q-2", false, 10)];

        let result = score(
            &session(AssessmentType::ModuleQuiz, questions, responses),
            Utc::now(),
        )
        .unwrap();

        let plan = result.remediation.unwrap();
        let ids: Vec<&str> = plan
            .priority_objectives
            .iter()
            .map(|o| o.objective_id.as_str())
            .collect();
        assert_eq!(ids, vec!["obj-refine", "obj-action"]);
    }

    #[test]
    fn passing_objectives_stay_off_the_remediation_list() {
        let questions = vec![
            question("q-1", ExamDomain::AskingQuestions, Some("obj-strong")),
            question("q-2", ExamDomain::AskingQuestions, Some("obj-weak")),
            question("q-3", ExamDomain::AskingQuestions, None),
        ];
        // Overall 1/3 = 33% fails, but obj-strong sits at 100%.
        let responses = vec![response("q-1", true, 10)];

        let result = score(
            &session(AssessmentType::ModuleQuiz, questions, responses),
            Utc::now(),
        )
        .unwrap();

        let plan = result.remediation.unwrap();
        assert_eq!(plan.priority_objectives.len(), 1);
        assert_eq!(plan.priority_objectives[0].objective_id, "obj-weak");
    }

    #[test]
    fn mock_exam_under_the_floor_locks_the_retake() {
        let questions: Vec<Question> = (0..10)
            .map(|n| question(&format!("q-{n}"), ExamDomain::AskingQuestions, None))
            .collect();
        let responses: Vec<QuestionResponse> = (0..5)
            .map(|n| response(&format!("q-{n}"), true, 10))
            .collect();

        let result = score(
            &session(AssessmentType::MockExam, questions, responses),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(result.overall_score, 50);
        let plan = result.remediation.unwrap();
        assert!(!plan.can_retake);
        assert_eq!(plan.retake_wait_hours, Some(24));
        assert_eq!(plan.max_attempts, 3);
    }

    #[test]
    fn mock_exam_above_the_floor_keeps_the_retake_open() {
        let questions: Vec<Question> = (0..10)
            .map(|n| question(&format!("q-{n}"), ExamDomain::AskingQuestions, None))
            .collect();
        // 6 of 10: fails the 70 bar but clears the 60 retake floor.
        let responses: Vec<QuestionResponse> = (0..6)
            .map(|n| response(&format!("q-{n}"), true, 10))
            .collect();

        let result = score(
            &session(AssessmentType::MockExam, questions, responses),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(result.overall_score, 60);
        let plan = result.remediation.unwrap();
        assert!(plan.can_retake);
        assert_eq!(plan.retake_wait_hours, None);
    }

    #[test]
    fn missing_end_time_falls_back_to_now() {
        let mut open_session = session(
            AssessmentType::ModuleQuiz,
            vec![question("q-1", ExamDomain::AskingQuestions, None)],
            vec![response("q-1", true, 10)],
        );
        open_session.end_time = None;
        open_session.status = SessionStatus::InProgress;
        let now = open_session.start_time + Duration::minutes(3);

        let result = score(&open_session, now).unwrap();
        assert_eq!(result.completed_at, now);
        assert_eq!(result.total_time_secs, 180);
    }

    #[test]
    fn rescoring_the_same_snapshot_is_idempotent() {
        let snapshot = session(
            AssessmentType::PracticeTest,
            vec![
                question("q-1", ExamDomain::AskingQuestions, Some("obj-a")),
                question("q-2", ExamDomain::RefiningQuestions, None),
            ],
            vec![response("q-1", true, 42)],
        );
        let now = Utc::now();

        let first = score(&snapshot, now).unwrap();
        let second = score(&snapshot, now).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn result_survives_a_serde_round_trip() {
        let snapshot = session(
            AssessmentType::MockExam,
            vec![
                question("q-1", ExamDomain::AskingQuestions, Some("obj-a")),
                question("q-2", ExamDomain::ReportingExport, Some("obj-b")),
            ],
            vec![response("q-1", true, 30), response("q-2", false, 45)],
        );
        let result = score(&snapshot, Utc::now()).unwrap();

        let json = serde_json::to_string(&result).unwrap();
        let back: AssessmentResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
