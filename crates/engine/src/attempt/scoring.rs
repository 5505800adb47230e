use chrono::{DateTime, Utc};
use tracing::warn;

use assess_core::model::{
    AttemptId, GradeOutcome, Question, QuestionOutcome, SubmissionResult,
};

use crate::providers::{GradeSignal, Grader};

use super::answers::AnswerStore;

/// Aggregate grading signals for every question into a `SubmissionResult`.
///
/// Fail-safe by contract: a grader failure for one question records that
/// question as ungraded (zero points, pending review) and the aggregation
/// continues. `points_possible` always covers the full question set.
pub(crate) fn score_attempt(
    attempt_id: AttemptId,
    questions: &[Question],
    answers: &AnswerStore,
    grader: &dyn Grader,
    answered_count: usize,
    submitted_at: DateTime<Utc>,
) -> SubmissionResult {
    let outcomes = questions
        .iter()
        .map(|question| {
            let outcome = match answers.value(question.id()) {
                None => GradeOutcome::Unanswered,
                Some(answer) => match grader.grade(question, answer) {
                    Ok(GradeSignal::Points(points)) => GradeOutcome::Scored(points),
                    Ok(GradeSignal::Pending) => GradeOutcome::PendingReview,
                    Err(unavailable) => {
                        warn!(
                            question = %question.id(),
                            error = %unavailable,
                            "grading failed, recording question as pending review"
                        );
                        GradeOutcome::GradingFailed
                    }
                },
            };

            QuestionOutcome {
                question_id: question.id(),
                points_possible: question.points(),
                outcome,
            }
        })
        .collect();

    SubmissionResult::from_outcomes(attempt_id, answered_count, submitted_at, outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assess_core::model::{AnswerValue, QuestionId, ResponseFormat};
    use assess_core::time::fixed_now;
    use crate::providers::GradingUnavailable;

    struct ChoiceKeyGrader;

    impl Grader for ChoiceKeyGrader {
        fn grade(
            &self,
            question: &Question,
            answer: &AnswerValue,
        ) -> Result<GradeSignal, GradingUnavailable> {
            match (question.format(), answer) {
                (ResponseFormat::SingleChoice { .. }, AnswerValue::Choice(choice)) => {
                    if choice == "a" {
                        Ok(GradeSignal::Points(question.points()))
                    } else {
                        Ok(GradeSignal::Points(0))
                    }
                }
                _ => Ok(GradeSignal::Pending),
            }
        }
    }

    struct FailingGrader;

    impl Grader for FailingGrader {
        fn grade(
            &self,
            _question: &Question,
            _answer: &AnswerValue,
        ) -> Result<GradeSignal, GradingUnavailable> {
            Err(GradingUnavailable("backend offline".into()))
        }
    }

    fn choice_question(id: u64, points: u32) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            ResponseFormat::SingleChoice {
                options: vec!["a".into(), "b".into()],
            },
            points,
        )
        .unwrap()
    }

    fn essay_question(id: u64, points: u32) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            ResponseFormat::LongText {
                min_len: 0,
                max_len: 4000,
            },
            points,
        )
        .unwrap()
    }

    #[test]
    fn unanswered_questions_skip_the_grader() {
        let questions = vec![choice_question(1, 5)];
        let answers = AnswerStore::new();

        // FailingGrader would error if consulted; unanswered questions never are.
        let result = score_attempt(
            AttemptId::new(),
            &questions,
            &answers,
            &FailingGrader,
            0,
            fixed_now(),
        );

        assert_eq!(result.points_possible(), 5);
        assert_eq!(result.points_earned(), 0);
        assert_eq!(result.outcomes()[0].outcome, GradeOutcome::Unanswered);
    }

    #[test]
    fn mixed_outcomes_aggregate() {
        let questions = vec![
            choice_question(1, 5),
            choice_question(2, 5),
            essay_question(3, 10),
        ];
        let mut answers = AnswerStore::new();
        answers.record(QuestionId::new(1), AnswerValue::Choice("a".into())).unwrap();
        answers.record(QuestionId::new(2), AnswerValue::Choice("b".into())).unwrap();
        answers
            .record(QuestionId::new(3), AnswerValue::Text("an essay".into()))
            .unwrap();

        let result = score_attempt(
            AttemptId::new(),
            &questions,
            &answers,
            &ChoiceKeyGrader,
            3,
            fixed_now(),
        );

        assert_eq!(result.points_possible(), 20);
        assert_eq!(result.points_earned(), 5);
        assert_eq!(result.pending_review(), 1);
        assert_eq!(result.answered_count(), 3);
    }

    #[test]
    fn grader_failure_never_aborts_scoring() {
        let questions = vec![choice_question(1, 5), choice_question(2, 10)];
        let mut answers = AnswerStore::new();
        answers.record(QuestionId::new(1), AnswerValue::Choice("a".into())).unwrap();
        answers.record(QuestionId::new(2), AnswerValue::Choice("a".into())).unwrap();

        let result = score_attempt(
            AttemptId::new(),
            &questions,
            &answers,
            &FailingGrader,
            2,
            fixed_now(),
        );

        assert_eq!(result.points_possible(), 15);
        assert_eq!(result.points_earned(), 0);
        assert_eq!(result.pending_review(), 2);
        assert!(
            result
                .outcomes()
                .iter()
                .all(|o| o.outcome == GradeOutcome::GradingFailed)
        );
    }
}
