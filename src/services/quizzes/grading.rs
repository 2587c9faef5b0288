//! 测验批改与 AI 反馈

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::ai::{AiGenerator, GenerationOptions};
use crate::models::performance::entities::count_percentage;
use crate::models::quizzes::entities::{AnswerDetail, QuestionId, QuizQuestion, SubmittedAnswer};

/// 反馈最多生成的 token 数
pub const FEEDBACK_MAX_TOKENS: u32 = 150;
/// 反馈回退阈值（百分比）
pub const FEEDBACK_PRAISE_THRESHOLD: i64 = 70;

pub const FALLBACK_PRAISE: &str = "Good job! Keep up the good work.";
pub const FALLBACK_ENCOURAGEMENT: &str = "Keep practicing, you're making progress!";

/// 批改结果
#[derive(Debug, Clone, PartialEq)]
pub struct GradedQuiz {
    pub score: i32,
    pub total_marks: i32,
    pub percentage: i64,
    pub answers: Vec<AnswerDetail>,
}

impl GradedQuiz {
    pub fn incorrect(&self) -> impl Iterator<Item = &AnswerDetail> {
        self.answers.iter().filter(|a| !a.is_correct)
    }
}

/// 批改：按作答顺序逐题比对，答案区分大小写且不做任何规范化
///
/// 找不到题目的作答被忽略；同一题重复作答只计第一次。
pub fn grade_quiz(questions: &[QuizQuestion], answers: &[SubmittedAnswer]) -> GradedQuiz {
    let by_id: HashMap<&QuestionId, &QuizQuestion> =
        questions.iter().map(|q| (&q.id, q)).collect();
    let mut answered = HashSet::new();

    let details: Vec<AnswerDetail> = answers
        .iter()
        .filter_map(|answer| {
            let question = by_id.get(&answer.question_id)?;
            answered.insert(&answer.question_id).then(|| AnswerDetail {
                question_id: answer.question_id.clone(),
                question: question.question.clone(),
                student_answer: answer.student_answer.clone(),
                correct_answer: question.correct_answer.clone(),
                is_correct: question.correct_answer == answer.student_answer,
            })
        })
        .collect();

    let score = details.iter().filter(|d| d.is_correct).count() as i32;
    let total_marks = questions.len() as i32;
    GradedQuiz {
        score,
        total_marks,
        percentage: count_percentage(i64::from(score), i64::from(total_marks)),
        answers: details,
    }
}

pub fn feedback_prompt(graded: &GradedQuiz, topic: &str) -> String {
    let missed = graded
        .incorrect()
        .map(|a| format!("- {}", a.question))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "A student scored {}/{} ({}%) on a quiz about {}.\n\
         The following questions were answered incorrectly:\n{}\n\n\
         Provide brief, encouraging feedback (2-3 sentences) focusing on areas for improvement.",
        graded.score, graded.total_marks, graded.percentage, topic, missed
    )
}

pub fn fallback_feedback(percentage: i64) -> &'static str {
    if percentage >= FEEDBACK_PRAISE_THRESHOLD {
        FALLBACK_PRAISE
    } else {
        FALLBACK_ENCOURAGEMENT
    }
}

/// 生成反馈；失败或回复为空时使用固定文案，不重试
pub async fn generate_feedback(ai: &dyn AiGenerator, graded: &GradedQuiz, topic: &str) -> String {
    let options = GenerationOptions::default().with_max_tokens(FEEDBACK_MAX_TOKENS);
    match ai.generate_text(&feedback_prompt(graded, topic), &options).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            warn!("AI feedback was empty, using fallback");
            fallback_feedback(graded.percentage).to_string()
        }
        Err(e) => {
            warn!("AI feedback failed, using fallback: {}", e);
            fallback_feedback(graded.percentage).to_string()
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ai::tests::ScriptedGenerator;

    pub(crate) fn question(id: i64, text: &str, correct: &str) -> QuizQuestion {
        QuizQuestion {
            id: QuestionId::Number(id),
            question: text.to_string(),
            correct_answer: correct.to_string(),
            options: None,
            explanation: None,
        }
    }

    pub(crate) fn answer(id: i64, given: &str) -> SubmittedAnswer {
        SubmittedAnswer {
            question_id: QuestionId::Number(id),
            student_answer: given.to_string(),
        }
    }

    fn three_questions() -> Vec<QuizQuestion> {
        vec![
            question(1, "What is 1+1?", "A"),
            question(2, "What is H2O?", "B"),
            question(3, "Capital of France?", "C"),
        ]
    }

    #[test]
    fn test_two_of_three() {
        let graded = grade_quiz(
            &three_questions(),
            &[answer(1, "A"), answer(2, "C"), answer(3, "C")],
        );
        assert_eq!(graded.score, 2);
        assert_eq!(graded.total_marks, 3);
        assert_eq!(graded.percentage, 67);
        assert_eq!(graded.answers.len(), 3);
        assert!(!graded.answers[1].is_correct);
        assert_eq!(graded.answers[1].correct_answer, "B");
    }

    #[test]
    fn test_unmatched_answers_ignored() {
        let graded = grade_quiz(&three_questions(), &[answer(9, "A"), answer(1, "A")]);
        assert_eq!(graded.score, 1);
        assert_eq!(graded.answers.len(), 1);
        assert_eq!(graded.percentage, 33);
    }

    #[test]
    fn test_ids_compare_strictly() {
        let text_answer = SubmittedAnswer {
            question_id: QuestionId::Text("1".into()),
            student_answer: "A".into(),
        };
        let graded = grade_quiz(&three_questions(), &[text_answer]);
        assert_eq!(graded.score, 0);
        assert!(graded.answers.is_empty());
    }

    #[test]
    fn test_half_percentage_rounds_up() {
        let questions: Vec<QuizQuestion> = (1..=40)
            .map(|id| question(id, &format!("Question {id}"), "A"))
            .collect();
        let answers: Vec<SubmittedAnswer> = (1..=40)
            .map(|id| answer(id, if id <= 23 { "A" } else { "B" }))
            .collect();
        let graded = grade_quiz(&questions, &answers);
        assert_eq!(graded.score, 23);
        assert_eq!(graded.percentage, 58);
    }

    #[test]
    fn test_answers_are_case_sensitive() {
        let graded = grade_quiz(&three_questions(), &[answer(1, "a"), answer(2, " B")]);
        assert_eq!(graded.score, 0);
    }

    #[test]
    fn test_repeated_answer_counts_once() {
        let graded = grade_quiz(
            &three_questions(),
            &[answer(1, "A"), answer(1, "A"), answer(1, "A"), answer(1, "A")],
        );
        assert_eq!(graded.score, 1);
        assert!(graded.score <= graded.total_marks);
        assert_eq!(graded.answers.len(), 1);
    }

    #[test]
    fn test_prompt_lists_incorrect_questions() {
        let graded = grade_quiz(&three_questions(), &[answer(1, "A"), answer(2, "C")]);
        let prompt = feedback_prompt(&graded, "Basics");
        assert!(prompt.starts_with("A student scored 1/3 (33%) on a quiz about Basics."));
        assert!(prompt.contains("- What is H2O?"));
        assert!(!prompt.contains("- What is 1+1?"));
    }

    #[test]
    fn test_fallback_threshold() {
        assert_eq!(fallback_feedback(70), FALLBACK_PRAISE);
        assert_eq!(fallback_feedback(100), FALLBACK_PRAISE);
        assert_eq!(fallback_feedback(69), FALLBACK_ENCOURAGEMENT);
        assert_eq!(fallback_feedback(0), FALLBACK_ENCOURAGEMENT);
    }

    #[tokio::test]
    async fn test_feedback_uses_reply_and_token_cap() {
        let ai = ScriptedGenerator::replying("  Nice work on the basics.  ");
        let graded = grade_quiz(&three_questions(), &[answer(1, "A")]);
        let feedback = generate_feedback(&ai, &graded, "Basics").await;
        assert_eq!(feedback, "Nice work on the basics.");
        let options = ai.options.lock().expect("lock");
        assert_eq!(options[0].max_tokens, Some(FEEDBACK_MAX_TOKENS));
    }

    #[tokio::test]
    async fn test_feedback_falls_back_on_failure_or_empty_reply() {
        let graded = grade_quiz(
            &three_questions(),
            &[answer(1, "A"), answer(2, "B"), answer(3, "C")],
        );
        let failed = generate_feedback(&ScriptedGenerator::failing(), &graded, "Basics").await;
        assert_eq!(failed, FALLBACK_PRAISE);

        let low = grade_quiz(&three_questions(), &[]);
        let empty = generate_feedback(&ScriptedGenerator::replying("   "), &low, "Basics").await;
        assert_eq!(empty, FALLBACK_ENCOURAGEMENT);
    }
}
