use std::collections::HashMap;

use crate::models::domain::AnswerOutcome;

/// Tally of one scored attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreSummary {
    pub total: i32,
    pub correct: i32,
    pub wrong: i32,
    pub unanswered: i32,
}

impl ScoreSummary {
    pub fn score(&self) -> i32 {
        self.correct
    }
}

/// Compares one given answer with the correct one. Both sides are trimmed and
/// uppercased; a missing or blank answer is unanswered, never wrong.
pub fn judge(given: Option<&str>, correct: &str) -> AnswerOutcome {
    let given = match given.map(str::trim) {
        Some(g) if !g.is_empty() => g.to_uppercase(),
        _ => return AnswerOutcome::Unanswered,
    };

    if given == correct.trim().to_uppercase() {
        AnswerOutcome::Correct
    } else {
        AnswerOutcome::Wrong
    }
}

/// Scores `given` (question id -> selected option) against `answer_key`
/// (question id, correct option). Given answers for questions outside the key
/// are ignored.
pub fn score_answers(answer_key: &[(&str, &str)], given: &HashMap<&str, &str>) -> ScoreSummary {
    let mut summary = ScoreSummary {
        total: answer_key.len() as i32,
        ..ScoreSummary::default()
    };

    for (question_id, correct) in answer_key {
        match judge(given.get(question_id).copied(), correct) {
            AnswerOutcome::Correct => summary.correct += 1,
            AnswerOutcome::Wrong => summary.wrong += 1,
            AnswerOutcome::Unanswered => summary.unanswered += 1,
        }
    }

    summary
}
