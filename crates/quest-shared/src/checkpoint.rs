//! Single-question checkpoint quiz.
//!
//! The first valid selection locks the quiz; later selections are no-ops.

use crate::catalog::CheckpointQuestion;
use crate::rewards::XP_TABLE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizAnswer {
    pub selected: usize,
    pub correct_index: usize,
    pub correct: bool,
    /// XP to award; zero for a wrong answer
    pub xp_awarded: u64,
}

#[derive(Debug, Clone)]
pub struct CheckpointQuiz<'a> {
    question: &'a CheckpointQuestion,
    answer: Option<QuizAnswer>,
}

impl<'a> CheckpointQuiz<'a> {
    pub fn new(question: &'a CheckpointQuestion) -> Self {
        Self {
            question,
            answer: None,
        }
    }

    pub fn question(&self) -> &'a CheckpointQuestion {
        self.question
    }

    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }

    pub fn answer(&self) -> Option<QuizAnswer> {
        self.answer
    }

    /// Returns `None` when already answered or the index is out of range
    pub fn select(&mut self, index: usize) -> Option<QuizAnswer> {
        if self.answer.is_some() || index >= self.question.options.len() {
            return None;
        }
        let correct = index == self.question.correct_index;
        let answer = QuizAnswer {
            selected: index,
            correct_index: self.question.correct_index,
            correct,
            xp_awarded: if correct { XP_TABLE.checkpoint_correct } else { 0 },
        };
        self.answer = Some(answer);
        Some(answer)
    }
}
