//! Psychology quiz: question selection, rewards and streaks.

use super::instability;
use super::state::{Difficulty, Feature, GameState, LogCategory, Question};

const EMBEDDED_QUESTIONS: &str = include_str!("../../assets/questions.json");

/// Result of answering the question on screen.
#[derive(Clone, Debug, PartialEq)]
pub enum AnswerOutcome {
    Correct { reward: f64, streak: u32 },
    Incorrect { correct_option: String, broken_streak: u32 },
}

pub fn parse_questions(json: &str) -> Result<Vec<Question>, serde_json::Error> {
    serde_json::from_str(json)
}

/// The question bank compiled into the binary. Empty if it fails to parse.
pub fn embedded_questions() -> Vec<Question> {
    match parse_questions(EMBEDDED_QUESTIONS) {
        Ok(qs) => qs,
        Err(e) => {
            tracing::warn!(error = %e, "embedded question bank is malformed");
            Vec::new()
        }
    }
}

pub fn current_question(state: &GameState) -> Option<&Question> {
    state.quiz.current.and_then(|i| state.quiz.bank.get(i))
}

/// Reward for a correct answer before the streak bonus.
pub fn scaled_reward(difficulty: Difficulty, tier: u32) -> f64 {
    let multiplier = 2f64.powi(tier.saturating_sub(1) as i32);
    difficulty.base_reward() * multiplier
}

/// Pick a random question within the unlocked band, avoiding `exclude`.
/// Leaves no question selected when none qualify.
pub fn load_next_question(state: &mut GameState, exclude: Option<u32>) {
    state.quiz.current = None;
    if !state.progression.is_unlocked(Feature::Questions) {
        return;
    }
    let Some(band) = state.progression.difficulty_unlocked else {
        return;
    };
    let candidates: Vec<usize> = state
        .quiz
        .bank
        .iter()
        .enumerate()
        .filter(|(_, q)| q.difficulty <= band as u8 && Some(q.id) != exclude)
        .map(|(i, _)| i)
        .collect();
    if candidates.is_empty() {
        return;
    }
    let pick = state.next_random() as usize % candidates.len();
    state.quiz.current = Some(candidates[pick]);
}

/// Make sure a question is on screen once the quiz is open.
pub fn ensure_question(state: &mut GameState) {
    if state.quiz.current.is_none() {
        load_next_question(state, None);
    }
}

/// Answer the current question with option `selected`.
pub fn answer(state: &mut GameState, selected: usize) -> Option<AnswerOutcome> {
    let question = current_question(state)?.clone();
    let difficulty = Difficulty::from_level(question.difficulty).unwrap_or(Difficulty::Easy);

    let outcome = if selected == question.correct_answer_index {
        let base = difficulty.base_reward();
        let reward = scaled_reward(difficulty, state.progression.current_tier)
            + state.quiz.streak_bonus;
        state.ledger.psychbucks += reward;
        state.quiz.streak_count += 1;
        state.quiz.streak_bonus += base;
        let streak = state.quiz.streak_count;
        state.log_message(
            &format!("Correct: +{} PB (Streak: {})", reward, streak),
            LogCategory::Info,
        );
        AnswerOutcome::Correct { reward, streak }
    } else {
        let broken_streak = state.quiz.streak_count;
        state.quiz.streak_count = 0;
        state.quiz.streak_bonus = 0.0;
        if broken_streak > 0 {
            state.log_message(
                &format!("Incorrect. Streak of {} broken.", broken_streak),
                LogCategory::Warning,
            );
        } else {
            state.log_message("Incorrect.", LogCategory::Warning);
        }
        if state.progression.current_tier >= 2 && !state.is_attack_active() {
            let extra = match difficulty {
                Difficulty::Easy => 0.0,
                Difficulty::Medium => 2.0,
                Difficulty::Hard => 5.0,
            };
            instability::increase_meter(state, 5.0 + extra);
        }
        let correct_option = question
            .options
            .get(question.correct_answer_index)
            .cloned()
            .unwrap_or_default();
        AnswerOutcome::Incorrect {
            correct_option,
            broken_streak,
        }
    };

    state.quiz.feedback = Some(match &outcome {
        AnswerOutcome::Correct { reward, .. } => format!("Correct! +{} PB", reward),
        AnswerOutcome::Incorrect { correct_option, .. } => {
            format!("Incorrect. Correct was: {}", correct_option)
        }
    });
    load_next_question(state, Some(question.id));
    Some(outcome)
}
