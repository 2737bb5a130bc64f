//! Random selection of unseen quiz questions.
//!
//! Nothing here keeps state between requests: the client resends the ids it has
//! already been shown and the handler rebuilds a [`QuizSession`] from them.

use std::collections::HashSet;

use itertools::Itertools;
use rand::{seq::SliceRandom, Rng};

use crate::db::Question;

#[derive(Debug, PartialEq, Eq)]
pub enum Pick<'a> {
    Question(&'a Question),
    /// Every question of the pool has already been seen.
    Exhausted,
}

/// Picks a question from `pool` whose id is not in `seen_ids`, uniformly at random.
///
/// `seen_ids` is not updated; recording the pick is up to the caller.
pub fn pick_question<'a, R>(pool: &'a [Question], seen_ids: &HashSet<i64>, rng: &mut R) -> Pick<'a>
where
    R: Rng + ?Sized,
{
    let candidates: Vec<&Question> = pool
        .iter()
        .filter(|question| !seen_ids.contains(&question.id))
        .collect();
    match candidates.choose(rng).copied() {
        Some(question) => Pick::Question(question),
        None => Pick::Exhausted,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Exhausted,
    Terminated,
}

/// One player's run through a category. The seen set only ever grows.
#[derive(Debug, Clone)]
pub struct QuizSession {
    seen: Vec<i64>,
    seen_set: HashSet<i64>,
    state: SessionState,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self {
            seen: vec![],
            seen_set: HashSet::new(),
            state: SessionState::NotStarted,
        }
    }
}

impl QuizSession {
    /// Resumes a session from the ids a client reports as already shown.
    /// Duplicates are dropped, first occurrence wins.
    pub fn resume(previous: impl IntoIterator<Item = i64>) -> Self {
        let seen: Vec<i64> = previous.into_iter().unique().collect();
        let state = if seen.is_empty() {
            SessionState::NotStarted
        } else {
            SessionState::InProgress
        };
        Self {
            seen_set: seen.iter().copied().collect(),
            seen,
            state,
        }
    }

    pub fn next<'a, R>(&mut self, pool: &'a [Question], rng: &mut R) -> Pick<'a>
    where
        R: Rng + ?Sized,
    {
        if self.state == SessionState::Terminated {
            return Pick::Exhausted;
        }
        let pick = pick_question(pool, &self.seen_set, rng);
        match pick {
            Pick::Question(question) => {
                self.seen_set.insert(question.id);
                self.seen.push(question.id);
                self.state = SessionState::InProgress;
            }
            Pick::Exhausted => self.state = SessionState::Exhausted,
        }
        pick
    }

    pub fn terminate(&mut self) {
        self.state = SessionState::Terminated;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Seen ids in the order they were shown.
    pub fn seen(&self) -> &[i64] {
        &self.seen
    }

    pub fn into_seen(self) -> Vec<i64> {
        self.seen
    }
}
