//! Question-set randomization.

use rand::Rng;

use crate::model::{ChapterKey, Question};

/// Default number of questions drawn for one chapter attempt.
pub const QUESTIONS_PER_CHAPTER: usize = 10;

/// Unbiased in-place Fisher-Yates shuffle.
///
/// Walks from the last index down to 1, swapping each slot with a uniformly
/// chosen slot in `0..=i`.
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Draws a shuffled question set for one chapter attempt.
///
/// Only questions of `chapter` are considered; at most `max` are returned.
pub fn draw_chapter<R: Rng + ?Sized>(
    questions: &[Question],
    chapter: ChapterKey,
    max: usize,
    rng: &mut R,
) -> Vec<Question> {
    let mut pool: Vec<Question> = questions
        .iter()
        .filter(|q| q.chapter() == chapter)
        .cloned()
        .collect();
    fisher_yates(&mut pool, rng);
    pool.truncate(max);
    pool
}
