use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;
use uuid::Uuid;

/// Upper bound on reviewer slots per pull request.
pub const MAX_REVIEWERS: usize = 2;

#[derive(Debug, Error, PartialEq)]
#[error("no candidates to select from")]
pub struct NoCandidates;

/// Picks up to `max` distinct reviewers from the candidate pool.
///
/// When the pool fits within `max` every candidate is returned; otherwise a
/// uniform sample without replacement is drawn. Callers are expected to have
/// already removed the author, current reviewers, and inactive users.
pub fn select_reviewers<R>(rng: &mut R, candidates: &[Uuid], max: usize) -> Vec<Uuid>
where
    R: Rng + ?Sized,
{
    if candidates.len() <= max {
        return candidates.to_vec();
    }

    candidates.choose_multiple(rng, max).copied().collect()
}

/// Picks one replacement reviewer uniformly at random.
pub fn select_replacement<R>(rng: &mut R, candidates: &[Uuid]) -> Result<Uuid, NoCandidates>
where
    R: Rng + ?Sized,
{
    candidates.choose(rng).copied().ok_or(NoCandidates)
}
