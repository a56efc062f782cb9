//! Like selection: unique `(target code, member)` pairs over a bounded pool.
//!
//! The candidate pool is a fixed prefix of each code range (boards, then
//! reviews, then replies), clamped to what the run actually produces. A cursor
//! walks the pool cyclically; the member for cursor `c` is
//! `((c + offset) % members) + 1`, where `offset` grows by one after every
//! full pass. Pairs already taken are skipped. The walk is capped at
//! [`ITERATION_FACTOR`] passes over the pool.

use crate::codes::{code, CodeKind};
use crate::error::{FixtureError, Result};
use crate::plan::LikePoolCaps;
use ahash::AHashSet;

/// Maximum number of passes over the candidate pool
pub const ITERATION_FACTOR: u64 = 10;

/// Ordered candidate codes for likes, stored as per-kind prefix lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidatePool {
    boards: u64,
    reviews: u64,
    replies: u64,
}

impl CandidatePool {
    pub fn new(boards: u64, reviews: u64, replies: u64, caps: LikePoolCaps) -> Self {
        Self {
            boards: boards.min(caps.boards),
            reviews: reviews.min(caps.reviews),
            replies: replies.min(caps.replies),
        }
    }

    pub fn len(&self) -> u64 {
        self.boards + self.reviews + self.replies
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Kind and sequence number of the `idx`-th candidate (0-based)
    pub fn get(&self, idx: u64) -> Option<(CodeKind, u64)> {
        (idx < self.len()).then(|| self.locate(idx))
    }

    /// Caller guarantees `idx < len()`
    fn locate(&self, idx: u64) -> (CodeKind, u64) {
        if idx < self.boards {
            (CodeKind::Board, idx + 1)
        } else if idx < self.boards + self.reviews {
            (CodeKind::Review, idx - self.boards + 1)
        } else {
            (CodeKind::Reply, idx - self.boards - self.reviews + 1)
        }
    }

    /// Number of candidates contributed by each kind
    pub fn breakdown(&self) -> [(CodeKind, u64); 3] {
        [
            (CodeKind::Board, self.boards),
            (CodeKind::Review, self.reviews),
            (CodeKind::Reply, self.replies),
        ]
    }
}

/// A selected like: candidate index into the pool, the code it resolves to,
/// and the member id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LikePair {
    pub candidate: u64,
    pub target: (CodeKind, u64),
    pub member: u64,
}

impl LikePair {
    pub fn code(&self) -> String {
        code(self.target.0, self.target.1)
    }
}

/// Pick `target` unique pairs, or fail with `InfeasibleUniquenessTarget`.
///
/// Runs to completion before any like is emitted, so an infeasible target
/// never leaves a partially written segment behind.
pub fn select_likes(pool: &CandidatePool, target: u64, members: u64) -> Result<Vec<LikePair>> {
    if target == 0 {
        return Ok(Vec::new());
    }
    let pool_len = pool.len();
    let infeasible = |produced: u64| FixtureError::InfeasibleUniquenessTarget {
        requested: target,
        produced,
        pool: pool_len,
        members,
    };
    if pool_len == 0 || members == 0 {
        return Err(infeasible(0));
    }

    let cap = pool_len.saturating_mul(ITERATION_FACTOR);
    // at most one pair per visit, so never reserve past the cap
    let reserve = usize::try_from(target.min(cap)).unwrap_or(usize::MAX);
    let mut selected = Vec::with_capacity(reserve);
    let mut seen: AHashSet<(u64, u64)> = AHashSet::with_capacity(reserve);
    let mut cursor: u64 = 0;
    let mut offset: u64 = 0;

    while (selected.len() as u64) < target && cursor < cap {
        let candidate = cursor % pool_len;
        let member = ((cursor + offset) % members) + 1;
        if seen.insert((candidate, member)) {
            selected.push(LikePair {
                candidate,
                target: pool.locate(candidate),
                member,
            });
        }

        cursor += 1;
        if cursor % pool_len == 0 {
            offset += 1;
        }
    }

    let produced = selected.len() as u64;
    if produced < target {
        return Err(infeasible(produced));
    }
    tracing::debug!(
        "selected {} likes after {} candidate visits ({} passes)",
        produced,
        cursor,
        offset
    );
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(boards: u64, reviews: u64, replies: u64) -> LikePoolCaps {
        LikePoolCaps {
            boards,
            reviews,
            replies,
        }
    }

    #[test]
    fn test_pool_clamps_to_produced_rows() {
        let pool = CandidatePool::new(40, 3, 1_000_000, LikePoolCaps::default());
        assert_eq!(pool.len(), 40 + 3 + 100_000);
        assert_eq!(pool.get(0), Some((CodeKind::Board, 1)));
        assert_eq!(pool.get(39), Some((CodeKind::Board, 40)));
        assert_eq!(pool.get(40), Some((CodeKind::Review, 1)));
        assert_eq!(pool.get(43), Some((CodeKind::Reply, 1)));
        assert_eq!(pool.get(pool.len()), None);
    }

    #[test]
    fn test_pairs_are_unique() {
        let pool = CandidatePool::new(5, 2, 3, caps(5, 2, 3));
        let likes = select_likes(&pool, 60, 7).unwrap();
        assert_eq!(likes.len(), 60);
        let unique: AHashSet<LikePair> = likes.iter().copied().collect();
        assert_eq!(unique.len(), 60);
        assert!(likes.iter().all(|l| (1..=7).contains(&l.member)));
        assert!(likes.iter().all(|l| l.candidate < pool.len()));
        assert!(likes
            .iter()
            .all(|l| pool.get(l.candidate) == Some(l.target)));
    }

    #[test]
    fn test_every_selected_like_resolves_to_a_code() {
        let pool = CandidatePool::new(2, 1, 2, LikePoolCaps::default());
        let likes = select_likes(&pool, 5, 3).unwrap();
        let codes: Vec<String> = likes.iter().map(LikePair::code).collect();
        assert_eq!(
            codes,
            vec![
                "BO_000000000001",
                "BO_000000000002",
                "BR_000000000001",
                "REP_000000000001",
                "REP_000000000002",
            ]
        );
    }

    #[test]
    fn test_first_pass_visits_pool_in_order() {
        let pool = CandidatePool::new(3, 0, 0, LikePoolCaps::default());
        let likes = select_likes(&pool, 5, 10).unwrap();
        let first: Vec<(u64, u64)> = likes.iter().map(|l| (l.candidate, l.member)).collect();
        // second pass shifts members by the cursor plus one offset
        assert_eq!(first, vec![(0, 1), (1, 2), (2, 3), (0, 5), (1, 6)]);
    }

    #[test]
    fn test_infeasible_target_is_reported() {
        // 2 candidates x 1 member: only 2 distinct pairs exist
        let pool = CandidatePool::new(2, 0, 0, LikePoolCaps::default());
        let err = select_likes(&pool, 3, 1).unwrap_err();
        match err {
            FixtureError::InfeasibleUniquenessTarget {
                requested,
                produced,
                pool,
                members,
            } => {
                assert_eq!((requested, produced, pool, members), (3, 2, 2, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_target_beyond_iteration_cap() {
        let pool = CandidatePool::new(4, 0, 0, LikePoolCaps::default());
        // plenty of members, but the walk stops after 10 passes = 40 visits
        assert!(select_likes(&pool, 41, 1_000).is_err());
        assert_eq!(select_likes(&pool, 40, 1_000).unwrap().len(), 40);
    }

    #[test]
    fn test_huge_target_is_infeasible_not_allocated() {
        let pool = CandidatePool::new(4, 0, 0, LikePoolCaps::default());
        match select_likes(&pool, 1u64 << 40, 1_000) {
            Err(FixtureError::InfeasibleUniquenessTarget {
                requested,
                produced,
                pool,
                ..
            }) => {
                assert_eq!(requested, 1u64 << 40);
                // the walk stops after 10 passes over 4 candidates
                assert_eq!(produced, 40);
                assert_eq!(pool, 4);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_zero_target_and_empty_pool() {
        let empty = CandidatePool::new(0, 0, 0, LikePoolCaps::default());
        assert!(select_likes(&empty, 0, 5).unwrap().is_empty());
        assert!(select_likes(&empty, 1, 5).is_err());
    }
}
