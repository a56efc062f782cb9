//! Hot-post set: the tail of each post range that absorbs every root reply.
//!
//! The set is the highest-ranked `hot_boards` boards followed by the
//! highest-ranked `hot_reviews` reviews, ascending by rank within each kind.
//! It is derived from post counts alone, so anyone holding the counts can
//! regenerate it without the post list.

use crate::codes::PostRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotSet {
    board_start: u64,
    board_count: u64,
    review_start: u64,
    review_count: u64,
}

impl HotSet {
    /// Take the last `hot_boards` of `boards` and the last `hot_reviews` of
    /// `reviews`. Hot counts larger than the ranges are clamped.
    pub fn from_tail(boards: u64, hot_boards: u64, reviews: u64, hot_reviews: u64) -> Self {
        let board_count = hot_boards.min(boards);
        let review_count = hot_reviews.min(reviews);
        Self {
            board_start: boards - board_count + 1,
            board_count,
            review_start: reviews - review_count + 1,
            review_count,
        }
    }

    pub fn len(&self) -> u64 {
        self.board_count + self.review_count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `idx`-th hot post (0-based). Boards come first.
    pub fn get(&self, idx: u64) -> Option<PostRef> {
        if idx < self.board_count {
            Some(PostRef::board(self.board_start + idx))
        } else if idx < self.len() {
            Some(PostRef::review(self.review_start + idx - self.board_count))
        } else {
            None
        }
    }

    /// Hot post hit by the `i`-th root reply (1-based), cycling with wraparound
    pub fn cycle(&self, i: u64) -> Option<PostRef> {
        if self.is_empty() {
            return None;
        }
        self.get((i - 1) % self.len())
    }

    pub fn contains(&self, post: PostRef) -> bool {
        use crate::codes::PostKind;
        match post.kind {
            PostKind::Board => {
                post.rank >= self.board_start && post.rank < self.board_start + self.board_count
            }
            PostKind::Review => {
                post.rank >= self.review_start
                    && post.rank < self.review_start + self.review_count
            }
        }
    }

    /// Inclusive board rank range, if any boards are hot
    pub fn board_range(&self) -> Option<(u64, u64)> {
        (self.board_count > 0).then(|| (self.board_start, self.board_start + self.board_count - 1))
    }

    /// Inclusive review rank range, if any reviews are hot
    pub fn review_range(&self) -> Option<(u64, u64)> {
        (self.review_count > 0)
            .then(|| (self.review_start, self.review_start + self.review_count - 1))
    }

    pub fn iter(&self) -> impl Iterator<Item = PostRef> + '_ {
        (0..self.len()).filter_map(move |idx| self.get(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_selection() {
        let hot = HotSet::from_tail(1_000_000, 25_000, 100_000, 5_000);
        assert_eq!(hot.len(), 30_000);
        assert_eq!(hot.get(0), Some(PostRef::board(975_001)));
        assert_eq!(hot.get(24_999), Some(PostRef::board(1_000_000)));
        assert_eq!(hot.get(25_000), Some(PostRef::review(95_001)));
        assert_eq!(hot.get(29_999), Some(PostRef::review(100_000)));
        assert_eq!(hot.get(30_000), None);
        assert_eq!(hot.board_range(), Some((975_001, 1_000_000)));
        assert_eq!(hot.review_range(), Some((95_001, 100_000)));
    }

    #[test]
    fn test_cycle_wraps_boards_then_reviews() {
        let hot = HotSet::from_tail(10, 2, 5, 1);
        let seen: Vec<PostRef> = (1..=7).filter_map(|i| hot.cycle(i)).collect();
        assert_eq!(
            seen,
            vec![
                PostRef::board(9),
                PostRef::board(10),
                PostRef::review(5),
                PostRef::board(9),
                PostRef::board(10),
                PostRef::review(5),
                PostRef::board(9),
            ]
        );
    }

    #[test]
    fn test_contains_only_tail() {
        let hot = HotSet::from_tail(10, 2, 5, 1);
        assert!(hot.contains(PostRef::board(9)));
        assert!(!hot.contains(PostRef::board(8)));
        assert!(hot.contains(PostRef::review(5)));
        assert!(!hot.contains(PostRef::review(4)));
        assert_eq!(hot.iter().count(), 3);
    }

    #[test]
    fn test_empty_and_clamped() {
        let empty = HotSet::from_tail(10, 0, 5, 0);
        assert!(empty.is_empty());
        assert_eq!(empty.cycle(1), None);
        assert_eq!(empty.board_range(), None);

        let clamped = HotSet::from_tail(3, 10, 0, 4);
        assert_eq!(clamped.len(), 3);
        assert_eq!(clamped.get(0), Some(PostRef::board(1)));
    }
}
