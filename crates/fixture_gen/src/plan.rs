//! Fixture plan: how many rows of each kind to generate.

use crate::error::{FixtureError, Result};
use crate::hot::HotSet;
use crate::likes::CandidatePool;
use crate::sink::Segment;

/// Generation scale presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// ~600 total rows, for tests and smoke runs
    Small,
    /// ~500K total rows
    Medium,
    /// ~2.3M total rows
    Large,
    /// ~4.6M total rows, the full load-test dataset
    Full,
}

impl Scale {
    pub fn plan(&self) -> FixturePlan {
        match self {
            Scale::Small => FixturePlan {
                members: 10,
                root_categories: 2,
                child_categories: 8,
                boards: 100,
                reviews: 20,
                root_replies: 90,
                depth1_replies: 135,
                depth2_replies: 45,
                likes: 200,
                hot_boards: 8,
                hot_reviews: 2,
                like_pool: LikePoolCaps::default(),
            },
            Scale::Medium => FixturePlan {
                members: 1_000,
                root_categories: 20,
                child_categories: 80,
                boards: 100_000,
                reviews: 10_000,
                root_replies: 100_000,
                depth1_replies: 150_000,
                depth2_replies: 50_000,
                likes: 50_000,
                hot_boards: 2_500,
                hot_reviews: 500,
                like_pool: LikePoolCaps::default(),
            },
            Scale::Large => FixturePlan {
                members: 5_000,
                root_categories: 20,
                child_categories: 80,
                boards: 500_000,
                reviews: 50_000,
                root_replies: 500_000,
                depth1_replies: 750_000,
                depth2_replies: 250_000,
                likes: 250_000,
                hot_boards: 12_500,
                hot_reviews: 2_500,
                like_pool: LikePoolCaps::default(),
            },
            Scale::Full => FixturePlan {
                members: 10_000,
                root_categories: 20,
                child_categories: 80,
                boards: 1_000_000,
                reviews: 100_000,
                root_replies: 1_000_000,
                depth1_replies: 1_500_000,
                depth2_replies: 500_000,
                likes: 500_000,
                hot_boards: 25_000,
                hot_reviews: 5_000,
                like_pool: LikePoolCaps::default(),
            },
        }
    }
}

impl std::str::FromStr for Scale {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" | "s" => Ok(Scale::Small),
            "medium" | "m" => Ok(Scale::Medium),
            "large" | "l" => Ok(Scale::Large),
            "full" | "f" => Ok(Scale::Full),
            _ => Err(format!(
                "Unknown scale: {}. Use small, medium, large, or full",
                s
            )),
        }
    }
}

impl std::fmt::Display for Scale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scale::Small => write!(f, "small"),
            Scale::Medium => write!(f, "medium"),
            Scale::Large => write!(f, "large"),
            Scale::Full => write!(f, "full"),
        }
    }
}

/// Upper bounds on how many codes of each kind feed the likes candidate pool.
/// Applied as clamps: a smaller run simply contributes all of its codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikePoolCaps {
    pub boards: u64,
    pub reviews: u64,
    pub replies: u64,
}

impl Default for LikePoolCaps {
    fn default() -> Self {
        Self {
            boards: 100_000,
            reviews: 50_000,
            replies: 100_000,
        }
    }
}

/// Row counts for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixturePlan {
    pub members: u64,
    pub root_categories: u64,
    pub child_categories: u64,
    pub boards: u64,
    pub reviews: u64,
    pub root_replies: u64,
    pub depth1_replies: u64,
    pub depth2_replies: u64,
    pub likes: u64,
    /// Highest-ranked boards that receive every root reply
    pub hot_boards: u64,
    /// Highest-ranked reviews that receive every root reply
    pub hot_reviews: u64,
    pub like_pool: LikePoolCaps,
}

impl Default for FixturePlan {
    fn default() -> Self {
        Scale::Full.plan()
    }
}

impl FixturePlan {
    pub fn categories(&self) -> u64 {
        self.root_categories + self.child_categories
    }

    pub fn posts(&self) -> u64 {
        self.boards + self.reviews
    }

    pub fn replies(&self) -> u64 {
        self.root_replies + self.depth1_replies + self.depth2_replies
    }

    pub fn hot_set(&self) -> HotSet {
        HotSet::from_tail(self.boards, self.hot_boards, self.reviews, self.hot_reviews)
    }

    pub fn candidate_pool(&self) -> CandidatePool {
        CandidatePool::new(self.boards, self.reviews, self.replies(), self.like_pool)
    }

    /// Expected row count of a segment
    pub fn rows_in(&self, segment: Segment) -> u64 {
        match segment {
            Segment::Members => self.members,
            Segment::Categories => self.categories(),
            Segment::Boards => self.boards,
            Segment::BookReviews => self.reviews,
            Segment::RootReplies => self.root_replies,
            Segment::Depth1Replies => self.depth1_replies,
            Segment::Depth2Replies => self.depth2_replies,
            Segment::Likes => self.likes,
        }
    }

    pub fn total_rows(&self) -> u64 {
        Segment::ALL.iter().map(|s| self.rows_in(*s)).sum()
    }

    /// Reject plans whose rows could not all reference valid parents.
    pub fn validate(&self) -> Result<()> {
        let referencing_members = self.posts() + self.replies() + self.likes;
        if self.members == 0 && referencing_members > 0 {
            return Err(FixtureError::InvalidPlan(format!(
                "{} rows reference members but the member count is 0",
                referencing_members
            )));
        }
        if self.root_categories == 0 && self.child_categories > 0 {
            return Err(FixtureError::InvalidPlan(
                "child categories need at least one root category".to_string(),
            ));
        }
        if self.categories() == 0 && self.posts() > 0 {
            return Err(FixtureError::InvalidPlan(
                "posts need at least one category".to_string(),
            ));
        }
        if self.hot_boards > self.boards {
            return Err(FixtureError::InvalidPlan(format!(
                "hot board count {} exceeds board count {}",
                self.hot_boards, self.boards
            )));
        }
        if self.hot_reviews > self.reviews {
            return Err(FixtureError::InvalidPlan(format!(
                "hot review count {} exceeds review count {}",
                self.hot_reviews, self.reviews
            )));
        }
        self.check_tier_order()
    }

    /// Each reply tier needs a non-empty parent tier (or hot set for roots).
    fn check_tier_order(&self) -> Result<()> {
        if self.root_replies > 0 && self.hot_set().is_empty() {
            return Err(FixtureError::PrerequisiteMissing {
                tier: "root replies",
                requires: "the hot post set",
            });
        }
        if self.depth1_replies > 0 && self.root_replies == 0 {
            return Err(FixtureError::PrerequisiteMissing {
                tier: "depth-1 replies",
                requires: "the root reply tier",
            });
        }
        if self.depth2_replies > 0 && self.depth1_replies == 0 {
            return Err(FixtureError::PrerequisiteMissing {
                tier: "depth-2 replies",
                requires: "the depth-1 reply tier",
            });
        }
        Ok(())
    }
}
