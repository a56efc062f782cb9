//! Reply tree linkage.
//!
//! Replies come in three tiers. Root replies cycle over the hot-post set;
//! every deeper reply cycles over the full ordered list of the tier above and
//! inherits its parent's post. Each tier's reply→post mapping is returned as a
//! [`TierLinks`] value and handed to the next tier; nothing else reads it.

use crate::codes::{code, CodeKind, PostRef};
use crate::error::{FixtureError, Result};
use crate::hot::HotSet;
use crate::sink::Segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyTier {
    Root,
    Depth1,
    Depth2,
}

impl ReplyTier {
    pub fn depth(&self) -> u8 {
        match self {
            ReplyTier::Root => 0,
            ReplyTier::Depth1 => 1,
            ReplyTier::Depth2 => 2,
        }
    }

    pub fn parent(&self) -> Option<ReplyTier> {
        match self {
            ReplyTier::Root => None,
            ReplyTier::Depth1 => Some(ReplyTier::Root),
            ReplyTier::Depth2 => Some(ReplyTier::Depth1),
        }
    }

    pub fn segment(&self) -> Segment {
        match self {
            ReplyTier::Root => Segment::RootReplies,
            ReplyTier::Depth1 => Segment::Depth1Replies,
            ReplyTier::Depth2 => Segment::Depth2Replies,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReplyTier::Root => "root replies",
            ReplyTier::Depth1 => "depth-1 replies",
            ReplyTier::Depth2 => "depth-2 replies",
        }
    }
}

/// Post linkage of one tier. Entry `k` belongs to the reply with sequence
/// number `first_seq + k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierLinks {
    tier: ReplyTier,
    first_seq: u64,
    posts: Vec<PostRef>,
}

impl TierLinks {
    pub fn tier(&self) -> ReplyTier {
        self.tier
    }

    pub fn len(&self) -> u64 {
        self.posts.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn first_seq(&self) -> u64 {
        self.first_seq
    }

    /// Reply sequence number following this tier
    pub fn next_seq(&self) -> u64 {
        self.first_seq + self.len()
    }

    /// Code of the `k`-th reply in this tier (0-based)
    pub fn code(&self, k: u64) -> String {
        code(CodeKind::Reply, self.first_seq + k)
    }

    pub fn post(&self, k: u64) -> Option<PostRef> {
        self.posts.get(k as usize).copied()
    }

    pub fn posts(&self) -> &[PostRef] {
        &self.posts
    }
}

/// Link `count` root replies, numbered from `first_seq`, to the hot set.
pub fn link_root_tier(count: u64, first_seq: u64, hot: &HotSet) -> Result<TierLinks> {
    if count > 0 && hot.is_empty() {
        return Err(FixtureError::PrerequisiteMissing {
            tier: ReplyTier::Root.label(),
            requires: "the hot post set",
        });
    }
    let posts = (1..=count).filter_map(|i| hot.cycle(i)).collect();
    Ok(TierLinks {
        tier: ReplyTier::Root,
        first_seq,
        posts,
    })
}

/// Index into `parent` of the parent of the `j`-th reply (1-based)
pub fn parent_index(j: u64, parent_len: u64) -> u64 {
    (j - 1) % parent_len
}

/// Link `count` replies of `tier`, numbered from `first_seq`, under `parent`.
///
/// The parent must be the tier directly above and must not be empty.
pub fn link_child_tier(
    tier: ReplyTier,
    parent: &TierLinks,
    count: u64,
    first_seq: u64,
) -> Result<TierLinks> {
    let expected_parent = tier.parent().ok_or(FixtureError::PrerequisiteMissing {
        tier: tier.label(),
        requires: "a parent tier",
    })?;
    if parent.tier != expected_parent || (count > 0 && parent.is_empty()) {
        return Err(FixtureError::PrerequisiteMissing {
            tier: tier.label(),
            requires: expected_parent.label(),
        });
    }

    let posts = (1..=count)
        .map(|j| parent.posts[parent_index(j, parent.len()) as usize])
        .collect();
    Ok(TierLinks {
        tier,
        first_seq,
        posts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_replies_cycle_hot_posts() {
        let hot = HotSet::from_tail(10, 2, 4, 1);
        let roots = link_root_tier(9, 1, &hot).unwrap();
        let expected: Vec<PostRef> = [
            PostRef::board(9),
            PostRef::board(10),
            PostRef::review(4),
        ]
        .repeat(3);
        assert_eq!(roots.posts(), expected.as_slice());
        assert_eq!(roots.code(0), "REP_000000000001");
        assert_eq!(roots.next_seq(), 10);
    }

    #[test]
    fn test_children_inherit_parent_post() {
        let hot = HotSet::from_tail(10, 2, 4, 1);
        let roots = link_root_tier(4, 1, &hot).unwrap();
        let depth1 = link_child_tier(ReplyTier::Depth1, &roots, 10, roots.next_seq()).unwrap();
        assert_eq!(depth1.first_seq(), 5);
        for j in 1..=10 {
            let parent = parent_index(j, roots.len());
            assert_eq!(depth1.post(j - 1), roots.post(parent));
        }

        let depth2 = link_child_tier(ReplyTier::Depth2, &depth1, 3, depth1.next_seq()).unwrap();
        assert_eq!(depth2.first_seq(), 15);
        assert_eq!(depth2.posts(), &depth1.posts()[..3]);
    }

    #[test]
    fn test_empty_parent_fails_fast() {
        let hot = HotSet::from_tail(10, 2, 4, 1);
        let roots = link_root_tier(0, 1, &hot).unwrap();
        let err = link_child_tier(ReplyTier::Depth1, &roots, 1, 1).unwrap_err();
        assert!(matches!(
            err,
            FixtureError::PrerequisiteMissing {
                tier: "depth-1 replies",
                requires: "root replies"
            }
        ));
        // nothing to generate, nothing required
        assert!(link_child_tier(ReplyTier::Depth1, &roots, 0, 1)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_wrong_parent_tier_rejected() {
        let hot = HotSet::from_tail(10, 2, 4, 1);
        let roots = link_root_tier(3, 1, &hot).unwrap();
        assert!(link_child_tier(ReplyTier::Depth2, &roots, 1, 4).is_err());
        assert!(link_child_tier(ReplyTier::Root, &roots, 1, 4).is_err());
    }

    #[test]
    fn test_root_without_hot_posts() {
        let hot = HotSet::from_tail(10, 0, 4, 0);
        assert!(link_root_tier(1, 1, &hot).is_err());
        assert!(link_root_tier(0, 1, &hot).unwrap().is_empty());
    }
}
