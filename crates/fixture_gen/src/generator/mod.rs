//! Fixture generator: drives every segment through a [`RowSink`].
//!
//! Generation is strictly sequential. Flat entities come first, then the
//! three reply tiers (each consuming the linkage of the tier above), then
//! likes. The plan is validated and the likes are selected before the first
//! row is emitted, so configuration errors never leave partial output.

mod entities;
mod likes;
mod replies;

use crate::clock::TimestampSampler;
use crate::error::Result;
use crate::fake::FakeData;
use crate::likes::select_likes;
use crate::plan::FixturePlan;
use crate::row::Row;
use crate::sink::{RowSink, Segment};
use crate::tree::{link_child_tier, link_root_tier, ReplyTier};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io;

pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const DEFAULT_SEED: u64 = 42;

/// Row counts actually emitted by a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub segments: Vec<(Segment, u64)>,
    pub timestamps_drawn: u64,
    pub hot_posts: u64,
    pub like_pool: u64,
}

impl GenerationSummary {
    pub fn rows_in(&self, segment: Segment) -> u64 {
        self.segments
            .iter()
            .find(|(s, _)| *s == segment)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn total_rows(&self) -> u64 {
        self.segments.iter().map(|(_, n)| n).sum()
    }
}

/// Main fixture generator
pub struct Generator {
    seed: u64,
    plan: FixturePlan,
    batch_size: usize,
    clock: TimestampSampler,
    fake: FakeData<ChaCha8Rng>,
}

impl Generator {
    pub fn new(seed: u64, plan: FixturePlan) -> Self {
        Self {
            seed,
            plan,
            batch_size: DEFAULT_BATCH_SIZE,
            clock: TimestampSampler::new(seed),
            fake: FakeData::new(ChaCha8Rng::seed_from_u64(seed.wrapping_add(1))),
        }
    }

    /// Rows per emitted batch. Affects statement layout only, never row content.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn plan(&self) -> &FixturePlan {
        &self.plan
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Generate every segment into `sink`.
    ///
    /// Each call restarts the seeded streams, so calling twice emits the
    /// same rows twice.
    pub fn generate<S: RowSink>(&mut self, sink: &mut S) -> Result<GenerationSummary> {
        self.plan.validate()?;

        let pool = self.plan.candidate_pool();
        let likes = select_likes(&pool, self.plan.likes, self.plan.members)?;
        tracing::info!(
            "like pool holds {} codes; selected {} unique likes",
            pool.len(),
            likes.len()
        );

        self.clock = TimestampSampler::new(self.seed);
        self.fake = FakeData::new(ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(1)));

        let hot = self.plan.hot_set();
        let mut summary = GenerationSummary {
            hot_posts: hot.len(),
            like_pool: pool.len(),
            ..Default::default()
        };

        let n = self.emit_members(sink)?;
        summary.segments.push((Segment::Members, n));
        let n = self.emit_categories(sink)?;
        summary.segments.push((Segment::Categories, n));
        let n = self.emit_boards(sink)?;
        summary.segments.push((Segment::Boards, n));
        let n = self.emit_book_reviews(sink)?;
        summary.segments.push((Segment::BookReviews, n));

        let roots = link_root_tier(self.plan.root_replies, 1, &hot)?;
        let n = self.emit_reply_tier(sink, &roots, None)?;
        summary.segments.push((Segment::RootReplies, n));
        tracing::debug!("stored {} root reply mappings", roots.len());

        let depth1 = link_child_tier(
            ReplyTier::Depth1,
            &roots,
            self.plan.depth1_replies,
            roots.next_seq(),
        )?;
        let n = self.emit_reply_tier(sink, &depth1, Some(&roots))?;
        summary.segments.push((Segment::Depth1Replies, n));
        tracing::debug!("stored {} depth-1 reply mappings", depth1.len());
        drop(roots);

        let depth2 = link_child_tier(
            ReplyTier::Depth2,
            &depth1,
            self.plan.depth2_replies,
            depth1.next_seq(),
        )?;
        let n = self.emit_reply_tier(sink, &depth2, Some(&depth1))?;
        summary.segments.push((Segment::Depth2Replies, n));
        drop(depth1);

        let n = self.emit_likes(sink, &likes)?;
        summary.segments.push((Segment::Likes, n));

        summary.timestamps_drawn = self.clock.draws();
        tracing::info!(
            "generated {} rows across {} segments",
            summary.total_rows(),
            summary.segments.len()
        );
        Ok(summary)
    }
}

/// Buffers rows for one segment and hands them to the sink in batches.
struct SegmentBatcher<'a, S: RowSink> {
    sink: &'a mut S,
    segment: Segment,
    rows: Vec<Row>,
    batch_size: usize,
    emitted: u64,
}

impl<'a, S: RowSink> SegmentBatcher<'a, S> {
    fn open(sink: &'a mut S, segment: Segment, batch_size: usize) -> io::Result<Self> {
        tracing::info!("generating {}", segment.label());
        sink.begin_segment(segment)?;
        Ok(Self {
            sink,
            segment,
            rows: Vec::with_capacity(batch_size),
            batch_size,
            emitted: 0,
        })
    }

    fn push(&mut self, row: Row) -> io::Result<()> {
        self.rows.push(row);
        if self.rows.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.rows.is_empty() {
            return Ok(());
        }
        self.sink.append_batch(self.segment, &self.rows)?;
        self.emitted += self.rows.len() as u64;
        self.rows.clear();
        Ok(())
    }

    /// Flush the tail batch and close the segment; returns the row count.
    fn close(mut self) -> io::Result<u64> {
        self.flush()?;
        self.sink.end_segment(self.segment)?;
        tracing::debug!("{}: {} rows", self.segment, self.emitted);
        Ok(self.emitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{parse_code, CodeKind, PostRef};
    use crate::error::FixtureError;
    use crate::plan::{LikePoolCaps, Scale};
    use crate::row::{SqlValue, Table};
    use crate::sink::MemorySink;
    use ahash::{AHashMap, AHashSet};

    fn generate(seed: u64, plan: FixturePlan, batch_size: usize) -> MemorySink {
        let mut sink = MemorySink::new();
        Generator::new(seed, plan)
            .with_batch_size(batch_size)
            .generate(&mut sink)
            .unwrap();
        sink
    }

    fn col<'r>(table: Table, row: &'r Row, column: &str) -> &'r SqlValue {
        &row[table.column_index(column).unwrap()]
    }

    #[test]
    fn test_generator_deterministic() {
        let a = generate(42, Scale::Small.plan(), 100);
        let b = generate(42, Scale::Small.plan(), 100);
        for segment in Segment::ALL {
            assert_eq!(a.rows(segment), b.rows(segment), "{segment}");
        }
    }

    #[test]
    fn test_seed_changes_only_timestamps_and_views() {
        let a = generate(1, Scale::Small.plan(), 100);
        let b = generate(2, Scale::Small.plan(), 100);
        let reply = Table::Reply;
        for (ra, rb) in a
            .rows(Segment::Depth1Replies)
            .iter()
            .zip(b.rows(Segment::Depth1Replies))
        {
            for column in ["reply_code", "member_id", "post_code", "parent_reply_code"] {
                assert_eq!(col(reply, ra, column), col(reply, rb, column));
            }
        }
        assert_ne!(a.rows(Segment::Members), b.rows(Segment::Members));
    }

    #[test]
    fn test_batch_size_does_not_change_rows() {
        let a = generate(7, Scale::Small.plan(), 1);
        let b = generate(7, Scale::Small.plan(), 1000);
        for segment in Segment::ALL {
            assert_eq!(a.rows(segment), b.rows(segment));
        }
        let boards = a.segment(Segment::Boards).unwrap();
        assert_eq!(boards.batches.len(), 100);
        let boards = b.segment(Segment::Boards).unwrap();
        assert_eq!(boards.batches, vec![100]);
    }

    #[test]
    fn test_row_counts_match_plan() {
        let plan = Scale::Small.plan();
        let mut sink = MemorySink::new();
        let summary = Generator::new(42, plan.clone())
            .with_batch_size(32)
            .generate(&mut sink)
            .unwrap();
        for segment in Segment::ALL {
            assert_eq!(sink.rows(segment).len() as u64, plan.rows_in(segment));
            assert_eq!(summary.rows_in(segment), plan.rows_in(segment));
        }
        assert_eq!(summary.timestamps_drawn, plan.total_rows());
        assert_eq!(sink.segments.len(), 8);
    }

    #[test]
    fn test_category_parents() {
        let plan = Scale::Small.plan();
        let sink = generate(42, plan.clone(), 1000);
        let rows = sink.rows(Segment::Categories);
        for (idx, row) in rows.iter().enumerate() {
            let id = col(Table::Category, row, "category_id").as_int().unwrap();
            assert_eq!(id, idx as i64 + 1);
            let parent = col(Table::Category, row, "p_category_id");
            if (id as u64) <= plan.root_categories {
                assert!(parent.is_null());
            } else {
                let p = parent.as_int().unwrap() as u64;
                assert!((1..=plan.root_categories).contains(&p));
            }
        }
    }

    #[test]
    fn test_reply_tree_invariants() {
        let plan = Scale::Small.plan();
        let sink = generate(42, plan.clone(), 64);

        let mut posts: AHashSet<String> = AHashSet::new();
        for row in sink.rows(Segment::Boards) {
            posts.insert(col(Table::Board, row, "code").as_str().unwrap().to_string());
        }
        for row in sink.rows(Segment::BookReviews) {
            posts.insert(col(Table::BookReview, row, "code").as_str().unwrap().to_string());
        }

        // reply code -> (depth, post code)
        let mut replies: AHashMap<String, (u8, String)> = AHashMap::new();
        for (segment, depth) in [
            (Segment::RootReplies, 0u8),
            (Segment::Depth1Replies, 1),
            (Segment::Depth2Replies, 2),
        ] {
            for row in sink.rows(segment) {
                let code = col(Table::Reply, row, "reply_code").as_str().unwrap();
                let post = col(Table::Reply, row, "post_code").as_str().unwrap();
                assert!(posts.contains(post), "{code} points at unknown post {post}");
                match col(Table::Reply, row, "parent_reply_code").as_str() {
                    None => assert_eq!(depth, 0),
                    Some(parent) => {
                        let (parent_depth, parent_post) = &replies[parent];
                        assert_eq!(*parent_depth + 1, depth);
                        assert_eq!(parent_post, post);
                    }
                }
                replies.insert(code.to_string(), (depth, post.to_string()));
            }
        }
        assert_eq!(replies.len() as u64, plan.replies());
    }

    #[test]
    fn test_hot_posts_receive_root_replies_evenly() {
        let plan = FixturePlan {
            root_replies: 95,
            ..Scale::Small.plan()
        };
        let sink = generate(42, plan.clone(), 1000);
        let hot = plan.hot_set();
        let mut hits: AHashMap<PostRef, u64> = AHashMap::new();
        for row in sink.rows(Segment::RootReplies) {
            let post = col(Table::Reply, row, "post_code").as_str().unwrap();
            let post = PostRef::from_code(post).unwrap();
            assert!(hot.contains(post));
            *hits.entry(post).or_default() += 1;
        }
        assert_eq!(hits.len() as u64, hot.len());
        let expected = plan.root_replies / hot.len();
        let average = plan.root_replies as f64 / plan.posts() as f64;
        for count in hits.values() {
            assert!(*count == expected || *count == expected + 1);
            assert!(*count as f64 > average);
        }
    }

    #[test]
    fn test_scenario_three_hot_posts() {
        let plan = FixturePlan {
            members: 10,
            root_categories: 1,
            child_categories: 0,
            boards: 5,
            reviews: 4,
            root_replies: 9,
            depth1_replies: 0,
            depth2_replies: 0,
            likes: 0,
            hot_boards: 2,
            hot_reviews: 1,
            like_pool: LikePoolCaps::default(),
        };
        let sink = generate(42, plan, 4);
        let order: Vec<&str> = sink
            .rows(Segment::RootReplies)
            .iter()
            .map(|r| col(Table::Reply, r, "post_code").as_str().unwrap())
            .collect();
        let cycle = ["BO_000000000004", "BO_000000000005", "BR_000000000004"];
        assert_eq!(order, cycle.repeat(3));
    }

    #[test]
    fn test_likes_unique_and_resolvable() {
        let plan = Scale::Small.plan();
        let sink = generate(42, plan.clone(), 50);
        let mut seen = AHashSet::new();
        for row in sink.rows(Segment::Likes) {
            let code = col(Table::Likes, row, "code").as_str().unwrap().to_string();
            let member = col(Table::Likes, row, "member_id").as_int().unwrap() as u64;
            assert!((1..=plan.members).contains(&member));
            let (kind, seq) = parse_code(&code).unwrap();
            let limit = match kind {
                CodeKind::Board => plan.boards,
                CodeKind::Review => plan.reviews,
                CodeKind::Reply => plan.replies(),
            };
            assert!(seq <= limit);
            assert!(seen.insert((code, member)));
        }
        assert_eq!(seen.len() as u64, plan.likes);
    }

    #[test]
    fn test_infeasible_likes_emit_nothing() {
        let plan = FixturePlan {
            likes: 10 * 390 + 1,
            ..Scale::Small.plan()
        };
        let mut sink = MemorySink::new();
        let err = Generator::new(42, plan).generate(&mut sink).unwrap_err();
        assert!(matches!(
            err,
            FixtureError::InfeasibleUniquenessTarget { pool: 390, .. }
        ));
        assert_eq!(sink.total_rows(), 0);
        assert!(sink.segments.is_empty());
    }

    #[test]
    fn test_invalid_plan_emits_nothing() {
        let plan = FixturePlan {
            root_replies: 0,
            ..Scale::Small.plan()
        };
        let mut sink = MemorySink::new();
        let err = Generator::new(42, plan).generate(&mut sink).unwrap_err();
        assert!(matches!(err, FixtureError::PrerequisiteMissing { .. }));
        assert!(sink.segments.is_empty());
    }

    #[test]
    fn test_reply_tier_with_empty_parent_opens_no_segment() {
        let hot = Scale::Small.plan().hot_set();
        let roots = link_root_tier(3, 1, &hot).unwrap();
        let depth1 = link_child_tier(ReplyTier::Depth1, &roots, 2, roots.next_seq()).unwrap();
        let no_roots = link_root_tier(0, 1, &hot).unwrap();

        let mut sink = MemorySink::new();
        let mut generator = Generator::new(42, Scale::Small.plan());
        let err = generator
            .emit_reply_tier(&mut sink, &depth1, Some(&no_roots))
            .unwrap_err();
        assert!(matches!(
            err,
            FixtureError::PrerequisiteMissing {
                tier: "depth-1 replies",
                ..
            }
        ));
        assert!(sink.segments.is_empty());
    }
}
