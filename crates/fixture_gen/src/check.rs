//! Streaming invariant checker.
//!
//! [`InvariantSink`] accepts rows like any other sink and verifies the
//! relational properties of the dataset as they arrive: every reference
//! points at a row already emitted, reply depths and posts agree with their
//! parents, and like pairs are unique. It keeps one compact entry per reply
//! plus one per like, never the rendered rows.

use crate::codes::{parse_code, CodeKind, PostRef};
use crate::hot::HotSet;
use crate::plan::FixturePlan;
use crate::row::{Row, SqlValue, Table};
use crate::sink::{RowSink, Segment};
use ahash::{AHashMap, AHashSet};
use std::io;

/// Issues kept verbatim; later ones are only counted
pub const MAX_REPORTED_ISSUES: usize = 1000;

/// Upper bound on entries reserved up front; larger runs grow on demand
const MAX_PREALLOCATED: u64 = 1 << 20;

fn reserve(planned: u64) -> usize {
    planned.min(MAX_PREALLOCATED) as usize
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentCheck {
    pub segment: Segment,
    pub rows: u64,
    pub expected: u64,
}

/// Outcome of a checked run
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub segments: Vec<SegmentCheck>,
    pub hot_posts: u64,
    /// Hot posts that received at least one root reply
    pub replied_hot_posts: u64,
    pub min_hot_root_replies: u64,
    pub max_hot_root_replies: u64,
    pub non_hot_root_replies: u64,
    /// Root replies per post if they were spread over every post
    pub average_root_replies: f64,
    pub issues: Vec<String>,
    pub total_issues: u64,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.total_issues == 0
    }

    pub fn total_rows(&self) -> u64 {
        self.segments.iter().map(|s| s.rows).sum()
    }
}

pub struct InvariantSink {
    expected: Vec<(Segment, u64)>,
    hot: HotSet,
    current: Option<Segment>,
    counts: Vec<(Segment, u64)>,
    members: u64,
    root_categories: u64,
    categories: u64,
    boards: u64,
    reviews: u64,
    /// Depth and post of every reply, indexed by sequence number - 1
    replies: Vec<(u8, PostRef)>,
    root_hits: AHashMap<PostRef, u64>,
    likes: AHashSet<(CodeKind, u64, u64)>,
    issues: Vec<String>,
    total_issues: u64,
}

impl InvariantSink {
    pub fn new(plan: &FixturePlan) -> Self {
        Self {
            expected: Segment::ALL
                .iter()
                .map(|s| (*s, plan.rows_in(*s)))
                .collect(),
            hot: plan.hot_set(),
            current: None,
            counts: Vec::new(),
            members: 0,
            root_categories: 0,
            categories: 0,
            boards: 0,
            reviews: 0,
            replies: Vec::with_capacity(reserve(plan.replies())),
            root_hits: AHashMap::new(),
            likes: AHashSet::with_capacity(reserve(plan.likes)),
            issues: Vec::new(),
            total_issues: 0,
        }
    }

    fn issue(&mut self, message: String) {
        self.total_issues += 1;
        if self.issues.len() < MAX_REPORTED_ISSUES {
            self.issues.push(message);
        }
    }

    fn check_row(&mut self, segment: Segment, row: &Row) {
        let table = segment.table();
        if row.len() != table.columns().len() {
            self.issue(format!(
                "{}: row has {} values, expected {}",
                segment,
                row.len(),
                table.columns().len()
            ));
            return;
        }
        match segment {
            Segment::Members => self.check_member(row),
            Segment::Categories => self.check_category(row),
            Segment::Boards => self.check_post(segment, CodeKind::Board, row),
            Segment::BookReviews => self.check_post(segment, CodeKind::Review, row),
            Segment::RootReplies | Segment::Depth1Replies | Segment::Depth2Replies => {
                self.check_reply(segment, row)
            }
            Segment::Likes => self.check_like(row),
        }
    }

    fn check_member(&mut self, row: &Row) {
        let id = int(Table::Member, row, "member_id");
        if id != Some(self.members + 1) {
            self.issue(format!(
                "member ids out of sequence: expected {}, got {:?}",
                self.members + 1,
                id
            ));
        }
        self.members += 1;
    }

    fn check_category(&mut self, row: &Row) {
        let id = int(Table::Category, row, "category_id");
        let Some(id) = id.filter(|id| *id == self.categories + 1) else {
            self.issue(format!(
                "category ids out of sequence at position {}",
                self.categories + 1
            ));
            self.categories += 1;
            return;
        };
        self.categories += 1;

        let parent = field(Table::Category, row, "p_category_id");
        match parent.and_then(SqlValue::as_int) {
            None if parent.is_some_and(SqlValue::is_null) => {
                if self.root_categories + 1 != id {
                    self.issue(format!("root category {} follows a child category", id));
                }
                self.root_categories += 1;
            }
            Some(p) if p >= 1 && (p as u64) <= self.root_categories => {}
            _ => self.issue(format!(
                "category {} has parent {:?} outside the root range 1..={}",
                id, parent, self.root_categories
            )),
        }
    }

    fn check_post(&mut self, segment: Segment, kind: CodeKind, row: &Row) {
        let table = segment.table();
        let expected = match kind {
            CodeKind::Board => self.boards + 1,
            _ => self.reviews + 1,
        };
        match text(table, row, "code").and_then(parse_code) {
            Some((k, seq)) if k == kind && seq == expected => {}
            other => self.issue(format!(
                "{}: expected code #{} of kind {}, got {:?}",
                segment, expected, kind, other
            )),
        }
        match kind {
            CodeKind::Board => self.boards += 1,
            _ => self.reviews += 1,
        }
        self.check_member_ref(segment, table, row);
        match int(table, row, "category_id") {
            Some(c) if c >= 1 && c <= self.categories => {}
            other => self.issue(format!(
                "{}: category {:?} outside 1..={}",
                segment, other, self.categories
            )),
        }
    }

    fn check_member_ref(&mut self, segment: Segment, table: Table, row: &Row) {
        match int(table, row, "member_id") {
            Some(m) if m >= 1 && m <= self.members => {}
            other => self.issue(format!(
                "{}: member {:?} outside 1..={}",
                segment, other, self.members
            )),
        }
    }

    fn post_emitted(&self, post: PostRef) -> bool {
        let limit = match post.kind.code_kind() {
            CodeKind::Board => self.boards,
            _ => self.reviews,
        };
        post.rank >= 1 && post.rank <= limit
    }

    fn check_reply(&mut self, segment: Segment, row: &Row) {
        let table = Table::Reply;
        let depth = segment.reply_depth().unwrap_or(0);
        self.check_member_ref(segment, table, row);

        let seq = self.replies.len() as u64 + 1;
        match text(table, row, "reply_code").and_then(parse_code) {
            Some((CodeKind::Reply, s)) if s == seq => {}
            other => self.issue(format!(
                "{}: expected reply #{}, got {:?}",
                segment, seq, other
            )),
        }

        let post = text(table, row, "post_code").and_then(PostRef::from_code);
        let Some(post) = post.filter(|p| self.post_emitted(*p)) else {
            self.issue(format!("{}: reply #{} points at an unknown post", segment, seq));
            self.replies.push((depth, PostRef::board(0)));
            return;
        };

        let parent = field(table, row, "parent_reply_code");
        if depth == 0 {
            if !parent.is_some_and(SqlValue::is_null) {
                self.issue(format!("{}: root reply #{} has a parent", segment, seq));
            }
            if !self.hot.contains(post) {
                self.issue(format!(
                    "{}: root reply #{} targets non-hot post {}",
                    segment,
                    seq,
                    post.code()
                ));
            }
            *self.root_hits.entry(post).or_default() += 1;
        } else {
            let parent_seq = parent
                .and_then(SqlValue::as_str)
                .and_then(parse_code)
                .filter(|(kind, s)| *kind == CodeKind::Reply && *s < seq)
                .map(|(_, s)| s);
            match parent_seq.and_then(|s| self.replies.get(s as usize - 1).copied()) {
                Some((parent_depth, parent_post)) => {
                    if parent_depth + 1 != depth {
                        self.issue(format!(
                            "{}: reply #{} at depth {} has parent at depth {}",
                            segment, seq, depth, parent_depth
                        ));
                    }
                    if parent_post != post {
                        self.issue(format!(
                            "{}: reply #{} is on {} but its parent is on {}",
                            segment,
                            seq,
                            post.code(),
                            parent_post.code()
                        ));
                    }
                }
                None => self.issue(format!(
                    "{}: reply #{} has a missing or later parent {:?}",
                    segment, seq, parent
                )),
            }
        }
        self.replies.push((depth, post));
    }

    fn check_like(&mut self, row: &Row) {
        let table = Table::Likes;
        self.check_member_ref(Segment::Likes, table, row);
        let target = text(table, row, "code").and_then(parse_code);
        let Some((kind, seq)) = target else {
            self.issue("likes: unparseable target code".to_string());
            return;
        };
        let limit = match kind {
            CodeKind::Board => self.boards,
            CodeKind::Review => self.reviews,
            CodeKind::Reply => self.replies.len() as u64,
        };
        if seq > limit {
            self.issue(format!("likes: target {}#{} was never emitted", kind, seq));
        }
        let member = int(table, row, "member_id").unwrap_or(0);
        if !self.likes.insert((kind, seq, member)) {
            self.issue(format!(
                "likes: duplicate pair ({}#{}, member {})",
                kind, seq, member
            ));
        }
    }

    /// Close the run and summarize it.
    pub fn finish(mut self) -> CheckReport {
        let mut segments = Vec::with_capacity(self.expected.len());
        for (segment, expected) in self.expected.clone() {
            let rows = self
                .counts
                .iter()
                .find(|(s, _)| *s == segment)
                .map(|(_, n)| *n);
            match rows {
                None => self.issue(format!("{}: segment was never emitted", segment)),
                Some(rows) if rows != expected => self.issue(format!(
                    "{}: {} rows emitted, {} planned",
                    segment, rows, expected
                )),
                Some(_) => {}
            }
            segments.push(SegmentCheck {
                segment,
                rows: rows.unwrap_or(0),
                expected,
            });
        }

        let root_replies: u64 = self.root_hits.values().sum();
        let posts = self.boards + self.reviews;
        let hot_counts: Vec<u64> = self
            .hot
            .iter()
            .map(|p| self.root_hits.get(&p).copied().unwrap_or(0))
            .collect();
        let hot_total: u64 = hot_counts.iter().sum();

        CheckReport {
            segments,
            hot_posts: self.hot.len(),
            replied_hot_posts: hot_counts.iter().filter(|n| **n > 0).count() as u64,
            min_hot_root_replies: hot_counts.iter().copied().min().unwrap_or(0),
            max_hot_root_replies: hot_counts.iter().copied().max().unwrap_or(0),
            non_hot_root_replies: root_replies - hot_total,
            average_root_replies: if posts == 0 {
                0.0
            } else {
                root_replies as f64 / posts as f64
            },
            issues: self.issues,
            total_issues: self.total_issues,
        }
    }
}

impl RowSink for InvariantSink {
    fn begin_segment(&mut self, segment: Segment) -> io::Result<()> {
        let last = self.counts.last().map(|(s, _)| *s);
        if last.is_some_and(|last| last >= segment) {
            self.issue(format!("{} opened after {:?}", segment, last));
        }
        self.current = Some(segment);
        self.counts.push((segment, 0));
        Ok(())
    }

    fn append_batch(&mut self, segment: Segment, rows: &[Row]) -> io::Result<()> {
        if self.current != Some(segment) {
            self.issue(format!("{}: batch arrived outside its segment", segment));
        }
        for row in rows {
            self.check_row(segment, row);
        }
        if let Some((_, n)) = self.counts.last_mut() {
            *n += rows.len() as u64;
        }
        Ok(())
    }

    fn end_segment(&mut self, segment: Segment) -> io::Result<()> {
        if self.current != Some(segment) {
            self.issue(format!("{}: closed without being open", segment));
        }
        self.current = None;
        Ok(())
    }
}

fn field<'r>(table: Table, row: &'r Row, column: &str) -> Option<&'r SqlValue> {
    table.column_index(column).and_then(|i| row.get(i))
}

fn int(table: Table, row: &Row, column: &str) -> Option<u64> {
    field(table, row, column)
        .and_then(SqlValue::as_int)
        .and_then(|v| u64::try_from(v).ok())
}

fn text<'r>(table: Table, row: &'r Row, column: &str) -> Option<&'r str> {
    field(table, row, column).and_then(SqlValue::as_str)
}
