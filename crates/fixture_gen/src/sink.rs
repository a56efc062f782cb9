//! Output segments and the sink interface rows are emitted through.
//!
//! The generator never touches files. It hands ordered row batches to a
//! [`RowSink`], one segment at a time, in the fixed segment order. Sinks must
//! preserve arrival order: loaders rely on sequential code ranges.

use crate::row::{Row, Table};
use std::fmt;
use std::io;

/// One output unit, emitted in [`Segment::ALL`] order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Members,
    Categories,
    Boards,
    BookReviews,
    RootReplies,
    Depth1Replies,
    Depth2Replies,
    Likes,
}

impl Segment {
    pub const ALL: [Segment; 8] = [
        Segment::Members,
        Segment::Categories,
        Segment::Boards,
        Segment::BookReviews,
        Segment::RootReplies,
        Segment::Depth1Replies,
        Segment::Depth2Replies,
        Segment::Likes,
    ];

    /// 1-based position in the ingestion order
    pub fn ordinal(&self) -> u8 {
        match self {
            Segment::Members => 1,
            Segment::Categories => 2,
            Segment::Boards => 3,
            Segment::BookReviews => 4,
            Segment::RootReplies => 5,
            Segment::Depth1Replies => 6,
            Segment::Depth2Replies => 7,
            Segment::Likes => 8,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Segment::Members => "members",
            Segment::Categories => "categories",
            Segment::Boards => "boards",
            Segment::BookReviews => "book_reviews",
            Segment::RootReplies => "root_replies",
            Segment::Depth1Replies => "depth1_replies",
            Segment::Depth2Replies => "depth2_replies",
            Segment::Likes => "likes",
        }
    }

    /// File stem, e.g. `05_root_replies`
    pub fn file_stem(&self) -> String {
        format!("{:02}_{}", self.ordinal(), self.name())
    }

    pub fn table(&self) -> Table {
        match self {
            Segment::Members => Table::Member,
            Segment::Categories => Table::Category,
            Segment::Boards => Table::Board,
            Segment::BookReviews => Table::BookReview,
            Segment::RootReplies | Segment::Depth1Replies | Segment::Depth2Replies => Table::Reply,
            Segment::Likes => Table::Likes,
        }
    }

    /// Whether loading this segment clears its table first.
    /// Deeper reply tiers share the `reply` table with the root tier.
    pub fn truncates(&self) -> bool {
        !matches!(self, Segment::Depth1Replies | Segment::Depth2Replies)
    }

    /// Human-readable label used in headers and logs
    pub fn label(&self) -> &'static str {
        match self {
            Segment::Members => "member",
            Segment::Categories => "category",
            Segment::Boards => "board",
            Segment::BookReviews => "book_review",
            Segment::RootReplies => "reply (root)",
            Segment::Depth1Replies => "reply (depth-1)",
            Segment::Depth2Replies => "reply (depth-2)",
            Segment::Likes => "likes",
        }
    }

    /// Reply depth for reply segments
    pub fn reply_depth(&self) -> Option<u8> {
        match self {
            Segment::RootReplies => Some(0),
            Segment::Depth1Replies => Some(1),
            Segment::Depth2Replies => Some(2),
            _ => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_stem())
    }
}

/// Receives generated rows.
///
/// Call order per run: for each segment in order, `begin_segment`, zero or
/// more `append_batch`, then `end_segment`. Every segment is opened, even
/// when it ends up empty.
pub trait RowSink {
    fn begin_segment(&mut self, segment: Segment) -> io::Result<()>;

    fn append_batch(&mut self, segment: Segment, rows: &[Row]) -> io::Result<()>;

    fn end_segment(&mut self, segment: Segment) -> io::Result<()>;
}

impl<S: RowSink + ?Sized> RowSink for &mut S {
    fn begin_segment(&mut self, segment: Segment) -> io::Result<()> {
        (**self).begin_segment(segment)
    }

    fn append_batch(&mut self, segment: Segment, rows: &[Row]) -> io::Result<()> {
        (**self).append_batch(segment, rows)
    }

    fn end_segment(&mut self, segment: Segment) -> io::Result<()> {
        (**self).end_segment(segment)
    }
}

/// Rows collected for one segment
#[derive(Debug, Clone)]
pub struct SegmentData {
    pub segment: Segment,
    pub rows: Vec<Row>,
    /// Sizes of the batches the rows arrived in
    pub batches: Vec<usize>,
}

/// Sink that keeps everything in memory. Meant for tests and small scales.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub segments: Vec<SegmentData>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segment(&self, segment: Segment) -> Option<&SegmentData> {
        self.segments.iter().find(|s| s.segment == segment)
    }

    pub fn rows(&self, segment: Segment) -> &[Row] {
        self.segment(segment)
            .map(|s| s.rows.as_slice())
            .unwrap_or(&[])
    }

    pub fn total_rows(&self) -> usize {
        self.segments.iter().map(|s| s.rows.len()).sum()
    }
}

impl RowSink for MemorySink {
    fn begin_segment(&mut self, segment: Segment) -> io::Result<()> {
        self.segments.push(SegmentData {
            segment,
            rows: Vec::new(),
            batches: Vec::new(),
        });
        Ok(())
    }

    fn append_batch(&mut self, segment: Segment, rows: &[Row]) -> io::Result<()> {
        match self.segments.last_mut() {
            Some(data) if data.segment == segment => {
                data.rows.extend_from_slice(rows);
                data.batches.push(rows.len());
                Ok(())
            }
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("batch for {} arrived outside its segment", segment),
            )),
        }
    }

    fn end_segment(&mut self, _segment: Segment) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::SqlValue;

    #[test]
    fn test_segment_order_and_stems() {
        let stems: Vec<String> = Segment::ALL.iter().map(|s| s.file_stem()).collect();
        assert_eq!(stems[0], "01_members");
        assert_eq!(stems[4], "05_root_replies");
        assert_eq!(stems[7], "08_likes");
        let mut sorted = stems.clone();
        sorted.sort();
        assert_eq!(stems, sorted);
    }

    #[test]
    fn test_only_deeper_reply_tiers_append() {
        let appending: Vec<Segment> = Segment::ALL
            .into_iter()
            .filter(|s| !s.truncates())
            .collect();
        assert_eq!(
            appending,
            vec![Segment::Depth1Replies, Segment::Depth2Replies]
        );
    }

    #[test]
    fn test_memory_sink_rejects_stray_batch() {
        let mut sink = MemorySink::new();
        sink.begin_segment(Segment::Members).unwrap();
        let row = vec![SqlValue::Int(1)];
        sink.append_batch(Segment::Members, &[row.clone()]).unwrap();
        assert!(sink.append_batch(Segment::Likes, &[row]).is_err());
        assert_eq!(sink.rows(Segment::Members).len(), 1);
        assert_eq!(sink.segment(Segment::Members).unwrap().batches, vec![1]);
    }
}
