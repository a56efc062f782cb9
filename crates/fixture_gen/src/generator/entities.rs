//! Flat entities: members, categories, boards and book reviews.

use super::{Generator, SegmentBatcher};
use crate::codes::{code, member_email, member_name, round_robin, CodeKind};
use crate::error::Result;
use crate::fake::{self, BOARD_MAX_VIEWS, REVIEW_MAX_VIEWS, SYSTEM_ACTOR};
use crate::row::SqlValue;
use crate::sink::{RowSink, Segment};

impl Generator {
    pub(super) fn emit_members<S: RowSink>(&mut self, sink: &mut S) -> Result<u64> {
        let mut batch = SegmentBatcher::open(sink, Segment::Members, self.batch_size)?;
        for id in 1..=self.plan.members {
            let ts = self.clock.next_formatted();
            batch.push(vec![
                SqlValue::from(id),
                SqlValue::String(member_email(id)),
                SqlValue::String(member_name(id)),
                SqlValue::from("OWN"),
                SqlValue::String(fake::member_password(id)),
                SqlValue::String(fake::member_phone(id)),
                SqlValue::String(fake::member_address(id)),
                SqlValue::from(fake::member_gender(id)),
                SqlValue::from("COMMON"),
                SqlValue::Bool(false),
                SqlValue::String(ts.clone()),
                SqlValue::String(ts),
                SqlValue::Int(0),
            ])?;
        }
        Ok(batch.close()?)
    }

    /// Root categories take ids `1..=R`; children follow at `R + i` with
    /// parent `((i - 1) % R) + 1`.
    pub(super) fn emit_categories<S: RowSink>(&mut self, sink: &mut S) -> Result<u64> {
        let roots = self.plan.root_categories;
        let mut batch = SegmentBatcher::open(sink, Segment::Categories, self.batch_size)?;
        for i in 1..=roots {
            let ts = self.clock.next_formatted();
            batch.push(vec![
                SqlValue::from(i),
                SqlValue::String(format!("RootCategory{}", i)),
                SqlValue::Bool(true),
                SqlValue::Null,
                SqlValue::Bool(false),
                SqlValue::Int(0),
                SqlValue::String(ts.clone()),
                SqlValue::String(ts),
                SqlValue::Int(0),
            ])?;
        }
        for i in 1..=self.plan.child_categories {
            let ts = self.clock.next_formatted();
            batch.push(vec![
                SqlValue::from(roots + i),
                SqlValue::String(format!("ChildCategory{}", i)),
                SqlValue::Bool(true),
                SqlValue::from(round_robin(i, roots)),
                SqlValue::Bool(false),
                SqlValue::from(i),
                SqlValue::String(ts.clone()),
                SqlValue::String(ts),
                SqlValue::Int(0),
            ])?;
        }
        Ok(batch.close()?)
    }

    pub(super) fn emit_boards<S: RowSink>(&mut self, sink: &mut S) -> Result<u64> {
        let members = self.plan.members;
        let categories = self.plan.categories();
        let mut batch = SegmentBatcher::open(sink, Segment::Boards, self.batch_size)?;
        for i in 1..=self.plan.boards {
            let ts = self.clock.next_formatted();
            let views = self.fake.views(BOARD_MAX_VIEWS);
            batch.push(vec![
                SqlValue::String(code(CodeKind::Board, i)),
                SqlValue::from(round_robin(i, members)),
                SqlValue::from(round_robin(i, categories)),
                SqlValue::String(fake::board_title(i)),
                SqlValue::String(fake::board_body(i)),
                SqlValue::Int(views as i64),
                SqlValue::Int(0),
                SqlValue::Bool(false),
                SqlValue::Bool(fake::board_is_notice(i)),
                SqlValue::from(SYSTEM_ACTOR),
                SqlValue::from(SYSTEM_ACTOR),
                SqlValue::String(ts.clone()),
                SqlValue::String(ts),
                SqlValue::Int(0),
            ])?;
        }
        Ok(batch.close()?)
    }

    pub(super) fn emit_book_reviews<S: RowSink>(&mut self, sink: &mut S) -> Result<u64> {
        let members = self.plan.members;
        let categories = self.plan.categories();
        let mut batch = SegmentBatcher::open(sink, Segment::BookReviews, self.batch_size)?;
        for i in 1..=self.plan.reviews {
            let ts = self.clock.next_formatted();
            let views = self.fake.views(REVIEW_MAX_VIEWS);
            let book = fake::book(i);
            batch.push(vec![
                SqlValue::String(code(CodeKind::Review, i)),
                SqlValue::from(round_robin(i, members)),
                SqlValue::from(round_robin(i, categories)),
                SqlValue::String(fake::review_title(i, book.title)),
                SqlValue::String(fake::review_body(i)),
                SqlValue::from(book.title),
                SqlValue::from(book.author),
                SqlValue::from(book.publisher),
                SqlValue::String(book.isbn),
                SqlValue::String(book.thumbnail_url),
                SqlValue::Int(book.rating as i64),
                SqlValue::Int(views as i64),
                SqlValue::Int(0),
                SqlValue::Bool(false),
                SqlValue::Bool(false),
                SqlValue::from(SYSTEM_ACTOR),
                SqlValue::from(SYSTEM_ACTOR),
                SqlValue::String(ts.clone()),
                SqlValue::String(ts),
                SqlValue::Int(0),
            ])?;
        }
        Ok(batch.close()?)
    }
}
