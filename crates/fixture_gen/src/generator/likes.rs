use super::{Generator, SegmentBatcher};
use crate::error::Result;
use crate::likes::LikePair;
use crate::row::SqlValue;
use crate::sink::{RowSink, Segment};

impl Generator {
    /// Emit pre-selected likes in selection order.
    pub(super) fn emit_likes<S: RowSink>(
        &mut self,
        sink: &mut S,
        likes: &[LikePair],
    ) -> Result<u64> {
        let mut batch = SegmentBatcher::open(sink, Segment::Likes, self.batch_size)?;
        for like in likes {
            let ts = self.clock.next_formatted();
            batch.push(vec![
                SqlValue::String(like.code()),
                SqlValue::from(like.member),
                SqlValue::String(ts.clone()),
                SqlValue::String(ts),
                SqlValue::Int(0),
            ])?;
        }
        Ok(batch.close()?)
    }
}
