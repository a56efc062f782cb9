//! Reply tiers. Linkage is computed up front by [`crate::tree`]; this module
//! only turns a tier's links into rows.

use super::{Generator, SegmentBatcher};
use crate::codes::round_robin;
use crate::error::{FixtureError, Result};
use crate::fake::{self, SYSTEM_ACTOR};
use crate::row::SqlValue;
use crate::sink::RowSink;
use crate::tree::{parent_index, TierLinks};

impl Generator {
    /// Emit one tier. `parent` is the tier directly above, absent for roots.
    pub(super) fn emit_reply_tier<S: RowSink>(
        &mut self,
        sink: &mut S,
        links: &TierLinks,
        parent: Option<&TierLinks>,
    ) -> Result<u64> {
        let tier = links.tier();
        let depth = tier.depth();
        let members = self.plan.members;
        if parent.is_some_and(|p| p.is_empty()) && !links.is_empty() {
            return Err(FixtureError::PrerequisiteMissing {
                tier: tier.label(),
                requires: "the parent reply tier",
            });
        }

        let mut batch = SegmentBatcher::open(sink, tier.segment(), self.batch_size)?;
        for (k, post) in links.posts().iter().enumerate() {
            let k = k as u64;
            let i = k + 1;
            let parent_code = match parent {
                Some(parent) => SqlValue::String(parent.code(parent_index(i, parent.len()))),
                None => SqlValue::Null,
            };
            let ts = self.clock.next_formatted();
            batch.push(vec![
                SqlValue::String(links.code(k)),
                SqlValue::from(round_robin(i, members)),
                SqlValue::String(post.code()),
                parent_code,
                SqlValue::String(fake::reply_body(depth, i)),
                SqlValue::Int(0),
                SqlValue::Bool(false),
                SqlValue::from(SYSTEM_ACTOR),
                SqlValue::from(SYSTEM_ACTOR),
                SqlValue::String(ts.clone()),
                SqlValue::String(ts),
                SqlValue::Int(0),
            ])?;
        }
        let emitted = batch.close()?;
        tracing::info!("{}: {} rows, reply codes {}..", tier.label(), emitted, links.first_seq());
        Ok(emitted)
    }
}
