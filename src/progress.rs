//! Shared progress tracking utilities.
//!
//! [`ProgressSink`] wraps any [`RowSink`] and drives one progress bar per
//! segment, sized from the plan's expected row count.

use fixture_gen::{FixturePlan, Row, RowSink, Segment};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::time::Duration;

pub struct ProgressSink<S: RowSink> {
    inner: S,
    plan: FixturePlan,
    style: ProgressStyle,
    bar: Option<ProgressBar>,
}

impl<S: RowSink> ProgressSink<S> {
    pub fn new(inner: S, plan: FixturePlan) -> anyhow::Result<Self> {
        let style = ProgressStyle::with_template(
            "  {spinner:.green} {msg:<18} [{bar:30.cyan/blue}] {pos}/{len} rows ({percent}%)",
        )?
        .progress_chars("█▓▒░  ")
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

        Ok(Self {
            inner,
            plan,
            style,
            bar: None,
        })
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: RowSink> RowSink for ProgressSink<S> {
    fn begin_segment(&mut self, segment: Segment) -> io::Result<()> {
        let pb = ProgressBar::new(self.plan.rows_in(segment));
        pb.set_style(self.style.clone());
        pb.set_message(segment.file_stem());
        pb.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(pb);
        self.inner.begin_segment(segment)
    }

    fn append_batch(&mut self, segment: Segment, rows: &[Row]) -> io::Result<()> {
        self.inner.append_batch(segment, rows)?;
        if let Some(pb) = &self.bar {
            pb.inc(rows.len() as u64);
        }
        Ok(())
    }

    fn end_segment(&mut self, segment: Segment) -> io::Result<()> {
        let result = self.inner.end_segment(segment);
        if let Some(pb) = self.bar.take() {
            pb.finish();
        }
        result
    }
}
