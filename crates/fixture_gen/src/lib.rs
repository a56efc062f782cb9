//! Deterministic fixture generator for the booktalk forum schema.
//!
//! Produces members, categories, boards, book reviews, a three-tier reply
//! tree concentrated on a hot-post set, and unique likes. Every foreign key
//! points at a row emitted earlier in the same run, and the same seed and
//! plan always yield the same rows.
//!
//! # Example
//!
//! ```rust
//! use fixture_gen::{Generator, MemorySink, Scale, Segment};
//!
//! let mut sink = MemorySink::new();
//! let summary = Generator::new(42, Scale::Small.plan())
//!     .generate(&mut sink)
//!     .unwrap();
//!
//! assert_eq!(summary.rows_in(Segment::Members), 10);
//! assert_eq!(sink.rows(Segment::Members).len(), 10);
//! ```

pub mod check;
pub mod clock;
pub mod codes;
pub mod error;
pub mod fake;
pub mod generator;
pub mod hot;
pub mod likes;
pub mod plan;
pub mod render;
pub mod row;
pub mod sink;
pub mod tree;

pub use check::{CheckReport, InvariantSink};
pub use codes::{CodeKind, PostRef};
pub use error::{FixtureError, Result};
pub use generator::{GenerationSummary, Generator, DEFAULT_BATCH_SIZE, DEFAULT_SEED};
pub use hot::HotSet;
pub use likes::CandidatePool;
pub use plan::{FixturePlan, LikePoolCaps, Scale};
pub use row::{Row, SqlValue, Table};
pub use sink::{MemorySink, RowSink, Segment};
