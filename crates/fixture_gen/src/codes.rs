//! Entity code scheme.
//!
//! Posts and replies are keyed by string codes: a short type prefix followed by
//! a fixed-width, zero-padded sequence number (`BO_000000000042`). Members and
//! categories use plain integer ids, with a few derived string fields.

use std::fmt;

/// Number of digits in the numeric part of every code
pub const CODE_WIDTH: usize = 12;

/// Entity types that carry a string code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CodeKind {
    Board,
    Review,
    Reply,
}

impl CodeKind {
    pub const ALL: [CodeKind; 3] = [CodeKind::Board, CodeKind::Review, CodeKind::Reply];

    pub fn prefix(&self) -> &'static str {
        match self {
            CodeKind::Board => "BO_",
            CodeKind::Review => "BR_",
            CodeKind::Reply => "REP_",
        }
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeKind::Board => write!(f, "board"),
            CodeKind::Review => write!(f, "review"),
            CodeKind::Reply => write!(f, "reply"),
        }
    }
}

/// Build the code for the `seq`-th entity (1-based) of the given kind.
pub fn code(kind: CodeKind, seq: u64) -> String {
    format!("{}{:0width$}", kind.prefix(), seq, width = CODE_WIDTH)
}

/// Recover the kind and sequence number from a code.
///
/// Returns `None` for unknown prefixes, wrong widths, non-digits, or a zero
/// sequence number (sequences start at 1).
pub fn parse_code(s: &str) -> Option<(CodeKind, u64)> {
    let kind = CodeKind::ALL
        .into_iter()
        .find(|k| s.starts_with(k.prefix()))?;
    let digits = &s[kind.prefix().len()..];
    if digits.len() != CODE_WIDTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let seq: u64 = digits.parse().ok()?;
    if seq == 0 {
        return None;
    }
    Some((kind, seq))
}

/// The two post variants a reply can hang off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PostKind {
    Board,
    Review,
}

impl PostKind {
    pub fn code_kind(&self) -> CodeKind {
        match self {
            PostKind::Board => CodeKind::Board,
            PostKind::Review => CodeKind::Review,
        }
    }
}

/// Rank-compact reference to a post; the code is materialised on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostRef {
    pub kind: PostKind,
    pub rank: u64,
}

impl PostRef {
    pub fn board(rank: u64) -> Self {
        Self {
            kind: PostKind::Board,
            rank,
        }
    }

    pub fn review(rank: u64) -> Self {
        Self {
            kind: PostKind::Review,
            rank,
        }
    }

    pub fn code(&self) -> String {
        code(self.kind.code_kind(), self.rank)
    }

    /// Inverse of [`PostRef::code`]; reply codes are not posts.
    pub fn from_code(s: &str) -> Option<Self> {
        match parse_code(s)? {
            (CodeKind::Board, rank) => Some(Self::board(rank)),
            (CodeKind::Review, rank) => Some(Self::review(rank)),
            (CodeKind::Reply, _) => None,
        }
    }
}

pub fn member_email(id: u64) -> String {
    format!("testuser{}@booktalk.com", id)
}

pub fn member_name(id: u64) -> String {
    format!("TestUser{}", id)
}

/// Round-robin a 1-based sequence index onto a 1-based id space of `base` ids.
pub fn round_robin(i: u64, base: u64) -> u64 {
    ((i - 1) % base) + 1
}
