//! Row values and the fixed table layouts they are emitted into.

use std::fmt;

/// SQL value representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Int(i64),
    String(String),
    Bool(bool),
}

impl SqlValue {
    /// Format as a MySQL literal
    pub fn to_mysql(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Int(n) => n.to_string(),
            SqlValue::String(s) => format!("'{}'", escape_mysql_string(s)),
            SqlValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SqlValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl From<u64> for SqlValue {
    fn from(n: u64) -> Self {
        SqlValue::Int(n as i64)
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::String(s)
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::String(s.to_string())
    }
}

pub fn escape_mysql_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// A row of generated data, in the column order of its [`Table`]
pub type Row = Vec<SqlValue>;

/// Destination tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Member,
    Category,
    Board,
    BookReview,
    Reply,
    Likes,
}

const MEMBER_COLUMNS: &[&str] = &[
    "member_id",
    "email",
    "name",
    "auth_type",
    "password",
    "phone_number",
    "address",
    "gender",
    "authority",
    "del_yn",
    "reg_time",
    "update_time",
    "version",
];

const CATEGORY_COLUMNS: &[&str] = &[
    "category_id",
    "value",
    "is_active",
    "p_category_id",
    "del_yn",
    "display_order",
    "reg_time",
    "update_time",
    "version",
];

const BOARD_COLUMNS: &[&str] = &[
    "code",
    "member_id",
    "category_id",
    "title",
    "content",
    "views",
    "like_cnt",
    "del_yn",
    "notification_yn",
    "created_by",
    "modified_by",
    "reg_time",
    "update_time",
    "version",
];

const BOOK_REVIEW_COLUMNS: &[&str] = &[
    "code",
    "member_id",
    "category_id",
    "title",
    "content",
    "book_title",
    "authors",
    "publisher",
    "isbn",
    "thumbnail_url",
    "rating",
    "views",
    "like_cnt",
    "del_yn",
    "notification_yn",
    "created_by",
    "modified_by",
    "reg_time",
    "update_time",
    "version",
];

const REPLY_COLUMNS: &[&str] = &[
    "reply_code",
    "member_id",
    "post_code",
    "parent_reply_code",
    "content",
    "like_cnt",
    "del_yn",
    "created_by",
    "modified_by",
    "reg_time",
    "update_time",
    "version",
];

const LIKES_COLUMNS: &[&str] = &["code", "member_id", "reg_time", "update_time", "version"];

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Member => "member",
            Table::Category => "category",
            Table::Board => "board",
            Table::BookReview => "book_review",
            Table::Reply => "reply",
            Table::Likes => "likes",
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Table::Member => MEMBER_COLUMNS,
            Table::Category => CATEGORY_COLUMNS,
            Table::Board => BOARD_COLUMNS,
            Table::BookReview => BOOK_REVIEW_COLUMNS,
            Table::Reply => REPLY_COLUMNS,
            Table::Likes => LIKES_COLUMNS,
        }
    }

    /// Position of a column, for readers that pick fields out of rows
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns().iter().position(|c| *c == column)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
