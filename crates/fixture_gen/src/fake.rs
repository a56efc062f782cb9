//! Fake field content for fixture rows.
//!
//! Text fields are pure functions of the row's sequence number. The only
//! drawn values besides timestamps are post view counts, which come from
//! their own RNG so they never shift the timestamp sequence.

use rand::Rng;

/// Actor recorded in audit columns
pub const SYSTEM_ACTOR: &str = "SYSTEM_TEST";

const BOOK_TITLES: &[&str] = &[
    "The Great Gatsby",
    "1984",
    "To Kill a Mockingbird",
    "Pride and Prejudice",
    "The Catcher in the Rye",
    "Lord of the Flies",
    "Animal Farm",
    "Brave New World",
    "The Hobbit",
    "Fahrenheit 451",
];

const AUTHORS: &[&str] = &[
    "F. Scott Fitzgerald",
    "George Orwell",
    "Harper Lee",
    "Jane Austen",
    "J.D. Salinger",
    "William Golding",
    "J.R.R. Tolkien",
    "Ray Bradbury",
];

const PUBLISHERS: &[&str] = &[
    "Penguin Books",
    "Random House",
    "HarperCollins",
    "Simon & Schuster",
    "Macmillan",
];

const BOARD_BODY: &str = "This is a longer content to simulate real-world scenarios. \
Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";

const REVIEW_BODY: &str = "This is a detailed review of the book. \
The story is compelling and the characters are well-developed. \
I highly recommend this book to anyone who enjoys";

pub const BOARD_MAX_VIEWS: u32 = 1_000;
pub const REVIEW_MAX_VIEWS: u32 = 500;

/// Seeded source for the non-timestamp random fields
pub struct FakeData<R: Rng> {
    rng: R,
}

impl<R: Rng> FakeData<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// View count in `0..=max`
    pub fn views(&mut self, max: u32) -> u32 {
        self.rng.random_range(0..=max)
    }
}

pub fn member_password(id: u64) -> String {
    format!("$2a$10$dummyhashedpassword{}", id)
}

pub fn member_phone(id: u64) -> String {
    format!("010-{:04}-{:04}", id / 100, id % 10_000)
}

pub fn member_address(id: u64) -> String {
    format!("Test Address {}", id)
}

pub fn member_gender(id: u64) -> &'static str {
    if id % 2 == 0 {
        "M"
    } else {
        "F"
    }
}

pub fn board_title(i: u64) -> String {
    format!(
        "Performance Test Board Title {} - Lorem ipsum dolor sit amet",
        i
    )
}

pub fn board_body(i: u64) -> String {
    format!("Performance test content for board {}. {}", i, BOARD_BODY)
}

/// Every hundredth board is a notice
pub fn board_is_notice(i: u64) -> bool {
    i % 100 == 0
}

/// Book metadata for the `i`-th review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub title: &'static str,
    pub author: &'static str,
    pub publisher: &'static str,
    pub isbn: String,
    pub thumbnail_url: String,
    pub rating: u8,
}

pub fn book(i: u64) -> Book {
    Book {
        title: BOOK_TITLES[(i % BOOK_TITLES.len() as u64) as usize],
        author: AUTHORS[(i % AUTHORS.len() as u64) as usize],
        publisher: PUBLISHERS[(i % PUBLISHERS.len() as u64) as usize],
        isbn: format!("978-{:010}", i),
        thumbnail_url: format!("https://example.com/thumbnails/book{}.jpg", i),
        rating: (i % 5) as u8 + 1,
    }
}

pub fn review_title(i: u64, book_title: &str) -> String {
    format!("Book Review #{}: {}", i, book_title)
}

pub fn review_body(i: u64) -> String {
    let genre = if i % 2 == 0 {
        "classic literature."
    } else {
        "modern fiction."
    };
    format!("{} {}", REVIEW_BODY, genre)
}

/// Reply body for the `i`-th reply (1-based within its tier)
pub fn reply_body(depth: u8, i: u64) -> String {
    match depth {
        0 => {
            let tail = if i % 3 == 0 {
                "I totally agree."
            } else {
                "Interesting perspective."
            };
            format!(
                "Root reply #{}: This is a comment on the post. Great content! {}",
                i, tail
            )
        }
        1 => {
            let tail = if i % 2 == 0 {
                "I agree with your point!"
            } else {
                "That is an interesting take."
            };
            format!("Depth-1 reply #{}: {}", i, tail)
        }
        _ => {
            let tail = match i % 3 {
                0 => "Thanks for the clarification!",
                1 => "Good discussion here.",
                _ => "Makes sense!",
            };
            format!("Depth-{} reply #{}: {}", depth, i, tail)
        }
    }
}
