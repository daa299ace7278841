//! Data models for the Local Library catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

use chrono::NaiveDate;

// Re-export commonly used types
pub use author::{Author, AuthorData, AuthorForm, AuthorView};
pub use book::{Book, BookData, BookForm, BookLink, BookListing, BookSummary, BookView};
pub use book_instance::{BookInstance, BookInstanceData, BookInstanceForm, InstanceStatus};
pub use genre::{Genre, GenreData, GenreForm};

/// Longest value accepted for names and titles
pub const MAX_NAME_LENGTH: usize = 100;

/// Medium date format used across the catalog pages, e.g. `Dec 16, 1775`
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

/// `yyyy-mm-dd` value for `<input type="date">` fields
pub fn iso_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
