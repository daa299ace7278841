//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::MAX_NAME_LENGTH;
use crate::validation::{self, FieldError};

/// Book record from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub summary: String,
    pub isbn: String,
}

impl Book {
    pub fn url(&self) -> String {
        book_url(self.id)
    }
}

pub fn book_url(id: Uuid) -> String {
    format!("/catalog/book/{}", id)
}

/// Title and summary, as listed on author/genre pages and in select boxes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BookSummary {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
}

impl BookSummary {
    pub fn url(&self) -> String {
        book_url(self.id)
    }
}

/// Book list row joined with its author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BookListing {
    pub id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub author_first_name: String,
    pub author_family_name: String,
}

impl BookListing {
    pub fn author_name(&self) -> String {
        if self.author_first_name.is_empty() || self.author_family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.author_family_name, self.author_first_name)
    }
}

/// Book reference handed to templates
#[derive(Debug, Clone, Serialize)]
pub struct BookLink {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub url: String,
    pub author_name: String,
}

impl From<&BookSummary> for BookLink {
    fn from(book: &BookSummary) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            summary: book.summary.clone(),
            url: book.url(),
            author_name: String::new(),
        }
    }
}

impl From<&BookListing> for BookLink {
    fn from(book: &BookListing) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            summary: String::new(),
            url: book_url(book.id),
            author_name: book.author_name(),
        }
    }
}

/// Full book record for the detail and delete pages
#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub url: String,
}

impl From<&Book> for BookView {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            url: book.url(),
        }
    }
}

/// Validated book fields, ready to insert or update
#[derive(Debug, Clone, PartialEq)]
pub struct BookData {
    pub title: String,
    pub author_id: Uuid,
    pub summary: String,
    pub isbn: String,
    pub genre_ids: Vec<Uuid>,
}

fn title_rules(value: &str) -> Result<(), ValidationError> {
    validation::check_max_length(value, MAX_NAME_LENGTH, "Title must not exceed 100 characters.")
}

fn valid_author_reference(value: &str) -> Result<(), ValidationError> {
    validation::check_reference(value, "Author must be selected from the list.")
}

fn valid_genre_references(values: &[String]) -> Result<(), ValidationError> {
    values
        .iter()
        .try_for_each(|v| validation::check_reference(v, "Genre must be selected from the list."))
}

/// Book form submission. `genre` repeats once per ticked checkbox.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct BookForm {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Title must not be empty."),
        custom(function = "title_rules")
    )]
    pub title: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Author must not be empty."),
        custom(function = "valid_author_reference")
    )]
    pub author: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Summary must not be empty."))]
    pub summary: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "ISBN must not be empty"))]
    pub isbn: String,
    #[serde(default)]
    #[validate(custom(function = "valid_genre_references"))]
    pub genre: Vec<String>,
}

const BOOK_FIELDS: &[&str] = &["title", "author", "summary", "isbn", "genre"];

impl BookForm {
    /// Trim, then validate. See `AuthorForm::check`.
    pub fn check(mut self) -> (Self, Vec<FieldError>) {
        validation::trim(&mut self.title);
        validation::trim(&mut self.author);
        validation::trim(&mut self.summary);
        validation::trim(&mut self.isbn);

        let errors = match self.validate() {
            Ok(()) => Vec::new(),
            Err(e) => validation::collect_errors(&e, BOOK_FIELDS),
        };
        (self, errors)
    }

    /// Convert a form that passed `check`; `None` if a reference does not parse
    pub fn to_data(&self) -> Option<BookData> {
        Some(BookData {
            title: self.title.clone(),
            author_id: validation::parse_reference(&self.author)?,
            summary: self.summary.clone(),
            isbn: self.isbn.clone(),
            genre_ids: self
                .genre
                .iter()
                .map(|g| validation::parse_reference(g))
                .collect::<Option<Vec<_>>>()?,
        })
    }

    /// Author id as selected in the form, if it parses
    pub fn selected_author(&self) -> Option<Uuid> {
        validation::parse_reference(&self.author)
    }

    /// Genre ids ticked in the form; unparseable entries are skipped
    pub fn selected_genres(&self) -> Vec<Uuid> {
        self.genre
            .iter()
            .filter_map(|g| validation::parse_reference(g))
            .collect()
    }

    pub fn from_book(book: &Book, genre_ids: &[Uuid]) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author_id.to_string(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: genre_ids.iter().map(Uuid::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(author: &str, genres: &[&str]) -> BookForm {
        BookForm {
            title: " Emma ".to_string(),
            author: author.to_string(),
            summary: "A novel about youthful hubris.".to_string(),
            isbn: "9780141439587".to_string(),
            genre: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn test_check_accepts_valid_input() {
        let author = Uuid::new_v4();
        let genre = Uuid::new_v4();
        let (checked, errors) = form(&author.to_string(), &[&genre.to_string()]).check();
        assert!(errors.is_empty());

        let data = checked.to_data().unwrap();
        assert_eq!(data.title, "Emma");
        assert_eq!(data.author_id, author);
        assert_eq!(data.genre_ids, vec![genre]);
        assert_eq!(data.summary, "A novel about youthful hubris.");
    }

    #[test]
    fn test_check_requires_fields() {
        let (_, errors) = BookForm::default().check();
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Title must not be empty.",
                "Author must not be empty.",
                "Summary must not be empty.",
                "ISBN must not be empty",
            ]
        );
    }

    #[test]
    fn test_check_rejects_unknown_references() {
        let (checked, errors) = form("someone", &["fiction"]).check();
        assert_eq!(
            errors,
            vec![
                FieldError::new("author", "Author must be selected from the list."),
                FieldError::new("genre", "Genre must be selected from the list."),
            ]
        );
        assert_eq!(checked.to_data(), None);
        assert_eq!(checked.selected_author(), None);
        assert!(checked.selected_genres().is_empty());
    }

    #[test]
    fn test_check_bounds_title_length() {
        let mut long = form(&Uuid::new_v4().to_string(), &[]);
        long.title = "x".repeat(MAX_NAME_LENGTH + 1);
        let (_, errors) = long.check();
        assert_eq!(
            errors,
            vec![FieldError::new("title", "Title must not exceed 100 characters.")]
        );
    }

    #[test]
    fn test_listing_author_name() {
        let listing = BookListing {
            id: Uuid::new_v4(),
            title: "Emma".to_string(),
            author_id: Uuid::new_v4(),
            author_first_name: "Jane".to_string(),
            author_family_name: "Austen".to_string(),
        };
        assert_eq!(BookLink::from(&listing).author_name, "Austen, Jane");
    }
}
