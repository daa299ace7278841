//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{book::book_url, format_date, iso_date};
use crate::validation::{self, FieldError};

/// Availability of a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceStatus {
    Available,
    Maintenance,
    Loaned,
    Reserved,
}

impl InstanceStatus {
    pub const ALL: [InstanceStatus; 4] = [
        InstanceStatus::Maintenance,
        InstanceStatus::Available,
        InstanceStatus::Loaned,
        InstanceStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Available => "Available",
            InstanceStatus::Maintenance => "Maintenance",
            InstanceStatus::Loaned => "Loaned",
            InstanceStatus::Reserved => "Reserved",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// Bootstrap text class used when listing copies
    pub fn css_class(&self) -> &'static str {
        match self {
            InstanceStatus::Available => "text-success",
            InstanceStatus::Maintenance => "text-danger",
            InstanceStatus::Loaned | InstanceStatus::Reserved => "text-warning",
        }
    }
}

impl Default for InstanceStatus {
    fn default() -> Self {
        InstanceStatus::Maintenance
    }
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Book instance record from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: Uuid,
    pub imprint: String,
    pub status: String,
    pub due_back: Option<NaiveDate>,
    // Populated when queried with a JOIN on books, None otherwise
    #[sqlx(default)]
    #[serde(default)]
    pub book_title: Option<String>,
}

impl BookInstance {
    pub fn url(&self) -> String {
        book_instance_url(self.id)
    }

    pub fn status(&self) -> InstanceStatus {
        InstanceStatus::parse(&self.status).unwrap_or_default()
    }

    pub fn due_back_formatted(&self) -> String {
        format_date(self.due_back)
    }
}

pub fn book_instance_url(id: Uuid) -> String {
    format!("/catalog/bookinstance/{}", id)
}

/// Book instance as handed to templates
#[derive(Debug, Clone, Serialize)]
pub struct BookInstanceView {
    pub id: Uuid,
    pub url: String,
    pub book_id: Uuid,
    pub book_url: String,
    pub book_title: String,
    pub imprint: String,
    pub status: String,
    pub status_class: String,
    pub due_back: String,
}

impl From<&BookInstance> for BookInstanceView {
    fn from(instance: &BookInstance) -> Self {
        let status = instance.status();
        Self {
            id: instance.id,
            url: instance.url(),
            book_id: instance.book_id,
            book_url: book_url(instance.book_id),
            book_title: instance.book_title.clone().unwrap_or_default(),
            imprint: instance.imprint.clone(),
            status: status.to_string(),
            status_class: status.css_class().to_string(),
            due_back: instance.due_back_formatted(),
        }
    }
}

/// Validated book instance fields, ready to insert or update
#[derive(Debug, Clone, PartialEq)]
pub struct BookInstanceData {
    pub book_id: Uuid,
    pub imprint: String,
    pub status: InstanceStatus,
    pub due_back: Option<NaiveDate>,
}

fn valid_book_reference(value: &str) -> Result<(), ValidationError> {
    validation::check_reference(value, "Book must be selected from the list")
}

fn valid_status(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || InstanceStatus::parse(value).is_some() {
        return Ok(());
    }
    let mut err = ValidationError::new("status");
    err.message = Some("Invalid status".into());
    Err(err)
}

fn valid_due_back(value: &str) -> Result<(), ValidationError> {
    validation::check_iso_date(value, "Invalid date")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct BookInstanceForm {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Book must be specified"),
        custom(function = "valid_book_reference")
    )]
    pub book: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Imprint must be specified"))]
    pub imprint: String,
    #[serde(default)]
    #[validate(custom(function = "valid_status"))]
    pub status: String,
    #[serde(default, deserialize_with = "validation::empty_as_none")]
    #[validate(custom(function = "valid_due_back"))]
    pub due_back: Option<String>,
}

const BOOK_INSTANCE_FIELDS: &[&str] = &["book", "imprint", "status", "due_back"];

impl BookInstanceForm {
    /// Trim, then validate. See `AuthorForm::check`.
    pub fn check(mut self) -> (Self, Vec<FieldError>) {
        validation::trim(&mut self.book);
        validation::trim(&mut self.imprint);

        let errors = match self.validate() {
            Ok(()) => Vec::new(),
            Err(e) => validation::collect_errors(&e, BOOK_INSTANCE_FIELDS),
        };
        (self, errors)
    }

    /// Convert a form that passed `check`; `None` if the book reference does not parse
    pub fn to_data(&self) -> Option<BookInstanceData> {
        Some(BookInstanceData {
            book_id: validation::parse_reference(&self.book)?,
            imprint: self.imprint.clone(),
            status: InstanceStatus::parse(&self.status).unwrap_or_default(),
            due_back: self.due_back.as_deref().and_then(validation::parse_iso_date),
        })
    }

    pub fn selected_book(&self) -> Option<Uuid> {
        validation::parse_reference(&self.book)
    }
}

impl From<&BookInstance> for BookInstanceForm {
    fn from(instance: &BookInstance) -> Self {
        Self {
            book: instance.book_id.to_string(),
            imprint: instance.imprint.clone(),
            status: instance.status.clone(),
            due_back: instance.due_back.map(|d| iso_date(Some(d))),
        }
    }
}
