//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{format_date, iso_date, MAX_NAME_LENGTH};
use crate::validation::{self, FieldError};

/// Author record from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// Display name, `"family, first"`; empty unless both parts are set
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    pub fn url(&self) -> String {
        author_url(self.id)
    }

    pub fn date_of_birth_formatted(&self) -> String {
        format_date(self.date_of_birth)
    }

    pub fn date_of_death_formatted(&self) -> String {
        format_date(self.date_of_death)
    }

    pub fn lifespan(&self) -> String {
        format!(
            "{} - {}",
            self.date_of_birth_formatted(),
            self.date_of_death_formatted()
        )
    }
}

pub fn author_url(id: Uuid) -> String {
    format!("/catalog/author/{}", id)
}

/// Author as handed to templates, derived fields included
#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub name: String,
    pub url: String,
    pub date_of_birth: String,
    pub date_of_death: String,
    pub lifespan: String,
}

impl From<&Author> for AuthorView {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            name: author.name(),
            url: author.url(),
            date_of_birth: author.date_of_birth_formatted(),
            date_of_death: author.date_of_death_formatted(),
            lifespan: author.lifespan(),
        }
    }
}

/// Validated author fields, ready to insert or update
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorData {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

fn first_name_rules(value: &str) -> Result<(), ValidationError> {
    validation::check_alphanumeric(value, "First name has non-alphanumeric characters")?;
    validation::check_max_length(value, MAX_NAME_LENGTH, "First name is too long")
}

fn family_name_rules(value: &str) -> Result<(), ValidationError> {
    validation::check_alphanumeric(value, "Family name has non-alphanumeric characters")?;
    validation::check_max_length(value, MAX_NAME_LENGTH, "Family name is too long")
}

fn valid_date_of_birth(value: &str) -> Result<(), ValidationError> {
    validation::check_iso_date(value, "Invalid date of birth")
}

fn valid_date_of_death(value: &str) -> Result<(), ValidationError> {
    validation::check_iso_date(value, "Invalid date of death")
}

/// Author form submission, also used to pre-fill the update form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct AuthorForm {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "First name must be specified"),
        custom(function = "first_name_rules")
    )]
    pub first_name: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Family name must be specified"),
        custom(function = "family_name_rules")
    )]
    pub family_name: String,
    #[serde(default, deserialize_with = "validation::empty_as_none")]
    #[validate(custom(function = "valid_date_of_birth"))]
    pub date_of_birth: Option<String>,
    #[serde(default, deserialize_with = "validation::empty_as_none")]
    #[validate(custom(function = "valid_date_of_death"))]
    pub date_of_death: Option<String>,
}

const AUTHOR_FIELDS: &[&str] = &["first_name", "family_name", "date_of_birth", "date_of_death"];

impl AuthorForm {
    /// Trim, then validate. The returned form is the candidate echoed
    /// back on failure; the error list is empty when the input is acceptable.
    pub fn check(mut self) -> (Self, Vec<FieldError>) {
        validation::trim(&mut self.first_name);
        validation::trim(&mut self.family_name);

        let errors = match self.validate() {
            Ok(()) => Vec::new(),
            Err(e) => validation::collect_errors(&e, AUTHOR_FIELDS),
        };
        (self, errors)
    }

    /// Convert a form that passed `check`
    pub fn to_data(&self) -> AuthorData {
        AuthorData {
            first_name: self.first_name.clone(),
            family_name: self.family_name.clone(),
            date_of_birth: self.date_of_birth.as_deref().and_then(validation::parse_iso_date),
            date_of_death: self.date_of_death.as_deref().and_then(validation::parse_iso_date),
        }
    }
}

impl From<&Author> for AuthorForm {
    fn from(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: author.date_of_birth.map(|d| iso_date(Some(d))),
            date_of_death: author.date_of_death.map(|d| iso_date(Some(d))),
        }
    }
}
