//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::MAX_NAME_LENGTH;
use crate::validation::{self, FieldError};

/// Genre record from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        genre_url(self.id)
    }
}

pub fn genre_url(id: Uuid) -> String {
    format!("/catalog/genre/{}", id)
}

/// Genre as handed to templates
#[derive(Debug, Clone, Serialize)]
pub struct GenreView {
    pub id: Uuid,
    pub name: String,
    pub url: String,
}

impl From<&Genre> for GenreView {
    fn from(genre: &Genre) -> Self {
        Self {
            id: genre.id,
            name: genre.name.clone(),
            url: genre.url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenreData {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct GenreForm {
    #[serde(default)]
    #[validate(length(min = 3, message = "Genre name must contain at least 3 characters"))]
    pub name: String,
}

impl GenreForm {
    /// Trim, then validate. See `AuthorForm::check`.
    pub fn check(mut self) -> (Self, Vec<FieldError>) {
        validation::trim(&mut self.name);

        let mut errors = match self.validate() {
            Ok(()) => Vec::new(),
            Err(e) => validation::collect_errors(&e, &["name"]),
        };
        if self.name.chars().count() > MAX_NAME_LENGTH {
            errors.push(FieldError::new("name", "Genre name must not exceed 100 characters"));
        }
        (self, errors)
    }

    pub fn to_data(&self) -> GenreData {
        GenreData {
            name: self.name.clone(),
        }
    }
}

impl From<&Genre> for GenreForm {
    fn from(genre: &Genre) -> Self {
        Self {
            name: genre.name.clone(),
        }
    }
}
