//! Restaurant domain model.
//!
//! # Responsibility
//! - Define the canonical restaurant record kept in a user's collection.
//! - Own field normalization and validation rules for that record.
//!
//! # Invariants
//! - `id` is stable and never reassigned to another restaurant.
//! - `name` and `cuisine` are non-empty once a record passes `validate()`.
//! - `rating` is always within `0..=5`; out-of-range values cannot be built.
//! - `created_at` is written once at creation and never changed by edits.
//!
//! # See also
//! - `model::document` for the persisted wire shape and legacy migration.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Highest rating a restaurant can carry.
pub const MAX_RATING: u8 = 5;

/// Opaque, client-generated restaurant identifier.
///
/// Stored as text so documents written by older clients keep their ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantId(String);

impl RestaurantId {
    /// Generates a fresh random id (UUID v4 text).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RestaurantId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RestaurantId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RestaurantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Star rating in `0..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: u8) -> Result<Self, RestaurantValidationError> {
        if value > MAX_RATING {
            return Err(RestaurantValidationError::RatingOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RestaurantValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// Validation failures for restaurant records and form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestaurantValidationError {
    EmptyId,
    EmptyName,
    EmptyCuisine,
    RatingOutOfRange(u8),
}

impl Display for RestaurantValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "restaurant id cannot be empty"),
            Self::EmptyName => write!(f, "restaurant name is required"),
            Self::EmptyCuisine => write!(f, "restaurant cuisine is required"),
            Self::RatingOutOfRange(value) => {
                write!(f, "rating {value} is out of range 0..={MAX_RATING}")
            }
        }
    }
}

impl Error for RestaurantValidationError {}

/// Canonical restaurant record.
///
/// Serialized with camelCase keys to match the persisted document shape.
/// Optional fields are omitted from the wire when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub cuisine: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    /// Unix epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl Restaurant {
    /// Creates a restaurant with a generated id and no optional fields.
    ///
    /// Name and cuisine are normalized but not validated; call `validate()`
    /// before handing the record to the collection.
    pub fn new(name: impl AsRef<str>, cuisine: impl AsRef<str>) -> Self {
        Self::with_id(RestaurantId::generate(), name, cuisine)
    }

    /// Creates a restaurant with a caller-provided id.
    ///
    /// Used by document readers and tests where identity already exists.
    pub fn with_id(id: RestaurantId, name: impl AsRef<str>, cuisine: impl AsRef<str>) -> Self {
        Self {
            id,
            name: normalize_single_line(name.as_ref()),
            cuisine: normalize_single_line(cuisine.as_ref()),
            notes: None,
            rating: None,
            created_at: None,
        }
    }

    /// Checks the required-field rules.
    pub fn validate(&self) -> Result<(), RestaurantValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(RestaurantValidationError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(RestaurantValidationError::EmptyName);
        }
        if self.cuisine.trim().is_empty() {
            return Err(RestaurantValidationError::EmptyCuisine);
        }
        Ok(())
    }

    /// Rating used for ordering; unrated counts as 0.
    pub fn rating_value(&self) -> u8 {
        self.rating.map_or(0, Rating::value)
    }

    /// Upper-cased first character of the name, used as the list avatar.
    pub fn avatar_initial(&self) -> Option<String> {
        self.name
            .chars()
            .next()
            .map(|first| first.to_uppercase().collect())
    }
}

/// Trims and collapses inner whitespace for one-line fields.
pub fn normalize_single_line(value: &str) -> String {
    WHITESPACE_RE.replace_all(value.trim(), " ").into_owned()
}

/// Trims multi-line notes and maps blank input to `None`.
pub fn normalize_notes(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_notes, normalize_single_line, Rating, Restaurant};

    #[test]
    fn single_line_fields_are_trimmed_and_collapsed() {
        assert_eq!(normalize_single_line("  Cafe \t  A \n"), "Cafe A");
    }

    #[test]
    fn blank_notes_become_none() {
        assert_eq!(normalize_notes("  \n "), None);
        assert_eq!(normalize_notes(" ok "), Some("ok".to_string()));
    }

    #[test]
    fn rating_rejects_values_above_five() {
        assert!(Rating::new(5).is_ok());
        assert!(Rating::new(6).is_err());
    }

    #[test]
    fn avatar_initial_uppercases_first_char() {
        let restaurant = Restaurant::new("épicerie", "French");
        assert_eq!(restaurant.avatar_initial().as_deref(), Some("É"));
    }
}
