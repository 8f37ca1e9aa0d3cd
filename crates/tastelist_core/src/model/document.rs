//! Persisted per-user document codec.
//!
//! # Responsibility
//! - Encode the full restaurant collection as one JSON document.
//! - Read documents written by every historical schema and migrate them to
//!   the current `Restaurant` shape.
//!
//! # Invariants
//! - Writers always emit `DOCUMENT_SCHEMA_VERSION` and never emit the
//!   deprecated `isFavorite` / `dateVisited` fields.
//! - Readers reject invalid persisted records instead of masking them.
//! - A document without `version` is treated as legacy version 1.
//! - Only legacy records have their text normalized. Current-version records
//!   load exactly as they were written.

use crate::model::restaurant::{
    normalize_notes, normalize_single_line, Rating, Restaurant, RestaurantId, MAX_RATING,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Schema version written by this binary.
pub const DOCUMENT_SCHEMA_VERSION: u32 = 2;
const LEGACY_SCHEMA_VERSION: u32 = 1;
/// Rating assigned to legacy records flagged as favorites.
const LEGACY_FAVORITE_RATING: u8 = 5;

/// Document codec errors.
#[derive(Debug)]
pub enum DocumentError {
    Json(serde_json::Error),
    UnsupportedVersion {
        document_version: u32,
        latest_supported: u32,
    },
    InvalidRecord {
        index: usize,
        reason: String,
    },
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed restaurant document: {err}"),
            Self::UnsupportedVersion {
                document_version,
                latest_supported,
            } => write!(
                f,
                "document version {document_version} is newer than supported {latest_supported}"
            ),
            Self::InvalidRecord { index, reason } => {
                write!(f, "invalid restaurant at index {index}: {reason}")
            }
        }
    }
}

impl Error for DocumentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Serialize)]
struct DocumentOut<'a> {
    version: u32,
    restaurants: &'a [Restaurant],
}

#[derive(Deserialize)]
struct DocumentIn {
    #[serde(default)]
    version: Option<u32>,
    #[serde(default)]
    restaurants: Vec<StoredRestaurant>,
}

/// Superset of every field any schema version has written.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRestaurant {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    cuisine: String,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    rating: Option<i64>,
    #[serde(default)]
    is_favorite: Option<bool>,
    #[serde(default)]
    created_at: Option<StoredTimestamp>,
    #[serde(default)]
    date_visited: Option<StoredTimestamp>,
}

/// Timestamps were written either as epoch millis or as a
/// `{ seconds, nanoseconds }` object.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTimestamp {
    Millis(i64),
    Parts {
        seconds: i64,
        #[serde(default)]
        nanoseconds: i64,
    },
}

impl StoredTimestamp {
    /// Returns `None` when the value does not fit in epoch millis.
    fn to_epoch_ms(&self) -> Option<i64> {
        match self {
            Self::Millis(value) => Some(*value),
            Self::Parts {
                seconds,
                nanoseconds,
            } => seconds
                .checked_mul(1000)?
                .checked_add(nanoseconds / 1_000_000),
        }
    }
}

/// Encodes a full collection as a document value.
pub fn encode_document(restaurants: &[Restaurant]) -> Result<Value, DocumentError> {
    Ok(serde_json::to_value(DocumentOut {
        version: DOCUMENT_SCHEMA_VERSION,
        restaurants,
    })?)
}

/// Encodes a full collection as document text.
pub fn encode_document_string(restaurants: &[Restaurant]) -> Result<String, DocumentError> {
    Ok(serde_json::to_string(&DocumentOut {
        version: DOCUMENT_SCHEMA_VERSION,
        restaurants,
    })?)
}

/// Decodes a document value written by any supported schema version.
pub fn decode_document(value: Value) -> Result<Vec<Restaurant>, DocumentError> {
    let document: DocumentIn = serde_json::from_value(value)?;
    migrate_document(document)
}

/// Decodes document text written by any supported schema version.
pub fn decode_document_str(text: &str) -> Result<Vec<Restaurant>, DocumentError> {
    let document: DocumentIn = serde_json::from_str(text)?;
    migrate_document(document)
}

fn migrate_document(document: DocumentIn) -> Result<Vec<Restaurant>, DocumentError> {
    let version = document.version.unwrap_or(LEGACY_SCHEMA_VERSION);
    if version > DOCUMENT_SCHEMA_VERSION {
        return Err(DocumentError::UnsupportedVersion {
            document_version: version,
            latest_supported: DOCUMENT_SCHEMA_VERSION,
        });
    }

    let legacy = version <= LEGACY_SCHEMA_VERSION;
    document
        .restaurants
        .into_iter()
        .enumerate()
        .map(|(index, stored)| {
            migrate_record(stored, legacy).map_err(|reason| DocumentError::InvalidRecord {
                index,
                reason,
            })
        })
        .collect()
}

fn migrate_record(stored: StoredRestaurant, legacy: bool) -> Result<Restaurant, String> {
    let rating = match (stored.rating, stored.is_favorite) {
        (Some(value), _) => Some(parse_rating(value)?),
        (None, Some(true)) => Some(parse_rating(i64::from(LEGACY_FAVORITE_RATING))?),
        (None, _) => None,
    };

    // Older documents only recorded a visit date; it is the best available
    // ordering key for "Recent".
    let created_at = match stored.created_at.as_ref().or(stored.date_visited.as_ref()) {
        Some(timestamp) => Some(
            timestamp
                .to_epoch_ms()
                .ok_or_else(|| "timestamp is out of range".to_string())?,
        ),
        None => None,
    };

    // Legacy writers stored raw form input.
    let (name, cuisine, notes) = if legacy {
        (
            normalize_single_line(&stored.name),
            normalize_single_line(&stored.cuisine),
            stored.notes.as_deref().and_then(normalize_notes),
        )
    } else {
        (stored.name, stored.cuisine, stored.notes)
    };

    let restaurant = Restaurant {
        id: RestaurantId::from(stored.id),
        name,
        cuisine,
        notes,
        rating,
        created_at,
    };
    restaurant.validate().map_err(|err| err.to_string())?;
    Ok(restaurant)
}

fn parse_rating(value: i64) -> Result<Rating, String> {
    u8::try_from(value)
        .ok()
        .and_then(|narrowed| Rating::new(narrowed).ok())
        .ok_or_else(|| format!("rating {value} is out of range 0..={MAX_RATING}"))
}

#[cfg(test)]
mod tests {
    use super::{decode_document, encode_document, DocumentError, DOCUMENT_SCHEMA_VERSION};
    use crate::model::restaurant::{Rating, Restaurant, RestaurantId};
    use serde_json::json;

    #[test]
    fn encode_omits_unset_optional_fields() {
        let restaurant = Restaurant::with_id(RestaurantId::from("r-1"), "Cafe A", "French");
        let value = encode_document(&[restaurant]).unwrap();

        assert_eq!(value["version"], DOCUMENT_SCHEMA_VERSION);
        let record = &value["restaurants"][0];
        assert_eq!(record["id"], "r-1");
        assert!(record.get("notes").is_none());
        assert!(record.get("rating").is_none());
        assert!(record.get("createdAt").is_none());
    }

    #[test]
    fn legacy_favorite_becomes_top_rating() {
        let restaurants = decode_document(json!({
            "restaurants": [
                { "id": "a", "name": "Fav", "cuisine": "Thai", "isFavorite": true },
                { "id": "b", "name": "Meh", "cuisine": "Thai", "isFavorite": false }
            ]
        }))
        .unwrap();

        assert_eq!(restaurants[0].rating, Some(Rating::new(5).unwrap()));
        assert_eq!(restaurants[1].rating, None);
    }

    #[test]
    fn explicit_rating_wins_over_legacy_favorite() {
        let restaurants = decode_document(json!({
            "version": 2,
            "restaurants": [
                { "id": "a", "name": "X", "cuisine": "Y", "rating": 2, "isFavorite": true }
            ]
        }))
        .unwrap();
        assert_eq!(restaurants[0].rating_value(), 2);
    }

    #[test]
    fn timestamp_objects_and_visit_dates_map_to_created_at() {
        let restaurants = decode_document(json!({
            "restaurants": [
                {
                    "id": "a", "name": "X", "cuisine": "Y",
                    "createdAt": { "seconds": 1_700_000_000, "nanoseconds": 250_000_000 }
                },
                { "id": "b", "name": "X", "cuisine": "Y", "dateVisited": 1_600_000_000_000_i64 }
            ]
        }))
        .unwrap();

        assert_eq!(restaurants[0].created_at, Some(1_700_000_000_250));
        assert_eq!(restaurants[1].created_at, Some(1_600_000_000_000));
    }

    #[test]
    fn oversized_timestamp_is_an_invalid_record() {
        let err = decode_document(json!({
            "restaurants": [{
                "id": "a", "name": "X", "cuisine": "Y",
                "createdAt": { "seconds": i64::MAX, "nanoseconds": 999_000_000 }
            }]
        }))
        .unwrap_err();
        assert!(matches!(err, DocumentError::InvalidRecord { index: 0, .. }));
        assert!(err.to_string().contains("timestamp is out of range"));
    }

    #[test]
    fn current_version_text_loads_verbatim() {
        let mut restaurant = Restaurant::with_id(RestaurantId::from("a"), "Cafe A", "French");
        restaurant.name = "  Cafe   A ".to_string();
        restaurant.cuisine = " French".to_string();
        restaurant.notes = Some("  patio ".to_string());
        restaurant.created_at = Some(42);
        let value = encode_document(std::slice::from_ref(&restaurant)).unwrap();

        assert_eq!(decode_document(value).unwrap(), vec![restaurant]);
    }

    #[test]
    fn legacy_text_is_normalized() {
        let restaurants = decode_document(json!({
            "restaurants": [
                { "id": "a", "name": "  Cafe   A ", "cuisine": "French", "notes": "  patio " },
                { "id": "b", "name": "B", "cuisine": "Thai", "notes": "   " }
            ]
        }))
        .unwrap();

        assert_eq!(restaurants[0].name, "Cafe A");
        assert_eq!(restaurants[0].notes.as_deref(), Some("patio"));
        assert_eq!(restaurants[1].notes, None);
    }

    #[test]
    fn missing_restaurants_key_decodes_to_empty() {
        assert!(decode_document(json!({})).unwrap().is_empty());
    }

    #[test]
    fn newer_version_is_rejected() {
        let err = decode_document(json!({ "version": 99, "restaurants": [] })).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::UnsupportedVersion {
                document_version: 99,
                ..
            }
        ));
    }

    #[test]
    fn invalid_records_are_rejected_with_index() {
        let err = decode_document(json!({
            "restaurants": [
                { "id": "a", "name": "ok", "cuisine": "ok" },
                { "id": "b", "name": "  ", "cuisine": "ok" }
            ]
        }))
        .unwrap_err();
        assert!(matches!(err, DocumentError::InvalidRecord { index: 1, .. }));

        let err = decode_document(json!({
            "restaurants": [{ "id": "a", "name": "x", "cuisine": "y", "rating": 9 }]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
