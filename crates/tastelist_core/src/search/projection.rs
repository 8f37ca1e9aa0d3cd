//! Filtered and sorted projection of the restaurant collection.
//!
//! # Responsibility
//! - Derive the display sequence from (collection, query, sort mode).
//! - Skip recomputation when inputs are unchanged.
//! - Classify the list screen into empty / no-match / items states.
//!
//! # Invariants
//! - Projection never mutates the collection; sorting works on a copy.
//! - Identical inputs always produce identical output.
//! - Every sort mode is a total order (ties fall back to name, then id).

use crate::model::collection::RestaurantCollection;
use crate::model::restaurant::Restaurant;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Message shown when the user has no restaurants at all.
pub const EMPTY_COLLECTION_MESSAGE: &str =
    "There are no restaurants in your list. Start by clicking Add above.";
/// Message shown when the query filters everything out.
pub const NO_MATCHES_MESSAGE: &str = "No restaurants found";

/// Display ordering for the restaurant list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortMode {
    /// Newest `created_at` first; records without one sort last.
    #[default]
    Recent,
    Name,
    Cuisine,
    /// Highest rating first; unrated counts as 0.
    Rating,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [Self::Recent, Self::Name, Self::Cuisine, Self::Rating];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Name => "name",
            Self::Cuisine => "cuisine",
            Self::Rating => "rating",
        }
    }
}

impl Display for SortMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortMode(pub String);

impl Display for UnknownSortMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown sort mode `{}`; expected recent|name|cuisine|rating",
            self.0
        )
    }
}

impl Error for UnknownSortMode {}

impl FromStr for SortMode {
    type Err = UnknownSortMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "recent" => Ok(Self::Recent),
            "name" => Ok(Self::Name),
            "cuisine" => Ok(Self::Cuisine),
            "rating" => Ok(Self::Rating),
            other => Err(UnknownSortMode(other.to_string())),
        }
    }
}

/// Projects the collection through `query` and `sort`.
///
/// Filtering is a case-insensitive substring match against name, cuisine
/// or notes. An empty query keeps everything.
pub fn project(collection: &RestaurantCollection, query: &str, sort: SortMode) -> Vec<Restaurant> {
    let needle = query.to_lowercase();
    let mut items: Vec<Restaurant> = collection
        .iter()
        .filter(|restaurant| matches_query(restaurant, &needle))
        .cloned()
        .collect();
    items.sort_by(|a, b| compare(a, b, sort));
    items
}

/// Returns whether `restaurant` matches an already lower-cased query.
pub fn matches_query(restaurant: &Restaurant, lowered_query: &str) -> bool {
    if lowered_query.is_empty() {
        return true;
    }

    restaurant.name.to_lowercase().contains(lowered_query)
        || restaurant.cuisine.to_lowercase().contains(lowered_query)
        || restaurant
            .notes
            .as_deref()
            .is_some_and(|notes| notes.to_lowercase().contains(lowered_query))
}

/// Total order used by `project` for one sort mode.
pub fn compare(a: &Restaurant, b: &Restaurant, sort: SortMode) -> Ordering {
    let primary = match sort {
        // `None < Some(_)`, so reversing puts missing timestamps last.
        SortMode::Recent => b.created_at.cmp(&a.created_at),
        SortMode::Name => Ordering::Equal,
        SortMode::Cuisine => collate(&a.cuisine, &b.cuisine),
        SortMode::Rating => b.rating_value().cmp(&a.rating_value()),
    };

    primary
        .then_with(|| collate(&a.name, &b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Dictionary-style string ordering.
///
/// Compares base letters first (accents and case ignored), then accents,
/// then the raw text, so `Éclair` sorts between `Apple` and `Zen` and the
/// order stays total.
pub fn collate(a: &str, b: &str) -> Ordering {
    let left = CollationKey::new(a);
    let right = CollationKey::new(b);
    left.base
        .cmp(&right.base)
        .then_with(|| left.accented.cmp(&right.accented))
        .then_with(|| a.cmp(b))
}

struct CollationKey {
    /// Lower-cased letters with combining marks stripped.
    base: String,
    /// Lower-cased canonical decomposition (NFD).
    accented: String,
}

impl CollationKey {
    fn new(value: &str) -> Self {
        let accented = value.nfd().collect::<String>().to_lowercase();
        let base = accented
            .chars()
            .filter(|ch| !is_combining_mark(*ch))
            .collect();
        Self { base, accented }
    }
}

/// What the list screen should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    /// The collection itself is empty; search is disabled.
    Empty,
    /// The collection has items but none match the query.
    NoMatches,
    Items(Arc<[Restaurant]>),
}

impl ListView {
    pub fn from_projection(collection: &RestaurantCollection, items: Arc<[Restaurant]>) -> Self {
        if collection.is_empty() {
            Self::Empty
        } else if items.is_empty() {
            Self::NoMatches
        } else {
            Self::Items(items)
        }
    }

    /// Whether the search field should accept input.
    pub fn search_enabled(&self) -> bool {
        !matches!(self, Self::Empty)
    }

    /// Placeholder text for non-item states.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Empty => Some(EMPTY_COLLECTION_MESSAGE),
            Self::NoMatches => Some(NO_MATCHES_MESSAGE),
            Self::Items(_) => None,
        }
    }

    pub fn items(&self) -> &[Restaurant] {
        match self {
            Self::Items(items) => items,
            _ => &[],
        }
    }
}

/// One-entry memo over `project`.
///
/// Holds the last collection revision, query and sort mode, and returns
/// the previous output while they are unchanged.
#[derive(Debug, Default)]
pub struct ProjectionCache {
    last: Option<CachedProjection>,
}

#[derive(Debug)]
struct CachedProjection {
    collection: RestaurantCollection,
    query: String,
    sort: SortMode,
    items: Arc<[Restaurant]>,
}

impl ProjectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the projection, recomputing only when an input changed.
    pub fn project(
        &mut self,
        collection: &RestaurantCollection,
        query: &str,
        sort: SortMode,
    ) -> Arc<[Restaurant]> {
        if let Some(cached) = &self.last {
            if cached.collection.same_revision(collection)
                && cached.query == query
                && cached.sort == sort
            {
                return Arc::clone(&cached.items);
            }
        }

        let items: Arc<[Restaurant]> = project(collection, query, sort).into();
        self.last = Some(CachedProjection {
            collection: collection.clone(),
            query: query.to_string(),
            sort,
            items: Arc::clone(&items),
        });
        items
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}
