//! In-memory restaurant collection reducer.
//!
//! # Responsibility
//! - Own the canonical set of restaurants for the active session.
//! - Apply add/update/remove as pure transitions that return new values.
//!
//! # Invariants
//! - Ids are unique within a collection value.
//! - Operations never mutate the receiver; a returned value that shares the
//!   receiver's storage means "nothing changed" (`same_revision`).
//! - Insertion order is an implementation detail and never a display order.
//!
//! # Preconditions
//! - Entities handed to `add`/`update` have already passed
//!   `Restaurant::validate()`. The reducer does not re-validate.

use crate::model::restaurant::{Restaurant, RestaurantId};
use log::warn;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type CollectionResult<T> = Result<T, CollectionError>;

/// Defensive reducer faults. Neither occurs when ids come from
/// `RestaurantId::generate()` and edits come from the dialog controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    DuplicateId(RestaurantId),
    NotFound(RestaurantId),
}

impl Display for CollectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "restaurant id already exists: {id}"),
            Self::NotFound(id) => write!(f, "restaurant not found: {id}"),
        }
    }
}

impl Error for CollectionError {}

/// One reducer input, as produced by the dialog controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionCommand {
    Add(Restaurant),
    Update(Restaurant),
    Remove(RestaurantId),
}

impl CollectionCommand {
    /// Short operation name for diagnostics.
    pub fn op_name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Update(_) => "update",
            Self::Remove(_) => "remove",
        }
    }
}

/// Immutable collection value.
///
/// Cloning is cheap (shared storage), which also makes change detection an
/// identity comparison.
#[derive(Debug, Clone, Default)]
pub struct RestaurantCollection {
    items: Arc<Vec<Restaurant>>,
}

impl RestaurantCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the collection wholesale with loaded data.
    ///
    /// Duplicate ids in loaded data keep their first occurrence.
    pub fn initialize(loaded: Vec<Restaurant>) -> Self {
        let mut seen = HashSet::with_capacity(loaded.len());
        let mut items = Vec::with_capacity(loaded.len());
        for restaurant in loaded {
            if seen.insert(restaurant.id.clone()) {
                items.push(restaurant);
            } else {
                warn!(
                    "event=collection_initialize module=model status=warn reason=duplicate_id id={}",
                    restaurant.id
                );
            }
        }

        Self {
            items: Arc::new(items),
        }
    }

    /// Returns a collection with `restaurant` appended.
    ///
    /// # Errors
    /// - `DuplicateId` when the id is already present.
    pub fn add(&self, restaurant: Restaurant) -> CollectionResult<Self> {
        if self.contains(&restaurant.id) {
            return Err(CollectionError::DuplicateId(restaurant.id));
        }

        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.extend(self.items.iter().cloned());
        items.push(restaurant);
        Ok(Self {
            items: Arc::new(items),
        })
    }

    /// Returns a collection where the record with the same id is replaced
    /// wholesale (no field merge).
    ///
    /// # Errors
    /// - `NotFound` when no record has that id. Nothing is inserted.
    pub fn update(&self, restaurant: Restaurant) -> CollectionResult<Self> {
        let Some(index) = self.position(&restaurant.id) else {
            return Err(CollectionError::NotFound(restaurant.id));
        };

        let mut items = self.items.as_ref().clone();
        items[index] = restaurant;
        Ok(Self {
            items: Arc::new(items),
        })
    }

    /// Returns a collection without `id`. Removing an absent id returns a
    /// value with the same revision.
    pub fn remove(&self, id: &RestaurantId) -> Self {
        if !self.contains(id) {
            return self.clone();
        }

        let items = self
            .items
            .iter()
            .filter(|restaurant| &restaurant.id != id)
            .cloned()
            .collect();
        Self {
            items: Arc::new(items),
        }
    }

    /// Applies one reducer command.
    pub fn apply(&self, command: CollectionCommand) -> CollectionResult<Self> {
        match command {
            CollectionCommand::Add(restaurant) => self.add(restaurant),
            CollectionCommand::Update(restaurant) => self.update(restaurant),
            CollectionCommand::Remove(id) => Ok(self.remove(&id)),
        }
    }

    /// Whether both values share the same storage, i.e. no transition
    /// happened between them.
    pub fn same_revision(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    pub fn get(&self, id: &RestaurantId) -> Option<&Restaurant> {
        self.items.iter().find(|restaurant| &restaurant.id == id)
    }

    pub fn contains(&self, id: &RestaurantId) -> bool {
        self.position(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Restaurant> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[Restaurant] {
        self.items.as_slice()
    }

    pub fn to_vec(&self) -> Vec<Restaurant> {
        self.items.as_ref().clone()
    }

    fn position(&self, id: &RestaurantId) -> Option<usize> {
        self.items.iter().position(|restaurant| &restaurant.id == id)
    }
}
