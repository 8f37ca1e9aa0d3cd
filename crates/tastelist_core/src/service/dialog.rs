//! Add/edit dialog controller.
//!
//! # Responsibility
//! - Hold the add/edit form state as an explicit state machine.
//! - Gate submission on required fields and build reducer commands.
//!
//! # Invariants
//! - A dialog is either closed or open in exactly one mode.
//! - Invalid input never leaves the controller; it stays open instead.
//! - Editing keeps the original `id` and `created_at`.
//! - Every successful save/delete and every cancel ends in `Closed`.

use crate::model::collection::CollectionCommand;
use crate::model::restaurant::{
    normalize_notes, normalize_single_line, Rating, Restaurant, RestaurantId,
    RestaurantValidationError,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

const ADD_TITLE: &str = "Add new restaurant";

/// Editable fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestaurantForm {
    pub name: String,
    pub cuisine: String,
    pub notes: String,
    pub rating: Option<Rating>,
}

impl RestaurantForm {
    fn from_restaurant(restaurant: &Restaurant) -> Self {
        Self {
            name: restaurant.name.clone(),
            cuisine: restaurant.cuisine.clone(),
            notes: restaurant.notes.clone().unwrap_or_default(),
            rating: restaurant.rating,
        }
    }

    /// Checks the required fields.
    pub fn validate(&self) -> Result<(), RestaurantValidationError> {
        if self.name.trim().is_empty() {
            return Err(RestaurantValidationError::EmptyName);
        }
        if self.cuisine.trim().is_empty() {
            return Err(RestaurantValidationError::EmptyCuisine);
        }
        Ok(())
    }

    fn apply_to(&self, restaurant: &mut Restaurant) {
        restaurant.name = normalize_single_line(&self.name);
        restaurant.cuisine = normalize_single_line(&self.cuisine);
        restaurant.notes = normalize_notes(&self.notes);
        restaurant.rating = self.rating;
    }
}

/// Which record the open dialog works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogMode {
    Adding,
    /// Holds the record as it was when the dialog opened.
    Editing(Restaurant),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DialogState {
    #[default]
    Closed,
    Open {
        mode: DialogMode,
        form: RestaurantForm,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogError {
    /// The action needs an open dialog.
    NotOpen,
    /// Delete is only offered while editing.
    DeleteUnavailable,
    /// Required input is missing; the dialog stays open.
    Validation(RestaurantValidationError),
}

impl Display for DialogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotOpen => write!(f, "dialog is not open"),
            Self::DeleteUnavailable => write!(f, "delete is only available when editing"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DialogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RestaurantValidationError> for DialogError {
    fn from(value: RestaurantValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Stateful add/edit form.
#[derive(Debug, Default)]
pub struct DialogController {
    state: DialogState,
}

impl DialogController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, DialogState::Open { .. })
    }

    /// Opens in edit mode for `selected`, or in add mode with an empty form.
    ///
    /// Opening while already open discards the previous form.
    pub fn open(&mut self, selected: Option<&Restaurant>) {
        self.state = match selected {
            Some(restaurant) => DialogState::Open {
                mode: DialogMode::Editing(restaurant.clone()),
                form: RestaurantForm::from_restaurant(restaurant),
            },
            None => DialogState::Open {
                mode: DialogMode::Adding,
                form: RestaurantForm::default(),
            },
        };
    }

    pub fn form(&self) -> Option<&RestaurantForm> {
        match &self.state {
            DialogState::Open { form, .. } => Some(form),
            DialogState::Closed => None,
        }
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        if let Some(form) = self.form_mut() {
            form.name = value.into();
        }
    }

    pub fn set_cuisine(&mut self, value: impl Into<String>) {
        if let Some(form) = self.form_mut() {
            form.cuisine = value.into();
        }
    }

    pub fn set_notes(&mut self, value: impl Into<String>) {
        if let Some(form) = self.form_mut() {
            form.notes = value.into();
        }
    }

    pub fn set_rating(&mut self, value: Option<Rating>) {
        if let Some(form) = self.form_mut() {
            form.rating = value;
        }
    }

    /// Whether the save action is enabled for the current input.
    pub fn can_save(&self) -> bool {
        self.form().is_some_and(|form| form.validate().is_ok())
    }

    /// Dialog heading: the add prompt, or the name being edited.
    pub fn title(&self) -> Option<&str> {
        match &self.state {
            DialogState::Open {
                mode: DialogMode::Adding,
                ..
            } => Some(ADD_TITLE),
            DialogState::Open {
                mode: DialogMode::Editing(original),
                ..
            } => Some(original.name.as_str()),
            DialogState::Closed => None,
        }
    }

    /// Label for the save action.
    pub fn save_label(&self) -> Option<&'static str> {
        match &self.state {
            DialogState::Open {
                mode: DialogMode::Adding,
                ..
            } => Some("Add"),
            DialogState::Open {
                mode: DialogMode::Editing(_),
                ..
            } => Some("Save"),
            DialogState::Closed => None,
        }
    }

    /// Submits with the current wall-clock time as creation timestamp.
    pub fn save(&mut self) -> Result<CollectionCommand, DialogError> {
        self.save_at(now_epoch_ms())
    }

    /// Submits the form and closes the dialog.
    ///
    /// Adding yields `Add` with a fresh id and `created_at = now_ms`;
    /// editing yields `Update` with the original id and timestamp.
    pub fn save_at(&mut self, now_ms: i64) -> Result<CollectionCommand, DialogError> {
        let DialogState::Open { mode, form } = &self.state else {
            return Err(DialogError::NotOpen);
        };
        form.validate()?;

        let command = match mode {
            DialogMode::Adding => {
                let mut restaurant = Restaurant::with_id(RestaurantId::generate(), "", "");
                form.apply_to(&mut restaurant);
                restaurant.created_at = Some(now_ms);
                CollectionCommand::Add(restaurant)
            }
            DialogMode::Editing(original) => {
                let mut restaurant = original.clone();
                form.apply_to(&mut restaurant);
                CollectionCommand::Update(restaurant)
            }
        };

        self.state = DialogState::Closed;
        Ok(command)
    }

    /// Deletes the record being edited and closes the dialog.
    pub fn delete(&mut self) -> Result<CollectionCommand, DialogError> {
        match &self.state {
            DialogState::Closed => Err(DialogError::NotOpen),
            DialogState::Open {
                mode: DialogMode::Adding,
                ..
            } => Err(DialogError::DeleteUnavailable),
            DialogState::Open {
                mode: DialogMode::Editing(original),
                ..
            } => {
                let command = CollectionCommand::Remove(original.id.clone());
                self.state = DialogState::Closed;
                Ok(command)
            }
        }
    }

    /// Closes without side effects.
    pub fn cancel(&mut self) {
        self.state = DialogState::Closed;
    }

    fn form_mut(&mut self) -> Option<&mut RestaurantForm> {
        match &mut self.state {
            DialogState::Open { form, .. } => Some(form),
            DialogState::Closed => None,
        }
    }
}

/// Current Unix time in milliseconds; clocks before the epoch read as 0.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
