//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Own the process-wide active session between sign-in and sign-out.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported inside response envelopes, never as panics.
//! - Every mutation goes through the dialog controller, so the core
//!   validation rules apply to Dart input unchanged.

use log::{info, warn};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tastelist_core::model::cuisine::suggest_cuisines;
use tastelist_core::service::guide::guide_search_url;
use tastelist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CollectionCommand, DialogController, Rating, Restaurant, RestaurantId, RestaurantSession,
    SessionContext, SortMode, SqliteDocumentStore, UserId,
};

const CUISINE_SUGGESTION_LIMIT_MAX: u32 = 40;

static ACTIVE_SESSION: Mutex<Option<RestaurantSession>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One restaurant as rendered by the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantItem {
    pub id: String,
    pub name: String,
    pub cuisine: String,
    pub notes: Option<String>,
    /// 0..=5, absent when unrated.
    pub rating: Option<u8>,
    /// Unix epoch milliseconds.
    pub created_at: Option<i64>,
    /// Upper-cased first letter of the name for the avatar.
    pub avatar_initial: String,
}

/// List screen envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantListResponse {
    pub ok: bool,
    pub items: Vec<RestaurantItem>,
    /// Placeholder text for empty/no-match states, or an error message.
    pub message: String,
    /// `false` while the collection itself is empty.
    pub search_enabled: bool,
}

impl RestaurantListResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            message: message.into(),
            search_enabled: false,
        }
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected restaurant ID, when the action targets one.
    pub restaurant_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, restaurant_id: Option<String>) -> Self {
        Self {
            ok: true,
            restaurant_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            restaurant_id: None,
            message: message.into(),
        }
    }
}

/// Background save state for the status indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatusResponse {
    /// `idle|pending|saving|saved|failed|signed_out`.
    pub status: String,
    pub error: Option<String>,
}

/// Opens the session for `user_id` backed by the SQLite file at `db_path`.
///
/// Replaces any active session; the previous one drains its saves first.
///
/// # FFI contract
/// - Sync call; loads the whole document before returning.
/// - A load failure leaves no active session.
#[flutter_rust_bridge::frb(sync)]
pub fn session_open(user_id: String, db_path: String) -> ActionResponse {
    let user_id = match UserId::parse(&user_id) {
        Ok(user_id) => user_id,
        Err(err) => return ActionResponse::failure(format!("session_open failed: {err}")),
    };
    let db_path = PathBuf::from(db_path.trim());
    if db_path.as_os_str().is_empty() {
        return ActionResponse::failure("session_open failed: db_path cannot be empty");
    }

    let mut active = lock_session();
    if let Some(previous) = active.take() {
        previous.close();
    }

    let opened = SqliteDocumentStore::open(&db_path)
        .map_err(|err| err.to_string())
        .and_then(|store| {
            RestaurantSession::open(SessionContext::new(user_id, Arc::new(store)))
                .map_err(|err| err.to_string())
        });
    match opened {
        Ok(session) => {
            let count = session.collection().len();
            *active = Some(session);
            info!("event=session_open module=ffi status=ok count={count}");
            ActionResponse::success(format!("Loaded {count} restaurant(s)."), None)
        }
        Err(err) => {
            warn!("event=session_open module=ffi status=error");
            ActionResponse::failure(format!("session_open failed: {err}"))
        }
    }
}

/// Closes the active session (sign-out). No-op when none is open.
#[flutter_rust_bridge::frb(sync)]
pub fn session_close() -> ActionResponse {
    match lock_session().take() {
        Some(session) => {
            session.close();
            ActionResponse::success("Session closed.", None)
        }
        None => ActionResponse::success("No active session.", None),
    }
}

/// Returns the filtered and sorted list.
///
/// `sort` accepts `recent|name|cuisine|rating`; empty means `recent`.
#[flutter_rust_bridge::frb(sync)]
pub fn restaurants_list(query: String, sort: String) -> RestaurantListResponse {
    let sort = match sort.parse::<SortMode>() {
        Ok(sort) => sort,
        Err(err) => {
            return RestaurantListResponse::failure(format!("restaurants_list failed: {err}"))
        }
    };

    let mut active = lock_session();
    let Some(session) = active.as_mut() else {
        return RestaurantListResponse::failure("restaurants_list failed: no active session");
    };

    let view = session.list_view(&query, sort);
    RestaurantListResponse {
        ok: true,
        items: view.items().iter().map(to_item).collect(),
        message: view.message().unwrap_or_default().to_string(),
        search_enabled: view.search_enabled(),
    }
}

/// Adds a restaurant. Name and cuisine are required; notes may be empty.
#[flutter_rust_bridge::frb(sync)]
pub fn restaurant_add(
    name: String,
    cuisine: String,
    notes: Option<String>,
    rating: Option<u8>,
) -> ActionResponse {
    with_session("restaurant_add", |session| {
        let rating = to_rating(rating)?;
        let mut dialog = DialogController::new();
        dialog.open(None);
        dialog.set_name(name);
        dialog.set_cuisine(cuisine);
        dialog.set_notes(notes.unwrap_or_default());
        dialog.set_rating(rating);
        let command = dialog.save().map_err(|err| err.to_string())?;
        let id = command_target(&command);
        session.apply(command).map_err(|err| err.to_string())?;
        Ok(ActionResponse::success("Restaurant added.", Some(id)))
    })
}

/// Replaces the editable fields of an existing restaurant.
///
/// `id` and creation time are preserved.
#[flutter_rust_bridge::frb(sync)]
pub fn restaurant_update(
    id: String,
    name: String,
    cuisine: String,
    notes: Option<String>,
    rating: Option<u8>,
) -> ActionResponse {
    with_session("restaurant_update", |session| {
        let rating = to_rating(rating)?;
        let existing = find(session, &id)?;
        let mut dialog = DialogController::new();
        dialog.open(Some(&existing));
        dialog.set_name(name);
        dialog.set_cuisine(cuisine);
        dialog.set_notes(notes.unwrap_or_default());
        dialog.set_rating(rating);
        let command = dialog.save().map_err(|err| err.to_string())?;
        session.apply(command).map_err(|err| err.to_string())?;
        Ok(ActionResponse::success("Restaurant updated.", Some(id)))
    })
}

/// Removes a restaurant. Removing an unknown id succeeds without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn restaurant_remove(id: String) -> ActionResponse {
    with_session("restaurant_remove", |session| {
        let Ok(existing) = find(session, &id) else {
            return Ok(ActionResponse::success("Nothing to remove.", None));
        };
        let mut dialog = DialogController::new();
        dialog.open(Some(&existing));
        let command = dialog.delete().map_err(|err| err.to_string())?;
        session.apply(command).map_err(|err| err.to_string())?;
        Ok(ActionResponse::success("Restaurant removed.", Some(id)))
    })
}

/// Reports the background save state of the active session.
#[flutter_rust_bridge::frb(sync)]
pub fn sync_status() -> SyncStatusResponse {
    match lock_session().as_ref() {
        Some(session) => {
            let status = session.sync_status();
            SyncStatusResponse {
                status: status.as_str().to_string(),
                error: status.error().map(ToString::to_string),
            }
        }
        None => SyncStatusResponse {
            status: "signed_out".to_string(),
            error: None,
        },
    }
}

/// Cuisine suggestions for the dialog's autocomplete field.
///
/// `limit` is clamped to the size of the built-in list.
#[flutter_rust_bridge::frb(sync)]
pub fn cuisine_suggestions(input: String, limit: u32) -> Vec<String> {
    let limit = limit.min(CUISINE_SUGGESTION_LIMIT_MAX) as usize;
    suggest_cuisines(&input, limit)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Guide search link for one restaurant, in `message` on success.
#[flutter_rust_bridge::frb(sync)]
pub fn restaurant_guide_url(id: String) -> ActionResponse {
    with_session("restaurant_guide_url", |session| {
        let existing = find(session, &id)?;
        let url = guide_search_url(&existing).map_err(|err| err.to_string())?;
        Ok(ActionResponse::success(url.to_string(), Some(id)))
    })
}

fn lock_session() -> MutexGuard<'static, Option<RestaurantSession>> {
    ACTIVE_SESSION.lock().unwrap_or_else(PoisonError::into_inner)
}

fn with_session(
    op: &'static str,
    f: impl FnOnce(&mut RestaurantSession) -> Result<ActionResponse, String>,
) -> ActionResponse {
    let mut active = lock_session();
    let Some(session) = active.as_mut() else {
        return ActionResponse::failure(format!("{op} failed: no active session"));
    };
    f(session).unwrap_or_else(|err| ActionResponse::failure(format!("{op} failed: {err}")))
}

fn find(session: &RestaurantSession, id: &str) -> Result<Restaurant, String> {
    session
        .get(&RestaurantId::from(id))
        .cloned()
        .ok_or_else(|| format!("restaurant not found: {id}"))
}

fn to_rating(raw: Option<u8>) -> Result<Option<Rating>, String> {
    raw.map(Rating::new)
        .transpose()
        .map_err(|err| err.to_string())
}

fn command_target(command: &CollectionCommand) -> String {
    match command {
        CollectionCommand::Add(restaurant) | CollectionCommand::Update(restaurant) => {
            restaurant.id.to_string()
        }
        CollectionCommand::Remove(id) => id.to_string(),
    }
}

fn to_item(restaurant: &Restaurant) -> RestaurantItem {
    RestaurantItem {
        id: restaurant.id.to_string(),
        name: restaurant.name.clone(),
        cuisine: restaurant.cuisine.clone(),
        notes: restaurant.notes.clone(),
        rating: restaurant.rating.map(Rating::value),
        created_at: restaurant.created_at,
        avatar_initial: restaurant.avatar_initial().unwrap_or_default(),
    }
}
