//! Terminal front end.
//!
//! # Responsibility
//! - Resolve config, open the signed-in user's session and run one command.
//! - Route every mutation through the dialog controller, like the UI does.
//!
//! # Invariants
//! - Pending saves are drained before the process exits.
//! - A failed save is reported and turns into a non-zero exit code.

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;
use tastelist_core::logging::init_logging_with;
use tastelist_core::model::cuisine::suggest_cuisines;
use tastelist_core::service::auth::LocalAuthProvider;
use tastelist_core::service::guide::guide_search_url;
use tastelist_core::{
    AppConfig, DialogController, ListView, Restaurant, RestaurantId, RestaurantSession,
    SessionContext, SqliteDocumentStore, SyncStatus,
};

type CliResult<T> = Result<T, Box<dyn Error>>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(user) = cli.user {
        config.session.user_id = Some(user);
    }
    if let Some(db) = cli.db {
        config.store.db_path = Some(db);
    }
    if let Some(settings) = config.log_settings()? {
        init_logging_with(settings)?;
    }

    // Suggestions need no session.
    if let Command::Cuisines { input, limit } = &cli.command {
        for cuisine in suggest_cuisines(input, *limit) {
            println!("{cuisine}");
        }
        return Ok(());
    }

    let store = Arc::new(SqliteDocumentStore::open(config.db_path())?);
    let auth = LocalAuthProvider::signed_in(config.user_id()?);
    let mut session = RestaurantSession::open(SessionContext::from_auth(&auth, store)?)?;

    let outcome = execute(&mut session, cli.command);
    session.flush();
    let status = session.sync_status();
    session.close();

    outcome?;
    if let SyncStatus::Failed(err) = status {
        return Err(err.into());
    }
    Ok(())
}

fn execute(session: &mut RestaurantSession, command: Command) -> CliResult<()> {
    let mut dialog = DialogController::new();
    match command {
        Command::List { query, sort } => print_list(&session.list_view(&query, sort)),
        Command::Add {
            name,
            cuisine,
            notes,
            rating,
        } => {
            dialog.open(None);
            dialog.set_name(name);
            dialog.set_cuisine(cuisine);
            dialog.set_notes(notes.unwrap_or_default());
            dialog.set_rating(rating);
            let command = dialog.save()?;
            session.apply(command)?;
            println!("added");
        }
        Command::Edit {
            id,
            name,
            cuisine,
            notes,
            rating,
            clear_rating,
        } => {
            let existing = find(session, &id)?;
            dialog.open(Some(&existing));
            if let Some(name) = name {
                dialog.set_name(name);
            }
            if let Some(cuisine) = cuisine {
                dialog.set_cuisine(cuisine);
            }
            if let Some(notes) = notes {
                dialog.set_notes(notes);
            }
            if rating.is_some() || clear_rating {
                dialog.set_rating(rating);
            }
            let command = dialog.save()?;
            session.apply(command)?;
            println!("updated {id}");
        }
        Command::Remove { id } => {
            let existing = find(session, &id)?;
            dialog.open(Some(&existing));
            let command = dialog.delete()?;
            session.apply(command)?;
            println!("removed {id}");
        }
        Command::Guide { id } => {
            let existing = find(session, &id)?;
            println!("{}", guide_search_url(&existing)?);
        }
        Command::Cuisines { .. } => {}
    }
    Ok(())
}

fn find(session: &RestaurantSession, id: &str) -> CliResult<Restaurant> {
    session
        .get(&RestaurantId::from(id))
        .cloned()
        .ok_or_else(|| format!("restaurant not found: {id}").into())
}

fn print_list(view: &ListView) {
    if let Some(message) = view.message() {
        println!("{message}");
        return;
    }
    for restaurant in view.items() {
        println!("{}", format_row(restaurant));
    }
}

fn format_row(restaurant: &Restaurant) -> String {
    let rating = restaurant
        .rating
        .map_or_else(|| "-".to_string(), |rating| format!("{}/5", rating.value()));
    let mut row = format!(
        "{}  {}  [{}]  {}",
        restaurant.id, restaurant.name, restaurant.cuisine, rating
    );
    if let Some(notes) = &restaurant.notes {
        row.push_str("  ");
        row.push_str(&notes.replace('\n', " "));
    }
    row
}

#[cfg(test)]
mod tests {
    use super::format_row;
    use tastelist_core::{Rating, Restaurant, RestaurantId};

    #[test]
    fn row_shows_rating_and_flattened_notes() {
        let mut restaurant = Restaurant::with_id(RestaurantId::from("1"), "Cafe A", "French");
        restaurant.rating = Some(Rating::new(4).unwrap());
        restaurant.notes = Some("tart\nwindow".to_string());
        assert_eq!(format_row(&restaurant), "1  Cafe A  [French]  4/5  tart window");
    }

    #[test]
    fn unrated_row_uses_placeholder() {
        let restaurant = Restaurant::with_id(RestaurantId::from("2"), "Bistro B", "Italian");
        assert_eq!(format_row(&restaurant), "2  Bistro B  [Italian]  -");
    }
}
