use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tastelist_core::search::projection::SortMode;
use tastelist_core::Rating;

#[derive(Parser, Debug)]
#[command(name = "tastelist")]
#[command(about = "Keep a personal list of restaurants")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
    /// TOML config file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// User whose list to open (defaults to the anonymous local user)
    #[arg(long, short = 'u')]
    pub user: Option<String>,

    /// SQLite database file
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show restaurants, optionally filtered and sorted
    List {
        /// Case-insensitive text matched against name, cuisine and notes
        #[arg(long, short = 'q', default_value = "")]
        query: String,
        /// recent | name | cuisine | rating
        #[arg(long, short = 's', default_value = "recent")]
        sort: SortMode,
    },
    /// Add a restaurant
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        cuisine: String,
        #[arg(long)]
        notes: Option<String>,
        /// Rating from 0 to 5
        #[arg(long, value_parser = parse_rating)]
        rating: Option<Rating>,
    },
    /// Edit fields of an existing restaurant
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        cuisine: Option<String>,
        /// New notes; pass an empty string to clear them
        #[arg(long)]
        notes: Option<String>,
        /// Rating from 0 to 5
        #[arg(long, value_parser = parse_rating, conflicts_with = "clear_rating")]
        rating: Option<Rating>,
        /// Remove the rating
        #[arg(long)]
        clear_rating: bool,
    },
    /// Delete a restaurant
    Remove { id: String },
    /// Print the restaurant guide search link for a restaurant
    Guide { id: String },
    /// Suggest cuisines for a partial input
    Cuisines {
        #[arg(default_value = "")]
        input: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn parse_rating(value: &str) -> Result<Rating, String> {
    let raw: u8 = value
        .trim()
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    Rating::new(raw).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};
    use tastelist_core::search::projection::SortMode;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_parses_sort_mode() {
        let cli = Cli::try_parse_from(["tastelist", "list", "--sort", "Rating", "-q", "thai"]).unwrap();
        match cli.command {
            Command::List { query, sort } => {
                assert_eq!(query, "thai");
                assert_eq!(sort, SortMode::Rating);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let parsed = Cli::try_parse_from([
            "tastelist", "add", "--name", "Cafe A", "--cuisine", "French", "--rating", "6",
        ]);
        assert!(parsed.is_err());
    }
}
