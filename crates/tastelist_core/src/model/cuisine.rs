//! Built-in cuisine suggestions for the cuisine field.
//!
//! Suggestions are a convenience only; any non-empty text is a valid cuisine.

/// Cuisines offered by the add/edit form, in display order.
pub const COMMON_CUISINES: &[&str] = &[
    "American",
    "Bakery",
    "Barbecue",
    "Brazilian",
    "British",
    "Burgers",
    "Cafe",
    "Caribbean",
    "Chinese",
    "Ethiopian",
    "Filipino",
    "French",
    "Fusion",
    "German",
    "Greek",
    "Indian",
    "Indonesian",
    "Italian",
    "Japanese",
    "Korean",
    "Lebanese",
    "Malaysian",
    "Mediterranean",
    "Mexican",
    "Middle Eastern",
    "Moroccan",
    "Pakistani",
    "Peruvian",
    "Pizza",
    "Portuguese",
    "Ramen",
    "Seafood",
    "Spanish",
    "Steakhouse",
    "Sushi",
    "Thai",
    "Turkish",
    "Vegan",
    "Vegetarian",
    "Vietnamese",
];

/// Returns suggestions whose name contains `input`, case-insensitively.
///
/// Prefix matches come first; each group keeps list order. Blank input
/// returns the full list.
pub fn suggest_cuisines(input: &str, limit: usize) -> Vec<&'static str> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return COMMON_CUISINES.iter().copied().take(limit).collect();
    }

    let (prefix, infix): (Vec<&'static str>, Vec<&'static str>) = COMMON_CUISINES
        .iter()
        .copied()
        .filter(|cuisine| cuisine.to_lowercase().contains(&needle))
        .partition(|cuisine| cuisine.to_lowercase().starts_with(&needle));

    prefix.into_iter().chain(infix).take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::{suggest_cuisines, COMMON_CUISINES};

    #[test]
    fn blank_input_returns_list_head() {
        assert_eq!(suggest_cuisines("  ", 3), &COMMON_CUISINES[..3]);
    }

    #[test]
    fn prefix_matches_rank_before_infix_matches() {
        let hits = suggest_cuisines("it", 10);
        assert_eq!(hits, vec!["Italian", "British", "Mediterranean"]);
    }

    #[test]
    fn unknown_cuisine_has_no_suggestions() {
        assert!(suggest_cuisines("martian", 5).is_empty());
    }
}
