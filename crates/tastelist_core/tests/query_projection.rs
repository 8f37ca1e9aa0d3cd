use proptest::prelude::*;
use tastelist_core::search::projection::{ProjectionCache, NO_MATCHES_MESSAGE};
use tastelist_core::{project, ListView, Restaurant, RestaurantCollection, RestaurantId, SortMode};

fn sample() -> RestaurantCollection {
    let mut noodle = Restaurant::with_id(RestaurantId::from("3"), "noodle bar", "Japanese");
    noodle.notes = Some("Great BROTH".to_string());
    noodle.created_at = Some(30);
    let mut cafe = Restaurant::with_id(RestaurantId::from("1"), "Cafe A", "French");
    cafe.created_at = Some(10);
    let bistro = Restaurant::with_id(RestaurantId::from("2"), "Bistro B", "Italian");
    RestaurantCollection::initialize(vec![cafe, bistro, noodle])
}

fn ids(items: &[Restaurant]) -> Vec<&str> {
    items.iter().map(|item| item.id.as_str()).collect()
}

#[test]
fn query_matches_notes_case_insensitively() {
    let found = project(&sample(), "broth", SortMode::Recent);
    assert_eq!(ids(&found), vec!["3"]);
}

#[test]
fn query_matches_cuisine() {
    let found = project(&sample(), "ITAL", SortMode::Recent);
    assert_eq!(ids(&found), vec!["2"]);
}

#[test]
fn query_is_not_trimmed() {
    assert!(project(&sample(), " cafe", SortMode::Name).is_empty());
}

#[test]
fn recent_sort_puts_missing_timestamps_last() {
    let found = project(&sample(), "", SortMode::Recent);
    assert_eq!(ids(&found), vec!["3", "1", "2"]);
}

#[test]
fn name_sort_ignores_case() {
    let found = project(&sample(), "", SortMode::Name);
    assert_eq!(ids(&found), vec!["2", "1", "3"]);
}

#[test]
fn name_sort_keeps_accented_names_in_dictionary_order() {
    let collection = RestaurantCollection::initialize(vec![
        Restaurant::with_id(RestaurantId::from("z"), "Zen", "Japanese"),
        Restaurant::with_id(RestaurantId::from("e"), "Éclair", "French"),
        Restaurant::with_id(RestaurantId::from("a"), "Apple", "American"),
    ]);
    let found = project(&collection, "", SortMode::Name);
    assert_eq!(ids(&found), vec!["a", "e", "z"]);
}

#[test]
fn cuisine_sort_groups_accented_cuisines_with_their_letter() {
    let collection = RestaurantCollection::initialize(vec![
        Restaurant::with_id(RestaurantId::from("1"), "One", "Thai"),
        Restaurant::with_id(RestaurantId::from("2"), "Two", "Éthiopien"),
        Restaurant::with_id(RestaurantId::from("3"), "Three", "Chinese"),
    ]);
    let found = project(&collection, "", SortMode::Cuisine);
    assert_eq!(ids(&found), vec!["3", "2", "1"]);
}

#[test]
fn cuisine_sort_is_alphabetical() {
    let found = project(&sample(), "", SortMode::Cuisine);
    assert_eq!(ids(&found), vec!["1", "2", "3"]);
}

#[test]
fn list_view_distinguishes_empty_and_no_matches() {
    let empty = RestaurantCollection::new();
    let mut cache = ProjectionCache::new();
    let view = ListView::from_projection(&empty, cache.project(&empty, "", SortMode::Recent));
    assert_eq!(view, ListView::Empty);
    assert!(!view.search_enabled());

    let collection = sample();
    let view = ListView::from_projection(
        &collection,
        cache.project(&collection, "zzz", SortMode::Recent),
    );
    assert_eq!(view.message(), Some(NO_MATCHES_MESSAGE));
    assert!(view.search_enabled());
    assert!(view.items().is_empty());
}

fn restaurants_strategy() -> impl Strategy<Value = Vec<Restaurant>> {
    prop::collection::vec(("[A-Za-z]{1,8}", "[A-Za-z]{1,8}"), 0..16).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(index, (name, cuisine))| {
                Restaurant::with_id(RestaurantId::from(index.to_string()), name, cuisine)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn empty_query_returns_everything(restaurants in restaurants_strategy()) {
        let collection = RestaurantCollection::initialize(restaurants);
        for sort in SortMode::ALL {
            prop_assert_eq!(project(&collection, "", sort).len(), collection.len());
        }
    }

    #[test]
    fn matching_ignores_ascii_case(restaurants in restaurants_strategy(), query in "[A-Za-z]{0,3}") {
        let collection = RestaurantCollection::initialize(restaurants);
        let lower = project(&collection, &query.to_lowercase(), SortMode::Name);
        let upper = project(&collection, &query.to_uppercase(), SortMode::Name);
        prop_assert_eq!(lower, upper);
    }

    #[test]
    fn sorting_is_idempotent(restaurants in restaurants_strategy()) {
        let collection = RestaurantCollection::initialize(restaurants);
        for sort in SortMode::ALL {
            let once = project(&collection, "", sort);
            let twice = project(&RestaurantCollection::initialize(once.clone()), "", sort);
            prop_assert_eq!(once, twice);
        }
    }
}
