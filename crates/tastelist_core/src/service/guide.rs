//! External restaurant-guide lookup links.

use crate::model::restaurant::Restaurant;
use url::form_urlencoded::byte_serialize;
use url::Url;

const GUIDE_SEARCH_URL: &str = "https://guide.michelin.com/en/restaurants";

/// Builds the guide search URL for a restaurant (`q = "<name> <cuisine>"`).
///
/// Spaces are sent as `%20`; the guide does not read `+` as a space.
pub fn guide_search_url(restaurant: &Restaurant) -> Result<Url, url::ParseError> {
    let query = format!("{} {}", restaurant.name, restaurant.cuisine);
    // byte_serialize escapes a literal '+' as %2B, so every '+' left is a space.
    let encoded = byte_serialize(query.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    let mut url = Url::parse(GUIDE_SEARCH_URL)?;
    url.set_query(Some(&format!("q={encoded}")));
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::guide_search_url;
    use crate::model::restaurant::Restaurant;

    #[test]
    fn query_combines_name_and_cuisine() {
        let url = guide_search_url(&Restaurant::new("Chez Nous & Co", "French")).unwrap();
        assert_eq!(url.host_str(), Some("guide.michelin.com"));
        let (key, value) = url.query_pairs().next().unwrap();
        assert_eq!(key, "q");
        assert_eq!(value, "Chez Nous & Co French");
    }

    #[test]
    fn spaces_are_percent_encoded() {
        let url = guide_search_url(&Restaurant::new("Chez Nous & Co", "French")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://guide.michelin.com/en/restaurants?q=Chez%20Nous%20%26%20Co%20French"
        );

        let url = guide_search_url(&Restaurant::new("C+C", "Thai")).unwrap();
        assert_eq!(url.query(), Some("q=C%2BC%20Thai"));
        let (_, value) = url.query_pairs().next().unwrap();
        assert_eq!(value, "C+C Thai");
    }
}
