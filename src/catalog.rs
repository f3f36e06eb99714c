use crate::api::{DetailRecord, Lookup, PokeApi};
use crate::config::CatalogConfig;
use crate::error::ApiError;
use futures_util::future::try_join_all;

pub const NOT_FOUND_MESSAGE: &str = "Pokémon not found. Try again!";

const UNKNOWN_ID: &str = "Id?";
const UNKNOWN_TYPE: &str = "Type?";
const UNKNOWN_NAME: &str = "Unknown name";

/// A record ready for display, with placeholders in place of missing fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub category: String,
    pub image: String,
    pub name: String,
}

impl Card {
    pub fn from_record(record: &DetailRecord, placeholder_image: &str) -> Self {
        Self {
            id: record
                .id
                .map(|id| format!("#{id}"))
                .unwrap_or_else(|| UNKNOWN_ID.to_string()),
            category: record.primary_type().unwrap_or(UNKNOWN_TYPE).to_string(),
            image: record.image_url().unwrap_or(placeholder_image).to_string(),
            name: record.name.clone().unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        }
    }

    /// Card for a listing entry whose detail could not be resolved.
    pub fn placeholder(placeholder_image: &str) -> Self {
        Self::from_record(&DetailRecord::default(), placeholder_image)
    }
}

/// Cards for one listing page plus the total reported by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub total_items: u64,
    pub cards: Vec<Card>,
}

/// Fetch/render pipeline on top of [`PokeApi`].
#[derive(Debug, Clone)]
pub struct Catalog {
    api: PokeApi,
    placeholder_image: String,
}

impl Catalog {
    pub fn new(config: &CatalogConfig) -> Result<Self, ApiError> {
        Ok(Self {
            api: PokeApi::new(config)?,
            placeholder_image: config.placeholder_image.clone(),
        })
    }

    fn card_for(&self, lookup: &Lookup) -> Card {
        match lookup {
            Lookup::Found(record) => Card::from_record(record, &self.placeholder_image),
            Lookup::NotFound | Lookup::Skipped => Card::placeholder(&self.placeholder_image),
        }
    }

    /// Listing, then every detail concurrently. The first failed detail
    /// fails the whole page.
    pub async fn load_page(&self, items_per_page: u32, offset: u64) -> Result<ListingPage, ApiError> {
        let listing = self.api.fetch_listing(items_per_page, offset).await?;

        let lookups = try_join_all(
            listing
                .results
                .iter()
                .map(|entry| self.api.fetch_detail(&entry.name)),
        )
        .await?;

        let cards = lookups.iter().map(|lookup| self.card_for(lookup)).collect();
        Ok(ListingPage {
            total_items: listing.count,
            cards,
        })
    }

    /// Single lookup by name. `Ok(None)` means the entry does not exist.
    pub async fn search(&self, name: &str) -> Result<Option<Card>, ApiError> {
        match self.api.fetch_detail(name).await? {
            Lookup::Found(record) => Ok(Some(Card::from_record(&record, &self.placeholder_image))),
            Lookup::NotFound | Lookup::Skipped => Ok(None),
        }
    }
}

/// Normalise raw search input; `None` means "no filter".
pub fn normalize_query(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{NamedResource, Sprites, TypeSlot};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PLACEHOLDER: &str = "assets/imgs/Image-not-found.png";

    fn catalog_for(server: &MockServer) -> Catalog {
        let config = CatalogConfig {
            base_url: server.uri(),
            ..CatalogConfig::default()
        };
        Catalog::new(&config).unwrap()
    }

    fn detail_json(id: u64, name: &str, kind: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": name,
            "types": [{"slot": 1, "type": {"name": kind}}],
            "sprites": {"front_default": format!("https://img/{id}.png")}
        })
    }

    #[test]
    fn test_card_from_complete_record() {
        let record = DetailRecord {
            id: Some(4),
            name: Some("charmander".to_string()),
            types: vec![
                TypeSlot {
                    kind: Some(NamedResource {
                        name: Some("fire".to_string()),
                    }),
                },
                TypeSlot {
                    kind: Some(NamedResource {
                        name: Some("dragon".to_string()),
                    }),
                },
            ],
            sprites: Some(Sprites {
                front_default: Some("https://img/4.png".to_string()),
            }),
        };
        let card = Card::from_record(&record, PLACEHOLDER);
        assert_eq!(card.id, "#4");
        assert_eq!(card.category, "fire");
        assert_eq!(card.image, "https://img/4.png");
        assert_eq!(card.name, "charmander");
    }

    #[test]
    fn test_card_defaults_missing_fields() {
        let card = Card::placeholder(PLACEHOLDER);
        assert_eq!(card.id, UNKNOWN_ID);
        assert_eq!(card.category, UNKNOWN_TYPE);
        assert_eq!(card.image, PLACEHOLDER);
        assert_eq!(card.name, UNKNOWN_NAME);
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query(""), None);
        assert_eq!(normalize_query("   "), None);
        assert_eq!(normalize_query(" Pikachu "), Some("pikachu".to_string()));
    }

    #[tokio::test]
    async fn test_load_page_keeps_listing_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "count": 151,
                "results": [{"name": "bulbasaur"}, {"name": "missingno"}, {"name": "charmander"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/pokemon/bulbasaur"))
            .respond_with(ResponseTemplate::new(200).set_body_json(detail_json(1, "bulbasaur", "grass")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/pokemon/missingno"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/pokemon/charmander"))
            .respond_with(ResponseTemplate::new(200).set_body_json(detail_json(4, "charmander", "fire")))
            .mount(&server)
            .await;

        let page = catalog_for(&server).load_page(3, 0).await.unwrap();
        assert_eq!(page.total_items, 151);
        let names: Vec<_> = page.cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["bulbasaur", UNKNOWN_NAME, "charmander"]);
        assert_eq!(page.cards[2].category, "fire");
    }

    #[tokio::test]
    async fn test_load_page_fails_when_any_detail_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "count": 2,
                "results": [{"name": "bulbasaur"}, {"name": "ivysaur"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/pokemon/bulbasaur"))
            .respond_with(ResponseTemplate::new(200).set_body_json(detail_json(1, "bulbasaur", "grass")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/pokemon/ivysaur"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = catalog_for(&server).load_page(2, 0).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_search_hit_builds_card() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/pikachu"))
            .respond_with(ResponseTemplate::new(200).set_body_json(detail_json(25, "pikachu", "electric")))
            .expect(1)
            .mount(&server)
            .await;

        let query = normalize_query("Pikachu").unwrap();
        let card = catalog_for(&server).search(&query).await.unwrap();
        assert_eq!(
            card,
            Some(Card {
                id: "#25".to_string(),
                category: "electric".to_string(),
                image: "https://img/25.png".to_string(),
                name: "pikachu".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_search_miss_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/agumon"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert_eq!(catalog_for(&server).search("agumon").await.unwrap(), None);
    }
}
