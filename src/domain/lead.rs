use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;

/// Placeholder stored for any field that could not be determined.
pub const NOT_FOUND: &str = "N/A";

const DEFAULT_QUANTITY: i64 = 20;

/// Best-effort values pulled from a single result page. Absence stays `None`
/// until the record is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    pub email: String,
    #[serde(rename = "site")]
    pub website: String,
    #[serde(rename = "nicho")]
    pub niche: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl LeadRecord {
    pub fn from_fields(fields: ExtractedFields, query: &SearchQuery) -> Self {
        LeadRecord {
            name: fields.name,
            phone: fields.phone.unwrap_or_else(|| NOT_FOUND.to_string()),
            email: fields.email.unwrap_or_else(|| NOT_FOUND.to_string()),
            website: fields.website.unwrap_or_else(|| NOT_FOUND.to_string()),
            niche: query.niche.clone(),
            city: query.city.clone(),
            user_id: query.user_id.clone(),
        }
    }

    pub fn has_phone(&self) -> bool {
        self.phone != NOT_FOUND
    }

    pub fn has_email(&self) -> bool {
        self.email != NOT_FOUND
    }

    pub fn has_website(&self) -> bool {
        self.website != NOT_FOUND
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "nicho", alias = "niche")]
    pub niche: String,
    #[serde(rename = "cidade", alias = "city")]
    pub city: String,
    #[serde(
        rename = "quantidade",
        alias = "quantity",
        default = "default_quantity",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub quantity: i64,
    #[serde(rename = "userId", alias = "requestingUser")]
    pub user_id: String,
}

fn default_quantity() -> i64 {
    DEFAULT_QUANTITY
}

impl SearchQuery {
    pub fn new(niche: &str, city: &str, quantity: i64, user_id: &str) -> Self {
        SearchQuery {
            niche: niche.to_string(),
            city: city.to_string(),
            quantity,
            user_id: user_id.to_string(),
        }
    }

    pub fn search_text(&self) -> String {
        format!("{} {}", self.niche, self.city)
    }

    /// Number of leads to collect. Zero or negative quantities collect nothing.
    pub fn target(&self) -> usize {
        usize::try_from(self.quantity).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_become_sentinel() {
        let query = SearchQuery::new("dentista", "Curitiba", 3, "u1");
        let fields = ExtractedFields {
            name: "Clinica Sorriso".to_string(),
            phone: Some("(41) 3333-4444".to_string()),
            email: None,
            website: None,
        };

        let lead = LeadRecord::from_fields(fields, &query);

        assert_eq!(lead.phone, "(41) 3333-4444");
        assert_eq!(lead.email, NOT_FOUND);
        assert_eq!(lead.website, NOT_FOUND);
        assert!(lead.has_phone());
        assert!(!lead.has_email());
        assert_eq!(lead.niche, "dentista");
        assert_eq!(lead.city, "Curitiba");
        assert_eq!(lead.user_id, "u1");
    }

    #[test]
    fn record_serializes_with_consumer_field_names() {
        let query = SearchQuery::new("dentista", "Curitiba", 3, "u1");
        let lead = LeadRecord::from_fields(
            ExtractedFields {
                name: "Clinica".to_string(),
                ..Default::default()
            },
            &query,
        );

        let json = serde_json::to_value(&lead).unwrap();

        assert_eq!(json["nome"], "Clinica");
        assert_eq!(json["telefone"], NOT_FOUND);
        assert_eq!(json["site"], NOT_FOUND);
        assert_eq!(json["nicho"], "dentista");
        assert_eq!(json["cidade"], "Curitiba");
        assert_eq!(json["userId"], "u1");
    }

    #[test]
    fn query_defaults_quantity_and_accepts_english_names() {
        let query: SearchQuery = serde_json::from_str(
            r#"{"niche": "padaria", "city": "Recife", "requestingUser": "u9"}"#,
        )
        .unwrap();

        assert_eq!(query.quantity, 20);
        assert_eq!(query.search_text(), "padaria Recife");
        assert_eq!(query.user_id, "u9");
    }

    #[test]
    fn quantity_sent_as_text_is_coerced() {
        let query: SearchQuery = serde_json::from_str(
            r#"{"nicho": "padaria", "cidade": "Recife", "quantidade": "5", "userId": "u9"}"#,
        )
        .unwrap();

        assert_eq!(query.target(), 5);
    }

    #[test]
    fn non_positive_quantity_targets_nothing() {
        assert_eq!(SearchQuery::new("a", "b", 0, "u").target(), 0);
        assert_eq!(SearchQuery::new("a", "b", -4, "u").target(), 0);
        assert_eq!(SearchQuery::new("a", "b", 7, "u").target(), 7);
    }
}
