/// Every piece of markup knowledge about the map search surface lives here.
#[derive(Debug, Clone)]
pub struct MapsLayout {
    pub search_input: String,
    pub result_link: String,
    pub result_link_attribute: String,
    pub results_feed: String,
    pub phone_button: String,
    pub website_link: String,
    pub website_link_attribute: String,
    pub detail_heading: String,
}

impl Default for MapsLayout {
    fn default() -> Self {
        MapsLayout {
            search_input: "input#searchboxinput".to_string(),
            result_link: "a.hfpxzc".to_string(),
            result_link_attribute: "href".to_string(),
            results_feed: r#"div[role="feed"]"#.to_string(),
            phone_button: r#"button[data-item-id="phone"]"#.to_string(),
            website_link: r#"a[data-item-id="authority"]"#.to_string(),
            website_link_attribute: "href".to_string(),
            detail_heading: "h1".to_string(),
        }
    }
}
