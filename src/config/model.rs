const DEFAULT_API_URL: &str = "https://repeater.bondlayer.com/fetch";
const DEFAULT_LOCALE: &str = "pt";
const DEFAULT_PROJECT_ID: &str = "snmlouf5g8jmtqva";
const DEFAULT_COLLECTION_ID: &str = "c8ks2f3U0auUJh8T";
const DEFAULT_REPEATER_ID: &str = "cDUzN6R14bU0s0UB";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub locale: String,
    pub project_id: String,
    pub collection_id: String,
    pub repeater_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            project_id: DEFAULT_PROJECT_ID.to_string(),
            collection_id: DEFAULT_COLLECTION_ID.to_string(),
            repeater_id: DEFAULT_REPEATER_ID.to_string(),
        }
    }
}
