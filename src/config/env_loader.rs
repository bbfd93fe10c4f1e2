use crate::config::model::Config;
use std::env;

pub fn load_config() -> Config {
    let defaults = Config::default();

    Config {
        api_url: load_str_config("AGENDAPORTO_API_URL", defaults.api_url),
        locale: load_str_config("AGENDAPORTO_LOCALE", defaults.locale),
        project_id: defaults.project_id,
        collection_id: defaults.collection_id,
        repeater_id: defaults.repeater_id,
    }
}

fn load_str_config(name: &str, default: String) -> String {
    env::var(name).unwrap_or(default)
}
