use agendaporto::bondlayer::api::BondlayerApi;
use agendaporto::config::env_loader::load_config;
use agendaporto::telemetry::setup_tracing;
use agendaporto::view::composer::{compose, CatalogView};
use agendaporto::view::state::{AppState, ScrollLock};
use tracing::debug;

/// stdout has no scroll surface to freeze; the capability is honored as logs.
struct HeadlessScroll;

impl ScrollLock for HeadlessScroll {
    fn current_offset(&self) -> f64 {
        0.0
    }

    fn lock(&mut self, offset: f64) {
        debug!("Scroll locked at {offset}");
    }

    fn unlock(&mut self, offset: f64) {
        debug!("Scroll restored to {offset}");
    }
}

#[tokio::main]
async fn main() {
    setup_tracing();

    let config = load_config();
    let mut state = AppState::new(HeadlessScroll);

    match BondlayerApi::fetch_catalog(&config).await {
        Ok(catalog) => state.fetch_succeeded(catalog),
        Err(err) => state.fetch_failed(err.to_string()),
    }

    match compose(&state).catalog {
        CatalogView::Loading => println!("Carregando eventos..."),
        CatalogView::Error(message) => println!("Erro: {}", message),
        CatalogView::Grid(cards) => {
            for card in cards {
                let mut line = format!("{} | Data: {}", card.title, card.starts);

                if let Some(section) = card.section {
                    line = format!("[{}] {}", section, line);
                }
                if let Some(until) = card.ends {
                    line.push_str(&format!(" | Até: {}", until));
                }

                println!("{}", line);
            }
        }
    }

    // Expand the first card the way a click would
    if let Some(first) = state.items.first().cloned() {
        state.select(&first);

        if let Some(detail) = compose(&state).detail {
            println!("\n{}", detail.title);
            if let Some(synopsis) = detail.synopsis {
                println!("{}", synopsis);
            }
            println!("Calendário: {}", detail.calendar_url);
            if let Some(venue) = detail.venue {
                println!("Localização: {}", venue.name);
                if let Some(address) = venue.address {
                    println!("Endereço: {}", address);
                }
            }
        }

        state.dismiss();
    }
}
