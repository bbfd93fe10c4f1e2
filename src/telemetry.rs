use std::io;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{filter, fmt};

pub fn setup_tracing() {
    let filter = filter::Targets::new()
        .with_target("agendaporto", Level::TRACE)
        .with_default(Level::WARN);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stdout))
        .init();
}
