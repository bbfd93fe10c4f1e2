pub mod bondlayer {
    pub mod api;
    pub mod dto;
    pub mod model;
}

pub mod catalog {
    pub mod resolver;
    pub mod temporal;
    pub mod text;
}

pub mod view {
    pub mod composer;
    pub mod state;
}

pub mod config {
    pub mod env_loader;
    pub mod model;
}

pub mod telemetry;
