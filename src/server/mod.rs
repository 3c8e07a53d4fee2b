pub mod config;
mod http_layers;
pub mod metrics;
mod recommendations;
mod search;
pub mod server;
pub mod state;
mod stream_song;

pub use config::ServerConfig;
pub use http_layers::*;
pub(self) use recommendations::make_recommendation_routes;
pub(self) use search::make_search_routes;
pub use server::{make_app, run_metrics_server, run_server};
pub use state::ServerState;
