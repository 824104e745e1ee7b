pub mod client;
pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod store;
pub mod topology;
pub mod utils;
pub mod visualize;

use std::sync::Arc;

use config::Config;
use store::ElementStore;
use visualize::{FileVisualizer, PlaceholderVisualizer, Visualizer};

/// Application state shared across handlers
pub struct AppState {
    pub store: ElementStore,
    pub config: Config,
    pub visualizer: Arc<dyn Visualizer>,
}

impl AppState {
    /// Build state around an existing store, choosing the visualizer from config
    pub fn new(store: ElementStore, config: Config) -> Self {
        let visualizer: Arc<dyn Visualizer> = match &config.image_path {
            Some(path) => {
                tracing::info!("Serving topology image from {}", path);
                Arc::new(FileVisualizer::new(path))
            }
            None => Arc::new(PlaceholderVisualizer),
        };
        Self {
            store,
            config,
            visualizer,
        }
    }
}
