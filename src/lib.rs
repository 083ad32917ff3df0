pub mod analysis;
pub mod app;
pub mod charts;
pub mod dataset;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod storage;
pub mod ui;
pub mod state;

pub use app::router;
pub use state::AppState;
pub use storage::{load_prefs, resolve_prefs_path};
