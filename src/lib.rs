pub mod admin;
pub mod api;
pub mod app;
pub mod config;
pub mod diagram;
pub mod dispatch;
pub mod flow;
pub mod gallery;
pub mod logging;
pub mod session;
pub mod ui;

// Internal modules
pub mod actions;
pub mod event;

// Re-export commonly used types
pub use app::{AppMode, AppState, Route};
pub use config::AppConfig;
pub use dispatch::{Dispatcher, Effect};
