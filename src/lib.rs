//! Library exports for the app binary and integration tests.
/// Config and log directory resolution.
pub mod app_dirs;
/// Remote image classification.
pub mod classifier;
/// Persistent settings.
pub mod config;
/// egui front end.
pub mod egui_app;
/// Shared HTTP agent and retry helpers.
pub(crate) mod http_client;
/// Tracing setup.
pub mod logging;
/// Scan data types.
pub mod scan;
/// Scan lifecycle state machine.
pub mod session;
