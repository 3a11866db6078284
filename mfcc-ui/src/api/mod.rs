//! HTTP handlers for mfcc-ui

pub mod buildinfo;
pub mod extract;
pub mod health;
pub mod ui;

pub use buildinfo::get_build_info;
pub use extract::extract_routes;
pub use health::health_routes;
pub use ui::ui_routes;
