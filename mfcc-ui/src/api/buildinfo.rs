//! GET /api/buildinfo
//!
//! Identifies the running mfcc-ui build, so an extracted matrix can be tied
//! to the exact code that computed it. Values are baked in by build.rs.

use axum::response::Json;
use serde::Serialize;

/// Build identification for this mfcc-ui binary
#[derive(Debug, Serialize)]
pub struct BuildInfo {
    /// Crate version
    pub version: String,
    /// Short commit hash, `-dirty` suffixed for uncommitted trees, or "unknown"
    pub git_hash: String,
    /// RFC 3339 UTC compile time
    pub build_timestamp: String,
    /// Cargo profile (debug/release)
    pub build_profile: String,
}

impl BuildInfo {
    /// Values compiled into this binary
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            git_hash: env!("GIT_HASH").to_string(),
            build_timestamp: env!("BUILD_TIMESTAMP").to_string(),
            build_profile: env!("BUILD_PROFILE").to_string(),
        }
    }
}

pub async fn get_build_info() -> Json<BuildInfo> {
    Json(BuildInfo::current())
}
