//! Environment/runtime helpers
//!
//! Sanity checks run once at startup.

use tracing::{info, warn};

/// Warn when the optional static asset directory is configured but missing.
///
/// Returns whether the directory can be served.
pub async fn check_static_dir(dir: Option<&str>) -> bool {
    let Some(dir) = dir else {
        info!("no static_dir configured; serving API routes only");
        return false;
    };
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => true,
        _ => {
            warn!(static_dir = %dir, "static asset directory not found; frontend will not be served");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::check_static_dir;

    #[tokio::test]
    async fn missing_dir_is_not_served() {
        assert!(!check_static_dir(Some("definitely/not/here")).await);
        assert!(!check_static_dir(None).await);
    }

    #[tokio::test]
    async fn existing_dir_is_served() {
        let dir = std::env::temp_dir();
        assert!(check_static_dir(dir.to_str()).await);
    }
}
