use std::sync::Arc;

use income_explorer::DirectSource;

/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// Upstream provider source. Its blocking client is only ever used from
    /// `spawn_blocking`.
    pub source: Arc<DirectSource>,
}
