use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::Semaphore;

use shared::types::AppConfig;

pub mod database;
pub mod handlers;

/// Cap on concurrently served connections, sized from
/// `server.max_connections`. The accept loop holds a permit for the lifetime
/// of each connection task; once exhausted, accepting blocks until a
/// connection closes.
pub fn connection_limiter(max_connections: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(max_connections))
}

/// Process-wide state, cloned into every connection task.
///
/// The pool is the only shared, concurrently-accessed resource; the config
/// and signing secret are loaded once at startup and never mutated, so they
/// ride along in `Arc`s rather than behind a lock.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub jwt_secret: Arc<String>,
}
