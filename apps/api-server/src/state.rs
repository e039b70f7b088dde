//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::PostRules;
use blog_core::error::RepoError;
use blog_core::ports::PostRepository;
use blog_infra::InMemoryPostRepository;

#[cfg(feature = "postgres")]
use blog_infra::{DatabaseConnections, PostgresPostRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub rules: Arc<PostRules>,
    #[cfg(feature = "postgres")]
    pg: Option<Arc<PostgresPostRepository>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// A configured database that cannot be reached is an error; without
    /// any database configuration the in-memory repository is used.
    pub async fn new(config: &AppConfig) -> Result<Self, RepoError> {
        let rules = config.post_rules.clone();
        tracing::info!(
            required = ?rules.required().map(|f| f.as_str()).collect::<Vec<_>>(),
            "Post validation rules loaded"
        );

        #[cfg(feature = "postgres")]
        if let Some(db_config) = &config.database {
            let connections = DatabaseConnections::init(db_config).await.map_err(|e| {
                tracing::error!("Failed to connect to database: {}", e);
                RepoError::Connection(e.to_string())
            })?;
            let repo = Arc::new(PostgresPostRepository::new(connections.main));

            tracing::info!("Application state initialized");
            return Ok(Self {
                posts: repo.clone(),
                rules: Arc::new(rules),
                pg: Some(repo),
            });
        }

        #[cfg(not(feature = "postgres"))]
        if config.database.is_some() {
            tracing::warn!("Built without postgres feature - ignoring database configuration");
        }

        tracing::warn!("No database configured. Running with in-memory repository.");
        Ok(Self::with_repository(
            Arc::new(InMemoryPostRepository::new()),
            rules,
        ))
    }

    /// State around an already constructed repository.
    pub fn with_repository(posts: Arc<dyn PostRepository>, rules: PostRules) -> Self {
        Self {
            posts,
            rules: Arc::new(rules),
            #[cfg(feature = "postgres")]
            pg: None,
        }
    }

    /// Release the connection pool, if one was opened.
    ///
    /// Call once the server has stopped and every other clone of the state
    /// has been dropped; otherwise the pool closes when its last user goes.
    pub async fn shutdown(self) {
        #[cfg(feature = "postgres")]
        if let Some(repo) = self.pg {
            drop(self.posts);
            match Arc::try_unwrap(repo) {
                Ok(repo) => {
                    let connections = DatabaseConnections {
                        main: repo.into_inner(),
                    };
                    if let Err(e) = connections.close().await {
                        tracing::error!("Failed to close database connections: {}", e);
                    }
                }
                Err(_) => tracing::warn!("Database pool still shared; leaving it to close on drop"),
            }
        }

        tracing::info!("Application state shut down");
    }
}
