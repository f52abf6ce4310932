use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todoapp::auth::token::TokenConfig;
use todoapp::shared::AppState;
use todoapp::todo::repository::{InMemoryTodoRepository, PostgresTodoRepository, TodoRepository};
use todoapp::user::repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todoapp=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting todo server");

    // Repository selection: Postgres when DATABASE_URL is set, in-memory
    // otherwise. Repositories are constructed once here and injected through
    // AppState; nothing holds a store connection at global scope.
    let (user_repository, todo_repository): (
        Arc<dyn UserRepository + Send + Sync>,
        Arc<dyn TodoRepository + Send + Sync>,
    ) = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = sqlx::PgPool::connect(&database_url)
                .await
                .expect("Failed to connect to database");
            info!("Using PostgreSQL repositories");
            (
                Arc::new(PostgresUserRepository::new(pool.clone())) as _,
                Arc::new(PostgresTodoRepository::new(pool)) as _,
            )
        }
        Err(_) => {
            info!("DATABASE_URL not set, using in-memory repositories");
            (
                Arc::new(InMemoryUserRepository::new()) as _,
                Arc::new(InMemoryTodoRepository::new()) as _,
            )
        }
    };

    let app_state = AppState::new(user_repository, todo_repository, TokenConfig::new());

    let app = todoapp::build_router(app_state).layer(CorsLayer::permissive());

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind listener");
    info!("Server listening on port {}", port);
    axum::serve(listener, app).await.expect("Server error");
}
