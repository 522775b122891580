#[tokio::main]
async fn main() {
    use axum::Router;
    use axum::routing::get;
    use newsroom_server::{
        auth::{self, OidcClient, db::SessionRepository},
        comments, news,
        config::ServerConfig,
        state::AppState,
    };
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;
    use tower_http::services::{ServeDir, ServeFile};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    // Create database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("failed to run migrations");

    // Cleanup expired sessions on startup
    let session_repo = SessionRepository::new(db_pool.clone());
    match session_repo.delete_expired().await {
        Ok(count) if count > 0 => {
            tracing::info!(
                deleted_sessions = count,
                "Cleaned up expired sessions on startup"
            );
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Failed to cleanup expired sessions on startup");
        }
    }

    // Spawn periodic session cleanup task
    let cleanup_pool = db_pool.clone();
    let cleanup_interval_secs = config.session.cleanup_interval_seconds;
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(cleanup_interval_secs));
        loop {
            interval.tick().await;
            let repo = SessionRepository::new(cleanup_pool.clone());
            match repo.delete_expired().await {
                Ok(count) if count > 0 => {
                    tracing::debug!(deleted_sessions = count, "Periodic session cleanup");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to cleanup expired sessions");
                }
            }
        }
    });

    // Initialize OIDC client
    tracing::info!("Discovering OIDC provider...");
    let oidc = OidcClient::discover(config.oidc)
        .await
        .expect("failed to discover OIDC provider");

    let app_state = Arc::new(AppState::new(
        db_pool,
        oidc,
        reqwest::Client::new(),
        config.roles.directory(),
        config.session,
        config.news,
        config.landing_url,
    ));

    // Non-API paths serve the built SPA bundle, with index.html for
    // client-side routes.
    let index = format!("{}/index.html", config.static_dir);
    let spa = ServeDir::new(&config.static_dir).fallback(ServeFile::new(index));

    let app = Router::new()
        .route("/api/auth/login", get(auth::login))
        .route("/api/auth/callback", get(auth::callback))
        .route("/api/auth/userinfo", get(auth::userinfo))
        .route("/api/auth/logout", get(auth::logout))
        .route(
            "/api/articles/{slug}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/api/articles/{slug}/comments/{id}",
            axum::routing::delete(comments::delete_comment),
        )
        .route("/api/stories", get(news::stories))
        .fallback_service(spa)
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", config.listen_addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
