use std::{env, net::SocketAddr};

use axum::{Router, extract::FromRef};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::handlers::{competitions, games, players};

mod errors;
mod handlers;
mod models;
mod payloads;
mod repositories;
mod responses;
mod services;

#[derive(Clone)]
struct AppState {
    pool: SqlitePool,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(input: &AppState) -> Self {
        input.pool.clone()
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "federation_manager=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    let db_url = env::var("DATABASE_URL").unwrap();
    let pool = SqlitePoolOptions::new().connect(&db_url).await.unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    let state = AppState { pool };
    let addr = SocketAddr::from(([127, 0, 0, 1], 3001));
    let listener = TcpListener::bind(addr).await.unwrap();
    tracing::info!("listening on {}", addr);
    let app = Router::new()
        .nest("/players", players::routes(state.clone()))
        .nest("/competitions", competitions::routes(state.clone()))
        .nest("/games", games::routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive());
    axum::serve(listener, app).await.unwrap();
}
