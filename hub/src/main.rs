mod profile;
mod routes;
mod services;
mod state;

#[cfg(test)]
#[path = "e2e_test.rs"]
mod e2e_tests;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let state = state::AppState::new();

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "driftroom hub listening");
    axum::serve(listener, app).await.expect("server failed");
}
