use anyhow::{Context, Result};
use axum::{
    extract::{Form, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    serve, Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::constants;
use crate::model::ProductId;
use crate::transcript::ChatMessage;
use crate::widget::ChatWidget;

const WIDGET_CSS: &str = include_str!("../static/widget.css");

// Shared application state
#[derive(Clone)]
pub struct AppState {
    widget: ChatWidget,
    title: String,
}

impl AppState {
    pub fn new(widget: ChatWidget) -> Self {
        Self {
            widget,
            title: constants::PAGE_TITLE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SubmitForm {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct CartForm {
    id: String,
}

async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, (StatusCode, Html<String>)> {
    state
        .widget
        .render_page(&state.title)
        .map(Html)
        .map_err(|e| {
            error!("Failed to render widget page: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!("Internal Server Error: {}", e)),
            )
        })
}

async fn submit_handler(State(state): State<AppState>, Form(form): Form<SubmitForm>) -> Redirect {
    let outcome = state.widget.submit(&form.message).await;
    info!(?outcome, "Handled chat submission");
    Redirect::to("/")
}

async fn cart_handler(State(state): State<AppState>, Form(form): Form<CartForm>) -> Redirect {
    // ProductId parsing is infallible; numeric ids stay numeric.
    let id: ProductId = form.id.parse().unwrap_or_else(|never| match never {});
    let outcome = state.widget.add_to_cart(&id).await;
    info!(%id, ?outcome, "Handled add to cart");
    Redirect::to("/")
}

async fn clear_handler(State(state): State<AppState>) -> Redirect {
    state.widget.clear_history();
    Redirect::to("/")
}

async fn stylesheet_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], WIDGET_CSS)
}

async fn transcript_handler(State(state): State<AppState>) -> Json<Vec<ChatMessage>> {
    Json(state.widget.messages())
}

/// Router for the widget page, its form actions and the stylesheet.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/submit", post(submit_handler))
        .route("/cart", post(cart_handler))
        .route("/clear", post(clear_handler))
        .route("/transcript", get(transcript_handler))
        // The stylesheet is compiled in, like the templates.
        .route("/static/widget.css", get(stylesheet_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http()) // Add request logging
}

pub async fn start_web_server(port: u16, widget: ChatWidget) -> Result<()> {
    let app = router(AppState::new(widget));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Chat widget listening on http://{}", addr);

    // Bind using tokio::net::TcpListener
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;

    serve(listener, app.into_make_service())
        .await
        .context("Web server failed")?;

    Ok(())
}
