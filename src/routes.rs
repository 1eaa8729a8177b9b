use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::container::Entry;
use crate::loader::{FeedLoader, LoadError};
use crate::menu::MenuController;
use crate::registry::FeedDescriptor;

const DEFAULT_TITLE: &str = "Feeds";

pub struct AppState {
    pub loader: FeedLoader,
    pub menu: RwLock<MenuController>,
}

impl AppState {
    pub fn new(loader: FeedLoader) -> Self {
        Self {
            loader,
            menu: RwLock::new(MenuController::new()),
        }
    }
}

// Template structs
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub body_class: String,
    pub title: String,
    pub feeds: Vec<FeedDescriptor>,
    pub entries: Vec<Entry>,
}

#[derive(Template)]
#[template(path = "feed.html")]
pub struct FeedTemplate {
    pub entries: Vec<Entry>,
}

// Wrapper for HTML responses
struct HtmlTemplate<T>(T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

pub struct AppError(LoadError);

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0 {
            LoadError::UnknownFeed(_) => StatusCode::NOT_FOUND,
            LoadError::Superseded { .. } => StatusCode::CONFLICT,
            LoadError::Request(_) | LoadError::HttpStatus(_) | LoadError::Parse(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), format!("Error: {}", self.0)).into_response()
    }
}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        AppError(err)
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/menu/toggle", post(toggle_menu))
        .route("/feed", get(feed))
        .route("/feeds/:index", post(select_feed))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new("static"))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

async fn render_page(state: &AppState) -> IndexTemplate {
    let body_class = state
        .menu
        .read()
        .await
        .body_class()
        .unwrap_or_default()
        .to_string();

    let container = state.loader.container().read().await;
    IndexTemplate {
        body_class,
        title: container.feed_name().unwrap_or(DEFAULT_TITLE).to_string(),
        feeds: state.loader.registry().iter().cloned().collect(),
        entries: container.entries().to_vec(),
    }
}

async fn render_feed(state: &AppState) -> FeedTemplate {
    let container = state.loader.container().read().await;
    FeedTemplate {
        entries: container.entries().to_vec(),
    }
}

// Route handlers
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    HtmlTemplate(render_page(&state).await)
}

pub async fn toggle_menu(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.menu.write().await.toggle();
    HtmlTemplate(render_page(&state).await)
}

pub async fn feed(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    HtmlTemplate(render_feed(&state).await)
}

pub async fn select_feed(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<impl IntoResponse, AppError> {
    state.menu.write().await.hide();

    if let Err(e) = state.loader.load_feed(index).await {
        warn!("Feed selection {} failed: {}", index, e);
        return Err(e.into());
    }

    Ok(HtmlTemplate(render_feed(&state).await))
}

pub async fn health() -> impl IntoResponse {
    Html("OK")
}
