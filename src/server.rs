use crate::config::{AppConfig, MapConfig};
use crate::dashboard::{StampsView, VisitsView};
use crate::data::DataStore;
use crate::error::LoadError;
use crate::filter::SelectionParams;
use crate::render::{self, Links};
use crate::table::TableData;
use anyhow::{Context, Result};
use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use geojson::FeatureCollection;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub struct AppState {
    pub store: DataStore,
    pub map: MapConfig,
    pub links: Links,
}

/// Why a page or API view could not be built.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("View build task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ViewError {
    fn path(&self) -> Option<&std::path::PathBuf> {
        match self {
            ViewError::Load(err) => Some(err.path()),
            ViewError::Task(_) => None,
        }
    }
}

/// A view failure shown to the browser as an error page.
pub struct PageError(ViewError);

impl From<ViewError> for PageError {
    fn from(err: ViewError) -> Self {
        PageError(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        error!("Page failed to load data: {}", self.0);
        let body = render::error_page(&self.0, &Links::server());
        (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
    }
}

/// A view failure reported to API clients as JSON.
pub struct ApiError(ViewError);

impl From<ViewError> for ApiError {
    fn from(err: ViewError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("API request failed to load data: {}", self.0);
        let body = serde_json::json!({
            "error": self.0.to_string(),
            "path": self.0.path(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Runs a view build on the blocking pool; loading may stat and read files.
async fn build_view<T, F>(state: Arc<AppState>, build: F) -> Result<T, ViewError>
where
    T: Send + 'static,
    F: FnOnce(&AppState) -> Result<T, LoadError> + Send + 'static,
{
    let view = tokio::task::spawn_blocking(move || build(&state)).await??;
    Ok(view)
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/stamps", get(stamps_handler))
        .route("/visits", get(visits_handler))
        .route("/api/stamps/markers", get(stamp_markers_handler))
        .route("/api/stamps/table", get(stamp_table_handler))
        .route("/api/visits/markers", get(visit_markers_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(config: AppConfig, store: DataStore) -> Result<()> {
    let state = Arc::new(AppState {
        store,
        map: config.map.clone(),
        links: Links::server(),
    });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Serving dashboard on http://{}", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn home_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render::home_page(&state.links))
}

async fn stamps_handler(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, PageError> {
    let params = SelectionParams::from_query(query.as_deref());
    let page = build_view(state, move |state| {
        StampsView::build(&state.store, &state.map, &params).map(|view| view.render(&state.links))
    })
    .await?;
    Ok(Html(page))
}

async fn visits_handler(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, PageError> {
    let params = SelectionParams::from_query(query.as_deref());
    let page = build_view(state, move |state| {
        VisitsView::build(&state.store, &state.map, &params).map(|view| view.render(&state.links))
    })
    .await?;
    Ok(Html(page))
}

async fn stamp_markers_handler(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<FeatureCollection>, ApiError> {
    let params = SelectionParams::from_query(query.as_deref());
    let view = build_view(state, move |state| StampsView::build(&state.store, &state.map, &params)).await?;
    Ok(Json(view.map.to_feature_collection()))
}

async fn stamp_table_handler(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<TableData>, ApiError> {
    let params = SelectionParams::from_query(query.as_deref());
    let view = build_view(state, move |state| StampsView::build(&state.store, &state.map, &params)).await?;
    Ok(Json(view.table))
}

async fn visit_markers_handler(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<FeatureCollection>, ApiError> {
    let params = SelectionParams::from_query(query.as_deref());
    let view = build_view(state, move |state| VisitsView::build(&state.store, &state.map, &params)).await?;
    Ok(Json(view.map.to_feature_collection()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::fixtures;

    fn state() -> (tempfile::TempDir, Arc<AppState>) {
        let (dir, paths) = fixtures::project();
        let state = Arc::new(AppState {
            store: DataStore::new(&paths),
            map: MapConfig::default(),
            links: Links::server(),
        });
        (dir, state)
    }

    #[tokio::test]
    async fn stamps_page_renders_filtered_rows() {
        let (_dir, state) = state();
        let Html(body) = stamps_handler(State(state), RawQuery(Some("region=Southwest".into())))
            .await
            .ok()
            .unwrap();
        assert!(body.contains("<td>Zion</td>"));
        assert!(!body.contains("<td>Acadia</td>"));
    }

    #[tokio::test]
    async fn visits_page_defaults_to_every_status() {
        let (_dir, state) = state();
        let Html(body) = visits_handler(State(state), RawQuery(None)).await.ok().unwrap();
        assert!(body.contains(r#"<option value="Evan" selected>Evan</option>"#));
        assert!(body.contains(r#"<option value="Kelsey" selected>Kelsey</option>"#));
    }

    #[tokio::test]
    async fn missing_data_becomes_error_page() {
        let (dir, state) = state();
        std::fs::remove_dir_all(dir.path().join("data")).unwrap();

        let response = stamps_handler(State(state), RawQuery(None)).await.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn missing_data_is_reported_to_api_clients_with_its_path() {
        let (_dir, state) = state();
        let visits_csv = state.store.visits.path().to_path_buf();
        std::fs::remove_file(&visits_csv).unwrap();

        let err = visit_markers_handler(State(state), RawQuery(None)).await.err().unwrap();
        assert_eq!(err.0.path(), Some(&visits_csv));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn blocking_view_build_returns_the_built_value() {
        let (_dir, state) = state();
        let count = build_view(state, |state| state.store.stamps.get().map(|stamps| stamps.len()))
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn marker_api_returns_geojson() {
        let (_dir, state) = state();
        let Json(collection) = stamp_markers_handler(State(state), RawQuery(Some("visited=No".into())))
            .await
            .ok()
            .unwrap();
        assert_eq!(collection.features.len(), 1);
        let properties = collection.features[0].properties.as_ref().unwrap();
        assert_eq!(properties["tooltip"], "Zion (2020)");
        assert_eq!(properties["icon"], "close");
    }

    #[tokio::test]
    async fn table_api_applies_submitted_empty_selection() {
        let (_dir, state) = state();
        let Json(table) = stamp_table_handler(State(state), RawQuery(Some("applied=1".into())))
            .await
            .ok()
            .unwrap();
        assert!(table.is_empty());
    }
}
