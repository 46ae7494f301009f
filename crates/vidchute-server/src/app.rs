//! Router and page handlers.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Form, Path as UrlPath, State};
use axum::response::{Html, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use vidchute_core::artifact::{ArtifactName, ArtifactStore};
use vidchute_core::config::VidchuteConfig;
use vidchute_core::fetch::Fetcher;
use vidchute_core::{janitor, urlfilter};

use crate::body;
use crate::error::PageError;
use crate::pages;

/// Shared handler state, built once at startup (or per test).
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ArtifactStore>,
    pub fetcher: Fetcher,
    pub url_must_contain: String,
    pub artifact_ext: String,
    pub max_artifact_age: Duration,
}

impl AppState {
    pub fn new(cfg: &VidchuteConfig, store: ArtifactStore) -> Self {
        AppState {
            store: Arc::new(store),
            fetcher: Fetcher::new(&cfg.fetch_config()),
            url_must_contain: cfg.url_must_contain.clone(),
            artifact_ext: cfg.artifact_ext.clone(),
            max_artifact_age: Duration::from_secs(cfg.max_artifact_age_secs),
        }
    }
}

/// The whole HTTP surface: form page, URL submission, artifact downloads.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(form_page).post(submit_url))
        .route("/download/{name}", get(download_artifact))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct SubmitForm {
    #[serde(default)]
    url: String,
}

/// GET `/`: sweep aged artifacts, then render the form.
async fn form_page(State(state): State<AppState>) -> Html<&'static str> {
    match janitor::sweep(state.store.dir(), state.max_artifact_age).await {
        Ok(stats) if stats.removed > 0 => {
            tracing::info!(
                removed = stats.removed,
                scanned = stats.scanned,
                "janitor removed aged artifacts"
            )
        }
        Ok(_) => {}
        Err(err) => tracing::warn!("janitor sweep failed: {err:#}"),
    }
    Html(pages::FORM_PAGE)
}

/// POST `/`: validate the URL, run the fetch tool, link the artifact.
async fn submit_url(
    State(state): State<AppState>,
    Form(form): Form<SubmitForm>,
) -> Result<Html<String>, PageError> {
    if !urlfilter::url_allowed(&form.url, &state.url_must_contain) {
        tracing::debug!(url = %form.url, "rejected submitted url");
        return Err(PageError::invalid_url());
    }

    let name = ArtifactName::mint(&state.artifact_ext);
    let output = state.store.path_of(&name);
    let fetcher = state.fetcher.clone();
    let url = form.url;
    // Detached from the connection: a client that gives up mid-fetch must not
    // abort the tool. Whatever stays uncollected, the janitor reaps.
    let outcome = tokio::spawn(async move { fetcher.fetch(&url, &output).await }).await;

    match outcome {
        Ok(Ok(())) => {
            tracing::info!(name = %name, "artifact ready");
            Ok(Html(pages::ready_page(name.as_str())))
        }
        Ok(Err(err)) => {
            tracing::error!("fetch failed: {err}");
            Err(PageError::fetch_failed())
        }
        Err(err) => {
            tracing::error!("fetch task failed: {err}");
            Err(PageError::fetch_failed())
        }
    }
}

/// GET `/download/{name}`: stream the artifact as an attachment, exactly once.
async fn download_artifact(
    State(state): State<AppState>,
    UrlPath(raw): UrlPath<String>,
) -> Result<Response, PageError> {
    let Some(name) = ArtifactName::from_path_segment(&raw) else {
        tracing::debug!(segment = %raw, "rejected download name");
        return Err(PageError::not_found());
    };
    match state.store.open_for_serve(&name).await {
        Ok(Some(served)) => Ok(body::attachment_response(&name, served)),
        Ok(None) => Err(PageError::not_found()),
        Err(err) => {
            tracing::error!("could not serve artifact: {err:#}");
            Err(PageError::internal())
        }
    }
}
