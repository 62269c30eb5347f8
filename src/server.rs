use std::collections::HashMap;

use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::services::ServeDir;

use crate::models::EnrichedProp;
use crate::utils::query::PropsQuery;
use crate::AppState;

// Custom filters for formatting
mod filters {
    pub fn format_odds(odds: &i32) -> ::askama::Result<String> {
        Ok(format!("{:+}", odds))
    }

    pub fn format_percent(value: &f64) -> ::askama::Result<String> {
        Ok(format!("{:.1}%", value * 100.0))
    }

    pub fn format_ev(value: &f64) -> ::askama::Result<String> {
        Ok(format!("{:+.3}", value))
    }

    pub fn format_line(value: &f64) -> ::askama::Result<String> {
        Ok(format!("{:.1}", value))
    }
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    prop_count: usize,
    positive_count: usize,
    props: Vec<EnrichedProp>,
}

struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
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

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Liveness check. Deliberately independent of the dataset snapshot so
/// it stays green even when the data failed to load.
async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn analyze(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let query = match PropsQuery::from_params(&params) {
        Ok(query) => query,
        Err(e) => return e.into_response(),
    };

    let snapshot = match state.snapshot.as_ref() {
        Ok(rows) => rows,
        Err(e) => return e.clone().into_response(),
    };

    let mut rows = query.apply(snapshot);
    if query.explain {
        state.explainer.annotate_top(&mut rows).await;
    }

    Json(rows).into_response()
}

async fn home(State(state): State<AppState>) -> Response {
    let snapshot = match state.snapshot.as_ref() {
        Ok(rows) => rows,
        Err(e) => {
            return (e.status_code(), format!("Data not loaded: {}", e)).into_response();
        }
    };

    let props = PropsQuery::default().apply(snapshot);
    let positive_count = props.iter().filter(|p| p.ev_per_dollar > 0.0).count();

    let template = HomeTemplate {
        prop_count: props.len(),
        positive_count,
        props,
    };

    HtmlTemplate(template).into_response()
}

/// Build the application router around a startup snapshot.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // This will serve files from the "static" directory at the "/static" URL path
        .nest_service("/static", ServeDir::new("static"))
        .route("/", get(home))
        .route("/health", get(health))
        .route("/analyze", get(analyze))
        .with_state(state)
}
