use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::pipeline::{
    EncodingConsistencyWarning, MatchInput, Pipeline, PipelineError, PredictionResult,
};
use crate::teams::TeamCatalog;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
}

/// Build the Axum router for the prediction API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/teams", get(teams_handler))
        .route("/api/predict", post(predict_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

#[derive(Debug, Serialize)]
pub struct TeamsResponse {
    pub teams: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub home_team: String,
    pub away_team: String,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub prediction: PredictionResult,
    pub warnings: Vec<EncodingConsistencyWarning>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<String>,
}

/// A request failure rendered as an HTTP response.
#[derive(Debug)]
pub enum ApiError {
    /// The body was not a readable match input.
    Body(JsonRejection),
    Pipeline(PipelineError),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError::Pipeline(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Body(rejection)
    }
}

/// Bad input is the caller's fault; anything past validation is ours.
pub fn status_for(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Body(rejection) => (
                rejection.status(),
                ErrorBody {
                    error: rejection.body_text(),
                    stage: None,
                },
            ),
            ApiError::Pipeline(err) => (
                status_for(&err),
                ErrorBody {
                    error: err.to_string(),
                    stage: err.stage().map(|s| s.to_string()),
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Serve the single-page prediction form.
async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

/// GET /api/teams
async fn teams_handler() -> Json<TeamsResponse> {
    Json(TeamsResponse {
        teams: TeamCatalog.names(),
    })
}

/// POST /api/predict
async fn predict_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MatchInput>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(input) = payload.map_err(|rejection| {
        warn!("Unreadable prediction request: {}", rejection.body_text());
        ApiError::Body(rejection)
    })?;
    let run = state.pipeline.run_detailed(&input).map_err(|err| {
        match &err {
            PipelineError::Validation(e) => warn!("Rejected prediction request: {}", e),
            other => error!("Prediction failed: {}", other),
        }
        ApiError::Pipeline(err)
    })?;

    let home_team = TeamCatalog
        .resolve(&input.home_team)
        .unwrap_or(input.home_team.trim());
    let away_team = TeamCatalog
        .resolve(&input.away_team)
        .unwrap_or(input.away_team.trim());
    info!(
        "Predicted {} vs {}: {} ({}-{})",
        home_team, away_team, run.result.result, run.result.home_goals, run.result.away_goals
    );

    Ok(Json(PredictResponse {
        home_team: home_team.to_string(),
        away_team: away_team.to_string(),
        generated_at: Utc::now(),
        prediction: run.result,
        warnings: run.warnings,
    }))
}

/// Embedded single-file form (HTML + JS)
const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Football Match Prediction Pipeline</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 40rem; margin: 2rem auto; }
  label { display: block; margin-top: .8rem; }
  pre { background: #f4f4f4; padding: 1rem; }
</style>
</head>
<body>
<h1>Football Match Prediction Pipeline</h1>
<label>Home team <select id="home"></select></label>
<label>Away team <select id="away"></select></label>
<label>Home form (avg points, last 5) <input id="home_form" type="number" min="0" max="3" step="0.1" value="1.0"></label>
<label>Away form (avg points, last 5) <input id="away_form" type="number" min="0" max="3" step="0.1" value="1.0"></label>
<p><button id="go">Predict Match</button></p>
<pre id="out"></pre>
<script>
async function init() {
  const { teams } = await (await fetch('/api/teams')).json();
  for (const id of ['home', 'away']) {
    const sel = document.getElementById(id);
    for (const t of teams) sel.add(new Option(t, t));
  }
}
document.getElementById('go').onclick = async () => {
  const body = {
    home_team: document.getElementById('home').value,
    away_team: document.getElementById('away').value,
    home_form_avg: parseFloat(document.getElementById('home_form').value),
    away_form_avg: parseFloat(document.getElementById('away_form').value),
  };
  const res = await fetch('/api/predict', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body),
  });
  const r = await res.json();
  const pct = p => (p * 100).toFixed(2) + '%';
  document.getElementById('out').textContent = r.error ? r.error : [
    `Predicted Home Goals: ${r.home_goals}`,
    `Predicted Away Goals: ${r.away_goals}`,
    `Predicted Home xG: ${r.home_xg.toFixed(2)}`,
    `Predicted Away xG: ${r.away_xg.toFixed(2)}`,
    `Predicted Home SOT: ${r.home_sot}`,
    `Predicted Away SOT: ${r.away_sot}`,
    `Predicted Match Result: ${r.result_label}`,
    '',
    `Home Win: ${pct(r.probabilities.home)}`,
    `Draw: ${pct(r.probabilities.draw)}`,
    `Away Win: ${pct(r.probabilities.away)}`,
  ].join('\n');
};
init();
</script>
</body>
</html>
"#;
