//! Axum server and routes.

use askama::Template;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use gdelt_functions::{FunctionCatalog, FunctionError};
use gdelt_scheduler::{JobRegistry, JobTask, RegistryError, TaskError};
use gdelt_types::{
    DataResponse, FunctionSchema, FunctionSummary, JobInfo, JobStatus, StatusResponse,
    SubmitResponse, WaitRequest,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared handler state: the function catalog and the registry plot jobs run in.
pub struct AppState {
    pub catalog: Arc<FunctionCatalog>,
    pub jobs: Arc<dyn JobRegistry<String>>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/functions", get(handle_functions))
        .route("/functions/:function", get(handle_function_schema))
        .route("/plot_request/:function", post(handle_plot_request))
        .route("/wait_for_plot", post(handle_wait_for_plot))
        .route("/jobs/:job_id", get(handle_job_status))
        .route("/plot/:function/:job_id", get(handle_plot))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn handle_health() -> &'static str {
    "ok"
}

async fn handle_functions(
    State(state): State<Arc<AppState>>,
) -> Json<DataResponse<Vec<FunctionSummary>>> {
    Json(DataResponse::ok(state.catalog.describe()))
}

async fn handle_function_schema(
    State(state): State<Arc<AppState>>,
    Path(function): Path<String>,
) -> Json<DataResponse<FunctionSchema>> {
    match state.catalog.schema(&function) {
        Ok(schema) => Json(DataResponse::ok(schema)),
        Err(e) => Json(DataResponse::error(e.to_string())),
    }
}

/// Validate the submitted values, then queue the plot as a job.
async fn handle_plot_request(
    State(state): State<Arc<AppState>>,
    Path(function): Path<String>,
    payload: Result<Json<HashMap<String, Value>>, JsonRejection>,
) -> Json<SubmitResponse> {
    let raw = match payload {
        Ok(Json(raw)) => raw,
        Err(rejection) => {
            tracing::debug!(function = %function, error = %rejection, "plot request body rejected");
            return Json(SubmitResponse::error(rejection.body_text(), "body"));
        }
    };
    let params = match state.catalog.check_params(&function, &raw) {
        Ok(params) => params,
        Err(FunctionError::Validation(e)) => {
            tracing::debug!(function = %function, parameter = %e.parameter, "parameter rejected");
            return Json(SubmitResponse::error(e.message, e.parameter));
        }
        Err(e) => return Json(SubmitResponse::error(e.to_string(), "function")),
    };

    let catalog = Arc::clone(&state.catalog);
    let name = function.clone();
    let task: JobTask<String> = Box::pin(async move {
        catalog
            .plot(&name, params)
            .await
            .map_err(|e| Box::new(e) as TaskError)
    });
    match state.jobs.submit(task).await {
        Ok(job_id) => {
            tracing::info!(job_id = %job_id, function = %function, "plot job submitted");
            Json(SubmitResponse::ok(function, job_id))
        }
        Err(e) => {
            tracing::error!(function = %function, error = %e, "plot job not queued");
            Json(SubmitResponse::error(e.to_string(), "function"))
        }
    }
}

/// Block until the job is done; a failed job is reported as an error.
async fn handle_wait_for_plot(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WaitRequest>, JsonRejection>,
) -> Json<StatusResponse> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return Json(StatusResponse::error(rejection.body_text())),
    };
    let outcome = match state.jobs.wait(&req.job_id).await {
        Ok(()) => state.jobs.status(&req.job_id).await,
        Err(e) => Err(e),
    };
    match outcome {
        Ok(JobInfo {
            status: JobStatus::Failed,
            error,
            ..
        }) => Json(StatusResponse::error(
            error.unwrap_or_else(|| "job failed".to_string()),
        )),
        Ok(_) => Json(StatusResponse::ok()),
        Err(e) => Json(StatusResponse::error(registry_message(&req.job_id, e))),
    }
}

async fn handle_job_status(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Json<DataResponse<JobInfo>> {
    match state.jobs.status(&job_id).await {
        Ok(info) => Json(DataResponse::ok(info)),
        Err(e) => Json(DataResponse::error(registry_message(&job_id, e))),
    }
}

/// Page with the function title and the stored plot, or an error body.
async fn handle_plot(
    State(state): State<Arc<AppState>>,
    Path((function, job_id)): Path<(String, String)>,
) -> Response {
    let title = match state.catalog.get(&function) {
        Ok(f) => f.label().to_string(),
        Err(e) => return Json(StatusResponse::error(e.to_string())).into_response(),
    };
    match state.jobs.get_result(&job_id).await {
        Ok(plot) => render_template(PlotPage { title, plot }),
        Err(e) => Json(StatusResponse::error(registry_message(&job_id, e))).into_response(),
    }
}

fn registry_message(job_id: &str, err: RegistryError) -> String {
    match err {
        RegistryError::UnknownJob(_) => {
            tracing::warn!(job_id = %job_id, "unknown job requested");
            format!("Unknown job {job_id}")
        }
        RegistryError::TaskFailed(failure) => failure.message(),
        RegistryError::Other(message) => {
            tracing::error!(job_id = %job_id, error = %message, "registry error");
            message
        }
    }
}

/// Plot result page; the title is escaped, the renderer's HTML is not.
#[derive(Template)]
#[template(path = "plot.html")]
struct PlotPage {
    title: String,
    plot: String,
}

fn render_template<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "template rendering failed");
            Json(StatusResponse::error("Template rendering error")).into_response()
        }
    }
}
