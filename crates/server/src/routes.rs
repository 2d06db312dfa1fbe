//! API route definitions

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use issuetrack::domain::{Issue, NewIssue, Status};
use issuetrack::query::{self, IssueFilter, Page};
use issuetrack::storage::IssueStore;
use issuetrack::validation;

/// Shared application state: the injected record store
pub type AppState<S> = Arc<S>;

/// JSON error body shared by every failure response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn error_body(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            message: message.into(),
        }),
    )
}

/// Backend failures surface the raw store error in the body, preserving the
/// historical behavior of this API.
fn internal_error(err: anyhow::Error) -> ApiError {
    tracing::error!("Store operation failed: {:?}", err);
    error_body(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

fn unprocessable(message: impl Into<String>) -> ApiError {
    error_body(StatusCode::UNPROCESSABLE_ENTITY, message)
}

fn issue_not_found(id: &str) -> ApiError {
    error_body(
        StatusCode::NOT_FOUND,
        format!("Cannot find an issue with the id {}", id),
    )
}

/// Create API routes
pub fn create_routes<S: IssueStore + Send + Sync + 'static>(store: Arc<S>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/issues", get(list_issues).post(create_issue))
        .route(
            "/issues/:id",
            get(get_issue).put(update_issue).delete(delete_issue),
        )
        .with_state(store)
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "issuetrack-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Query parameters accepted by the list endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// Equality filter on status
    status: Option<String>,
    /// Upper bound on effort (inclusive)
    effort_lte: Option<i64>,
    /// Lower bound on effort (inclusive)
    effort_gte: Option<i64>,
    /// Records to skip (default 0)
    offset: Option<usize>,
    /// Page size (default 10, capped at 50)
    limit: Option<usize>,
    /// Presence switches the response to the owner/status summary
    summary: Option<String>,
}

impl ListParams {
    fn to_filter(&self) -> IssueFilter {
        IssueFilter {
            status: self.status.clone(),
            effort_lte: self.effort_lte,
            effort_gte: self.effort_gte,
        }
    }
}

/// Paged list envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    #[serde(rename = "_metadata")]
    pub metadata: ListMetadata,
    pub records: Vec<Issue>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListMetadata {
    /// Matching records before pagination
    #[serde(rename = "totalCount")]
    pub total_count: usize,
}

/// List issues matching the filter, paged, or the summary count map
async fn list_issues<S: IssueStore>(
    State(store): State<AppState<S>>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let matched = store
        .find_issues(&params.to_filter())
        .map_err(internal_error)?;

    if params.summary.is_some() {
        let counts = query::summarize(&matched);
        return Ok(Json(counts).into_response());
    }

    let page = Page::new(params.offset, params.limit);
    let records = query::paginate(&matched, page);
    Ok(Json(ListResponse {
        metadata: ListMetadata {
            total_count: matched.len(),
        },
        records,
    })
    .into_response())
}

/// Create an issue from a partial record
async fn create_issue<S: IssueStore>(
    State(store): State<AppState<S>>,
    Json(body): Json<Value>,
) -> Result<Json<Issue>, ApiError> {
    let Value::Object(mut record) = body else {
        return Err(unprocessable("Issue must be a JSON object."));
    };

    // Server-side creation stamp, and the default status for new records
    record.insert(
        "created".to_string(),
        serde_json::to_value(Utc::now()).map_err(|e| internal_error(e.into()))?,
    );
    if record.get("status").map_or(true, validation::is_falsy) {
        record.insert(
            "status".to_string(),
            Value::String(Status::New.as_str().to_string()),
        );
    }

    let new_issue = sanitize_record(&record)?;
    store
        .insert_issue(new_issue)
        .map(Json)
        .map_err(internal_error)
}

/// Get single issue by id
async fn get_issue<S: IssueStore>(
    Path(id): Path<String>,
    State(store): State<AppState<S>>,
) -> Result<Json<Issue>, ApiError> {
    let id = parse_issue_id(&id)?;
    match store.load_issue(&id) {
        Ok(Some(issue)) => Ok(Json(issue)),
        Ok(None) => Err(issue_not_found(&id)),
        Err(e) => Err(internal_error(e)),
    }
}

/// Replace an issue's mutable fields
async fn update_issue<S: IssueStore>(
    Path(id): Path<String>,
    State(store): State<AppState<S>>,
    Json(body): Json<Value>,
) -> Result<Json<Issue>, ApiError> {
    let id = parse_issue_id(&id)?;
    let Value::Object(record) = body else {
        return Err(unprocessable("Issue must be a JSON object."));
    };

    let fields = sanitize_record(&record)?;
    match store.replace_issue(&id, fields) {
        Ok(Some(issue)) => Ok(Json(issue)),
        Ok(None) => Err(issue_not_found(&id)),
        Err(e) => Err(internal_error(e)),
    }
}

/// Delete response: `OK`, or a warning when the id was already gone
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub status: String,
}

/// Delete an issue by id
async fn delete_issue<S: IssueStore>(
    Path(id): Path<String>,
    State(store): State<AppState<S>>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_issue_id(&id)?;
    match store.delete_issue(&id) {
        Ok(true) => Ok(Json(DeleteResponse {
            status: "OK".to_string(),
        })),
        // Deleting a missing record answers 200 with a warning, not an
        // error. Kept as-is pending a product decision.
        Ok(false) => Ok(Json(DeleteResponse {
            status: "Warning: object not found".to_string(),
        })),
        Err(e) => Err(internal_error(e)),
    }
}

/// Validate the raw record and convert it to the store's field set.
fn sanitize_record(record: &serde_json::Map<String, Value>) -> Result<NewIssue, ApiError> {
    let sanitized = validation::validate(record).map_err(|e| unprocessable(e.to_string()))?;
    serde_json::from_value(Value::Object(sanitized)).map_err(|e| unprocessable(e.to_string()))
}

/// Path ids must be well-formed UUIDs; anything else is a client error.
fn parse_issue_id(raw: &str) -> Result<String, ApiError> {
    Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|e| unprocessable(format!("Invalid issue ID. {}", e)))
}
