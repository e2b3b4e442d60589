use axum::{
    body::Body,
    extract::{Extension, Path, Query, State},
    http::{HeaderName, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use base64::Engine as _;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use teloxide::types::ChatId;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::ai::AiConfig;
use crate::analysis::{analyze_notice, NoticeInput};
use crate::country::Country;
use crate::db::{ChecklistChange, Database, EventFilter, EventUpdate, NewEvent, StoredEvent};
use crate::parser::{EventDiagnostics, ParsedEvent};

#[derive(Clone)]
pub struct ApiState {
    pub db: Database,
    /// `None` disables `/api/analyze`.
    pub ai: Option<AiConfig>,
    pub default_country: Country,
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub rate_limit_per_second: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    chat_id: Option<i64>,
    country: Option<String>,
    text: Option<String>,
    /// Plain base64 or a `data:` URL.
    image_base64: Option<String>,
    #[serde(default)]
    save: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct AnalyzeResponse {
    country: String,
    raw_result: String,
    parsed_events: Vec<ParsedEvent>,
    diagnostics: Vec<EventDiagnostics>,
    saved_event_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct EventsQuery {
    #[serde(default)]
    upcoming: bool,
    /// Reference day for `upcoming`, defaults to the local date.
    today: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EventsResponse {
    events: Vec<StoredEvent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CreatedResponse {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct ChecklistRequest {
    item_name: String,
}

#[derive(Debug, Deserialize)]
struct ChecklistUpdateRequest {
    item_name: Option<String>,
    is_checked: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ChildRequest {
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChildrenResponse {
    children: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CountryBody {
    country: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct MutationResponse {
    affected: u64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

#[derive(Clone, Debug)]
struct RequestContext {
    request_id: String,
}

#[derive(Debug)]
struct RateLimiter {
    limit: u64,
    window: Duration,
    timestamps: Mutex<VecDeque<Instant>>,
}

pub fn router(state: ApiState, config: ApiConfig) -> Router {
    let request_id_layer = middleware::from_fn(assign_request_id);
    let mut router = Router::new()
        .route("/api/health", get(health))
        .route("/api/analyze", post(analyze))
        .route(
            "/api/chats/{chat_id}/events",
            get(list_events).post(create_event),
        )
        .route(
            "/api/chats/{chat_id}/events/{event_id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route(
            "/api/chats/{chat_id}/events/{event_id}/checklist",
            post(add_checklist_item),
        )
        .route(
            "/api/chats/{chat_id}/checklist/{item_id}",
            put(update_checklist_item).delete(delete_checklist_item),
        )
        .route(
            "/api/chats/{chat_id}/children",
            get(list_children).post(add_child),
        )
        .route(
            "/api/chats/{chat_id}/children/{name}",
            put(rename_child).delete(delete_child),
        )
        .route(
            "/api/chats/{chat_id}/country",
            get(get_country).put(set_country),
        )
        .route("/api/chats/{chat_id}/data", axum::routing::delete(reset_chat))
        .with_state(state);

    if let Some(rate_limit) = config.rate_limit_per_second {
        let limiter = Arc::new(RateLimiter {
            limit: rate_limit,
            window: Duration::from_secs(1),
            timestamps: Mutex::new(VecDeque::new()),
        });
        let rate_limit_layer = middleware::from_fn_with_state(limiter, rate_limit_requests);
        router = router.layer(rate_limit_layer);
    }

    router.layer(request_id_layer)
}

async fn health() -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
        .into_response()
}

async fn analyze(
    State(state): State<ApiState>,
    Extension(request): Extension<RequestContext>,
    Json(payload): Json<AnalyzeRequest>,
) -> Response {
    let Some(config) = state.ai.as_ref() else {
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "analysis_disabled");
    };

    let image = match payload.image_base64.as_deref().map(decode_image) {
        Some(Ok(bytes)) => Some(bytes),
        Some(Err(err)) => {
            tracing::debug!(request_id = %request.request_id, error = %err, "Invalid image payload");
            return error_response(StatusCode::BAD_REQUEST, "invalid_image");
        }
        None => None,
    };
    let input = NoticeInput {
        text: payload.text,
        image,
    };
    let chat_id = payload.chat_id.map(ChatId);
    if input.is_empty() || (payload.save && chat_id.is_none()) {
        return error_response(StatusCode::BAD_REQUEST, "invalid_request");
    }

    let country = match resolve_country(&state, chat_id, payload.country.as_deref()).await {
        Ok(country) => country,
        Err(err) => return db_error(&request, "Failed to resolve country", &err),
    };

    let analysis = match analyze_notice(config, country, input).await {
        Ok(analysis) => analysis,
        Err(err) => {
            tracing::warn!(request_id = %request.request_id, error = %err, "Analysis failed");
            return (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: "model_error",
                    detail: Some(err.to_string()),
                }),
            )
                .into_response();
        }
    };

    let mut saved_event_ids = Vec::new();
    if let (true, Some(chat_id)) = (payload.save, chat_id) {
        for event in &analysis.outcome.events {
            match state
                .db
                .save_event(chat_id, &NewEvent::from(event.clone()))
                .await
            {
                Ok(id) => saved_event_ids.push(id),
                Err(err) => return db_error(&request, "Failed to save analyzed event", &err),
            }
        }
    }

    tracing::debug!(
        request_id = %request.request_id,
        country = country.key(),
        events = analysis.outcome.events.len(),
        saved = saved_event_ids.len(),
        "Analyzed notice via API"
    );
    let response = AnalyzeResponse {
        country: country.key().to_string(),
        raw_result: analysis.raw,
        parsed_events: analysis.outcome.events,
        diagnostics: analysis.outcome.diagnostics,
        saved_event_ids,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Explicit country first, then the chat's setting, then the default.
/// An unrecognized explicit value maps to the generic profile.
async fn resolve_country(
    state: &ApiState,
    chat_id: Option<ChatId>,
    explicit: Option<&str>,
) -> anyhow::Result<Country> {
    if let Some(raw) = explicit.filter(|c| !c.trim().is_empty()) {
        return Ok(raw.parse().unwrap_or_else(|_| Country::from_key(raw)));
    }
    if let Some(chat_id) = chat_id {
        if let Some(key) = state.db.get_country(chat_id).await? {
            return Ok(Country::from_key(&key));
        }
    }
    Ok(state.default_country)
}

fn decode_image(raw: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let data = match raw.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => raw,
    };
    base64::engine::general_purpose::STANDARD.decode(data.trim())
}

async fn list_events(
    State(state): State<ApiState>,
    Extension(request): Extension<RequestContext>,
    Path(chat_id): Path<i64>,
    Query(query): Query<EventsQuery>,
) -> Response {
    let filter = if query.upcoming {
        EventFilter::Upcoming(
            query
                .today
                .unwrap_or_else(|| chrono::Local::now().date_naive()),
        )
    } else {
        EventFilter::All
    };
    let events = match state.db.list_events(ChatId(chat_id), filter).await {
        Ok(events) => events,
        Err(err) => return db_error(&request, "Failed to load events", &err),
    };
    tracing::debug!(
        request_id = %request.request_id,
        chat_id,
        ?filter,
        count = events.len(),
        "Read events"
    );
    (StatusCode::OK, Json(EventsResponse { events })).into_response()
}

async fn create_event(
    State(state): State<ApiState>,
    Extension(request): Extension<RequestContext>,
    Path(chat_id): Path<i64>,
    Json(payload): Json<NewEvent>,
) -> Response {
    match state.db.save_event(ChatId(chat_id), &payload).await {
        Ok(id) => {
            tracing::debug!(request_id = %request.request_id, chat_id, event_id = id, "Created event via API");
            (StatusCode::CREATED, Json(CreatedResponse { id })).into_response()
        }
        Err(err) => db_error(&request, "Failed to create event", &err),
    }
}

async fn get_event(
    State(state): State<ApiState>,
    Extension(request): Extension<RequestContext>,
    Path((chat_id, event_id)): Path<(i64, i64)>,
) -> Response {
    match state.db.get_event(ChatId(chat_id), event_id).await {
        Ok(Some(event)) => (StatusCode::OK, Json(event)).into_response(),
        Ok(None) => not_found_response(),
        Err(err) => db_error(&request, "Failed to load event", &err),
    }
}

async fn update_event(
    State(state): State<ApiState>,
    Extension(request): Extension<RequestContext>,
    Path((chat_id, event_id)): Path<(i64, i64)>,
    Json(payload): Json<EventUpdate>,
) -> Response {
    if payload.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "invalid_request");
    }
    let chat = ChatId(chat_id);
    match state.db.update_event(chat, event_id, &payload).await {
        Ok(true) => {}
        Ok(false) => return not_found_response(),
        Err(err) => return db_error(&request, "Failed to update event", &err),
    }
    tracing::debug!(request_id = %request.request_id, chat_id, event_id, "Updated event via API");
    match state.db.get_event(chat, event_id).await {
        Ok(Some(event)) => (StatusCode::OK, Json(event)).into_response(),
        Ok(None) => not_found_response(),
        Err(err) => db_error(&request, "Failed to reload event", &err),
    }
}

async fn delete_event(
    State(state): State<ApiState>,
    Extension(request): Extension<RequestContext>,
    Path((chat_id, event_id)): Path<(i64, i64)>,
) -> Response {
    match state.db.delete_event(ChatId(chat_id), event_id).await {
        Ok(true) => {
            tracing::debug!(request_id = %request.request_id, chat_id, event_id, "Deleted event via API");
            (StatusCode::OK, Json(MutationResponse { affected: 1 })).into_response()
        }
        Ok(false) => not_found_response(),
        Err(err) => db_error(&request, "Failed to delete event", &err),
    }
}

async fn add_checklist_item(
    State(state): State<ApiState>,
    Extension(request): Extension<RequestContext>,
    Path((chat_id, event_id)): Path<(i64, i64)>,
    Json(payload): Json<ChecklistRequest>,
) -> Response {
    let chat = ChatId(chat_id);
    match state.db.get_event(chat, event_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found_response(),
        Err(err) => return db_error(&request, "Failed to load event", &err),
    }
    match state
        .db
        .add_checklist_item(chat, event_id, &payload.item_name)
        .await
    {
        Ok(Some(id)) => (StatusCode::CREATED, Json(CreatedResponse { id })).into_response(),
        Ok(None) => error_response(StatusCode::BAD_REQUEST, "invalid_item"),
        Err(err) => db_error(&request, "Failed to add checklist item", &err),
    }
}

async fn update_checklist_item(
    State(state): State<ApiState>,
    Extension(request): Extension<RequestContext>,
    Path((chat_id, item_id)): Path<(i64, i64)>,
    Json(payload): Json<ChecklistUpdateRequest>,
) -> Response {
    let chat = ChatId(chat_id);
    if payload.item_name.is_none() && payload.is_checked.is_none() {
        return error_response(StatusCode::BAD_REQUEST, "invalid_request");
    }

    if let Some(name) = payload.item_name.as_deref() {
        match state.db.rename_checklist_item(chat, item_id, name).await {
            Ok(ChecklistChange::Applied) => {}
            Ok(ChecklistChange::Rejected) => {
                return error_response(StatusCode::BAD_REQUEST, "invalid_item")
            }
            Ok(ChecklistChange::NotFound) => return not_found_response(),
            Err(err) => return db_error(&request, "Failed to rename checklist item", &err),
        }
    }
    if let Some(checked) = payload.is_checked {
        match state.db.set_checklist_item(chat, item_id, checked).await {
            Ok(true) => {}
            Ok(false) => return not_found_response(),
            Err(err) => return db_error(&request, "Failed to update checklist item", &err),
        }
    }

    tracing::debug!(request_id = %request.request_id, chat_id, item_id, "Updated checklist item via API");
    (StatusCode::OK, Json(MutationResponse { affected: 1 })).into_response()
}

async fn delete_checklist_item(
    State(state): State<ApiState>,
    Extension(request): Extension<RequestContext>,
    Path((chat_id, item_id)): Path<(i64, i64)>,
) -> Response {
    match state.db.delete_checklist_item(ChatId(chat_id), item_id).await {
        Ok(true) => (StatusCode::OK, Json(MutationResponse { affected: 1 })).into_response(),
        Ok(false) => not_found_response(),
        Err(err) => db_error(&request, "Failed to delete checklist item", &err),
    }
}

async fn list_children(
    State(state): State<ApiState>,
    Extension(request): Extension<RequestContext>,
    Path(chat_id): Path<i64>,
) -> Response {
    match state.db.list_children(ChatId(chat_id)).await {
        Ok(children) => (StatusCode::OK, Json(ChildrenResponse { children })).into_response(),
        Err(err) => db_error(&request, "Failed to load children", &err),
    }
}

async fn add_child(
    State(state): State<ApiState>,
    Extension(request): Extension<RequestContext>,
    Path(chat_id): Path<i64>,
    Json(payload): Json<ChildRequest>,
) -> Response {
    if payload.name.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "invalid_request");
    }
    match state.db.add_child(ChatId(chat_id), &payload.name).await {
        Ok(true) => (StatusCode::CREATED, Json(MutationResponse { affected: 1 })).into_response(),
        Ok(false) => error_response(StatusCode::CONFLICT, "duplicate"),
        Err(err) => db_error(&request, "Failed to add child", &err),
    }
}

async fn rename_child(
    State(state): State<ApiState>,
    Extension(request): Extension<RequestContext>,
    Path((chat_id, name)): Path<(i64, String)>,
    Json(payload): Json<ChildRequest>,
) -> Response {
    if payload.name.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "invalid_request");
    }
    match state
        .db
        .rename_child(ChatId(chat_id), &name, &payload.name)
        .await
    {
        Ok(true) => (StatusCode::OK, Json(MutationResponse { affected: 1 })).into_response(),
        Ok(false) => not_found_response(),
        Err(err) => db_error(&request, "Failed to rename child", &err),
    }
}

async fn delete_child(
    State(state): State<ApiState>,
    Extension(request): Extension<RequestContext>,
    Path((chat_id, name)): Path<(i64, String)>,
) -> Response {
    match state.db.delete_child(ChatId(chat_id), &name).await {
        Ok(true) => (StatusCode::OK, Json(MutationResponse { affected: 1 })).into_response(),
        Ok(false) => not_found_response(),
        Err(err) => db_error(&request, "Failed to delete child", &err),
    }
}

async fn get_country(
    State(state): State<ApiState>,
    Extension(request): Extension<RequestContext>,
    Path(chat_id): Path<i64>,
) -> Response {
    match resolve_country(&state, Some(ChatId(chat_id)), None).await {
        Ok(country) => (
            StatusCode::OK,
            Json(CountryBody {
                country: country.key().to_string(),
            }),
        )
            .into_response(),
        Err(err) => db_error(&request, "Failed to load country", &err),
    }
}

async fn set_country(
    State(state): State<ApiState>,
    Extension(request): Extension<RequestContext>,
    Path(chat_id): Path<i64>,
    Json(payload): Json<CountryBody>,
) -> Response {
    let Ok(country) = payload.country.parse::<Country>() else {
        return error_response(StatusCode::BAD_REQUEST, "unknown_country");
    };
    match state.db.set_country(ChatId(chat_id), country.key()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(CountryBody {
                country: country.key().to_string(),
            }),
        )
            .into_response(),
        Err(err) => db_error(&request, "Failed to store country", &err),
    }
}

async fn reset_chat(
    State(state): State<ApiState>,
    Extension(request): Extension<RequestContext>,
    Path(chat_id): Path<i64>,
) -> Response {
    match state.db.reset_chat(ChatId(chat_id)).await {
        Ok(affected) => {
            tracing::debug!(request_id = %request.request_id, chat_id, affected, "Reset chat via API");
            (StatusCode::OK, Json(MutationResponse { affected })).into_response()
        }
        Err(err) => db_error(&request, "Failed to reset chat", &err),
    }
}

async fn assign_request_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
    });
    let method = req.method().clone();
    let uri = req.uri().clone();
    let mut response = next.run(req).await;
    let status = response.status();
    if let Ok(header_value) = request_id.parse() {
        response
            .headers_mut()
            .insert(HeaderName::from_static("x-request-id"), header_value);
    }
    tracing::debug!(
        request_id,
        method = %method,
        uri = %uri,
        status = %status,
        "API request completed"
    );
    response
}

async fn rate_limit_requests(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let now = Instant::now();
    let mut timestamps = limiter.timestamps.lock().await;
    while let Some(ts) = timestamps.front() {
        if now.duration_since(*ts) >= limiter.window {
            timestamps.pop_front();
        } else {
            break;
        }
    }

    if timestamps.len() as u64 >= limiter.limit {
        let request_id = req
            .extensions()
            .get::<RequestContext>()
            .map(|ctx| ctx.request_id.as_str())
            .unwrap_or("unknown");
        tracing::debug!(request_id, "API rate limit exceeded");
        return error_response(StatusCode::TOO_MANY_REQUESTS, "rate_limited");
    }
    timestamps.push_back(now);
    drop(timestamps);
    next.run(req).await
}

fn error_response(status: StatusCode, error: &'static str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error,
            detail: None,
        }),
    )
        .into_response()
}

fn not_found_response() -> Response {
    error_response(StatusCode::NOT_FOUND, "not_found")
}

fn db_error(request: &RequestContext, what: &str, err: &anyhow::Error) -> Response {
    tracing::error!(request_id = %request.request_id, error = %err, "{what}");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
}
