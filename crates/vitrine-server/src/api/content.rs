//! Content collection routes
//!
//! Both collections share one set of handlers, generic over the content kind.
//! Listing is public; create, patch and delete require an admin token.

use actix_web::{HttpRequest, HttpResponse, Scope, web};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use vitrine_common::VitrineError;
use vitrine_content::{BlogKind, ContentKind, ContentService, FaqKind, ListQuery, RawInput};

use crate::{auth::require_admin, error::Result, model::common::AppState};

const BODY_NOT_OBJECT: &str = "Request body must be a JSON object";
const BODY_MALFORMED: &str = "Request body is not valid JSON";

/// A content kind exposed over HTTP
pub trait ContentRoute: ContentKind + Sized {
    /// Scope path of the collection
    const PATH: &'static str;

    fn service(state: &AppState) -> &ContentService<Self>;
}

impl ContentRoute for BlogKind {
    const PATH: &'static str = "/service-blogs";

    fn service(state: &AppState) -> &ContentService<Self> {
        &state.blogs
    }
}

impl ContentRoute for FaqKind {
    const PATH: &'static str = "/service-faqs";

    fn service(state: &AppState) -> &ContentService<Self> {
        &state.faqs
    }
}

/// Query string of the list route
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    #[serde(rename = "serviceId")]
    pub service_id: Option<String>,
    pub slug: Option<String>,
    pub limit: Option<String>,
}

impl From<&ListParams> for ListQuery {
    fn from(params: &ListParams) -> Self {
        ListQuery::from_params(
            params.status.as_deref(),
            params.service_id.as_deref(),
            params.slug.as_deref(),
            params.limit.as_deref(),
        )
    }
}

pub fn routes<K: ContentRoute>() -> Scope {
    web::scope(K::PATH)
        .route("", web::get().to(list::<K>))
        .route("", web::post().to(create::<K>))
        .route("/{id}", web::patch().to(patch::<K>))
        .route("/{id}", web::delete().to(delete::<K>))
}

fn parse_id<K: ContentKind>(raw: &str) -> Result<i64> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(VitrineError::Validation(K::INVALID_ID.to_string()).into()),
    }
}

/// Parse a write body once the caller is authorized. An empty body is `{}`.
fn parse_body(body: &[u8]) -> Result<RawInput> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RawInput::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(input)) => Ok(input),
        Ok(_) => Err(VitrineError::Validation(BODY_NOT_OBJECT.to_string()).into()),
        Err(_) => Err(VitrineError::Validation(BODY_MALFORMED.to_string()).into()),
    }
}

async fn list<K: ContentRoute>(
    data: web::Data<AppState>,
    params: web::Query<ListParams>,
) -> Result<HttpResponse> {
    let query = ListQuery::from(&params.into_inner());
    let entries = K::service(&data).list(&query).await?;

    Ok(HttpResponse::Ok().json(entries))
}

async fn create<K: ContentRoute>(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let admin = require_admin(&req)?;
    let input = parse_body(&body)?;

    let created = K::service(&data).create(&input).await?;
    info!(
        collection = K::COLLECTION,
        id = K::id(&created),
        username = %admin.username,
        "Content entry created"
    );

    Ok(HttpResponse::Created().json(created))
}

async fn patch<K: ContentRoute>(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let admin = require_admin(&req)?;
    let id = parse_id::<K>(&path)?;
    let input = parse_body(&body)?;

    let updated = K::service(&data).patch(id, &input).await?;
    info!(
        collection = K::COLLECTION,
        id,
        username = %admin.username,
        "Content entry updated"
    );

    Ok(HttpResponse::Ok().json(updated))
}

async fn delete<K: ContentRoute>(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let admin = require_admin(&req)?;
    let id = parse_id::<K>(&path)?;

    K::service(&data).delete(id).await?;
    info!(
        collection = K::COLLECTION,
        id,
        username = %admin.username,
        "Content entry deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
