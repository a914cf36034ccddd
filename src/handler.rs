//! HTTP request handlers
//!
//! - `POST /create` stores a new link and answers with the JSON envelope
//! - `GET /{short_id}` follows a link or falls back to the not-found page
//! - everything else is answered by the client application

use axum::{
    extract::{rejection::JsonRejection, Path, Request, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::error::LinkError;
use crate::model::{ApiResponse, CreateRequest};
use crate::service::Visit;
use crate::state::AppState;

pub const CREATED_MESSAGE: &str = "Your link was created and copied to your clipboard!";

/// Creates a new short link
///
/// # Request Body
///
/// ```json
/// {
///   "redirectTo": "https://example.com",
///   "type": "CLICKS",
///   "maxClicks": 1,
///   "expirationDate": null
/// }
/// ```
///
/// # Response
///
/// - **200 OK** - `{"type":"success","statusCode":200,"message":...,"data":"<short url>"}`
/// - **400 Bad Request** - malformed body or the first invalid field
/// - **500 Internal Server Error** - the link could not be stored
pub async fn create_link(
    State(state): State<AppState>,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> Result<ApiResponse, LinkError> {
    let Json(request) = payload.map_err(|rejection| LinkError::MalformedBody(rejection.body_text()))?;
    let short_url = state.links.create(request).await?;

    Ok(ApiResponse::success(CREATED_MESSAGE, short_url))
}

/// Follows a short link
///
/// # Response
///
/// - **302 Found** - the link is live; `Location` holds its destination
/// - **200 OK** - fallback page for unknown or just-expired links
/// - **500 Internal Server Error** - the store could not be read
pub async fn redirect_link(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
    request: Request,
) -> Response {
    match state.links.visit(&short_id).await {
        Ok(Visit::Redirect(destination)) => {
            (StatusCode::FOUND, [(header::LOCATION, destination)]).into_response()
        }
        Ok(Visit::NotFound | Visit::Expired) => state.frontend.serve(request).await,
        Err(err) => err.into_response(),
    }
}

/// Serves the client application for any other path
pub async fn client_app(State(state): State<AppState>, request: Request) -> Response {
    if !matches!(*request.method(), Method::GET | Method::HEAD) {
        return StatusCode::NOT_FOUND.into_response();
    }
    state.frontend.serve(request).await
}
