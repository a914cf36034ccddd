//! Route definitions

use axum::routing::{get, post};
use axum::Router;

use crate::handler::{client_app, create_link, redirect_link};
use crate::middleware::cors_layer;
use crate::state::AppState;

/// Creates the application router
///
/// # Route Definitions
///
/// - `POST /create` - Creates a short link
/// - `GET /{short_id}` - Redirects to the link destination or shows the fallback page
/// - any other path - Client application (static files, entry page)
///
/// # Example Usage
///
/// ```no_run
/// # use std::sync::Arc;
/// # use templink::database::{init_db, RedbLinkStore};
/// # use templink::frontend::Frontend;
/// # use templink::route::create_app;
/// # use templink::service::LinkService;
/// # use templink::state::AppState;
/// # let db = init_db("data.db").unwrap();
/// let store = RedbLinkStore::new(Arc::new(db));
/// let links = LinkService::new(Arc::new(store), "http://localhost:8000");
/// let app = create_app(AppState::new(links, Frontend::embedded()));
/// // axum::serve(listener, app).await.unwrap();
/// ```
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/create", post(create_link))
        .route("/{short_id}", get(redirect_link))
        .fallback(client_app)
        .layer(cors_layer())
        .with_state(state)
}
