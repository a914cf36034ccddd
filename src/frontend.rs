//! Client entry page and not-found fallback
//!
//! When a built client application is available its files are served
//! directly, with `index.html` answering every path that is not a file.
//! Without one, small built-in pages stand in.

use std::path::{Path, PathBuf};

use axum::{
    extract::Request,
    response::{Html, IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};
use tracing::warn;

pub const INDEX_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Temp Lnk</title></head>
<body>
<h1>Temp Lnk</h1>
<p>Create a short link that expires after a number of clicks or days by sending a <code>POST /create</code> request.</p>
</body>
</html>
"#;

pub const NOT_FOUND_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Temp Lnk</title></head>
<body>
<h1>Uh oh!</h1>
<p>It seems like this link has expired or never existed in the first place. Maybe you typed it in wrong (case matters!)?</p>
</body>
</html>
"#;

#[derive(Clone)]
pub struct Frontend {
    assets: Option<ServeDir<ServeFile>>,
}

impl Frontend {
    /// Serves the client build in `dir` if it contains an `index.html`
    pub fn new(dir: Option<&Path>) -> Self {
        let Some(dir) = dir else {
            return Self::embedded();
        };

        let index: PathBuf = dir.join("index.html");
        if !index.is_file() {
            warn!(dir = %dir.display(), "client build not found, using built-in pages");
            return Self::embedded();
        }

        Self {
            assets: Some(ServeDir::new(dir).fallback(ServeFile::new(index))),
        }
    }

    /// Built-in pages only
    pub fn embedded() -> Self {
        Self { assets: None }
    }

    /// Answers `request` with a static file, the entry page or the fallback page
    pub async fn serve(&self, request: Request) -> Response {
        match &self.assets {
            Some(assets) => match assets.clone().oneshot(request).await {
                Ok(response) => response.into_response(),
                Err(never) => match never {},
            },
            None if request.uri().path() == "/" => Html(INDEX_PAGE).into_response(),
            None => Html(NOT_FOUND_PAGE).into_response(),
        }
    }
}
