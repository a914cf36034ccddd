use crate::frontend::Frontend;
use crate::service::LinkService;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    pub links: LinkService,
    pub frontend: Frontend,
}

impl AppState {
    pub fn new(links: LinkService, frontend: Frontend) -> Self {
        Self { links, frontend }
    }
}
