//! Create and redirect flows
//!
//! [`LinkService`] validates and stores new links, and resolves short ids
//! against their expiration policy. Expired links are deleted by the visit
//! that observes the expiry, detached from the response.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::database::LinkStore;
use crate::error::LinkError;
use crate::model::{CreateRequest, ExpirationPolicy, LinkRecord};

/// Number of trailing id characters that form the short id
pub const SHORT_ID_LEN: usize = 6;

/// Returns the short id for a store-assigned record id
pub fn derive_short_id(id: &str) -> &str {
    let start = id
        .char_indices()
        .rev()
        .nth(SHORT_ID_LEN - 1)
        .map_or(0, |(idx, _)| idx);
    &id[start..]
}

/// What a visit to a live record should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Redirect without touching the record
    Redirect,
    /// Increment the click counter, then redirect
    CountAndRedirect,
    /// Serve the fallback page and delete the record
    Expire,
}

/// Applies a record's expiration policy at time `now`
pub fn decide(record: &LinkRecord, now: DateTime<Utc>) -> Decision {
    match record.policy {
        ExpirationPolicy::Clicks { max_clicks } if record.clicks >= max_clicks => Decision::Expire,
        ExpirationPolicy::Clicks { .. } => Decision::CountAndRedirect,
        ExpirationPolicy::Days { expiration_date } if now >= expiration_date => Decision::Expire,
        ExpirationPolicy::Days { .. } => Decision::Redirect,
    }
}

/// Outcome of visiting a short id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit {
    /// Follow the link to this destination
    Redirect(String),
    /// No live record has this short id
    NotFound,
    /// The record just expired and is being deleted
    Expired,
}

#[derive(Clone)]
pub struct LinkService {
    store: Arc<dyn LinkStore>,
    base_url: String,
}

impl LinkService {
    pub fn new(store: Arc<dyn LinkStore>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { store, base_url }
    }

    pub fn store(&self) -> &Arc<dyn LinkStore> {
        &self.store
    }

    pub fn short_url(&self, short_id: &str) -> String {
        format!("{}/{}", self.base_url, short_id)
    }

    /// Validates `request`, stores it and returns the fully-qualified short URL
    ///
    /// The record is written twice: once to obtain its id, then again to
    /// attach the derived short id. A failure between the two writes leaves
    /// a record that no short id resolves to.
    ///
    /// Store I/O runs on the blocking pool.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub async fn create(&self, request: CreateRequest) -> Result<String, LinkError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.create_blocking(request)).await?
    }

    /// Resolves `short_id`, counting the click or expiring the record
    ///
    /// An expired record is deleted by a detached task; the returned
    /// [`Visit::Expired`] does not wait for it.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub async fn visit(&self, short_id: &str) -> Result<Visit, LinkError> {
        let service = self.clone();
        let short_id = short_id.to_string();
        tokio::task::spawn_blocking(move || service.visit_blocking(&short_id)).await?
    }

    fn create_blocking(&self, request: CreateRequest) -> Result<String, LinkError> {
        let link = request.validate()?;

        let record = self.store.insert(link)?;
        let short_id = derive_short_id(&record.id);
        self.store.assign_short_id(&record.id, short_id)?;

        info!(id = %record.id, short_id, "link created");
        Ok(self.short_url(short_id))
    }

    fn visit_blocking(&self, short_id: &str) -> Result<Visit, LinkError> {
        let Some(record) = self.store.find_by_short_id(short_id)? else {
            debug!(short_id, "no link for short id");
            return Ok(Visit::NotFound);
        };

        match decide(&record, Utc::now()) {
            Decision::Redirect => Ok(Visit::Redirect(record.redirect_to)),
            Decision::CountAndRedirect => {
                if let Err(err) = self.store.update_clicks(&record.id, record.clicks + 1) {
                    warn!(id = %record.id, error = %err, "failed to count click");
                }
                Ok(Visit::Redirect(record.redirect_to))
            }
            Decision::Expire => {
                info!(id = %record.id, short_id, "link expired");
                self.expire(record.id);
                Ok(Visit::Expired)
            }
        }
    }

    /// Deletes a record in the background; failures are only logged
    fn expire(&self, id: String) {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || match store.delete(&id) {
            Ok(true) => debug!(id = %id, "expired link deleted"),
            Ok(false) => debug!(id = %id, "expired link already gone"),
            Err(err) => warn!(id = %id, error = %err, "failed to delete expired link"),
        });
    }
}
