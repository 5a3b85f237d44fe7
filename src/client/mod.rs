//! The incident board client.
//!
//! Owns the in-memory mirror of the remote collection and mediates every
//! operation against the store. Consistency strategy is reload-after-mutate:
//! any successful write triggers a full refetch of the collection instead of
//! patching the cache in place, so the cache never drifts from the store.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::errors::ClientError;
use crate::media;
use crate::models::{Incident, IncidentStatus, NewIncident};
use crate::notify::{ConfirmPrompt, Notifier, Severity};
use crate::store::RemoteStore;
use crate::view::{self, BoardView, FilterContext};

/// Attempts for a comment update whose precondition keeps getting lost.
const MAX_COMMENT_ATTEMPTS: usize = 3;

/// Outcome of a load: either the cache was replaced, or a newer load was
/// initiated while this one was in flight and the response was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied(usize),
    Superseded,
}

/// Outcome of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    Cancelled,
}

/// The state container: the mirrored collection plus the context it was
/// loaded under.
#[derive(Debug)]
struct BoardState {
    incidents: Vec<Incident>,
    filter: FilterContext,
}

/// Client for the incident board.
pub struct IncidentClient {
    store: RemoteStore,
    notifier: Arc<dyn Notifier>,
    prompt: Arc<dyn ConfirmPrompt>,
    state: RwLock<BoardState>,
    load_seq: AtomicU64,
}

impl IncidentClient {
    pub fn new(
        store: RemoteStore,
        notifier: Arc<dyn Notifier>,
        prompt: Arc<dyn ConfirmPrompt>,
    ) -> Self {
        Self {
            store,
            notifier,
            prompt,
            state: RwLock::new(BoardState {
                incidents: Vec::new(),
                filter: FilterContext::All,
            }),
            load_seq: AtomicU64::new(0),
        }
    }

    /// Fetch the collection, optionally status-filtered, and replace the
    /// cache in full. On failure the cache is left untouched and the error is
    /// returned; the caller renders an error state instead of stale data.
    ///
    /// Each load claims a generation number. A completion that is no longer
    /// the latest initiated load is discarded, so responses arriving out of
    /// order cannot clobber newer state.
    pub async fn load(&self, status: Option<IncidentStatus>) -> Result<LoadOutcome, ClientError> {
        let generation = self.load_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let incidents = self.store.list(status.as_ref()).await?;

        let mut state = self.state.write().await;
        if self.load_seq.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "discarding superseded load response");
            return Ok(LoadOutcome::Superseded);
        }

        let count = incidents.len();
        state.incidents = incidents;
        state.filter = match status {
            Some(status) => FilterContext::Status(status),
            None => FilterContext::All,
        };
        Ok(LoadOutcome::Applied(count))
    }

    /// Validate and submit a new incident, encoding any picked files first.
    ///
    /// Validation failures block submission entirely and never reach the
    /// wire. Files the pipeline rejects produce per-file warnings through the
    /// notification sink without aborting the submission. The draft is only
    /// borrowed, so a failed submit leaves it intact for retry.
    pub async fn create(
        &self,
        draft: &NewIncident,
        files: &[PathBuf],
    ) -> Result<Incident, ClientError> {
        draft.validate()?;

        let batch = media::encode_attachments(files).await;
        for rejected in &batch.rejected {
            self.notifier.notify(
                &format!("Skipped {}: {}", rejected.path.display(), rejected.reason),
                Severity::Warning,
            );
        }

        let created = self.store.create(draft, &batch.attachments).await?;
        self.reload_after_mutate().await?;
        Ok(created)
    }

    /// Delete an incident after interactive confirmation. A declined prompt
    /// is a no-op and issues no network call; a failed delete never mutates
    /// the cache speculatively.
    pub async fn remove(&self, id: &str) -> Result<RemoveOutcome, ClientError> {
        let message = format!("Delete incident {}? This cannot be undone.", id);
        if !self.prompt.confirm(&message) {
            tracing::debug!(%id, "delete declined at prompt");
            return Ok(RemoveOutcome::Cancelled);
        }

        self.store.delete(id).await?;
        self.reload_after_mutate().await?;
        Ok(RemoveOutcome::Removed)
    }

    /// Append a comment to an incident.
    ///
    /// The protocol is a full-array replace, so the client fetches the target
    /// fresh, appends, and writes the whole sequence back under an `If-Match`
    /// precondition when the store supplies an entity tag. A lost
    /// precondition triggers refetch-and-retry, bounded at
    /// [`MAX_COMMENT_ATTEMPTS`]. Stores that emit no validator degrade to an
    /// unconditioned replace, where a concurrent writer can still win.
    pub async fn add_comment(&self, id: &str, text: &str) -> Result<Incident, ClientError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::Validation(
                "Comment text must not be empty".to_string(),
            ));
        }

        for attempt in 1..=MAX_COMMENT_ATTEMPTS {
            let (current, etag) = self.store.fetch(id).await?;
            let mut comments = current.comments;
            comments.push(text.to_string());

            match self
                .store
                .replace_comments(id, &comments, etag.as_deref())
                .await
            {
                Ok(updated) => {
                    self.reload_after_mutate().await?;
                    return Ok(updated);
                }
                Err(ClientError::Conflict(_)) if attempt < MAX_COMMENT_ATTEMPTS => {
                    tracing::warn!(%id, attempt, "comment precondition lost, retrying");
                }
                Err(err) => return Err(err),
            }
        }

        Err(ClientError::Conflict(format!(
            "Comment on incident {} kept losing to concurrent updates",
            id
        )))
    }

    /// Filter the cached incidents whose type or location contains `term`,
    /// case-insensitively. Substring match, not tokenized. A blank term is
    /// equivalent to an unfiltered [`load`](Self::load). Pure read; the cache
    /// is not mutated by a non-blank search.
    pub async fn search(&self, term: &str) -> Result<BoardView, ClientError> {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            self.load(None).await?;
            return Ok(self.view().await);
        }

        let needle = trimmed.to_lowercase();
        let state = self.state.read().await;
        let matches: Vec<Incident> = state
            .incidents
            .iter()
            .filter(|incident| {
                incident.kind.to_lowercase().contains(&needle)
                    || incident.location.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        Ok(view::project(
            &matches,
            FilterContext::Search(trimmed.to_string()),
        ))
    }

    /// Project the current cache into display rows.
    pub async fn view(&self) -> BoardView {
        let state = self.state.read().await;
        view::project(&state.incidents, state.filter.clone())
    }

    /// Snapshot of the cached incidents.
    pub async fn incidents(&self) -> Vec<Incident> {
        self.state.read().await.incidents.clone()
    }

    /// Refetch the collection under the active status filter so the cache
    /// and any derived view stay consistent after a write.
    async fn reload_after_mutate(&self) -> Result<(), ClientError> {
        let status = {
            let state = self.state.read().await;
            match &state.filter {
                FilterContext::Status(status) => Some(status.clone()),
                _ => None,
            }
        };
        self.load(status).await?;
        Ok(())
    }
}
