//! Remote store gateway.
//!
//! Thin HTTP layer over the incident collection's REST contract. Every read
//! and write the client performs flows through here; any non-success status
//! is a hard failure for that call, mapped into the error taxonomy.

use reqwest::header::{HeaderMap, HeaderValue, ETAG, IF_MATCH};
use reqwest::{Response, StatusCode};
use serde::Serialize;

use crate::config::Config;
use crate::errors::ClientError;
use crate::models::{Attachment, Incident, IncidentStatus, NewIncident};

/// Header name for the optional API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// POST body for a new incident: the draft plus the fields this client fixes
/// at creation time.
#[derive(Debug, Serialize)]
struct CreateIncidentBody<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    location: &'a str,
    datetime: &'a str,
    description: &'a str,
    status: IncidentStatus,
    comments: &'a [String],
    attachments: &'a [Attachment],
}

/// PATCH body for a comment update: a full-array replace of `comments`.
#[derive(Debug, Serialize)]
struct CommentsPatch<'a> {
    comments: &'a [String],
}

/// Gateway to the remote incident collection.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    http: reqwest::Client,
    collection_url: String,
}

impl RemoteStore {
    /// Build a gateway from configuration.
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        Self::with_collection_url(&config.store_url, config.api_key.as_deref())
    }

    /// Build a gateway for an explicit collection URL.
    pub fn with_collection_url(
        collection_url: &str,
        api_key: Option<&str>,
    ) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(key) = api_key {
            let value = HeaderValue::from_str(key).map_err(|e| {
                ClientError::Transport(format!("Invalid API key header value: {}", e))
            })?;
            let mut headers = HeaderMap::new();
            headers.insert(API_KEY_HEADER, value);
            builder = builder.default_headers(headers);
        }

        Ok(Self {
            http: builder.build()?,
            collection_url: collection_url.trim_end_matches('/').to_string(),
        })
    }

    fn incident_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url, id)
    }

    /// GET the collection, optionally status-filtered.
    pub async fn list(
        &self,
        status: Option<&IncidentStatus>,
    ) -> Result<Vec<Incident>, ClientError> {
        let mut request = self.http.get(&self.collection_url);
        if let Some(status) = status {
            request = request.query(&[("status", status.as_str())]);
        }

        let response = check(request.send().await?).await?;
        let incidents = response.json::<Vec<Incident>>().await?;
        tracing::debug!(count = incidents.len(), "fetched incident collection");
        Ok(incidents)
    }

    /// GET a single incident, capturing its entity tag when the store sends
    /// one. The tag becomes the `If-Match` precondition for comment updates.
    pub async fn fetch(&self, id: &str) -> Result<(Incident, Option<String>), ClientError> {
        let response = check(self.http.get(self.incident_url(id)).send().await?).await?;

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let incident = response.json::<Incident>().await?;
        Ok((incident, etag))
    }

    /// POST a new incident. The store assigns and returns the `id`.
    pub async fn create(
        &self,
        draft: &NewIncident,
        attachments: &[Attachment],
    ) -> Result<Incident, ClientError> {
        let body = CreateIncidentBody {
            kind: &draft.kind,
            location: &draft.location,
            datetime: &draft.datetime,
            description: &draft.description,
            status: IncidentStatus::Open,
            comments: &[],
            attachments,
        };

        let response = check(
            self.http
                .post(&self.collection_url)
                .json(&body)
                .send()
                .await?,
        )
        .await?;

        let created = response.json::<Incident>().await?;
        tracing::info!(id = %created.id, "created incident");
        Ok(created)
    }

    /// PATCH the full comment array, with an `If-Match` precondition when an
    /// entity tag is available. A lost precondition surfaces as `Conflict`.
    pub async fn replace_comments(
        &self,
        id: &str,
        comments: &[String],
        etag: Option<&str>,
    ) -> Result<Incident, ClientError> {
        let mut request = self
            .http
            .patch(self.incident_url(id))
            .json(&CommentsPatch { comments });
        if let Some(etag) = etag {
            request = request.header(IF_MATCH, etag);
        }

        let response = check(request.send().await?).await?;
        Ok(response.json::<Incident>().await?)
    }

    /// DELETE an incident by id.
    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        check(self.http.delete(self.incident_url(id)).send().await?).await?;
        tracing::info!(%id, "deleted incident");
        Ok(())
    }
}

/// Map a non-success response into the error taxonomy.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    match status {
        StatusCode::NOT_FOUND => Err(ClientError::NotFound(
            "Incident not found in store".to_string(),
        )),
        StatusCode::PRECONDITION_FAILED | StatusCode::CONFLICT => Err(ClientError::Conflict(
            "Write precondition lost to a concurrent update".to_string(),
        )),
        _ => Err(ClientError::Status {
            status: status.as_u16(),
            message,
        }),
    }
}
