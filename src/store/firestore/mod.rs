//! # Firestore Backend
//!
//! Document store over the Firestore REST API (v1). Works against the
//! managed service or a local emulator.

pub mod codec;
pub mod credentials;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};

use super::backend::{DocumentStore, DocumentStream};
use super::collection::Collection;
use super::errors::{StoreError, StoreResult};
use super::query::Query;
use super::value::{Document, Fields};

use codec::{encode_fields, RawDocument};
use credentials::{ServiceAccountKey, TokenProvider, TokenSource};

const FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com";
const LIST_PAGE_SIZE: u32 = 300;

/// Connection settings
#[derive(Debug, Clone, PartialEq)]
pub struct FirestoreConfig {
    pub project_id: String,
    /// Database id, `(default)` unless a named database is used
    pub database: String,
    /// `host:port` of a Firestore emulator
    pub emulator_host: Option<String>,
    /// Service-account key file
    pub credentials: Option<PathBuf>,
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database: "(default)".to_string(),
            emulator_host: None,
            credentials: None,
        }
    }

    /// Root of the document tree for this database
    pub fn documents_url(&self) -> String {
        let root = match &self.emulator_host {
            Some(host) => format!("http://{}", host),
            None => FIRESTORE_ENDPOINT.to_string(),
        };
        format!(
            "{}/v1/projects/{}/databases/{}/documents",
            root, self.project_id, self.database
        )
    }

    pub fn token_source(&self) -> StoreResult<TokenSource> {
        if self.emulator_host.is_some() {
            return Ok(TokenSource::Emulator);
        }
        match &self.credentials {
            Some(path) => Ok(TokenSource::ServiceAccount(ServiceAccountKey::from_file(path)?)),
            None => Ok(TokenSource::Metadata),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPage {
    #[serde(default)]
    documents: Vec<RawDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunQueryItem {
    #[serde(default)]
    document: Option<RawDocument>,
}

enum Cursor {
    Page(ListPage),
    Next(String),
    Done,
}

#[derive(Debug)]
struct Inner {
    client: reqwest::Client,
    documents_url: String,
    tokens: TokenProvider,
}

/// Firestore-backed document store
#[derive(Debug, Clone)]
pub struct FirestoreStore {
    inner: Arc<Inner>,
}

impl FirestoreStore {
    pub fn new(config: &FirestoreConfig) -> StoreResult<Self> {
        let source = config.token_source()?;
        Ok(Self::with_client(reqwest::Client::new(), config, source))
    }

    pub fn with_client(
        client: reqwest::Client,
        config: &FirestoreConfig,
        source: TokenSource,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                documents_url: config.documents_url(),
                tokens: TokenProvider::new(source),
            }),
        }
    }

    /// `{documents}/{collection}[/{id}]`, segments percent-encoded
    pub fn document_url(&self, collection: Collection, id: Option<&str>) -> StoreResult<Url> {
        let mut url = self.parse_url(&self.inner.documents_url)?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StoreError::Transport("documents url cannot be a base".to_string()))?;
            segments.push(collection.name());
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn parse_url(&self, raw: &str) -> StoreResult<Url> {
        Url::parse(raw).map_err(|e| StoreError::Transport(format!("bad url {}: {}", raw, e)))
    }

    async fn send(&self, request: RequestBuilder) -> StoreResult<Response> {
        let token = self.inner.tokens.bearer(&self.inner.client).await?;
        Ok(request.bearer_auth(token).send().await?)
    }

    async fn list_page(
        &self,
        collection: Collection,
        page_token: Option<&str>,
    ) -> StoreResult<ListPage> {
        let mut url = self.document_url(collection, None)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("pageSize", &LIST_PAGE_SIZE.to_string());
            if let Some(token) = page_token {
                pairs.append_pair("pageToken", token);
            }
        }
        let response = self.send(self.inner.client.get(url)).await?;
        Ok(check(response).await?.json().await?)
    }
}

/// Turn a non-success response into a store error
async fn check(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error.message)
        .unwrap_or(body);
    Err(StoreError::Status {
        status: status.as_u16(),
        message,
    })
}

fn drain(page: ListPage) -> (Vec<StoreResult<Document>>, Cursor) {
    let items = page
        .documents
        .into_iter()
        .map(RawDocument::into_document)
        .collect();
    let next = match page.next_page_token.filter(|t| !t.is_empty()) {
        Some(token) => Cursor::Next(token),
        None => Cursor::Done,
    };
    (items, next)
}

/// Body for `documents:runQuery`
pub fn structured_query(collection: Collection, query: &Query) -> Value {
    let mut structured = json!({
        "from": [{ "collectionId": collection.name() }],
    });
    if let Some(order) = &query.order_by {
        structured["orderBy"] = json!([{
            "field": { "fieldPath": order.field },
            "direction": order.direction.as_str(),
        }]);
    }
    if let Some(limit) = query.limit {
        structured["limit"] = json!(limit);
    }
    json!({ "structuredQuery": structured })
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn add(&self, collection: Collection, fields: Fields) -> StoreResult<String> {
        let url = self.document_url(collection, None)?;
        let request = self
            .inner
            .client
            .post(url)
            .json(&json!({ "fields": encode_fields(&fields) }));
        let created: RawDocument = check(self.send(request).await?).await?.json().await?;
        Ok(created.id().to_string())
    }

    async fn set(&self, collection: Collection, id: &str, fields: Fields) -> StoreResult<()> {
        let url = self.document_url(collection, Some(id))?;
        let request = self
            .inner
            .client
            .patch(url)
            .json(&json!({ "fields": encode_fields(&fields) }));
        check(self.send(request).await?).await?;
        Ok(())
    }

    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Document> {
        let url = self.document_url(collection, Some(id))?;
        let response = self.send(self.inner.client.get(url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::not_found(collection.name(), id));
        }
        let raw: RawDocument = check(response).await?.json().await?;
        raw.into_document()
    }

    async fn documents(&self, collection: Collection) -> StoreResult<DocumentStream> {
        let first = self.list_page(collection, None).await?;
        let store = self.clone();

        let pages = stream::unfold(Cursor::Page(first), move |cursor| {
            let store = store.clone();
            async move {
                match cursor {
                    Cursor::Done => None,
                    Cursor::Page(page) => Some(drain(page)),
                    Cursor::Next(token) => match store.list_page(collection, Some(&token)).await {
                        Ok(page) => Some(drain(page)),
                        Err(err) => Some((vec![Err(err)], Cursor::Done)),
                    },
                }
            }
        });
        Ok(pages.flat_map(stream::iter).boxed())
    }

    async fn query(&self, collection: Collection, query: Query) -> StoreResult<DocumentStream> {
        let url = self.parse_url(&format!("{}:runQuery", self.inner.documents_url))?;
        let request = self
            .inner
            .client
            .post(url)
            .json(&structured_query(collection, &query));
        let items: Vec<RunQueryItem> = check(self.send(request).await?).await?.json().await?;

        let documents: Vec<StoreResult<Document>> = items
            .into_iter()
            .filter_map(|item| item.document)
            .map(RawDocument::into_document)
            .collect();
        Ok(stream::iter(documents).boxed())
    }
}
