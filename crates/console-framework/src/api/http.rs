//! reqwest-backed [`ResourceApi`].

use super::{ApiError, ListQuery, Page, ResourceApi};
use crate::fields::LIST_SEPARATOR;
use crate::pagination::PaginationInfo;
use crate::schema::{Draft, ListFilter, ResourceSchema};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::marker::PhantomData;
use tracing::{debug, instrument};

/// Talks to one collection endpoint of the admin API.
pub struct HttpResourceApi<R> {
    http: Client,
    base_url: String,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for HttpResourceApi<R> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: ResourceSchema> HttpResourceApi<R> {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            _resource: PhantomData,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn record_url(&self, id: &R::Id) -> String {
        self.url(&format!("{}/{}", R::ENDPOINT, id))
    }

    /// Sends a draft as JSON, or as multipart for file-bearing drafts and
    /// any draft carrying an attachment.
    async fn send_draft(&self, method: Method, url: String, draft: &R::Draft) -> Result<Response, ApiError> {
        let request = self.http.request(method, url);
        let attachment = draft.attachment();
        let request = if <R::Draft as Draft>::MULTIPART || attachment.is_some() {
            let mut form = multipart_fields(draft)?;
            if let Some(attachment) = attachment {
                let mut part = Part::bytes(attachment.bytes.clone()).file_name(attachment.file_name.clone());
                if let Some(mime) = &attachment.mime_type {
                    part = part.mime_str(mime)?;
                }
                form = form.part(attachment.field, part);
            }
            request.multipart(form)
        } else {
            request.json(draft)
        };
        Ok(request.send().await?)
    }
}

#[derive(Deserialize)]
struct ListEnvelope<R> {
    data: Vec<R>,
    #[serde(default)]
    pagination: Option<PaginationInfo>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScopedBody<R> {
    Envelope { data: Vec<R> },
    Bare(Vec<R>),
}

#[derive(Deserialize)]
struct DeleteBody {
    #[serde(default = "succeeded")]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

fn succeeded() -> bool {
    true
}

/// Rejects non-2xx responses, extracting the backend's message.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::from_response(status.as_u16(), &body))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = check_status(response).await?;
    response
        .json()
        .await
        .map_err(|e| ApiError::Transport(format!("Invalid response body: {e}")))
}

/// String-encodes every serialized draft field for a multipart body. Lists
/// are comma-joined and nulls are left out.
fn multipart_fields<D: Draft>(draft: &D) -> Result<Form, ApiError> {
    let value = serde_json::to_value(draft).map_err(|e| ApiError::Transport(e.to_string()))?;
    let mut form = Form::new();
    let serde_json::Value::Object(fields) = value else {
        return Ok(form);
    };
    for (name, value) in fields {
        let text = match value {
            serde_json::Value::Null => continue,
            serde_json::Value::String(s) => s,
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(&LIST_SEPARATOR.to_string()),
            other => other.to_string(),
        };
        form = form.text(name, text);
    }
    Ok(form)
}

#[async_trait]
impl<R: ResourceSchema> ResourceApi<R> for HttpResourceApi<R> {
    #[instrument(skip(self), fields(resource = R::PLURAL))]
    async fn list(&self, query: &ListQuery<R::Filter>) -> Result<Page<R>, ApiError> {
        if let Some(path) = query.filter.scoped_path(R::ENDPOINT) {
            debug!(%path, "scoped fetch");
            let response = self.http.get(self.url(&path)).send().await?;
            let data = match read_json::<ScopedBody<R>>(response).await? {
                ScopedBody::Envelope { data } | ScopedBody::Bare(data) => data,
            };
            return Ok(Page::scoped(data));
        }

        let mut params: Vec<(&str, String)> = vec![("page", query.page.to_string()), ("limit", query.limit.to_string())];
        if let Some(term) = query.search_term() {
            params.push(("search", term.to_string()));
        }
        params.extend(query.filter.query());

        let response = self.http.get(self.url(R::ENDPOINT)).query(&params).send().await?;
        let envelope: ListEnvelope<R> = read_json(response).await?;
        let pagination = envelope
            .pagination
            .unwrap_or_else(|| PaginationInfo::for_total(query.page, envelope.data.len() as u64, query.limit))
            .normalized();
        debug!(count = envelope.data.len(), page = pagination.current_page, "fetched");
        Ok(Page {
            data: envelope.data,
            pagination,
        })
    }

    #[instrument(skip(self, draft), fields(resource = R::PLURAL))]
    async fn create(&self, draft: &R::Draft) -> Result<(), ApiError> {
        let response = self.send_draft(Method::POST, self.url(R::ENDPOINT), draft).await?;
        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self, draft), fields(resource = R::PLURAL))]
    async fn update(&self, id: &R::Id, draft: &R::Draft) -> Result<(), ApiError> {
        let response = self.send_draft(Method::PUT, self.record_url(id), draft).await?;
        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(resource = R::PLURAL))]
    async fn remove(&self, id: &R::Id) -> Result<(), ApiError> {
        let response = self.http.delete(self.record_url(id)).send().await?;
        let status = response.status().as_u16();
        let body = check_status(response).await?.text().await?;
        if let Ok(DeleteBody { success: false, message }) = serde_json::from_str::<DeleteBody>(&body) {
            return Err(ApiError::Backend {
                status,
                message: message.unwrap_or_default(),
            });
        }
        Ok(())
    }
}
