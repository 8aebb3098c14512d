//! Creating and updating posts through the WordPress REST API.

use crate::config::WordPressConfig;
use crate::document::Metadata;
use crate::error::PublishError;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

const DEFAULT_TITLE: &str = "Untitled";

/// Remote status requested for the post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Publish,
}

impl PostStatus {
    pub fn from_publish_flag(publish: bool) -> Self {
        if publish {
            PostStatus::Publish
        } else {
            PostStatus::Draft
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Publish => "publish",
        }
    }
}

/// JSON body sent for both create and update requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostPayload {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<JsonValue>,
}

impl PostPayload {
    pub fn new(metadata: &Metadata, content: String, status: PostStatus) -> Self {
        Self {
            title: metadata
                .title()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            content,
            status,
            slug: metadata.slug().unwrap_or_default(),
            excerpt: metadata.seo_description().map(str::to_string),
            tags: metadata.tags(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedText {
    pub rendered: String,
}

/// The fields of a WordPress post this tool relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: u64,
    pub link: String,
    pub status: String,
    pub slug: String,
    pub title: RenderedText,
}

/// Status code and raw body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one authenticated JSON POST. Network-level failures map to
/// [`PublishError::Transport`]; any received response is returned as is.
pub trait HttpTransport {
    fn post_json(
        &self,
        url: &str,
        user: &str,
        password: &str,
        payload: &PostPayload,
    ) -> Result<HttpResponse, PublishError>;
}

pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, PublishError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("wp-publish/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_json(
        &self,
        url: &str,
        user: &str,
        password: &str,
        payload: &PostPayload,
    ) -> Result<HttpResponse, PublishError> {
        let response = self
            .client
            .post(url)
            .basic_auth(user, Some(password))
            .json(payload)
            .send()?;

        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

pub struct Publisher<T = ReqwestTransport> {
    config: WordPressConfig,
    transport: T,
}

impl Publisher<ReqwestTransport> {
    pub fn new(config: WordPressConfig) -> Result<Self, PublishError> {
        Ok(Self::with_transport(config, ReqwestTransport::new()?))
    }
}

impl<T: HttpTransport> Publisher<T> {
    pub fn with_transport(config: WordPressConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Creates a post, or updates the one named by the metadata's
    /// `wordpress_id`, and returns the record WordPress sends back.
    ///
    /// Configuration is checked before anything is sent. Only 200 and 201
    /// count as success; nothing is retried.
    pub fn publish(
        &self,
        metadata: &Metadata,
        content: String,
        status: PostStatus,
    ) -> Result<PostRecord, PublishError> {
        self.config.validate()?;

        let payload = PostPayload::new(metadata, content, status);
        let url = match metadata.wordpress_id() {
            Some(id) => {
                debug!("Updating post {id} as {}", status.as_str());
                self.config.post_url(&id)
            }
            None => {
                debug!("Creating post as {}", status.as_str());
                self.config.posts_url()
            }
        };

        let response = self.transport.post_json(
            &url,
            &self.config.user,
            &self.config.app_password,
            &payload,
        )?;

        if !matches!(response.status, 200 | 201) {
            return Err(PublishError::RemoteApi {
                status: response.status,
                body: response.body,
            });
        }

        serde_json::from_str(&response.body)
            .map_err(|err| PublishError::InvalidResponse(err.to_string()))
    }
}
