//! Thin HTTP wrapper mirroring the server's endpoints.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

use quill_core::domain::{Category, PostView};
use quill_core::query::{ListParams, Pagination};
use quill_shared::ApiResponse;
use quill_shared::dto::{CategoryPayload, CommentPayload, PostPayload};

use crate::error::ClientError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// One page of posts as returned by `GET /posts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostList {
    pub posts: Vec<PostView>,
    pub pagination: Pagination,
}

/// The operations the client can perform against the blog API.
#[async_trait]
pub trait BlogApi: Send + Sync {
    async fn list_posts(&self, params: &ListParams) -> Result<PostList, ClientError>;

    async fn get_post(&self, id: Uuid) -> Result<PostView, ClientError>;

    async fn create_post(&self, payload: &PostPayload) -> Result<PostView, ClientError>;

    async fn update_post(&self, id: Uuid, payload: &PostPayload) -> Result<PostView, ClientError>;

    async fn delete_post(&self, id: Uuid) -> Result<(), ClientError>;

    async fn add_comment(
        &self,
        id: Uuid,
        payload: &CommentPayload,
    ) -> Result<PostView, ClientError>;

    async fn list_categories(&self) -> Result<Vec<Category>, ClientError>;

    async fn create_category(&self, payload: &CategoryPayload) -> Result<Category, ClientError>;
}

/// [`BlogApi`] over HTTP with `reqwest`.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    /// `base_url` is the API root, e.g. [`DEFAULT_BASE_URL`].
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self { client, base })
    }

    pub fn user_agent() -> &'static str {
        concat!("quill-client/", env!("CARGO_PKG_VERSION"))
    }

    pub fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base.join(path).map_err(ClientError::Url)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        Ok(self.client.request(method, self.url(path)?))
    }

    async fn send<T: DeserializeOwned>(
        req: RequestBuilder,
    ) -> Result<ApiResponse<T>, ClientError> {
        let resp = req.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        decode_envelope(status, &bytes)
    }

    async fn send_data<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ClientError> {
        Self::send::<T>(req).await?.data.ok_or(ClientError::MissingData)
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        Self::send_data(self.request(method, path)?.json(body)).await
    }
}

/// Interpret a response body as the `{success, data, message}` envelope.
pub fn decode_envelope<T: DeserializeOwned>(
    status: StatusCode,
    bytes: &[u8],
) -> Result<ApiResponse<T>, ClientError> {
    if !status.is_success() {
        let message = serde_json::from_slice::<ApiResponse<serde_json::Value>>(bytes)
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned());
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let envelope: ApiResponse<T> =
        serde_json::from_slice(bytes).map_err(|e| ClientError::Decode(e.to_string()))?;
    if !envelope.success {
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: envelope.message.unwrap_or_default(),
        });
    }
    Ok(envelope)
}

#[async_trait]
impl BlogApi for ApiClient {
    async fn list_posts(&self, params: &ListParams) -> Result<PostList, ClientError> {
        let envelope =
            Self::send::<Vec<PostView>>(self.request(Method::GET, "posts")?.query(params)).await?;

        match (envelope.data, envelope.pagination) {
            (Some(posts), Some(pagination)) => Ok(PostList { posts, pagination }),
            _ => Err(ClientError::MissingData),
        }
    }

    async fn get_post(&self, id: Uuid) -> Result<PostView, ClientError> {
        Self::send_data(self.request(Method::GET, &format!("posts/{id}"))?).await
    }

    async fn create_post(&self, payload: &PostPayload) -> Result<PostView, ClientError> {
        self.send_json(Method::POST, "posts", payload).await
    }

    async fn update_post(&self, id: Uuid, payload: &PostPayload) -> Result<PostView, ClientError> {
        self.send_json(Method::PUT, &format!("posts/{id}"), payload)
            .await
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), ClientError> {
        Self::send::<serde_json::Value>(self.request(Method::DELETE, &format!("posts/{id}"))?)
            .await
            .map(|_| ())
    }

    async fn add_comment(
        &self,
        id: Uuid,
        payload: &CommentPayload,
    ) -> Result<PostView, ClientError> {
        self.send_json(Method::POST, &format!("posts/{id}/comments"), payload)
            .await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ClientError> {
        Self::send_data(self.request(Method::GET, "categories")?).await
    }

    async fn create_category(&self, payload: &CategoryPayload) -> Result<Category, ClientError> {
        self.send_json(Method::POST, "categories", payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_stay_under_api_root() {
        let client = ApiClient::new("http://localhost:5000/api").unwrap();
        let id = Uuid::nil();

        assert_eq!(
            client.url("posts").unwrap().as_str(),
            "http://localhost:5000/api/posts"
        );
        assert_eq!(
            client.url(&format!("posts/{id}/comments")).unwrap().as_str(),
            format!("http://localhost:5000/api/posts/{id}/comments")
        );
    }

    #[test]
    fn test_default_base_url() {
        let client = ApiClient::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(
            client.url("health").unwrap().as_str(),
            format!("{DEFAULT_BASE_URL}/health")
        );
    }

    #[test]
    fn test_rejects_bad_base() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ClientError::Url(_))
        ));
    }

    #[test]
    fn test_decode_error_envelope() {
        let body = br#"{"success":false,"message":"Post not found"}"#;
        let err = decode_envelope::<PostView>(StatusCode::NOT_FOUND, body).unwrap_err();

        assert_eq!(err.server_message(), Some("Post not found"));
        assert!(matches!(err, ClientError::Api { status: 404, .. }));
    }

    #[test]
    fn test_decode_non_json_error() {
        let err = decode_envelope::<PostView>(StatusCode::BAD_GATEWAY, b"upstream down")
            .unwrap_err();
        assert_eq!(err.server_message(), Some("upstream down"));
    }

    #[test]
    fn test_decode_success_envelope() {
        let body = br#"{"success":true,"data":[1,2,3],"message":"ok"}"#;
        let envelope = decode_envelope::<Vec<u32>>(StatusCode::OK, body).unwrap();

        assert_eq!(envelope.data, Some(vec![1, 2, 3]));
        assert_eq!(envelope.message.as_deref(), Some("ok"));
    }
}
