//! Comment service endpoints.
//!
//! One thin method per endpoint. Page-scoped calls use the configured page
//! URL; all query values are percent-encoded.

use bytes::Bytes;
use serde_json::{json, Value};

use crate::fetcher::{FetchError, Fetcher, RequestDescriptor, RequestOptions};
use crate::models::{
    BlockResponse, BlockTtl, BlockedUser, Comment, CommentCount, DeleteMeResponse, Image,
    PictureUploaded, RemoteConfig, Sorting, Tree, User, UserComments,
};
use crate::traits::Method;

#[derive(Clone)]
pub struct CommentApi {
    fetcher: Fetcher,
}

impl CommentApi {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    fn page_url(&self) -> String {
        urlencoding::encode(&self.fetcher.config().page_url).into_owned()
    }

    async fn call(&self, method: Method, path: String, options: RequestOptions) -> Result<(), FetchError> {
        self.fetcher
            .request(RequestDescriptor::new(method, path, options))
            .await
            .map(|_| ())
    }

    pub async fn config(&self) -> Result<RemoteConfig, FetchError> {
        self.fetcher.get("/config", RequestOptions::new()).await
    }

    pub async fn post_comments(&self, sort: Sorting) -> Result<Tree, FetchError> {
        let path = format!("/find?url={}&sort={}&format=tree", self.page_url(), sort.as_str());
        self.fetcher.get(&path, RequestOptions::new()).await
    }

    pub async fn comments_count(&self, urls: &[String]) -> Result<Vec<CommentCount>, FetchError> {
        self.fetcher
            .post("/counts", RequestOptions::new().json(json!(urls)))
            .await
    }

    pub async fn comment(&self, id: &str) -> Result<Comment, FetchError> {
        let path = format!("/id/{}?url={}", urlencoding::encode(id), self.page_url());
        self.fetcher.get(&path, RequestOptions::new()).await
    }

    pub async fn user_comments(&self, user_id: &str, limit: u32) -> Result<UserComments, FetchError> {
        let path = format!("/comments?user={}&limit={}", urlencoding::encode(user_id), limit);
        self.fetcher.get(&path, RequestOptions::new()).await
    }

    pub async fn vote(&self, id: &str, value: i8) -> Result<(), FetchError> {
        let path = format!(
            "/vote/{}?url={}&vote={}",
            urlencoding::encode(id),
            self.page_url(),
            value
        );
        self.call(Method::Put, path, RequestOptions::new()).await
    }

    /// Post a comment on the current page, optionally as a reply to `pid`.
    pub async fn add_comment(
        &self,
        title: &str,
        text: &str,
        pid: Option<&str>,
    ) -> Result<Comment, FetchError> {
        let config = self.fetcher.config();
        let mut body = json!({
            "title": title,
            "text": text,
            "locator": { "site": config.site_id, "url": config.page_url },
        });
        if let Some(pid) = pid {
            body["pid"] = Value::String(pid.to_string());
        }
        self.fetcher
            .post("/comment", RequestOptions::new().json(body))
            .await
    }

    pub async fn update_comment(&self, id: &str, text: &str) -> Result<Comment, FetchError> {
        let path = format!("/comment/{}?url={}", urlencoding::encode(id), self.page_url());
        self.fetcher
            .put(&path, RequestOptions::new().json(json!({ "text": text })))
            .await
    }

    /// Delete one of the visitor's own comments.
    pub async fn remove_my_comment(&self, id: &str) -> Result<(), FetchError> {
        let path = format!("/comment/{}?url={}", urlencoding::encode(id), self.page_url());
        self.call(
            Method::Put,
            path,
            RequestOptions::new().json(json!({ "delete": true })),
        )
        .await
    }

    /// Rendered HTML for `text`.
    pub async fn preview(&self, text: &str) -> Result<String, FetchError> {
        self.fetcher
            .post("/preview", RequestOptions::new().json(json!({ "text": text })))
            .await
    }

    pub async fn user(&self) -> Result<Option<User>, FetchError> {
        self.fetcher.get("/user", RequestOptions::new()).await
    }

    pub async fn delete_me(&self) -> Result<DeleteMeResponse, FetchError> {
        let path = format!(
            "/deleteme?site={}",
            urlencoding::encode(&self.fetcher.config().site_id)
        );
        self.fetcher.post(&path, RequestOptions::new()).await
    }

    pub async fn approve_delete_me(&self, token: &str) -> Result<(), FetchError> {
        let path = format!("/admin/deleteme?token={}", urlencoding::encode(token));
        self.call(Method::Get, path, RequestOptions::new()).await
    }

    pub async fn set_pinned(&self, id: &str, pinned: bool) -> Result<(), FetchError> {
        let path = format!(
            "/admin/pin/{}?url={}&pin={}",
            urlencoding::encode(id),
            self.page_url(),
            u8::from(pinned)
        );
        self.call(Method::Put, path, RequestOptions::new()).await
    }

    pub async fn set_verified(&self, user_id: &str, verified: bool) -> Result<(), FetchError> {
        let path = format!(
            "/admin/verify/{}?verified={}",
            urlencoding::encode(user_id),
            u8::from(verified)
        );
        self.call(Method::Put, path, RequestOptions::new()).await
    }

    pub async fn remove_comment(&self, id: &str) -> Result<(), FetchError> {
        let path = format!(
            "/admin/comment/{}?url={}",
            urlencoding::encode(id),
            self.page_url()
        );
        self.call(Method::Delete, path, RequestOptions::new()).await
    }

    pub async fn block_user(&self, user_id: &str, ttl: &BlockTtl) -> Result<BlockResponse, FetchError> {
        let mut path = format!("/admin/user/{}?block=1", urlencoding::encode(user_id));
        if let BlockTtl::For(duration) = ttl {
            path.push_str("&ttl=");
            path.push_str(&urlencoding::encode(duration));
        }
        self.fetcher.put(&path, RequestOptions::new()).await
    }

    pub async fn unblock_user(&self, user_id: &str) -> Result<BlockResponse, FetchError> {
        let path = format!("/admin/user/{}?block=0", urlencoding::encode(user_id));
        self.fetcher.put(&path, RequestOptions::new()).await
    }

    /// Blocked users; the server answers `null` when there are none.
    pub async fn blocked(&self) -> Result<Vec<BlockedUser>, FetchError> {
        let blocked: Option<Vec<BlockedUser>> =
            self.fetcher.get("/admin/blocked", RequestOptions::new()).await?;
        Ok(blocked.unwrap_or_default())
    }

    pub async fn set_read_only(&self, read_only: bool) -> Result<(), FetchError> {
        let path = format!(
            "/admin/readonly?url={}&ro={}",
            self.page_url(),
            u8::from(read_only)
        );
        self.call(Method::Put, path, RequestOptions::new()).await
    }

    /// Upload a picture and describe where it can be fetched from.
    pub async fn upload_image(
        &self,
        name: &str,
        content_type: &str,
        bytes: impl Into<Bytes>,
    ) -> Result<Image, FetchError> {
        let bytes = bytes.into();
        let size = bytes.len();
        let uploaded: PictureUploaded = self
            .fetcher
            .post(
                "/picture",
                RequestOptions::new().file("file", name, content_type, bytes),
            )
            .await?;

        let config = self.fetcher.config();
        Ok(Image {
            name: name.to_string(),
            size,
            content_type: content_type.to_string(),
            url: format!("{}{}/picture/{}", config.base_url, config.api_root, uploaded.id),
        })
    }

    pub async fn subscribe_email(&self, address: &str) -> Result<(), FetchError> {
        let path = format!("/email/subscribe?address={}", urlencoding::encode(address));
        self.call(Method::Post, path, RequestOptions::new()).await
    }

    pub async fn confirm_email_subscription(&self, token: &str) -> Result<(), FetchError> {
        let path = format!("/email/confirm?tkn={}", urlencoding::encode(token));
        self.call(Method::Post, path, RequestOptions::new()).await
    }

    pub async fn unsubscribe_email(&self) -> Result<(), FetchError> {
        self.call(Method::Delete, "/email".to_string(), RequestOptions::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockBrowser, MockClock, MockHttpClient, MockResponse};
    use crate::config::ClientConfig;
    use crate::session::SessionContext;
    use crate::traits::{RequestBody, Response};
    use std::sync::Arc;

    fn api(http: &MockHttpClient) -> CommentApi {
        let config = ClientConfig::default()
            .with_base_url("https://remark.example.com")
            .with_site_id("blog")
            .with_page_url("https://blog.example.com/post/1");
        CommentApi::new(Fetcher::new(
            config,
            Arc::new(http.clone()),
            Arc::new(MockBrowser::new()),
            Arc::new(MockClock::default()),
            Arc::new(SessionContext::new()),
        ))
    }

    fn json_ok(body: &str) -> MockResponse {
        MockResponse::Success(
            Response::new(200, Bytes::from(body.to_string()))
                .header("Content-Type", "application/json"),
        )
    }

    #[tokio::test]
    async fn test_config() {
        let http = MockHttpClient::new();
        http.set_default_response(json_ok(
            r#"{"version":"1.9","auth_providers":["github","anonymous"],"max_image_size":5000}"#,
        ));

        let config = api(&http).config().await.unwrap();
        assert_eq!(config.auth_providers, vec!["github", "anonymous"]);
        assert_eq!(config.max_image_size, 5000);
        assert_eq!(
            http.get_requests()[0].url,
            "https://remark.example.com/api/v1/config?site=blog"
        );
    }

    #[tokio::test]
    async fn test_post_comments_url() {
        let http = MockHttpClient::new();
        http.set_default_response(json_ok(r#"{"comments":[],"info":{"url":"x","count":0}}"#));

        api(&http).post_comments(Sorting::BestScore).await.unwrap();
        assert_eq!(
            http.get_requests()[0].url,
            "https://remark.example.com/api/v1/find?url=https%3A%2F%2Fblog.example.com%2Fpost%2F1&sort=-score&format=tree&site=blog"
        );
    }

    #[tokio::test]
    async fn test_add_reply_body() {
        let http = MockHttpClient::new();
        http.set_default_response(json_ok(
            r#"{"id":"c2","pid":"c1","text":"<p>hi</p>","user":{"id":"u","name":"n"},"locator":{"site":"blog","url":"u"},"time":"2024-03-01T12:00:00Z"}"#,
        ));

        let comment = api(&http).add_comment("Post", "hi", Some("c1")).await.unwrap();
        assert_eq!(comment.pid, "c1");

        let request = &http.get_requests()[0];
        assert_eq!(request.url, "https://remark.example.com/api/v1/comment");
        let RequestBody::Text(body) = &request.body else {
            panic!("expected a JSON body");
        };
        let body: Value = serde_json::from_str(body).unwrap();
        assert_eq!(body["pid"], "c1");
        assert_eq!(body["locator"]["site"], "blog");
    }

    #[tokio::test]
    async fn test_block_user_ttl() {
        let http = MockHttpClient::new();
        http.set_default_response(json_ok(r#"{"block":true,"site_id":"blog","user_id":"u1"}"#));

        let api = api(&http);
        api.block_user("u1", &BlockTtl::Permanently).await.unwrap();
        api.block_user("u1", &BlockTtl::For("1440m".to_string())).await.unwrap();

        let requests = http.get_requests();
        assert!(requests[0].url.contains("/admin/user/u1?block=1&site=blog"));
        assert!(requests[1].url.contains("/admin/user/u1?block=1&ttl=1440m&site=blog"));
    }

    #[tokio::test]
    async fn test_blocked_null_is_empty() {
        let http = MockHttpClient::new();
        http.set_default_response(json_ok("null"));
        assert!(api(&http).blocked().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_preview_returns_text() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::Success(Response::new(
            200,
            Bytes::from("<p><strong>hi</strong></p>"),
        )));
        assert_eq!(
            api(&http).preview("**hi**").await.unwrap(),
            "<p><strong>hi</strong></p>"
        );
    }

    #[tokio::test]
    async fn test_upload_image() {
        let http = MockHttpClient::new();
        http.set_default_response(json_ok(r#"{"id":"blog/abc.png"}"#));

        let image = api(&http)
            .upload_image("cat.png", "image/png", vec![0u8; 10])
            .await
            .unwrap();
        assert_eq!(image.size, 10);
        assert_eq!(
            image.url,
            "https://remark.example.com/api/v1/picture/blog/abc.png"
        );

        let request = &http.get_requests()[0];
        assert!(matches!(request.body, RequestBody::Multipart(_)));
        assert!(request.headers.get("Content-Type").is_none());
    }

    #[tokio::test]
    async fn test_delete_me_is_post_without_extra_site() {
        let http = MockHttpClient::new();
        http.set_default_response(json_ok(r#"{"user_id":"u1","link":"https://x"}"#));

        api(&http).delete_me().await.unwrap();
        assert_eq!(
            http.get_requests()[0].url,
            "https://remark.example.com/api/v1/deleteme?site=blog"
        );
    }

    #[tokio::test]
    async fn test_vote_error_propagates() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::Success(Response::new(
            400,
            Bytes::from(r#"{"error":"can't vote for own comment"}"#),
        )));

        let err = api(&http).vote("c1", 1).await.unwrap_err();
        assert_eq!(err.user_message(), "can't vote for own comment");
    }
}
