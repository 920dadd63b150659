//! Typed async client for the backend REST API.
//!
//! Plain JSON over HTTPS. Every request carries the session token as an
//! auth cookie; the backend answers 401/400 for missing or invalid tokens.

use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::StatusCode;
use thiserror::Error;

use super::types::{
    PageDeleteRequest, PageDto, PageGetResponse, PageListResponse, PageUpdateRequest, UserProfile,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{endpoint} returned {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },
    #[error("invalid session token")]
    InvalidToken,
}

/// Handle to the backend. Cheap to clone; requests can run concurrently.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, session_token: &str) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        let cookie = HeaderValue::from_str(&format!("Authorization={session_token}"))
            .map_err(|_| ApiError::InvalidToken)?;
        headers.insert(COOKIE, cookie);

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn check(
        endpoint: &'static str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::Status { endpoint, status })
        }
    }

    /// Fetch a page with its elements.
    pub async fn page_get(&self, page_uuid: &str) -> Result<PageGetResponse, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("page-get/{page_uuid}")))
            .send()
            .await?;
        Ok(Self::check("page-get", response)?.json().await?)
    }

    /// List all pages of the current user.
    pub async fn page_list(&self) -> Result<Vec<PageDto>, ApiError> {
        let response = self.http.get(self.url("page-list")).send().await?;
        let body: PageListResponse = Self::check("page-list", response)?.json().await?;
        Ok(body.pages)
    }

    /// Create a page object; the uuid is generated client-side.
    pub async fn page_create(&self, page: &PageDto) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url("page-create"))
            .json(page)
            .send()
            .await?;
        Self::check("page-create", response)?;
        Ok(())
    }

    /// Update page metadata and any changed/removed elements.
    pub async fn page_update(&self, request: &PageUpdateRequest) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url("page-update"))
            .json(request)
            .send()
            .await?;
        Self::check("page-update", response)?;
        Ok(())
    }

    /// Delete a page; the backend cascades to child elements and pages.
    pub async fn page_delete(&self, page_uuid: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url("page-delete"))
            .json(&PageDeleteRequest {
                page_uuid: page_uuid.to_string(),
            })
            .send()
            .await?;
        Self::check("page-delete", response)?;
        Ok(())
    }

    /// Fetch the current user's profile.
    pub async fn user_get(&self) -> Result<UserProfile, ApiError> {
        let response = self.http.get(self.url("user-get")).send().await?;
        Ok(Self::check("user-get", response)?.json().await?)
    }

    /// End the backend session.
    pub async fn user_logout(&self) -> Result<(), ApiError> {
        let response = self.http.post(self.url("user-logout")).send().await?;
        Self::check("user-logout", response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("http://localhost:8080/", "token").expect("client");
        assert_eq!(client.url("page-list"), "http://localhost:8080/page-list");
        assert_eq!(
            client.url("page-get/abc"),
            "http://localhost:8080/page-get/abc"
        );
    }

    #[test]
    fn test_token_with_control_chars_is_rejected() {
        assert!(matches!(
            ApiClient::new("http://localhost:8080", "bad\ntoken"),
            Err(ApiError::InvalidToken)
        ));
    }
}
