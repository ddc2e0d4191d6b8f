//! Gmail API mailbox implementation.
//!
//! Implements [`Mailbox`] over the Gmail REST API v1:
//! - `users.messages.list` for free-text search
//! - `users.messages.get` (`format=full`) for message payloads
//! - `users.labels.list` / `users.labels.create` for label management
//! - `users.messages.modify` for label mutation
//!
//! # Authentication
//!
//! Gmail uses OAuth 2.0. The refresh token and client credentials are
//! stored in the system keychain keyed by user identity; the access token
//! is refreshed against Google's token endpoint on
//! [`Mailbox::authenticate`]. Token issuance (the consent flow) is out of
//! scope and expected to have happened elsewhere.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{Mailbox, MailboxError, MailboxLabel, Result};
use crate::domain::{Message, UserId};

const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Gmail message list response.
#[derive(Debug, Deserialize)]
struct MessageListResponse {
    messages: Option<Vec<MessageRef>>,
    #[allow(dead_code)]
    #[serde(rename = "resultSizeEstimate")]
    result_size_estimate: Option<u32>,
}

/// Minimal message reference returned by the list endpoint.
#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

/// Gmail labels list response.
#[derive(Debug, Deserialize)]
struct LabelsListResponse {
    labels: Option<Vec<GmailLabel>>,
}

/// Gmail API label.
#[derive(Debug, Deserialize)]
struct GmailLabel {
    id: String,
    name: String,
}

/// Gmail label creation request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateLabelRequest<'a> {
    name: &'a str,
    message_list_visibility: &'a str,
    label_list_visibility: &'a str,
}

/// Gmail modify request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ModifyRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    add_label_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    remove_label_ids: Vec<String>,
}

/// OAuth token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[allow(dead_code)]
    expires_in: u64,
    #[allow(dead_code)]
    token_type: String,
}

/// OAuth credentials stored in the keychain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GmailCredentials {
    /// OAuth refresh token.
    pub refresh_token: String,
    /// OAuth client ID.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
}

/// Gmail REST mailbox.
///
/// # Example
///
/// ```ignore
/// use mailsweep::providers::{GmailMailbox, Mailbox};
///
/// let mut mailbox = GmailMailbox::new(user_id);
/// mailbox.authenticate().await?;
/// let ids = mailbox.search("\"unsubscribe\"", 50).await?;
/// ```
pub struct GmailMailbox {
    /// User identity for keychain credential lookup.
    user_id: UserId,
    /// HTTP client for API requests.
    client: reqwest::Client,
    /// OAuth credentials.
    credentials: Option<GmailCredentials>,
    /// Current OAuth access token (refreshed as needed).
    access_token: Option<String>,
    /// Whether the mailbox is authenticated.
    authenticated: bool,
}

impl GmailMailbox {
    /// Creates a mailbox for the given user.
    ///
    /// Credentials are loaded from the keychain on
    /// [`authenticate`](Mailbox::authenticate).
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            client: reqwest::Client::new(),
            credentials: None,
            access_token: None,
            authenticated: false,
        }
    }

    /// Creates a mailbox with explicit credentials (for testing or direct
    /// use).
    pub fn with_credentials(user_id: UserId, credentials: GmailCredentials) -> Self {
        Self {
            user_id,
            client: reqwest::Client::new(),
            credentials: Some(credentials),
            access_token: None,
            authenticated: false,
        }
    }

    /// Returns whether the mailbox is currently authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Returns the user identity for this mailbox.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Loads credentials from the system keychain.
    fn load_credentials_from_keychain(&self) -> Result<GmailCredentials> {
        let entry = keyring::Entry::new("mailsweep", &format!("gmail-{}", self.user_id.0))
            .map_err(|e| MailboxError::Authentication(format!("keyring error: {}", e)))?;

        let creds_json = entry
            .get_password()
            .map_err(|e| MailboxError::Authentication(format!("no credentials found: {}", e)))?;

        serde_json::from_str(&creds_json)
            .map_err(|e| MailboxError::Authentication(format!("invalid credentials: {}", e)))
    }

    /// Saves credentials to the system keychain.
    pub fn save_credentials_to_keychain(&self, credentials: &GmailCredentials) -> Result<()> {
        let entry = keyring::Entry::new("mailsweep", &format!("gmail-{}", self.user_id.0))
            .map_err(|e| MailboxError::Authentication(format!("keyring error: {}", e)))?;

        let creds_json = serde_json::to_string(credentials)
            .map_err(|e| MailboxError::Authentication(format!("serialize error: {}", e)))?;

        entry
            .set_password(&creds_json)
            .map_err(|e| MailboxError::Authentication(format!("keyring error: {}", e)))?;

        Ok(())
    }

    /// Refreshes the OAuth access token using the refresh token.
    async fn refresh_access_token(&mut self) -> Result<String> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| MailboxError::Authentication("no credentials available".to_string()))?;

        let params = [
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("refresh_token", credentials.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .client
            .post(GOOGLE_TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| MailboxError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MailboxError::Authentication(format!(
                "token refresh failed ({}): {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| MailboxError::Internal(format!("parse token response: {}", e)))?;

        self.access_token = Some(token_response.access_token.clone());
        Ok(token_response.access_token)
    }

    /// Builds authorization headers for API requests.
    fn auth_headers(&self) -> Result<HeaderMap> {
        let token = self
            .access_token
            .as_ref()
            .ok_or_else(|| MailboxError::Authentication("not authenticated".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| MailboxError::Internal(format!("invalid header: {}", e)))?,
        );
        Ok(headers)
    }

    /// Builds an API URL for the given endpoint path.
    fn api_url(&self, endpoint: &str) -> Result<Url> {
        Url::parse(&format!("{}{}", GMAIL_API_BASE, endpoint))
            .map_err(|e| MailboxError::InvalidRequest(format!("bad endpoint {}: {}", endpoint, e)))
    }

    /// Makes an authenticated GET request to the Gmail API.
    async fn get<T: for<'de> Deserialize<'de>>(&self, url: Url) -> Result<T> {
        let headers = self.auth_headers()?;

        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| MailboxError::Connection(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Makes an authenticated POST request to the Gmail API.
    async fn post<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T> {
        let mut headers = self.auth_headers()?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| MailboxError::Connection(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Makes an authenticated POST request that discards the response body.
    async fn post_no_response<B: Serialize>(&self, url: Url, body: &B) -> Result<()> {
        let mut headers = self.auth_headers()?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| MailboxError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(self.handle_error(response).await);
        }
        Ok(())
    }

    /// Handles an API response, checking for errors.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            return Err(self.handle_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| MailboxError::Internal(format!("parse response: {}", e)))
    }

    /// Maps API error responses to the error taxonomy.
    async fn handle_error(&self, response: reqwest::Response) -> MailboxError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => MailboxError::Authentication(format!("unauthorized: {}", body)),
            403 => MailboxError::Authentication(format!("forbidden: {}", body)),
            404 => MailboxError::NotFound(body),
            429 => MailboxError::RateLimited {
                retry_after_secs: None,
            },
            _ => MailboxError::Internal(format!("API error ({}): {}", status, body)),
        }
    }
}

#[async_trait]
impl Mailbox for GmailMailbox {
    async fn authenticate(&mut self) -> Result<()> {
        if self.credentials.is_none() {
            self.credentials = Some(self.load_credentials_from_keychain()?);
        }

        self.refresh_access_token().await?;
        self.authenticated = true;

        tracing::info!(user = %self.user_id, "Gmail mailbox authenticated");
        Ok(())
    }

    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<String>> {
        if !self.authenticated {
            return Err(MailboxError::Authentication(
                "not authenticated".to_string(),
            ));
        }

        let mut url = self.api_url("/messages")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("maxResults", &max_results.to_string());

        let response: MessageListResponse = self.get(url).await?;
        let ids: Vec<String> = response
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(|m| m.id)
            .collect();

        tracing::debug!(count = ids.len(), %query, "mailbox search completed");
        Ok(ids)
    }

    async fn get_message(&self, id: &str) -> Result<Message> {
        if !self.authenticated {
            return Err(MailboxError::Authentication(
                "not authenticated".to_string(),
            ));
        }

        let mut url = self.api_url(&format!("/messages/{}", id))?;
        url.query_pairs_mut().append_pair("format", "full");

        self.get(url).await
    }

    async fn list_labels(&self) -> Result<Vec<MailboxLabel>> {
        if !self.authenticated {
            return Err(MailboxError::Authentication(
                "not authenticated".to_string(),
            ));
        }

        let url = self.api_url("/labels")?;
        let response: LabelsListResponse = self.get(url).await?;

        Ok(response
            .labels
            .unwrap_or_default()
            .into_iter()
            .map(|l| MailboxLabel {
                id: l.id,
                name: l.name,
            })
            .collect())
    }

    async fn create_label(&self, name: &str) -> Result<MailboxLabel> {
        if !self.authenticated {
            return Err(MailboxError::Authentication(
                "not authenticated".to_string(),
            ));
        }

        let url = self.api_url("/labels")?;
        let body = CreateLabelRequest {
            name,
            message_list_visibility: "show",
            label_list_visibility: "labelShow",
        };

        let label: GmailLabel = self.post(url, &body).await?;
        tracing::info!(label = %label.name, id = %label.id, "created mailbox label");

        Ok(MailboxLabel {
            id: label.id,
            name: label.name,
        })
    }

    async fn modify_labels(
        &self,
        message_id: &str,
        add: &[String],
        remove: &[String],
    ) -> Result<()> {
        if !self.authenticated {
            return Err(MailboxError::Authentication(
                "not authenticated".to_string(),
            ));
        }

        let url = self.api_url(&format!("/messages/{}/modify", message_id))?;
        let body = ModifyRequest {
            add_label_ids: add.to_vec(),
            remove_label_ids: remove.to_vec(),
        };

        self.post_no_response(url, &body).await
    }
}
