use std::env;

use reqwest::Client;
use ring::digest::{SHA256, digest};
use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::error::AuthError;
use tracker_core::model::UserSession;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

const BASE_SCOPES: &str = "openid email profile https://www.googleapis.com/auth/drive.readonly";
const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct GoogleAuthConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    extra_scopes: Vec<&'static str>,
}

impl GoogleAuthConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let client_id = env::var("TUHFAH_GOOGLE_CLIENT_ID").ok()?;
        if client_id.trim().is_empty() {
            return None;
        }
        let client_secret = env::var("TUHFAH_GOOGLE_CLIENT_SECRET")
            .ok()
            .filter(|secret| !secret.trim().is_empty());
        Some(Self {
            client_id,
            client_secret,
            extra_scopes: Vec::new(),
        })
    }

    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: Option<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret,
            extra_scopes: Vec::new(),
        }
    }

    /// Adds the Firestore scope to the consent request. Needed only when the
    /// remote progress backend is selected.
    #[must_use]
    pub fn with_datastore_scope(mut self) -> Self {
        self.extra_scopes.push(DATASTORE_SCOPE);
        self
    }

    fn scopes(&self) -> String {
        let mut scopes = BASE_SCOPES.to_string();
        for extra in &self.extra_scopes {
            scopes.push(' ');
            scopes.push_str(extra);
        }
        scopes
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Runs the interactive sign-in: consent in the system browser, the redirect
/// caught on an ephemeral loopback listener, then token exchange and a
/// profile fetch. A failed attempt leaves no session behind.
#[derive(Clone)]
pub struct GoogleAuthService {
    client: Client,
    config: Option<GoogleAuthConfig>,
}

impl GoogleAuthService {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GoogleAuthConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<GoogleAuthConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Runs the full sign-in flow. `open_consent` receives the consent URL
    /// and is expected to put it in front of the user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` when sign-in is unconfigured, consent is denied,
    /// or any step of the exchange fails. Callers treat every variant the
    /// same way: log it and stay signed out.
    pub async fn sign_in<F>(&self, open_consent: F) -> Result<UserSession, AuthError>
    where
        F: FnOnce(&str),
    {
        let config = self.config.as_ref().ok_or(AuthError::Disabled)?;

        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let redirect_uri = format!("http://{}", listener.local_addr()?);
        let state = random_token(16);
        let pkce = PkcePair::generate();

        let consent = self.consent_url(config, &redirect_uri, &state, &pkce.challenge)?;
        open_consent(&consent);

        let code = wait_for_redirect(listener, &state).await?;
        let access_token = self
            .exchange_code(config, &code, &pkce.verifier, &redirect_uri)
            .await?;
        let info = self.fetch_userinfo(&access_token).await?;
        Ok(session_from_userinfo(info, access_token))
    }

    fn consent_url(
        &self,
        config: &GoogleAuthConfig,
        redirect_uri: &str,
        state: &str,
        challenge: &str,
    ) -> Result<String, AuthError> {
        let scope = config.scopes();
        let request = self
            .client
            .get(AUTH_ENDPOINT)
            .query(&[
                ("client_id", config.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", scope.as_str()),
                ("state", state),
                ("code_challenge", challenge),
                ("code_challenge_method", "S256"),
            ])
            .build()?;
        Ok(request.url().to_string())
    }

    async fn exchange_code(
        &self,
        config: &GoogleAuthConfig,
        code: &str,
        verifier: &str,
        redirect_uri: &str,
    ) -> Result<String, AuthError> {
        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("code_verifier", verifier),
        ];
        // Installed-app clients issued without a secret omit the field.
        if let Some(secret) = config.client_secret.as_deref() {
            form.push(("client_secret", secret));
        }

        let response = self.client.post(TOKEN_ENDPOINT).form(&form).send().await?;
        if !response.status().is_success() {
            return Err(AuthError::TokenStatus(response.status()));
        }

        let body: TokenResponse = response.json().await?;
        Ok(body.access_token)
    }

    async fn fetch_userinfo(&self, access_token: &str) -> Result<UserInfo, AuthError> {
        let response = self
            .client
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AuthError::UserinfoStatus(response.status()));
        }

        Ok(response.json().await?)
    }
}

fn session_from_userinfo(info: UserInfo, access_token: String) -> UserSession {
    UserSession {
        name: info.name,
        email: info.email,
        picture: info.picture,
        access_token,
        year: None,
    }
}

//
// ─── LOOPBACK REDIRECT ─────────────────────────────────────────────────────────
//

/// Accepts one connection on the loopback listener, answers it with a short
/// close-this-tab page, and extracts the authorization code.
async fn wait_for_redirect(listener: TcpListener, expected_state: &str) -> Result<String, AuthError> {
    let (mut stream, _) = listener.accept().await?;

    let mut buf = [0u8; 4096];
    let read = stream.read(&mut buf).await?;
    let request = String::from_utf8_lossy(&buf[..read]);

    let result = match request_target(&request) {
        Some(target) => parse_redirect_target(target, expected_state),
        None => Err(AuthError::MissingCode),
    };

    let body = if result.is_ok() {
        "Signed in. You can close this tab and return to Tuhfah Tracker."
    } else {
        "Sign-in did not complete. You can close this tab."
    };
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;

    result
}

fn request_target(request: &str) -> Option<&str> {
    let mut parts = request.split_whitespace();
    if parts.next()? != "GET" {
        return None;
    }
    parts.next()
}

fn parse_redirect_target(target: &str, expected_state: &str) -> Result<String, AuthError> {
    let url = reqwest::Url::parse(&format!("http://127.0.0.1{target}"))
        .map_err(|_| AuthError::MissingCode)?;

    let mut code = None;
    let mut state = None;
    let mut denied = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => denied = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(reason) = denied {
        return Err(AuthError::ConsentDenied(reason));
    }
    if state.as_deref() != Some(expected_state) {
        return Err(AuthError::StateMismatch);
    }
    code.ok_or(AuthError::MissingCode)
}

//
// ─── PKCE ──────────────────────────────────────────────────────────────────────
//

struct PkcePair {
    verifier: String,
    challenge: String,
}

impl PkcePair {
    fn generate() -> Self {
        let verifier = random_token(32);
        let challenge = base64_url_encode(digest(&SHA256, verifier.as_bytes()).as_ref());
        Self {
            verifier,
            challenge,
        }
    }
}

fn random_token(len: usize) -> String {
    use rand::RngCore;

    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    base64_url_encode(&bytes)
}

fn base64_url_encode(data: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(data)
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    name: String,
    email: String,
    #[serde(default)]
    picture: String,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
