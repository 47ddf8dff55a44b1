use crate::domain::credential::Credential;
use crate::domain::model::{Home, HomeId, Zone, ZoneId, ZoneState};
use crate::domain::ports::TadoApi;
use crate::utils::error::{RequestFailure, Result, TadoError};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub const BASE_URL: &str = "https://my.tado.com";

/// Fixed per-request timeout, covering connect, send and body download.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

const CLIENT_ID: &str = "tado-webapp";
const SCOPE: &str = "home.user";

const TOKEN_PATH: &str = "/oauth/token";
const ME_PATH: &str = "/api/v2/me";

fn zones_path(home_id: HomeId) -> String {
    format!("/api/v2/homes/{}/zones", home_id)
}

fn zone_state_path(home_id: HomeId, zone_id: ZoneId) -> String {
    format!("/api/v2/homes/{}/zones/{}/state", home_id, zone_id)
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
}

impl From<TokenResponse> for Credential {
    fn from(token: TokenResponse) -> Self {
        Credential::new(token.access_token, token.refresh_token, token.expires_in)
    }
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    homes: Vec<IdName>,
}

#[derive(Debug, Deserialize)]
struct IdName {
    id: u64,
    name: String,
}

/// HTTP client for the tado cloud API.
///
/// Owns the underlying connection pool; it is released when the client is
/// dropped. The client holds no token state: each authenticated call takes the
/// credential to use.
#[derive(Debug, Clone)]
pub struct TadoClient {
    http: Client,
    base_url: String,
}

impl TadoClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TadoError::Config {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn request_token(
        &self,
        form: &[(&str, &str)],
    ) -> std::result::Result<Credential, RequestFailure> {
        let request = self.http.post(self.url(TOKEN_PATH)).form(form);
        let token: TokenResponse = send_json(request).await?;
        Ok(token.into())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        path: &str,
    ) -> std::result::Result<T, RequestFailure> {
        tracing::debug!("GET {}", path);
        let request = self
            .http
            .get(self.url(path))
            .header(reqwest::header::AUTHORIZATION, credential.bearer_header());
        send_json(request).await
    }
}

async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
) -> std::result::Result<T, RequestFailure> {
    let response = request
        .send()
        .await
        .map_err(|e| RequestFailure::from_reqwest(e, REQUEST_TIMEOUT_SECS))?;

    let status = response.status();
    tracing::debug!("API response status: {}", status);

    if !status.is_success() {
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Could not read body of {} response: {}", status, e);
                format!("<unreadable body: {}>", e)
            }
        };
        return Err(RequestFailure::Status { status, body });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| RequestFailure::from_reqwest(e, REQUEST_TIMEOUT_SECS))
}

#[async_trait::async_trait]
impl TadoApi for TadoClient {
    async fn fetch_token(&self, username: &str, password: &str) -> Result<Credential> {
        tracing::debug!("POST {} (grant_type=password)", TOKEN_PATH);
        self.request_token(&[
            ("client_id", CLIENT_ID),
            ("grant_type", "password"),
            ("scope", SCOPE),
            ("username", username),
            ("password", password),
        ])
        .await
        .map_err(TadoError::Auth)
    }

    async fn refresh_token(&self, credential: &Credential) -> Result<Credential> {
        tracing::debug!("POST {} (grant_type=refresh_token)", TOKEN_PATH);
        self.request_token(&[
            ("client_id", CLIENT_ID),
            ("grant_type", "refresh_token"),
            ("scope", SCOPE),
            ("refresh_token", credential.refresh_token()),
        ])
        .await
        .map_err(TadoError::Auth)
    }

    async fn fetch_homes(&self, credential: &Credential) -> Result<Vec<Home>> {
        let me: MeResponse = self
            .get_json(credential, ME_PATH)
            .await
            .map_err(TadoError::Api)?;

        Ok(me
            .homes
            .into_iter()
            .map(|home| Home {
                id: home.id,
                name: home.name,
            })
            .collect())
    }

    async fn fetch_zones(&self, credential: &Credential, home: &Home) -> Result<Vec<Zone>> {
        let zones: Vec<IdName> = self
            .get_json(credential, &zones_path(home.id))
            .await
            .map_err(TadoError::Api)?;

        Ok(zones
            .into_iter()
            .map(|zone| Zone {
                id: zone.id,
                name: zone.name,
                home_id: home.id,
            })
            .collect())
    }

    async fn fetch_zone_state(&self, credential: &Credential, zone: &Zone) -> Result<ZoneState> {
        self.get_json(credential, &zone_state_path(zone.home_id, zone.id))
            .await
            .map_err(TadoError::Api)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn token_body(access: &str, refresh: &str) -> serde_json::Value {
        serde_json::json!({
            "access_token": access,
            "token_type": "bearer",
            "refresh_token": refresh,
            "expires_in": 599,
            "scope": "home.user",
            "jti": "abc"
        })
    }

    #[tokio::test]
    async fn test_fetch_token_posts_password_grant() {
        let server = MockServer::start();
        let token_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/oauth/token")
                .header("content-type", "application/x-www-form-urlencoded")
                .body_contains("client_id=tado-webapp")
                .body_contains("grant_type=password")
                .body_contains("scope=home.user")
                .body_contains("username=alice")
                .body_contains("password=hunter2");
            then.status(200).json_body(token_body("access-1", "refresh-1"));
        });

        let client = TadoClient::with_base_url(server.base_url()).unwrap();
        let credential = client.fetch_token("alice", "hunter2").await.unwrap();

        token_mock.assert();
        assert_eq!(credential.access_token(), "access-1");
        assert_eq!(credential.refresh_token(), "refresh-1");
        assert_eq!(credential.lifetime_seconds(), 599);
        assert!(!credential.is_expired());
    }

    #[tokio::test]
    async fn test_refresh_token_posts_refresh_grant() {
        let server = MockServer::start();
        let refresh_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/oauth/token")
                .body_contains("grant_type=refresh_token")
                .body_contains("refresh_token=refresh-1");
            then.status(200).json_body(token_body("access-2", "refresh-2"));
        });

        let client = TadoClient::with_base_url(server.base_url()).unwrap();
        let old = Credential::new("access-1", "refresh-1", 599);
        let fresh = client.refresh_token(&old).await.unwrap();

        refresh_mock.assert();
        assert_ne!(old, fresh);
        assert_eq!(fresh.access_token(), "access-2");
        assert_eq!(fresh.refresh_token(), "refresh-2");
    }

    #[tokio::test]
    async fn test_fetch_token_rejected_credentials() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(401)
                .json_body(serde_json::json!({"error": "invalid_grant"}));
        });

        let client = TadoClient::with_base_url(server.base_url()).unwrap();
        let err = client.fetch_token("alice", "wrong").await.unwrap_err();

        match err {
            TadoError::Auth(RequestFailure::Status { status, body }) => {
                assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
                assert!(body.contains("invalid_grant"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_token_missing_fields_is_auth_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(200)
                .json_body(serde_json::json!({"access_token": "only-this"}));
        });

        let client = TadoClient::with_base_url(server.base_url()).unwrap();
        let err = client.fetch_token("alice", "hunter2").await.unwrap_err();

        assert!(matches!(err, TadoError::Auth(RequestFailure::Decode(_))));
    }

    #[tokio::test]
    async fn test_fetch_homes_preserves_order_and_sends_bearer() {
        let server = MockServer::start();
        let me_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v2/me")
                .header("authorization", "Bearer access-1");
            then.status(200).json_body(serde_json::json!({
                "name": "Alice",
                "email": "alice@example.com",
                "homes": [
                    {"id": 20, "name": "Cabin"},
                    {"id": 10, "name": "Flat"}
                ]
            }));
        });

        let client = TadoClient::with_base_url(server.base_url()).unwrap();
        let credential = Credential::new("access-1", "refresh-1", 599);
        let homes = client.fetch_homes(&credential).await.unwrap();

        me_mock.assert();
        assert_eq!(
            homes,
            vec![
                Home {
                    id: 20,
                    name: "Cabin".to_string()
                },
                Home {
                    id: 10,
                    name: "Flat".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_zones_sets_home_back_reference() {
        let server = MockServer::start();
        let zones_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v2/homes/7/zones")
                .header("authorization", "Bearer access-1");
            then.status(200).json_body(serde_json::json!([
                {"id": 1, "name": "Living Room", "type": "HEATING"},
                {"id": 3, "name": "Bathroom", "type": "HEATING"}
            ]));
        });

        let client = TadoClient::with_base_url(server.base_url()).unwrap();
        let credential = Credential::new("access-1", "refresh-1", 599);
        let home = Home {
            id: 7,
            name: "Flat".to_string(),
        };
        let zones = client.fetch_zones(&credential, &home).await.unwrap();

        zones_mock.assert();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].id, 1);
        assert_eq!(zones[0].name, "Living Room");
        assert_eq!(zones[1].id, 3);
        assert!(zones.iter().all(|zone| zone.home_id == 7));
    }

    #[tokio::test]
    async fn test_fetch_zone_state_is_passed_through() {
        let server = MockServer::start();
        let state = serde_json::json!({
            "tadoMode": "HOME",
            "setting": {"type": "HEATING", "power": "ON", "temperature": {"celsius": 21.0}},
            "sensorDataPoints": {
                "insideTemperature": {"celsius": 20.4},
                "humidity": {"percentage": 48.1}
            }
        });
        let state_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v2/homes/7/zones/3/state")
                .header("authorization", "Bearer access-1");
            then.status(200).json_body(state.clone());
        });

        let client = TadoClient::with_base_url(server.base_url()).unwrap();
        let credential = Credential::new("access-1", "refresh-1", 599);
        let zone = Zone {
            id: 3,
            name: "Bathroom".to_string(),
            home_id: 7,
        };
        let fetched = client.fetch_zone_state(&credential, &zone).await.unwrap();

        state_mock.assert();
        assert_eq!(fetched, state);
    }

    #[tokio::test]
    async fn test_discovery_failure_is_api_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v2/me");
            then.status(500).body("boom");
        });

        let client = TadoClient::with_base_url(server.base_url()).unwrap();
        let credential = Credential::new("access-1", "refresh-1", 599);
        let err = client.fetch_homes(&credential).await.unwrap_err();

        assert!(matches!(
            err,
            TadoError::Api(RequestFailure::Status { .. })
        ));
        assert!(!err.is_timeout());
    }

    #[tokio::test]
    async fn test_malformed_homes_payload_is_api_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v2/me");
            then.status(200).json_body(serde_json::json!({"name": "Alice"}));
        });

        let client = TadoClient::with_base_url(server.base_url()).unwrap();
        let credential = Credential::new("access-1", "refresh-1", 599);
        let err = client.fetch_homes(&credential).await.unwrap_err();

        assert!(matches!(err, TadoError::Api(RequestFailure::Decode(_))));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = TadoClient::with_base_url("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url(ME_PATH), "http://localhost:8080/api/v2/me");
        assert_eq!(TadoClient::new().unwrap().base_url(), BASE_URL);
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(zones_path(42), "/api/v2/homes/42/zones");
        assert_eq!(zone_state_path(42, 5), "/api/v2/homes/42/zones/5/state");
    }
}
