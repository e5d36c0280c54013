//! Single request-building/dispatch path for all backend calls.

use std::sync::Arc;

use reqwest::{Method, Url};
use serde_json::{json, Value};
use tracing::{debug, warn};

use models::blood::{BloodType, HospitalStock};
use models::user::{Profile, UserType};
use service::session::SessionStore;

use crate::errors::ApiError;
use crate::transport::{ApiRequest, Transport};

/// Optional filters for the query-parameter form of the stock endpoint.
/// Only present filters are encoded.
#[derive(Debug, Clone, Default)]
pub struct StockFilters {
    pub county: Option<String>,
    pub constituency: Option<String>,
    pub blood_type: Option<BloodType>,
}

/// API client over an injected transport and session store.
///
/// Every call is single-attempt: transport and request errors bubble to the
/// caller unchanged, and failed requests make no local writes (the one
/// deliberate exception is [`ApiClient::current_user`]'s session-clear
/// degrade path).
pub struct ApiClient<T: Transport> {
    base_url: String,
    transport: Arc<T>,
    session: Arc<SessionStore>,
}

impl<T: Transport> ApiClient<T> {
    /// `base_url` includes the `/api` prefix, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: impl Into<String>, transport: Arc<T>, session: Arc<SessionStore>) -> Self {
        Self { base_url: base_url.into(), transport, session }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url_for(&self, segments: &[&str], params: &[(&str, String)]) -> Result<String, ApiError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| ApiError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Url("base url cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url.to_string())
    }

    /// Build and dispatch one JSON request.
    ///
    /// The bearer token is attached only when `requires_auth` is set and a
    /// token is cached; the body is serialized for mutating methods only.
    /// A non-success status becomes [`ApiError::Request`] carrying the
    /// server's `error`/`message` field.
    pub async fn request(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
        method: Method,
        body: Option<Value>,
        requires_auth: bool,
    ) -> Result<Value, ApiError> {
        let url = self.url_for(segments, params)?;
        let bearer = if requires_auth { self.session.token().await } else { None };
        let body = match method {
            Method::POST | Method::PUT | Method::PATCH => body,
            _ => None,
        };

        debug!(%url, method = %method, authed = bearer.is_some(), "dispatching api request");
        let resp = self.transport.send(ApiRequest { method, url, bearer, body }).await?;

        if !(200..300).contains(&resp.status) {
            return Err(ApiError::Request {
                status: resp.status,
                message: error_message(&resp.body),
            });
        }
        Ok(resp.body)
    }

    /// POST credentials unauthenticated. When the response carries a token
    /// (either `token` or `access_token`, with the record under `donor` or
    /// `user`), the session is persisted. A token-less response is a
    /// non-success login, not a protocol error: the raw body is returned
    /// either way for the caller to inspect.
    pub async fn login(
        &self,
        phone: &str,
        password: &str,
        user_type: UserType,
    ) -> Result<Value, ApiError> {
        let body = json!({ "phone": phone, "password": password, "user_type": user_type });
        let result = self
            .request(&["donor", "login"], &[], Method::POST, Some(body), false)
            .await?;

        let token = result
            .get("token")
            .or_else(|| result.get("access_token"))
            .and_then(Value::as_str);
        if let Some(token) = token {
            let profile = result
                .get("donor")
                .or_else(|| result.get("user"))
                .cloned()
                .map(serde_json::from_value::<Profile>)
                .transpose()
                .map_err(|e| ApiError::Validation(format!("unreadable profile in login response: {e}")))?
                .unwrap_or_default();
            self.session.save(token, &profile, user_type).await?;
            debug!(user_type = %user_type, "session persisted after login");
        }
        Ok(result)
    }

    pub async fn register(&self, registration: Value) -> Result<Value, ApiError> {
        self.request(&["donor", "register"], &[], Method::POST, Some(registration), false)
            .await
    }

    /// Best-effort server-side invalidation; the local session is cleared
    /// regardless of the outcome. Navigating back to the login view is the
    /// caller's concern.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if let Err(e) = self
            .request(&["donor", "logout"], &[], Method::POST, None, true)
            .await
        {
            warn!(error = %e, code = e.code(), "server-side logout failed; clearing local session anyway");
        }
        self.session.clear().await?;
        Ok(())
    }

    /// Cached-token fast path: no token means logged out, no request made.
    /// A failed profile fetch is treated as an invalid session: the local
    /// state is cleared via [`ApiClient::logout`] and `None` is returned.
    pub async fn current_user(&self) -> Result<Option<Profile>, ApiError> {
        if self.session.token().await.is_none() {
            return Ok(None);
        }
        match self
            .request(&["donor", "profile"], &[], Method::GET, None, true)
            .await
        {
            Ok(body) => {
                let record = body.get("donor").or_else(|| body.get("user")).unwrap_or(&body);
                serde_json::from_value(record.clone())
                    .map(Some)
                    .map_err(|e| ApiError::Validation(format!("unreadable profile: {e}")))
            }
            Err(e) => {
                warn!(error = %e, "profile fetch failed; treating session as invalid");
                self.logout().await?;
                Ok(None)
            }
        }
    }

    /// Path form of the stock endpoint; segments are percent-encoded.
    pub async fn blood_stock(
        &self,
        county: &str,
        constituency: &str,
    ) -> Result<Vec<HospitalStock>, ApiError> {
        let body = self
            .request(&["blood-stock", county, constituency], &[], Method::GET, None, false)
            .await?;
        decode_stock_list(body)
    }

    /// Query form of the stock endpoint; filters are appended only when
    /// present.
    pub async fn blood_availability(
        &self,
        filters: &StockFilters,
    ) -> Result<Vec<HospitalStock>, ApiError> {
        let mut params = Vec::new();
        if let Some(county) = &filters.county {
            params.push(("county", county.clone()));
        }
        if let Some(constituency) = &filters.constituency {
            params.push(("constituency", constituency.clone()));
        }
        if let Some(blood_type) = filters.blood_type {
            params.push(("blood_type", blood_type.to_string()));
        }
        let body = self
            .request(&["blood-stock"], &params, Method::GET, None, false)
            .await?;
        decode_stock_list(body)
    }

    pub async fn nearby_donors(
        &self,
        county: &str,
        blood_type: BloodType,
        constituency: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut params = vec![
            ("county", county.to_string()),
            ("blood_type", blood_type.to_string()),
        ];
        if let Some(c) = constituency {
            if !c.is_empty() {
                params.push(("constituency", c.to_string()));
            }
        }
        self.request(&["donors", "nearby"], &params, Method::GET, None, true)
            .await
    }

    pub async fn update_availability(&self, is_available: bool) -> Result<Value, ApiError> {
        self.request(
            &["donor", "availability"],
            &[],
            Method::PUT,
            Some(json!({ "is_available": is_available })),
            true,
        )
        .await
    }

    pub async fn create_blood_request(&self, fields: Value) -> Result<Value, ApiError> {
        self.request(&["blood-request"], &[], Method::POST, Some(fields), true)
            .await
    }

    pub async fn counties(&self) -> Result<Value, ApiError> {
        self.request(&["counties"], &[], Method::GET, None, false).await
    }

    pub async fn constituencies(&self, county: &str) -> Result<Value, ApiError> {
        self.request(&["constituencies", county], &[], Method::GET, None, false)
            .await
    }

    pub async fn blood_types(&self) -> Result<Value, ApiError> {
        self.request(&["blood-types"], &[], Method::GET, None, false).await
    }

    /// One-off database seeding hook exposed by the backend.
    pub async fn init_database(&self) -> Result<Value, ApiError> {
        self.request(&["init"], &[], Method::POST, None, false).await
    }
}

fn error_message(body: &Value) -> String {
    body.get("error")
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("API request failed")
        .to_string()
}

/// Stock lists arrive either bare or wrapped as `{"success": .., "data": [..]}`.
fn decode_stock_list(body: Value) -> Result<Vec<HospitalStock>, ApiError> {
    let list = match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(list)
        .map_err(|e| ApiError::Validation(format!("unreadable stock payload: {e}")))
}
