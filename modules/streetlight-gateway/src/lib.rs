pub mod guard;
pub mod session;
pub mod vault;

pub use guard::{required_route, Route};
pub use session::{AuthApi, Session, SessionStatus};
pub use vault::{FileVault, MemoryVault, TokenVault};

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use streetlight_common::error::{Result, StreetlightError};
use streetlight_common::types::{
    Ack, ClientDetailResponse, ClientEnvelope, ContactEnvelope, ContactOutcome, ContextResponse,
    HotspotsResponse, LoginResponse, QueueResponse, ScreeningResult,
};

/// Partial update for a client's plan: the five need flags plus the
/// follow-up instant, already formatted without a timezone suffix
/// (`None` clears the follow-up server-side).
#[derive(Debug, Clone, Serialize)]
pub struct PlanUpdate {
    pub follow_up_at: Option<String>,
    pub need_housing: bool,
    pub need_food: bool,
    pub need_therapy: bool,
    pub need_job: bool,
    pub need_transport: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewClientPayload {
    pub display_name: String,
    pub neighborhood: Option<String>,
    pub notes: Option<String>,
    pub need_housing: bool,
    pub need_food: bool,
    pub need_therapy: bool,
    pub need_job: bool,
    pub need_transport: bool,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct ContactPayload<'a> {
    outcome: ContactOutcome,
    note: Option<&'a str>,
}

#[derive(Serialize)]
struct ScreeningPayload<'a> {
    notes: &'a str,
}

/// HTTP boundary to the outreach API. Attaches the bearer token when the
/// session holds one, resolves paths against the configured base URL, and
/// decodes bodies defensively. No retries, no token refresh, no redirect
/// on 401 — an expired token surfaces as an API error for the caller.
pub struct Gateway {
    http: reqwest::Client,
    base: Url,
    session: Arc<Session>,
}

impl Gateway {
    pub fn new(base: Url, session: Arc<Session>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
            session,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| StreetlightError::Config(format!("bad endpoint path {path:?}: {e}")))
    }

    /// Build a request with the bearer header merged in when a token is
    /// held. Absence of a token is not an error here; the server decides
    /// whether the call needed one.
    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        let mut req = self.http.request(method, url);
        if let Some(token) = self.session.token().await {
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    /// Read the full body as text, then parse. A non-2xx status becomes an
    /// API error with the message extracted from the body; an unparsable
    /// body becomes a decode error carrying status + raw text, never a
    /// silent default — the server may answer with HTML error pages.
    async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StreetlightError::from_response(status.as_u16(), &body));
        }
        serde_json::from_str(&body).map_err(|_| StreetlightError::Decode {
            status: status.as_u16(),
            body,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.request(Method::GET, path).await?.send().await?;
        Self::decode_json(resp).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let resp = self.request(method, path).await?.json(body).send().await?;
        Self::decode_json(resp).await
    }

    // --- Auth (unauthenticated; the session store drives these) ---

    pub(crate) async fn auth_request(&self, path: &str, email: &str, password: &str) -> Result<LoginResponse> {
        let url = self.endpoint(path)?;
        let resp = self
            .http
            .post(url)
            .json(&Credentials { email, password })
            .send()
            .await?;
        Self::decode_json(resp).await
    }

    // --- Triage ---

    pub async fn queue(&self) -> Result<QueueResponse> {
        tracing::debug!("Fetching triage queue");
        self.get_json("/triage/queue").await
    }

    pub async fn create_client(&self, payload: &NewClientPayload) -> Result<ClientEnvelope> {
        tracing::info!(display_name = %payload.display_name, "Creating client");
        self.send_json(Method::POST, "/triage/clients", payload).await
    }

    pub async fn client_detail(&self, client_id: i64) -> Result<ClientDetailResponse> {
        self.get_json(&format!("/triage/clients/{client_id}")).await
    }

    pub async fn client_context(&self, client_id: i64) -> Result<ContextResponse> {
        self.get_json(&format!("/triage/clients/{client_id}/context"))
            .await
    }

    pub async fn update_plan(&self, client_id: i64, plan: &PlanUpdate) -> Result<ClientEnvelope> {
        tracing::info!(client_id, follow_up = ?plan.follow_up_at, "Saving plan");
        self.send_json(Method::PATCH, &format!("/triage/clients/{client_id}"), plan)
            .await
    }

    pub async fn log_contact(
        &self,
        client_id: i64,
        outcome: ContactOutcome,
        note: Option<&str>,
    ) -> Result<ContactEnvelope> {
        tracing::info!(client_id, %outcome, "Logging contact");
        self.send_json(
            Method::POST,
            &format!("/triage/clients/{client_id}/contacts"),
            &ContactPayload { outcome, note },
        )
        .await
    }

    // --- Screening ---

    /// Submit free-text screening notes for a server-side risk verdict.
    pub async fn screening_submit(&self, notes: &str) -> Result<ScreeningResult> {
        tracing::info!("Submitting screening notes");
        self.send_json(
            Method::POST,
            "/screening/submit",
            &ScreeningPayload { notes },
        )
        .await
    }

    // --- Hotspots ---

    pub async fn hotspot_cells(&self) -> Result<HotspotsResponse> {
        tracing::debug!("Fetching hotspot cells");
        self.get_json("/hotspots").await
    }

    pub async fn seed_hotspots(&self, source: &str, n: u32) -> Result<Ack> {
        tracing::info!(source, n, "Seeding demo incidents");
        let resp = self
            .request(Method::POST, &format!("/hotspots/seed?source={source}&n={n}"))
            .await?
            .send()
            .await?;
        Self::decode_json(resp).await
    }

    pub async fn run_hotspots(&self, source: &str) -> Result<Ack> {
        tracing::info!(source, "Running hotspot aggregation");
        let resp = self
            .request(Method::POST, &format!("/hotspots/run?source={source}"))
            .await?
            .send()
            .await?;
        Self::decode_json(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_resolution_joins_relative_paths() {
        let session = Arc::new(Session::new(Arc::new(MemoryVault::new()), "k"));
        let gw = Gateway::new(Url::parse("http://localhost:8000/").unwrap(), session);
        assert_eq!(
            gw.endpoint("/triage/queue").unwrap().as_str(),
            "http://localhost:8000/triage/queue"
        );
        assert_eq!(
            gw.endpoint("hotspots").unwrap().as_str(),
            "http://localhost:8000/hotspots"
        );
    }
}
