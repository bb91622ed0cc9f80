// Trait abstraction over the remote gateway.
//
// View-models depend on OutreachApi rather than the concrete Gateway so
// they can be driven by the in-memory MockApi in tests: no network, no
// running server.

use async_trait::async_trait;

use streetlight_common::error::Result;
use streetlight_common::types::{
    Ack, ClientDetailResponse, ClientEnvelope, ContactEnvelope, ContactOutcome, ContextResponse,
    HotspotsResponse, QueueResponse,
};
use streetlight_gateway::{Gateway, NewClientPayload, PlanUpdate};

#[async_trait]
pub trait OutreachApi: Send + Sync {
    /// Fetch the prioritized triage queue. Order is server-defined.
    async fn queue(&self) -> Result<QueueResponse>;

    async fn create_client(&self, payload: &NewClientPayload) -> Result<ClientEnvelope>;

    /// Fetch one client plus its full contact history.
    async fn client_detail(&self, client_id: i64) -> Result<ClientDetailResponse>;

    /// Fetch the nearest-hotspot context. Supplementary: callers absorb a
    /// failure here instead of failing their composite load.
    async fn client_context(&self, client_id: i64) -> Result<ContextResponse>;

    async fn update_plan(&self, client_id: i64, plan: &PlanUpdate) -> Result<ClientEnvelope>;

    async fn log_contact(
        &self,
        client_id: i64,
        outcome: ContactOutcome,
        note: Option<&str>,
    ) -> Result<ContactEnvelope>;

    async fn hotspot_cells(&self) -> Result<HotspotsResponse>;

    async fn seed_hotspots(&self, source: &str, n: u32) -> Result<Ack>;

    async fn run_hotspots(&self, source: &str) -> Result<Ack>;
}

#[async_trait]
impl OutreachApi for Gateway {
    async fn queue(&self) -> Result<QueueResponse> {
        Gateway::queue(self).await
    }

    async fn create_client(&self, payload: &NewClientPayload) -> Result<ClientEnvelope> {
        Gateway::create_client(self, payload).await
    }

    async fn client_detail(&self, client_id: i64) -> Result<ClientDetailResponse> {
        Gateway::client_detail(self, client_id).await
    }

    async fn client_context(&self, client_id: i64) -> Result<ContextResponse> {
        Gateway::client_context(self, client_id).await
    }

    async fn update_plan(&self, client_id: i64, plan: &PlanUpdate) -> Result<ClientEnvelope> {
        Gateway::update_plan(self, client_id, plan).await
    }

    async fn log_contact(
        &self,
        client_id: i64,
        outcome: ContactOutcome,
        note: Option<&str>,
    ) -> Result<ContactEnvelope> {
        Gateway::log_contact(self, client_id, outcome, note).await
    }

    async fn hotspot_cells(&self) -> Result<HotspotsResponse> {
        Gateway::hotspot_cells(self).await
    }

    async fn seed_hotspots(&self, source: &str, n: u32) -> Result<Ack> {
        Gateway::seed_hotspots(self, source, n).await
    }

    async fn run_hotspots(&self, source: &str) -> Result<Ack> {
        Gateway::run_hotspots(self, source).await
    }
}
