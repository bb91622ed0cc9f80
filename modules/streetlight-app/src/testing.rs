// Test mock for the OutreachApi boundary.
//
// MockApi is a stateful in-memory stand-in for the server: registered
// fixtures via builder `.on_*()` methods, per-operation failure injection,
// and a call log so tests can assert which requests happened (and which
// were skipped). Mutations behave like the real backend — created clients
// get server-derived queue metrics, logged contacts land in the stored
// history — so "reload reflects the server" scenarios are meaningful.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use streetlight_common::error::{Result, StreetlightError};
use streetlight_common::types::{
    Ack, Client, ClientDetailResponse, ClientEnvelope, Contact, ContactEnvelope, ContactOutcome,
    ContextResponse, HotspotCell, HotspotsResponse, QueueItem, QueueResponse, NEVER_CONTACTED,
};
use streetlight_gateway::{NewClientPayload, PlanUpdate};

use crate::api::OutreachApi;

pub struct MockApi {
    queue_items: Mutex<Vec<QueueItem>>,
    details: Mutex<HashMap<i64, ClientDetailResponse>>,
    contexts: Mutex<HashMap<i64, HotspotCell>>,
    cells: Mutex<Vec<HotspotCell>>,
    failing: Mutex<HashSet<&'static str>>,
    calls: Mutex<Vec<String>>,
    next_id: Mutex<i64>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            queue_items: Mutex::new(Vec::new()),
            details: Mutex::new(HashMap::new()),
            contexts: Mutex::new(HashMap::new()),
            cells: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
            next_id: Mutex::new(1000),
        }
    }

    pub fn on_queue(self, items: Vec<QueueItem>) -> Self {
        *self.queue_items.lock().unwrap() = items;
        self
    }

    pub fn on_detail(self, client: Client, contacts: Vec<Contact>) -> Self {
        self.details
            .lock()
            .unwrap()
            .insert(client.id, ClientDetailResponse { client, contacts });
        self
    }

    pub fn on_context(self, client_id: i64, cell: HotspotCell) -> Self {
        self.contexts.lock().unwrap().insert(client_id, cell);
        self
    }

    pub fn on_cells(self, cells: Vec<HotspotCell>) -> Self {
        *self.cells.lock().unwrap() = cells;
        self
    }

    /// Make one operation fail with an injected transport error.
    /// Operations: queue, create_client, detail, context, update_plan,
    /// log_contact, cells, seed, run.
    pub fn failing(self, op: &'static str) -> Self {
        self.failing.lock().unwrap().insert(op);
        self
    }

    /// Start failing an operation mid-test.
    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn recover(&self, op: &str) {
        self.failing.lock().unwrap().remove(op);
    }

    /// Every operation invoked so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) -> Result<()> {
        self.calls.lock().unwrap().push(call.to_string());
        let op = call.split(':').next().unwrap_or(call);
        if self.failing.lock().unwrap().contains(op) {
            return Err(StreetlightError::Network(format!(
                "injected failure for {op}"
            )));
        }
        Ok(())
    }

    fn fresh_id(&self) -> i64 {
        let mut id = self.next_id.lock().unwrap();
        *id += 1;
        *id
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutreachApi for MockApi {
    async fn queue(&self) -> Result<QueueResponse> {
        self.record("queue")?;
        Ok(QueueResponse {
            items: self.queue_items.lock().unwrap().clone(),
        })
    }

    async fn create_client(&self, payload: &NewClientPayload) -> Result<ClientEnvelope> {
        self.record("create_client")?;
        let id = self.fresh_id();
        let client = Client {
            id,
            display_name: payload.display_name.clone(),
            neighborhood: payload.neighborhood.clone(),
            notes: payload.notes.clone(),
            created_at: "2026-08-30T12:00:00".to_string(),
            follow_up_at: None,
            need_housing: payload.need_housing,
            need_food: payload.need_food,
            need_therapy: payload.need_therapy,
            need_job: payload.need_job,
            need_transport: payload.need_transport,
            home_lat: None,
            home_lon: None,
        };
        let needs_count = [
            payload.need_housing,
            payload.need_food,
            payload.need_therapy,
            payload.need_job,
            payload.need_transport,
        ]
        .iter()
        .filter(|b| **b)
        .count() as i64;

        // Server-derived metrics for a never-contacted client.
        self.queue_items.lock().unwrap().push(QueueItem {
            client_id: id,
            display_name: client.display_name.clone(),
            neighborhood: client.neighborhood.clone(),
            days_since_last: NEVER_CONTACTED,
            misses_30d: 0,
            urgency_score: 60.0,
            needs_count,
            follow_up_at: None,
        });
        self.details.lock().unwrap().insert(
            id,
            ClientDetailResponse {
                client: client.clone(),
                contacts: Vec::new(),
            },
        );
        Ok(ClientEnvelope { client })
    }

    async fn client_detail(&self, client_id: i64) -> Result<ClientDetailResponse> {
        self.record(&format!("detail:{client_id}"))?;
        self.details
            .lock()
            .unwrap()
            .get(&client_id)
            .cloned()
            .ok_or(StreetlightError::Api {
                status: 404,
                message: "Client not found".into(),
            })
    }

    async fn client_context(&self, client_id: i64) -> Result<ContextResponse> {
        self.record(&format!("context:{client_id}"))?;
        Ok(ContextResponse {
            nearest_hotspot: self.contexts.lock().unwrap().get(&client_id).cloned(),
        })
    }

    async fn update_plan(&self, client_id: i64, plan: &PlanUpdate) -> Result<ClientEnvelope> {
        self.record(&format!("update_plan:{client_id}"))?;
        let mut details = self.details.lock().unwrap();
        let detail = details.get_mut(&client_id).ok_or(StreetlightError::Api {
            status: 404,
            message: "Client not found".into(),
        })?;
        detail.client.follow_up_at = plan.follow_up_at.clone();
        detail.client.need_housing = plan.need_housing;
        detail.client.need_food = plan.need_food;
        detail.client.need_therapy = plan.need_therapy;
        detail.client.need_job = plan.need_job;
        detail.client.need_transport = plan.need_transport;
        Ok(ClientEnvelope {
            client: detail.client.clone(),
        })
    }

    async fn log_contact(
        &self,
        client_id: i64,
        outcome: ContactOutcome,
        note: Option<&str>,
    ) -> Result<ContactEnvelope> {
        self.record(&format!("log_contact:{client_id}"))?;
        let contact = Contact {
            id: self.fresh_id(),
            contacted_at: "2026-08-30T12:00:00".to_string(),
            outcome,
            note: note.map(str::to_string),
        };
        let mut details = self.details.lock().unwrap();
        let detail = details.get_mut(&client_id).ok_or(StreetlightError::Api {
            status: 404,
            message: "Client not found".into(),
        })?;
        // Server returns history newest-first.
        detail.contacts.insert(0, contact.clone());
        Ok(ContactEnvelope { contact })
    }

    async fn hotspot_cells(&self) -> Result<HotspotsResponse> {
        self.record("cells")?;
        Ok(HotspotsResponse {
            cells: self.cells.lock().unwrap().clone(),
        })
    }

    async fn seed_hotspots(&self, source: &str, n: u32) -> Result<Ack> {
        self.record(&format!("seed:{source}"))?;
        Ok(Ack {
            status: "seeded".into(),
            inserted: Some(n as i64),
            cells: None,
        })
    }

    async fn run_hotspots(&self, source: &str) -> Result<Ack> {
        self.record(&format!("run:{source}"))?;
        Ok(Ack {
            status: "computed".into(),
            inserted: None,
            cells: Some(self.cells.lock().unwrap().len() as i64),
        })
    }
}

// --- Fixture helpers ---

pub fn sample_client(id: i64, display_name: &str) -> Client {
    Client {
        id,
        display_name: display_name.to_string(),
        neighborhood: Some("City Heights".to_string()),
        notes: None,
        created_at: "2026-08-01T09:00:00".to_string(),
        follow_up_at: None,
        need_housing: true,
        need_food: false,
        need_therapy: false,
        need_job: false,
        need_transport: false,
        home_lat: Some(32.74),
        home_lon: Some(-117.08),
    }
}

pub fn sample_queue_item(client_id: i64, urgency_score: f64) -> QueueItem {
    QueueItem {
        client_id,
        display_name: format!("Client {client_id}"),
        neighborhood: None,
        days_since_last: 4,
        misses_30d: 1,
        urgency_score,
        needs_count: 1,
        follow_up_at: None,
    }
}

pub fn sample_cell(id: i64, coords: Option<(f64, f64)>, risk_score: f64) -> HotspotCell {
    HotspotCell {
        id,
        grid_lat: coords.map(|c| c.0),
        grid_lon: coords.map(|c| c.1),
        recent_count: 5,
        baseline_count: 2,
        risk_score,
    }
}
