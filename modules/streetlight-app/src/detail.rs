use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use streetlight_common::error::{Result, StreetlightError};
use streetlight_common::time::{follow_up_in_days, follow_up_now, format_follow_up, parse_instant};
use streetlight_common::types::{Client, Contact, ContactOutcome, HotspotCell, NeedFlag};
use streetlight_gateway::PlanUpdate;

use crate::api::OutreachApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPhase {
    Idle,
    Loading,
    Ready,
}

/// View-model for one client's detail screen: the record, its contact
/// history, the nearest-hotspot context, and the staged plan edits.
///
/// Need flags and the follow-up are staged locally until `save_plan`;
/// everything else is replaced wholesale from server responses so derived
/// quantities are never guessed client-side.
pub struct ClientDetail<A: OutreachApi> {
    api: Arc<A>,
    client_id: i64,
    phase: DetailPhase,
    saving: bool,
    client: Option<Client>,
    contacts: Vec<Contact>,
    nearest: Option<HotspotCell>,
    follow_up: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl<A: OutreachApi> ClientDetail<A> {
    pub fn new(api: Arc<A>, client_id: i64) -> Self {
        Self {
            api,
            client_id,
            phase: DetailPhase::Idle,
            saving: false,
            client: None,
            contacts: Vec::new(),
            nearest: None,
            follow_up: None,
            last_error: None,
        }
    }

    pub fn phase(&self) -> DetailPhase {
        self.phase
    }

    /// True while a mutation is settling. UI disables the quick-log and
    /// save controls on this flag; overlapping saves are not supported.
    pub fn saving(&self) -> bool {
        self.saving
    }

    pub fn client(&self) -> Option<&Client> {
        self.client.as_ref()
    }

    /// Contact history in server order (newest first), never re-sorted.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn nearest_hotspot(&self) -> Option<&HotspotCell> {
        self.nearest.as_ref()
    }

    pub fn follow_up(&self) -> Option<DateTime<Utc>> {
        self.follow_up
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Fetch the client record + history and the area context concurrently.
    /// The context is supplementary: its failure is logged and the load
    /// still succeeds with no nearest hotspot. A failure of the main fetch
    /// fails the load and keeps whatever was shown before.
    pub async fn load(&mut self) -> Result<()> {
        self.phase = DetailPhase::Loading;
        let (detail, context) = tokio::join!(
            self.api.client_detail(self.client_id),
            self.api.client_context(self.client_id),
        );

        let detail = match detail {
            Ok(d) => d,
            Err(e) => {
                warn!(client_id = self.client_id, error = %e, "Client load failed");
                self.phase = if self.client.is_some() {
                    DetailPhase::Ready
                } else {
                    DetailPhase::Idle
                };
                self.last_error = Some(e.to_string());
                return Err(e);
            }
        };

        self.nearest = match context {
            Ok(ctx) => ctx.nearest_hotspot,
            Err(e) => {
                warn!(client_id = self.client_id, error = %e, "Context fetch failed, continuing without it");
                None
            }
        };

        self.follow_up = parse_instant(detail.client.follow_up_at.as_deref());
        self.client = Some(detail.client);
        self.contacts = detail.contacts;
        self.phase = DetailPhase::Ready;
        self.last_error = None;
        Ok(())
    }

    /// Flip one staged need flag. Local only; nothing is sent until
    /// `save_plan`.
    pub fn toggle_need(&mut self, flag: NeedFlag) {
        if let Some(client) = self.client.as_mut() {
            let current = client.need(flag);
            client.set_need(flag, !current);
        }
    }

    // --- Follow-up staging ---

    pub fn set_follow_up(&mut self, instant: DateTime<Utc>) {
        self.follow_up = Some(instant);
    }

    pub fn clear_follow_up(&mut self) {
        self.follow_up = None;
    }

    /// "Today" keeps the current time of day, not midnight.
    pub fn follow_up_today(&mut self) {
        self.follow_up = Some(follow_up_now());
    }

    pub fn follow_up_tomorrow(&mut self) {
        self.follow_up = Some(follow_up_in_days(1));
    }

    pub fn follow_up_plus_days(&mut self, days: i64) {
        self.follow_up = Some(follow_up_in_days(days));
    }

    /// Send the staged need flags and follow-up as a partial update. On
    /// success the server's returned record replaces local state (staged
    /// edits included — the server is authoritative) and the context is
    /// re-fetched, since a changed plan can change the nearest hotspot's
    /// relevance. On failure the staged edits stay for a retry.
    pub async fn save_plan(&mut self) -> Result<()> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| StreetlightError::Validation("No client loaded".into()))?;

        let plan = PlanUpdate {
            follow_up_at: self.follow_up.map(format_follow_up),
            need_housing: client.need_housing,
            need_food: client.need_food,
            need_therapy: client.need_therapy,
            need_job: client.need_job,
            need_transport: client.need_transport,
        };

        self.saving = true;
        let result = self.api.update_plan(self.client_id, &plan).await;
        match result {
            Ok(envelope) => {
                self.follow_up = parse_instant(envelope.client.follow_up_at.as_deref());
                self.client = Some(envelope.client);
                self.nearest = match self.api.client_context(self.client_id).await {
                    Ok(ctx) => ctx.nearest_hotspot,
                    Err(e) => {
                        warn!(client_id = self.client_id, error = %e, "Context refresh after save failed");
                        None
                    }
                };
                self.saving = false;
                info!(client_id = self.client_id, "Plan saved");
                Ok(())
            }
            Err(e) => {
                self.saving = false;
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Append a contact entry, then reload everything: days-since-last and
    /// miss counts are server-computed, so a local append would show
    /// guesses.
    pub async fn log_contact(&mut self, outcome: ContactOutcome, note: Option<&str>) -> Result<()> {
        self.saving = true;
        let result = self.api.log_contact(self.client_id, outcome, note).await;
        match result {
            Ok(_) => {
                self.saving = false;
                info!(client_id = self.client_id, %outcome, "Contact logged");
                self.load().await
            }
            Err(e) => {
                self.saving = false;
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Quick-log buttons from the detail header.
    pub async fn log_reached(&mut self) -> Result<()> {
        self.log_contact(ContactOutcome::Reached, Some("Quick log from detail"))
            .await
    }

    pub async fn log_no_answer(&mut self) -> Result<()> {
        self.log_contact(ContactOutcome::NoAnswer, Some("No answer"))
            .await
    }
}
