use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use typed_builder::TypedBuilder;

use streetlight_common::classify::{urgency_tier, UrgencyTier, URGENCY_CRITICAL, URGENCY_HIGH};
use streetlight_common::error::{Result, StreetlightError};
use streetlight_common::time::{days_until_at, is_overdue_at, parse_instant};
use streetlight_common::types::QueueItem;
use streetlight_gateway::NewClientPayload;

use crate::api::OutreachApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Fields for creating a client. Only the display name is required; the
/// server derives everything the queue shows.
#[derive(Debug, Clone, TypedBuilder)]
pub struct NewClient {
    #[builder(setter(into))]
    pub display_name: String,
    #[builder(default, setter(strip_option, into))]
    pub neighborhood: Option<String>,
    #[builder(default, setter(strip_option, into))]
    pub notes: Option<String>,
    #[builder(default)]
    pub need_housing: bool,
    #[builder(default)]
    pub need_food: bool,
    #[builder(default)]
    pub need_therapy: bool,
    #[builder(default)]
    pub need_job: bool,
    #[builder(default)]
    pub need_transport: bool,
}

/// Display-ready derivation for one queue row. Pure function of the item
/// and the clock; the raw scores are never altered.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueRow {
    pub item: QueueItem,
    pub tier: UrgencyTier,
    pub overdue: bool,
    /// Ceiling days until follow-up; `None` when no follow-up is set (or
    /// the server sent an unparsable timestamp, treated the same).
    pub follow_up_in_days: Option<i64>,
}

impl QueueRow {
    pub fn derive_at(item: &QueueItem, now: DateTime<Utc>) -> Self {
        let follow = parse_instant(item.follow_up_at.as_deref());
        Self {
            item: item.clone(),
            tier: urgency_tier(item.urgency_score),
            overdue: is_overdue_at(follow, now),
            follow_up_in_days: follow.map(|f| days_until_at(f, now)),
        }
    }
}

/// Header counts, recomputed from the current list on every call — a pure
/// aggregate, never fetched or cached on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueSummary {
    pub total: usize,
    pub high: usize,
    pub critical: usize,
    pub overdue: usize,
}

pub fn summary_at(items: &[QueueItem], now: DateTime<Utc>) -> QueueSummary {
    QueueSummary {
        total: items.len(),
        high: items
            .iter()
            .filter(|i| i.urgency_score >= URGENCY_HIGH)
            .count(),
        critical: items
            .iter()
            .filter(|i| i.urgency_score >= URGENCY_CRITICAL)
            .count(),
        overdue: items
            .iter()
            .filter(|i| is_overdue_at(parse_instant(i.follow_up_at.as_deref()), now))
            .count(),
    }
}

/// View-model for the prioritized client list. The server is the sole
/// source of ranking truth: each refresh replaces the list wholesale and
/// the client never re-sorts it.
pub struct TriageQueue<A: OutreachApi> {
    api: Arc<A>,
    phase: Phase,
    items: Vec<QueueItem>,
    last_error: Option<String>,
}

impl<A: OutreachApi> TriageQueue<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            phase: Phase::Idle,
            items: Vec::new(),
            last_error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn items(&self) -> &[QueueItem] {
        &self.items
    }

    /// Message for the one-shot error notification, kept alongside the
    /// stale list so a transient blip never blanks the screen.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Fetch the queue. On success the list is replaced in full; on failure
    /// the prior list stays visible and the error is surfaced once.
    pub async fn refresh(&mut self) -> Result<()> {
        self.phase = Phase::Loading;
        match self.api.queue().await {
            Ok(resp) => {
                info!(count = resp.items.len(), "Queue refreshed");
                self.items = resp.items;
                self.phase = Phase::Loaded;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Queue refresh failed, keeping previous list");
                self.phase = Phase::Errored;
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Create a client, then refresh so the new row's derived metrics come
    /// from the server instead of local guesses. An empty display name is
    /// rejected locally; no request is sent.
    pub async fn add_client(&mut self, fields: NewClient) -> Result<()> {
        let display_name = fields.display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(StreetlightError::Validation(
                "Please enter a display name.".into(),
            ));
        }

        let payload = NewClientPayload {
            display_name,
            neighborhood: normalize(fields.neighborhood),
            notes: normalize(fields.notes),
            need_housing: fields.need_housing,
            need_food: fields.need_food,
            need_therapy: fields.need_therapy,
            need_job: fields.need_job,
            need_transport: fields.need_transport,
        };
        self.api.create_client(&payload).await?;
        self.refresh().await
    }

    /// Per-row display derivation over the current list, in server order.
    pub fn rows(&self) -> Vec<QueueRow> {
        let now = Utc::now();
        self.items
            .iter()
            .map(|i| QueueRow::derive_at(i, now))
            .collect()
    }

    pub fn summary(&self) -> QueueSummary {
        summary_at(&self.items, Utc::now())
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
