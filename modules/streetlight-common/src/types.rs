use serde::{Deserialize, Serialize};

// --- Auth ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserProfile,
}

// --- Needs ---

/// The five independent need flags a client can carry. The count shown on
/// queue rows (`needs_count`) is computed server-side; these flags exist
/// client-side only for staging edits on the detail screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedFlag {
    Housing,
    Food,
    Therapy,
    Job,
    Transport,
}

impl NeedFlag {
    pub const ALL: [NeedFlag; 5] = [
        NeedFlag::Housing,
        NeedFlag::Food,
        NeedFlag::Therapy,
        NeedFlag::Job,
        NeedFlag::Transport,
    ];
}

impl std::fmt::Display for NeedFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NeedFlag::Housing => write!(f, "Housing"),
            NeedFlag::Food => write!(f, "Food"),
            NeedFlag::Therapy => write!(f, "Therapy"),
            NeedFlag::Job => write!(f, "Job"),
            NeedFlag::Transport => write!(f, "Transport"),
        }
    }
}

// --- Clients ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub display_name: String,
    pub neighborhood: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub follow_up_at: Option<String>,
    pub need_housing: bool,
    pub need_food: bool,
    pub need_therapy: bool,
    pub need_job: bool,
    pub need_transport: bool,
    pub home_lat: Option<f64>,
    pub home_lon: Option<f64>,
}

impl Client {
    pub fn need(&self, flag: NeedFlag) -> bool {
        match flag {
            NeedFlag::Housing => self.need_housing,
            NeedFlag::Food => self.need_food,
            NeedFlag::Therapy => self.need_therapy,
            NeedFlag::Job => self.need_job,
            NeedFlag::Transport => self.need_transport,
        }
    }

    pub fn set_need(&mut self, flag: NeedFlag, value: bool) {
        match flag {
            NeedFlag::Housing => self.need_housing = value,
            NeedFlag::Food => self.need_food = value,
            NeedFlag::Therapy => self.need_therapy = value,
            NeedFlag::Job => self.need_job = value,
            NeedFlag::Transport => self.need_transport = value,
        }
    }

    pub fn home_coords(&self) -> Option<(f64, f64)> {
        match (self.home_lat, self.home_lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

// --- Contacts ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactOutcome {
    Reached,
    NoAnswer,
    Referral,
    Other,
}

impl std::fmt::Display for ContactOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactOutcome::Reached => write!(f, "reached"),
            ContactOutcome::NoAnswer => write!(f, "no_answer"),
            ContactOutcome::Referral => write!(f, "referral"),
            ContactOutcome::Other => write!(f, "other"),
        }
    }
}

/// Append-only contact log entry. The server assigns id and timestamp;
/// entries are never edited or deleted from the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub contacted_at: String,
    pub outcome: ContactOutcome,
    pub note: Option<String>,
}

// --- Triage queue ---

/// Sentinel `days_since_last` value the server emits for clients who have
/// never been contacted.
pub const NEVER_CONTACTED: i64 = 9999;

/// Read-only projection for one queue row. All derived metrics
/// (days_since_last, misses_30d, urgency_score, needs_count) are computed
/// server-side and replaced wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    pub client_id: i64,
    pub display_name: String,
    #[serde(default)]
    pub neighborhood: Option<String>,
    pub days_since_last: i64,
    pub misses_30d: i64,
    pub urgency_score: f64,
    pub needs_count: i64,
    #[serde(default)]
    pub follow_up_at: Option<String>,
}

impl QueueItem {
    pub fn never_contacted(&self) -> bool {
        self.days_since_last >= NEVER_CONTACTED
    }

    /// Human label for the last-contact column: "—" when never contacted.
    pub fn last_contact_label(&self) -> String {
        if self.never_contacted() {
            "—".to_string()
        } else {
            format!("{}d ago", self.days_since_last)
        }
    }
}

// --- Hotspots ---

/// One geographic grid cell from the server's hotspot aggregation. Cells
/// without resolvable coordinates stay in list views but are never mapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotCell {
    pub id: i64,
    #[serde(default)]
    pub grid_lat: Option<f64>,
    #[serde(default)]
    pub grid_lon: Option<f64>,
    pub recent_count: i64,
    pub baseline_count: i64,
    pub risk_score: f64,
}

impl HotspotCell {
    pub fn coords(&self) -> Option<(f64, f64)> {
        match (self.grid_lat, self.grid_lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

// --- Screening ---

/// Server verdict on a free-text screening note. The keyword scan lives
/// entirely server-side; the client only renders the verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub is_escalated: bool,
    #[serde(default)]
    pub escalation_reason: Option<String>,
    pub next_steps: String,
}

// --- Wire envelopes ---

#[derive(Debug, Clone, Deserialize)]
pub struct QueueResponse {
    #[serde(default)]
    pub items: Vec<QueueItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientEnvelope {
    pub client: Client,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientDetailResponse {
    pub client: Client,
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContextResponse {
    #[serde(default)]
    pub nearest_hotspot: Option<HotspotCell>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactEnvelope {
    pub contact: Contact,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HotspotsResponse {
    #[serde(default)]
    pub cells: Vec<HotspotCell>,
}

/// Loose acknowledgement body for the hotspot seed/run admin calls.
/// The server reports a status word plus whichever count applies.
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    pub status: String,
    #[serde(default)]
    pub inserted: Option<i64>,
    #[serde(default)]
    pub cells: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_snake_case() {
        let json = serde_json::to_string(&ContactOutcome::NoAnswer).unwrap();
        assert_eq!(json, "\"no_answer\"");
        let back: ContactOutcome = serde_json::from_str("\"referral\"").unwrap();
        assert_eq!(back, ContactOutcome::Referral);
    }

    #[test]
    fn queue_item_sentinel_means_never_contacted() {
        let item: QueueItem = serde_json::from_str(
            r#"{
                "client_id": 1,
                "display_name": "John D.",
                "days_since_last": 9999,
                "misses_30d": 0,
                "urgency_score": 10,
                "needs_count": 2
            }"#,
        )
        .unwrap();
        assert!(item.never_contacted());
        assert_eq!(item.last_contact_label(), "—");
        assert!(item.follow_up_at.is_none());
    }

    #[test]
    fn cell_without_coords_has_no_mappable_point() {
        let cell: HotspotCell = serde_json::from_str(
            r#"{"id": 3, "recent_count": 2, "baseline_count": 5, "risk_score": 9.0}"#,
        )
        .unwrap();
        assert_eq!(cell.coords(), None);
    }

    #[test]
    fn screening_verdict_decodes_with_and_without_a_reason() {
        let escalated: ScreeningResult = serde_json::from_str(
            r#"{
                "is_escalated": true,
                "escalation_reason": "High-risk keywords detected",
                "next_steps": "Immediate outreach recommended"
            }"#,
        )
        .unwrap();
        assert!(escalated.is_escalated);
        assert!(escalated.escalation_reason.is_some());

        let routine: ScreeningResult = serde_json::from_str(
            r#"{"is_escalated": false, "escalation_reason": null, "next_steps": "Routine follow-up"}"#,
        )
        .unwrap();
        assert!(!routine.is_escalated);
        assert_eq!(routine.escalation_reason, None);
        assert_eq!(routine.next_steps, "Routine follow-up");
    }

    #[test]
    fn need_flags_round_trip_through_client() {
        let mut client: Client = serde_json::from_str(
            r#"{
                "id": 7,
                "display_name": "A",
                "neighborhood": null,
                "notes": null,
                "created_at": "2026-01-02T03:04:05",
                "follow_up_at": null,
                "need_housing": false,
                "need_food": true,
                "need_therapy": false,
                "need_job": false,
                "need_transport": false,
                "home_lat": null,
                "home_lon": null
            }"#,
        )
        .unwrap();
        assert!(client.need(NeedFlag::Food));
        client.set_need(NeedFlag::Housing, true);
        assert!(client.need(NeedFlag::Housing));
        assert_eq!(NeedFlag::ALL.iter().filter(|f| client.need(**f)).count(), 2);
    }
}
