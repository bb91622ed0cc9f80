pub mod api;
pub mod detail;
pub mod hotspots;
pub mod queue;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use api::OutreachApi;
pub use detail::{ClientDetail, DetailPhase};
pub use hotspots::{HotspotMap, Marker};
pub use queue::{NewClient, QueueRow, QueueSummary, TriageQueue};
