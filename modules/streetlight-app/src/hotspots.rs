use std::sync::Arc;

use tracing::{info, warn};

use streetlight_common::classify::{risk_tier, MarkerColor, RiskTier};
use streetlight_common::error::Result;
use streetlight_common::types::HotspotCell;

use crate::api::OutreachApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Initial map framing when no cell has usable coordinates yet
/// (downtown San Diego).
pub const FALLBACK_CENTER: (f64, f64) = (32.7157, -117.1611);

/// Demo-seeding defaults, matching the server's demo source.
pub const DEMO_SOURCE: &str = "sdpd_demo";
pub const DEMO_INCIDENT_COUNT: u32 = 120;

/// One mappable point: a cell that has coordinates, annotated with its
/// display tier and marker weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub cell_id: i64,
    pub lat: f64,
    pub lon: f64,
    pub risk_score: f64,
    pub tier: RiskTier,
    pub size: u32,
    pub color: MarkerColor,
}

/// View-model for the hotspot map. Cells are a read-only set replaced
/// wholesale on every refresh.
pub struct HotspotMap<A: OutreachApi> {
    api: Arc<A>,
    phase: Phase,
    cells: Vec<HotspotCell>,
    last_error: Option<String>,
}

impl<A: OutreachApi> HotspotMap<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            phase: Phase::Idle,
            cells: Vec::new(),
            last_error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// All cells, coordinate-less ones included, for list-mode display.
    pub fn cells(&self) -> &[HotspotCell] {
        &self.cells
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub async fn refresh(&mut self) -> Result<()> {
        self.phase = Phase::Loading;
        match self.api.hotspot_cells().await {
            Ok(resp) => {
                info!(cells = resp.cells.len(), "Hotspots refreshed");
                self.cells = resp.cells;
                self.phase = Phase::Loaded;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Hotspot refresh failed");
                self.phase = Phase::Errored;
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Demo workflow: seed synthetic incidents, trigger the server-side
    /// aggregation, then refresh. Strictly sequential; the first failing
    /// step aborts the rest and its error is surfaced. No rollback and no
    /// automatic retry — partial server state is left as the failed call
    /// left it.
    pub async fn seed_demo(&mut self) -> Result<()> {
        self.seed_demo_from(DEMO_SOURCE, DEMO_INCIDENT_COUNT).await
    }

    pub async fn seed_demo_from(&mut self, source: &str, n: u32) -> Result<()> {
        let seeded = self.api.seed_hotspots(source, n).await.map_err(|e| {
            self.last_error = Some(e.to_string());
            e
        })?;
        info!(source, inserted = ?seeded.inserted, "Seeded demo incidents");

        let ran = self.api.run_hotspots(source).await.map_err(|e| {
            self.last_error = Some(e.to_string());
            e
        })?;
        info!(source, cells = ?ran.cells, "Hotspot aggregation complete");

        self.refresh().await
    }

    /// Map markers: every cell with coordinates, tiered and weighted.
    /// Coordinate-less cells are excluded here but stay in `cells()`.
    pub fn markers(&self) -> Vec<Marker> {
        self.cells
            .iter()
            .filter_map(|cell| {
                let (lat, lon) = cell.coords()?;
                let tier = risk_tier(cell.risk_score);
                Some(Marker {
                    cell_id: cell.id,
                    lat,
                    lon,
                    risk_score: cell.risk_score,
                    tier,
                    size: tier.marker_size(),
                    color: tier.marker_color(),
                })
            })
            .collect()
    }

    /// Initial framing center: the first cell with coordinates, else the
    /// fixed fallback.
    pub fn center(&self) -> (f64, f64) {
        self.cells
            .iter()
            .find_map(HotspotCell::coords)
            .unwrap_or(FALLBACK_CENTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(id: i64, coords: Option<(f64, f64)>, risk: f64) -> HotspotCell {
        HotspotCell {
            id,
            grid_lat: coords.map(|c| c.0),
            grid_lon: coords.map(|c| c.1),
            recent_count: 3,
            baseline_count: 4,
            risk_score: risk,
        }
    }

    #[test]
    fn center_falls_back_without_coordinates() {
        let map = HotspotMap {
            api: Arc::new(crate::testing::MockApi::new()),
            phase: Phase::Idle,
            cells: vec![cell(1, None, 9.0)],
            last_error: None,
        };
        assert_eq!(map.center(), FALLBACK_CENTER);
    }

    #[test]
    fn markers_skip_unlocated_cells_but_lists_keep_them() {
        let map = HotspotMap {
            api: Arc::new(crate::testing::MockApi::new()),
            phase: Phase::Loaded,
            cells: vec![
                cell(1, Some((32.71, -117.16)), 5.5),
                cell(2, None, 9.0),
            ],
            last_error: None,
        };
        let markers = map.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].tier, RiskTier::Medium);
        assert_eq!(markers[0].size, 32);
        assert_eq!(map.cells().len(), 2);
        assert_eq!(map.center(), (32.71, -117.16));
    }
}
