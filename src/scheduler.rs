//! Scheduler - drives the recurring regeneration and wear-decay sweep

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::WorldResult;
use crate::gateway::{SweepReport, WorldGateway};
use crate::store::{ColonyStatus, TileStore};
use crate::tile::ColonyId;

/// Statistics for a single sweep tick
#[derive(Debug, Clone)]
pub struct SweepStats {
    pub tick: u64,
    pub duration: Duration,
    pub colonies_swept: usize,
    pub colonies_skipped: usize,
    pub failures: Vec<(ColonyId, String)>,
    pub totals: SweepReport,
}

/// Runs `regenerate_and_decay` for every colony that has not ended.
pub struct SweepScheduler {
    tick_count: u64,
    stats_history: Vec<SweepStats>,
    max_stats_history: usize,
}

impl SweepScheduler {
    pub fn new() -> Self {
        Self {
            tick_count: 0,
            stats_history: Vec::new(),
            max_stats_history: 100,
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Execute one sweep over all colonies. A failing colony is recorded and
    /// skipped; it does not stop the others.
    pub fn tick<S: TileStore>(&mut self, gateway: &WorldGateway<S>) -> WorldResult<SweepStats> {
        let tick_start = Instant::now();
        let mut totals = SweepReport::default();
        let mut swept = 0;
        let mut skipped = 0;
        let mut failures = Vec::new();

        for record in gateway.store().colonies()? {
            if record.status == ColonyStatus::Ended {
                debug!(colony = %record.id, "skipping ended colony");
                skipped += 1;
                continue;
            }
            match gateway.regenerate_and_decay(&record.id) {
                Ok(report) => {
                    swept += 1;
                    totals.tiles_scanned += report.tiles_scanned;
                    totals.regenerated += report.regenerated;
                    totals.replenished += report.replenished;
                    totals.wear_decayed += report.wear_decayed;
                }
                Err(err) => {
                    warn!(colony = %record.id, error = %err, "sweep failed");
                    failures.push((record.id.clone(), err.to_string()));
                }
            }
        }

        self.tick_count += 1;
        let stats = SweepStats {
            tick: self.tick_count,
            duration: tick_start.elapsed(),
            colonies_swept: swept,
            colonies_skipped: skipped,
            failures,
            totals,
        };
        info!(
            tick = stats.tick,
            swept,
            skipped,
            regenerated = totals.regenerated,
            wear_decayed = totals.wear_decayed,
            "sweep tick complete"
        );

        self.stats_history.push(stats.clone());
        if self.stats_history.len() > self.max_stats_history {
            self.stats_history.remove(0);
        }
        Ok(stats)
    }

    /// Get recent sweep statistics
    pub fn recent_stats(&self) -> &[SweepStats] {
        &self.stats_history
    }

    /// Get average sweep time from recent history
    pub fn average_tick_time(&self) -> Option<Duration> {
        if self.stats_history.is_empty() {
            return None;
        }
        let total: Duration = self.stats_history.iter().map(|s| s.duration).sum();
        Some(total / self.stats_history.len() as u32)
    }
}

impl Default for SweepScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::colony_anchor;
    use crate::store::InMemoryStore;

    #[test]
    fn test_scheduler_skips_ended_colonies() {
        let gateway = WorldGateway::new(InMemoryStore::new());
        let alive = ColonyId::new("alive");
        let ended = ColonyId::new("ended");
        for colony in [&alive, &ended] {
            gateway.create_colony(colony).unwrap();
            gateway.initialize_world(colony).unwrap();
            gateway.add_wear(colony, colony_anchor(), 10).unwrap();
        }
        gateway
            .store()
            .set_status(&ended, ColonyStatus::Ended)
            .unwrap();

        let mut scheduler = SweepScheduler::new();
        let stats = scheduler.tick(&gateway).unwrap();
        assert_eq!(stats.tick, 1);
        assert_eq!(stats.colonies_swept, 1);
        assert_eq!(stats.colonies_skipped, 1);
        assert_eq!(stats.totals.wear_decayed, 1);

        let ended_tile = gateway.get_tile(&ended, colony_anchor()).unwrap().unwrap();
        assert_eq!(ended_tile.path_wear, 10);
        let alive_tile = gateway.get_tile(&alive, colony_anchor()).unwrap().unwrap();
        assert_eq!(alive_tile.path_wear, 9);
    }

    #[test]
    fn test_scheduler_stats_history() {
        let gateway = WorldGateway::new(InMemoryStore::new());
        let mut scheduler = SweepScheduler::new();
        assert!(scheduler.average_tick_time().is_none());
        scheduler.tick(&gateway).unwrap();
        scheduler.tick(&gateway).unwrap();
        assert_eq!(scheduler.tick_count(), 2);
        assert_eq!(scheduler.recent_stats().len(), 2);
        assert_eq!(scheduler.recent_stats()[1].tick, 2);
        assert!(scheduler.average_tick_time().is_some());
    }
}
