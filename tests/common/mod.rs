use std::sync::Arc;

use chrono::{TimeZone, Utc};
use colony_world::{clock::ManualClock, ColonyId, InMemoryStore, WorldGateway};

pub fn fixture() -> (WorldGateway<InMemoryStore>, Arc<ManualClock>, ColonyId) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 5, 20, 8, 0, 0).unwrap(),
    ));
    let gateway = WorldGateway::new(InMemoryStore::new()).with_clock(clock.clone());
    let colony = ColonyId::new("mittens");
    gateway.create_colony(&colony).expect("colony registers");
    (gateway, clock, colony)
}
