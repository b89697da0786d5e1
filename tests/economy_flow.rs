mod common;

use chrono::Duration;
use colony_world::{
    coords::{colony_anchor, TILES_PER_CHUNK},
    economy,
    territory::{classify, Control, PatrolPresence},
    ChunkCoord, ColonyId, InMemoryStore, ResourceKind, TilePos, TileStore, WorldError,
    WorldGateway, WorldTile,
};

fn plain_tile(gateway: &WorldGateway<InMemoryStore>, colony: &ColonyId) -> WorldTile {
    gateway
        .get_all_tiles(colony)
        .unwrap()
        .into_iter()
        .find(|t| !t.is_river() && t.max_resources.food >= 2 && t.max_resources.herbs >= 2)
        .expect("starting area has a plain tile")
}

fn set_stock(
    gateway: &WorldGateway<InMemoryStore>,
    colony: &ColonyId,
    pos: TilePos,
    food: u32,
    herbs: u32,
) {
    gateway
        .store()
        .mutate_tile(colony, pos, &mut |t| {
            t.resources.food = food;
            t.resources.herbs = herbs;
        })
        .unwrap();
}

#[test]
fn harvest_never_takes_more_than_skill_or_stock() {
    let (gateway, _, colony) = common::fixture();
    gateway.initialize_world(&colony).unwrap();
    let tile = plain_tile(&gateway, &colony);

    for skill in [0, 49, 50, 99, 100, 250] {
        let before = gateway.get_tile(&colony, tile.pos()).unwrap().unwrap();
        let pre = before.resources.food;
        let taken = gateway
            .harvest_tile(&colony, tile.pos(), ResourceKind::Food, skill)
            .unwrap();
        let after = gateway.get_tile(&colony, tile.pos()).unwrap().unwrap();
        assert!(taken <= (1 + skill / 50).min(pre));
        assert_eq!(after.resources.food, pre - taken);
    }
}

#[test]
fn harvest_on_missing_tile_is_not_found() {
    let (gateway, _, colony) = common::fixture();
    let result = gateway.harvest_tile(&colony, TilePos::new(500, 500), ResourceKind::Food, 10);
    assert!(matches!(result, Err(WorldError::TileNotFound { .. })));
    assert!(gateway.get_all_tiles(&colony).unwrap().is_empty());
}

#[test]
fn depleted_tile_regrows_fully_at_six_hours() {
    let (gateway, clock, colony) = common::fixture();
    gateway.initialize_world(&colony).unwrap();
    let tile = plain_tile(&gateway, &colony);
    let pos = tile.pos();
    set_stock(&gateway, &colony, pos, 1, 1);

    gateway.harvest_tile(&colony, pos, ResourceKind::Food, 0).unwrap();
    let stamp = gateway.now().timestamp_millis();
    clock.advance(Duration::minutes(10));
    gateway.harvest_tile(&colony, pos, ResourceKind::Herbs, 0).unwrap();
    let depleted = gateway.get_tile(&colony, pos).unwrap().unwrap();
    assert_eq!(depleted.last_depleted, stamp, "clock starts at first depletion");
    assert!(gateway.is_tile_depleted(&colony, pos).unwrap());

    clock.advance(Duration::hours(5) - Duration::minutes(10));
    gateway.regenerate_and_decay(&colony).unwrap();
    let partial = gateway.get_tile(&colony, pos).unwrap().unwrap();
    assert!(partial.resources.food < partial.max_resources.food);
    assert!(partial.resources.herbs < partial.max_resources.herbs);
    assert!(partial.is_marked_depleted());

    clock.advance(Duration::hours(1));
    let report = gateway.regenerate_and_decay(&colony).unwrap();
    assert_eq!(report.replenished, 1);
    let full = gateway.get_tile(&colony, pos).unwrap().unwrap();
    assert_eq!(full.resources.food, full.max_resources.food);
    assert_eq!(full.resources.herbs, full.max_resources.herbs);
    assert_eq!(full.last_depleted, 0);
}

#[test]
fn river_tiles_are_exempt() {
    let (gateway, clock, colony) = common::fixture();
    gateway.initialize_world(&colony).unwrap();
    let anchor = colony_anchor();
    gateway
        .store()
        .mutate_tile(&colony, anchor, &mut |t| {
            t.terrain = colony_world::terrain::TerrainType::River;
            t.resources.water = 0;
            t.resources.food = 0;
            t.resources.herbs = 0;
            t.last_depleted = 1;
        })
        .unwrap();
    let river = gateway.get_tile(&colony, anchor).unwrap().unwrap();
    assert!(!gateway.is_tile_depleted(&colony, anchor).unwrap());
    assert_eq!(economy::regenerate(&river, 48.0), river);

    clock.advance(Duration::hours(12));
    gateway.regenerate_and_decay(&colony).unwrap();
    assert_eq!(gateway.get_tile(&colony, anchor).unwrap().unwrap(), river);

    let taken = gateway
        .harvest_tile(&colony, anchor, ResourceKind::Water, 100)
        .unwrap();
    assert_eq!(taken, 0, "a dry river has nothing to give");
    assert_eq!(gateway.get_tile(&colony, anchor).unwrap().unwrap(), river);

    gateway
        .store()
        .mutate_tile(&colony, anchor, &mut |t| t.resources.water = 2)
        .unwrap();
    for _ in 0..3 {
        let taken = gateway
            .harvest_tile(&colony, anchor, ResourceKind::Water, 100)
            .unwrap();
        assert_eq!(taken, 2);
    }
    let after = gateway.get_tile(&colony, anchor).unwrap().unwrap();
    assert_eq!(after.resources.water, 2);
    assert_eq!(after.last_depleted, 1);
}

#[test]
fn wear_accrues_materializes_and_decays() {
    let (gateway, _, colony) = common::fixture();
    let far = TilePos::new(-40, 33);
    assert!(gateway.get_tile(&colony, far).unwrap().is_none());

    assert_eq!(gateway.add_wear(&colony, far, 60).unwrap(), 60);
    assert_eq!(
        gateway.get_tiles_in_chunk(&colony, far.chunk()).unwrap().len(),
        TILES_PER_CHUNK
    );
    assert_eq!(gateway.add_wear(&colony, far, 60).unwrap(), 100);

    let report = gateway.regenerate_and_decay(&colony).unwrap();
    assert_eq!(report.wear_decayed, 1);
    assert_eq!(
        gateway.get_tile(&colony, far).unwrap().unwrap().path_wear,
        99
    );

    let reveal = gateway.reveal_map(&colony).unwrap();
    assert!(reveal.is_revealed(far));
    assert!(reveal.is_revealed(TilePos::new(-40, 34)));
    assert!(!reveal.is_revealed(TilePos::new(-38, 33)));
}

#[test]
fn reset_world_replaces_seed_and_tiles() {
    let (gateway, _, colony) = common::fixture();
    gateway.initialize_world(&colony).unwrap();
    gateway.expand_revealed_area(&colony, 5).unwrap();
    let old_seed = gateway.world_seed(&colony).unwrap();
    let outer = ChunkCoord::new(2, 2);
    assert!(!gateway.get_tiles_in_chunk(&colony, outer).unwrap().is_empty());

    let report = gateway.reset_world(&colony).unwrap();
    assert_eq!(report.previous_seed, Some(old_seed));
    assert_ne!(report.new_seed, old_seed);
    assert_eq!(gateway.world_seed(&colony).unwrap(), report.new_seed);
    assert_eq!(report.deleted, 25 * TILES_PER_CHUNK);
    assert_eq!(report.generated, 9 * TILES_PER_CHUNK);

    assert!(gateway.get_tiles_in_chunk(&colony, outer).unwrap().is_empty());
    assert_eq!(
        gateway.get_all_tiles(&colony).unwrap().len(),
        9 * TILES_PER_CHUNK
    );
}

#[test]
fn reset_unknown_colony_is_not_found() {
    let (gateway, _, _) = common::fixture();
    let result = gateway.reset_world(&ColonyId::new("nobody"));
    assert!(matches!(result, Err(WorldError::ColonyNotFound(_))));
}

#[test]
fn territory_summary_reflects_patrols() {
    let (gateway, _, colony) = common::fixture();
    gateway.initialize_world(&colony).unwrap();

    let quiet = gateway
        .territory_summary(&colony, &PatrolPresence::new())
        .unwrap();
    assert_eq!(quiet.tile_count(), 9 * TILES_PER_CHUNK);
    assert!(quiet.controlled > 0, "home tiles are controlled");
    assert!(quiet.wild > quiet.controlled);

    let far = TilePos::new(20, 20);
    let far_tile = gateway.get_tile(&colony, far).unwrap().unwrap();
    assert_eq!(
        classify(colony_world::territory::tile_influence(
            far.distance(colony_anchor()),
            0,
            0,
            far_tile.terrain
        )),
        Control::Wild
    );

    let mut presence = PatrolPresence::new();
    for _ in 0..4 {
        presence.add_cat(far);
    }
    let patrolled = gateway.territory_summary(&colony, &presence).unwrap();
    assert_eq!(patrolled.controlled, quiet.controlled + 1);
    assert!(patrolled.total_influence > quiet.total_influence);
}
