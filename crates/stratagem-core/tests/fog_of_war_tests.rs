//! Fog-of-war projection tests: what each player may and may not see.
//!
//! The core security property under test: a player's projection never
//! carries any attribute of a fogged province, and never reveals unit types
//! or buildings in visible-but-not-owned provinces.

use stratagem_core::{
    player_view, Building, BuildingType, Game, GameConfig, ProvinceView, UnitType,
};

fn game() -> Game {
    Game::new(&GameConfig::default())
}

#[test]
fn test_watchtower_vision_chain() {
    // p0 owns ironvale and thornfield; a watchtower in ironvale extends
    // sight two hops: mistwood (adjacent) and darkhollow (adjacent to
    // mistwood) both become observable, everything further stays fogged.
    let mut g = game();
    g.provinces
        .get_mut("ironvale")
        .unwrap()
        .buildings
        .push(Building::completed(BuildingType::Watchtower));
    // Garrison the far provinces so the aggregate counts are visible.
    g.spawn_unit("p1", UnitType::Knights, "mistwood");
    g.spawn_unit("p1", UnitType::Knights, "darkhollow");
    g.spawn_unit("p1", UnitType::Knights, "shadowfen");

    let view = player_view(&g, "p0");

    for id in ["mistwood", "darkhollow"] {
        match &view.provinces[id] {
            ProvinceView::Observed(glimpse) => {
                assert_eq!(glimpse.unit_count, 1, "{} should show one unit", id);
                assert!(glimpse.owner.is_none());
            }
            ProvinceView::Owned(_) => panic!("{} is not owned by p0", id),
        }
    }
    // shadowfen is three hops out.
    assert!(view.fog.contains(&"shadowfen".to_string()));
    // Every province is accounted for exactly once.
    assert_eq!(view.provinces.len() + view.fog.len(), 24);
}

#[test]
fn test_projection_hides_enemy_unit_types() {
    let mut g = game();
    // A knight next door is visible only as a count.
    g.spawn_unit("p1", UnitType::Knights, "mistwood");
    let view = player_view(&g, "p0");
    let json = serde_json::to_string(&view).unwrap();
    // p0 owns no knights, so the type name can only leak from the glimpse.
    assert!(!json.contains("knights"));
    // The enemy unit id must not leak either.
    assert!(!json.contains("p1_knights"));
}

#[test]
fn test_projection_carries_nothing_about_fogged_provinces() {
    let g = game();
    let view = player_view(&g, "p0");
    let json = serde_json::to_value(&view).unwrap();

    assert!(!view.fog.is_empty());
    for fogged in &view.fog {
        assert!(json["provinces"].get(fogged).is_none());
    }
    // p3's home corner is fogged from p0's corner, so nothing about p3's
    // starting units can appear anywhere in the document.
    let text = serde_json::to_string(&view).unwrap();
    assert!(!text.contains("p3_"));
}

#[test]
fn test_own_provinces_show_full_breakdown() {
    let mut g = game();
    g.provinces
        .get_mut("ironvale")
        .unwrap()
        .buildings
        .push(Building::completed(BuildingType::Farm));
    let view = player_view(&g, "p0");
    match &view.provinces["ironvale"] {
        ProvinceView::Owned(detail) => {
            let types: Vec<_> = detail.units.iter().map(|u| u.unit_type).collect();
            assert!(types.contains(&UnitType::Militia));
            assert!(types.contains(&UnitType::Infantry));
            assert!(types.contains(&UnitType::Scout));
            assert_eq!(detail.buildings.len(), 1);
            assert!(detail.buildings[0].done);
            // Farm bonus shows up in production.
            assert_eq!(detail.production.food, 5);
        }
        ProvinceView::Observed(_) => panic!("capital must be fully visible"),
    }
}

#[test]
fn test_projection_consistent_for_every_player() {
    let g = game();
    for pid in g.live_players() {
        let view = player_view(&g, &pid);
        assert_eq!(view.player, pid);
        // Two owned provinces at start.
        let owned = view
            .provinces
            .values()
            .filter(|v| matches!(v, ProvinceView::Owned(_)))
            .count();
        assert_eq!(owned, 2);
        assert_eq!(view.provinces.len() + view.fog.len(), 24);
    }
}

#[test]
fn test_eliminated_player_sees_only_fog() {
    let mut g = game();
    for id in g.provinces_owned_by("p0") {
        g.provinces.get_mut(&id).unwrap().owner = None;
    }
    for id in g.units_owned_by("p0") {
        g.remove_unit(&id);
    }
    g.players.get_mut("p0").unwrap().alive = false;
    let view = player_view(&g, "p0");
    assert!(!view.alive);
    assert!(view.provinces.is_empty());
    assert_eq!(view.fog.len(), 24);
}
