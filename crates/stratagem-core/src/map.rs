//! Provinces and the fixed 24-province tournament map.

use crate::building::{Building, BuildingType, FORTRESS_DEFENSE};
use crate::terrain::Terrain;
use crate::types::{PlayerId, ProvinceId, Resources, UnitId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// A province on the map.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Province {
    /// Unique identifier (lowercase name).
    pub id: ProvinceId,
    /// Display name.
    pub name: String,
    /// Terrain type (immutable).
    pub terrain: Terrain,
    /// Map coordinates.
    pub x: i32,
    pub y: i32,
    /// Ids of adjacent provinces (symmetric, sorted).
    pub adjacent: Vec<ProvinceId>,
    /// Owning player, if any.
    pub owner: Option<PlayerId>,
    /// Units currently in this province, by id, in arrival order.
    pub unit_ids: Vec<UnitId>,
    /// Buildings, at most one per type.
    pub buildings: Vec<Building>,
}

impl Province {
    fn new(id: &str, terrain: Terrain, x: i32, y: i32) -> Self {
        let mut name = id.to_string();
        if let Some(first) = name.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        Self {
            id: id.to_string(),
            name,
            terrain,
            x,
            y,
            adjacent: Vec::new(),
            owner: None,
            unit_ids: Vec::new(),
            buildings: Vec::new(),
        }
    }

    /// Whether the province has a building of the given type (done or not).
    pub fn has_building(&self, building_type: BuildingType) -> bool {
        self.buildings.iter().any(|b| b.building_type == building_type)
    }

    /// Whether the province has a completed building of the given type.
    pub fn has_completed(&self, building_type: BuildingType) -> bool {
        self.buildings
            .iter()
            .any(|b| b.building_type == building_type && b.done)
    }

    /// Defense bonus granted to the owning side: terrain base plus the
    /// Fortress bonus.
    pub fn defense_bonus(&self) -> i32 {
        let mut bonus = self.terrain.defense_bonus();
        if self.has_completed(BuildingType::Fortress) {
            bonus += FORTRESS_DEFENSE;
        }
        bonus
    }

    /// Per-turn production from terrain plus completed buildings.
    pub fn production(&self) -> Resources {
        let mut prod = self.terrain.production();
        for b in &self.buildings {
            if b.done {
                prod += b.building_type.production_bonus();
            }
        }
        prod
    }
}

/// The four home pairs, `(capital, second)`, indexed by player number.
pub const HOME_PAIRS: [(&str, &str); 4] = [
    ("ironvale", "thornfield"),
    ("sunharbor", "goldreach"),
    ("stonekeep", "ashford"),
    ("deepwater", "willowbend"),
];

/// The four contested core provinces around the map center.
pub const CORE_PROVINCES: [&str; 4] = ["silverlake", "stormwatch", "emberveil", "moonhaven"];

/// Build the fixed 24-province tournament map.
///
/// Provinces sit on a 5x5 grid with the center removed; adjacency is
/// orthogonal, plus a diamond ring connecting the four core provinces
/// around the missing center. All provinces start unowned and empty.
pub fn tournament_map() -> BTreeMap<ProvinceId, Province> {
    use Terrain::*;
    let layout: [(&str, Terrain, i32, i32); 24] = [
        ("ironvale", Plains, 0, 0),
        ("thornfield", Forest, 1, 0),
        ("frostgate", Mountain, 2, 0),
        ("goldreach", Plains, 3, 0),
        ("sunharbor", Coast, 4, 0),
        ("mistwood", Forest, 0, 1),
        ("copperhill", Mountain, 1, 1),
        ("silverlake", River, 2, 1),
        ("windcrest", Plains, 3, 1),
        ("brightmoor", Coast, 4, 1),
        ("darkhollow", Forest, 0, 2),
        ("stormwatch", River, 1, 2),
        ("emberveil", River, 3, 2),
        ("driftwood", Coast, 4, 2),
        ("shadowfen", Forest, 0, 3),
        ("grimstone", Mountain, 1, 3),
        ("moonhaven", River, 2, 3),
        ("ravenrock", Mountain, 3, 3),
        ("duskmeadow", Coast, 4, 3),
        ("stonekeep", Plains, 0, 4),
        ("ashford", Forest, 1, 4),
        ("greendale", Plains, 2, 4),
        ("willowbend", Plains, 3, 4),
        ("deepwater", Coast, 4, 4),
    ];

    let mut provinces: BTreeMap<ProvinceId, Province> = layout
        .iter()
        .map(|&(id, terrain, x, y)| (id.to_string(), Province::new(id, terrain, x, y)))
        .collect();

    // Orthogonal grid adjacency.
    let coords: Vec<(ProvinceId, i32, i32)> = provinces
        .values()
        .map(|p| (p.id.clone(), p.x, p.y))
        .collect();
    let mut edges: Vec<(ProvinceId, ProvinceId)> = Vec::new();
    for (a, ax, ay) in &coords {
        for (b, bx, by) in &coords {
            if a < b && (ax - bx).abs() + (ay - by).abs() == 1 {
                edges.push((a.clone(), b.clone()));
            }
        }
    }
    // Diamond ring around the missing center.
    for (a, b) in [
        ("silverlake", "stormwatch"),
        ("silverlake", "emberveil"),
        ("stormwatch", "moonhaven"),
        ("emberveil", "moonhaven"),
    ] {
        edges.push((a.to_string(), b.to_string()));
    }

    for (a, b) in edges {
        if let Some(p) = provinces.get_mut(&a) {
            p.adjacent.push(b.clone());
        }
        if let Some(p) = provinces.get_mut(&b) {
            p.adjacent.push(a.clone());
        }
    }
    for p in provinces.values_mut() {
        p.adjacent.sort();
        p.adjacent.dedup();
    }
    provinces
}

/// Length (edge count) of the shortest path between two provinces.
///
/// Breadth-first search expanding neighbors in sorted order, so the result
/// and the canonical path are deterministic. Returns `None` when the
/// provinces are disconnected or unknown.
pub fn shortest_path(
    provinces: &BTreeMap<ProvinceId, Province>,
    from: &str,
    to: &str,
) -> Option<Vec<ProvinceId>> {
    if !provinces.contains_key(from) || !provinces.contains_key(to) {
        return None;
    }
    if from == to {
        return Some(vec![from.to_string()]);
    }
    let mut parents: BTreeMap<ProvinceId, ProvinceId> = BTreeMap::new();
    let mut queue = VecDeque::new();
    queue.push_back(from.to_string());
    while let Some(current) = queue.pop_front() {
        // Adjacency lists are sorted, so expansion order is canonical.
        for next in &provinces[&current].adjacent {
            if next.as_str() != from && !parents.contains_key(next) {
                parents.insert(next.clone(), current.clone());
                if next.as_str() == to {
                    let mut path = vec![to.to_string()];
                    let mut at = to.to_string();
                    while let Some(parent) = parents.get(&at) {
                        path.push(parent.clone());
                        at = parent.clone();
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(next.clone());
            }
        }
    }
    None
}
