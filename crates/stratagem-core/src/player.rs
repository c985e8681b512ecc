//! Player state.

use crate::civ::Civ;
use crate::tech::TechId;
use crate::types::{Age, PlayerId, Resources};
use serde::{Deserialize, Serialize};

/// A player in the game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    /// Player identifier (`"p0"` .. `"p3"`).
    pub id: PlayerId,
    /// Chosen civilization.
    pub civ: Civ,
    /// Current age.
    pub age: Age,
    /// Resource stockpile, kept non-negative by the engine.
    pub resources: Resources,
    /// Researched techs, at most one per age group.
    pub techs: Vec<TechId>,
    /// False once eliminated.
    pub alive: bool,
    /// Final score, computed only when the turn limit is reached.
    pub score: i64,
}

impl Player {
    /// Create a player with the standard starting stockpile.
    pub fn new(id: PlayerId, civ: Civ) -> Self {
        Self {
            id,
            civ,
            age: Age::Bronze,
            resources: Resources::new(10, 5, 5),
            techs: Vec::new(),
            alive: true,
            score: 0,
        }
    }

    /// Check if the player has researched a specific tech.
    pub fn has_tech(&self, tech: TechId) -> bool {
        self.techs.contains(&tech)
    }

    /// Check if the player already holds a tech in the given age group.
    pub fn has_tech_in_group(&self, age: Age) -> bool {
        self.techs.iter().any(|t| t.age() == age)
    }

    /// Whether the stockpile covers a cost.
    pub fn can_afford(&self, cost: &Resources) -> bool {
        self.resources.covers(cost)
    }

    /// Debit a cost from the stockpile. Callers check affordability first;
    /// the result is clamped so the stockpile can never go negative.
    pub fn pay(&mut self, cost: &Resources) {
        self.resources = (self.resources - *cost).clamp_non_negative();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_starts_in_bronze() {
        let player = Player::new("p0".to_string(), Civ::Ironborn);
        assert_eq!(player.age, Age::Bronze);
        assert_eq!(player.resources, Resources::new(10, 5, 5));
        assert!(player.alive);
        assert!(player.techs.is_empty());
    }

    #[test]
    fn test_pay_and_afford() {
        let mut player = Player::new("p0".to_string(), Civ::Verdanti);
        let cost = Resources::new(4, 2, 1);
        assert!(player.can_afford(&cost));
        player.pay(&cost);
        assert_eq!(player.resources, Resources::new(6, 3, 4));
        assert!(!player.can_afford(&Resources::new(7, 0, 0)));
    }

    #[test]
    fn test_tech_group_lookup() {
        let mut player = Player::new("p0".to_string(), Civ::Ashwalkers);
        assert!(!player.has_tech_in_group(Age::Bronze));
        player.techs.push(TechId::Mining);
        assert!(player.has_tech(TechId::Mining));
        assert!(player.has_tech_in_group(Age::Bronze));
        assert!(!player.has_tech_in_group(Age::Iron));
    }
}
