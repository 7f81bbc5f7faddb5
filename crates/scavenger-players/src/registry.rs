use std::collections::HashMap;

use rand::Rng;
use scavenger_world::MapId;

use crate::Player;
use crate::PlayerId;
use crate::Token;

/// A well-formed token that isn't (or isn't anymore) registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownToken;

/// In-memory directory of joined players, owned exclusively by the
/// coordinator's single-writer strand. Ids are monotonically increasing
/// and never reused, even across a snapshot restore.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: HashMap<PlayerId, Player>,
    tokens: HashMap<Token, PlayerId>,
    next_id: PlayerId,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a brand-new player with a freshly generated token.
    pub fn join(&mut self, name: String, map_id: MapId, rng: &mut impl Rng) -> Player {
        let id = self.next_id;
        self.next_id += 1;
        let token = Token::generate(rng);
        let player = Player {
            id,
            name,
            token: token.clone(),
            map_id,
        };
        self.tokens.insert(token, id);
        self.players.insert(id, player.clone());
        player
    }

    /// Reinserts a player restored from a snapshot, preserving its
    /// original id and token and bumping `next_id` above it so future
    /// joins never collide with restored ids.
    pub fn reinsert(&mut self, player: Player) {
        self.next_id = self.next_id.max(player.id + 1);
        self.tokens.insert(player.token.clone(), player.id);
        self.players.insert(player.id, player);
    }

    pub fn by_token(&self, token: &Token) -> Result<&Player, UnknownToken> {
        let id = self.tokens.get(token).ok_or(UnknownToken)?;
        self.players.get(id).ok_or(UnknownToken)
    }

    pub fn by_id(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn on_map(&self, map_id: &MapId) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.values().filter(|p| p.map_id == *map_id).collect();
        players.sort_by_key(|p| p.id);
        players
    }

    /// Removes a retired player from the registry; its id is never reused.
    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        let player = self.players.remove(&id)?;
        self.tokens.remove(&player.token);
        Some(player)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn join_assigns_increasing_ids() {
        let mut registry = PlayerRegistry::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let a = registry.join("alice".into(), MapId::new("m"), &mut rng);
        let b = registry.join("bob".into(), MapId::new("m"), &mut rng);
        assert!(b.id > a.id);
    }

    #[test]
    fn by_token_finds_joined_player() {
        let mut registry = PlayerRegistry::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let player = registry.join("alice".into(), MapId::new("m"), &mut rng);
        assert_eq!(registry.by_token(&player.token).unwrap().id, player.id);
    }

    #[test]
    fn unregistered_token_is_unknown() {
        let registry = PlayerRegistry::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let stray = crate::Token::generate(&mut rng);
        assert!(registry.by_token(&stray).is_err());
    }

    #[test]
    fn reinsert_bumps_next_id_above_restored_max() {
        let mut registry = PlayerRegistry::new();
        let mut rng = SmallRng::seed_from_u64(1);
        registry.reinsert(Player {
            id: 41,
            name: "restored".into(),
            token: crate::Token::generate(&mut rng),
            map_id: MapId::new("m"),
        });
        let joined = registry.join("fresh".into(), MapId::new("m"), &mut rng);
        assert!(joined.id > 41);
    }

    #[test]
    fn remove_drops_both_id_and_token_lookup() {
        let mut registry = PlayerRegistry::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let player = registry.join("alice".into(), MapId::new("m"), &mut rng);
        registry.remove(player.id);
        assert!(registry.by_id(player.id).is_none());
        assert!(registry.by_token(&player.token).is_err());
    }

    #[test]
    fn on_map_filters_and_orders_by_id() {
        let mut registry = PlayerRegistry::new();
        let mut rng = SmallRng::seed_from_u64(1);
        registry.join("a".into(), MapId::new("m1"), &mut rng);
        registry.join("b".into(), MapId::new("m2"), &mut rng);
        registry.join("c".into(), MapId::new("m1"), &mut rng);
        let on_m1 = registry.on_map(&MapId::new("m1"));
        assert_eq!(on_m1.len(), 2);
        assert!(on_m1[0].id < on_m1[1].id);
    }
}
