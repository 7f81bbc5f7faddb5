use scavenger_world::MapId;
use serde::Serialize;

use crate::Token;

pub type PlayerId = i64;

/// A joined player: identity and session, not in-world state (that's
/// [`scavenger_world::Dog`], keyed by the same id).
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(skip)]
    pub token: Token,
    pub map_id: MapId,
}
