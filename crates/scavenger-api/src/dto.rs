//! JSON wire shapes for every route in spec §6, converted from/to the
//! coordinator's plain view types in [`handlers`](crate::handlers). Kept
//! separate from `scavenger-gameroom`'s views so the wire format can
//! evolve without touching the simulation crate.
use std::collections::BTreeMap;

use scavenger_gameroom::DogView;
use scavenger_gameroom::LostObjectView;
use scavenger_gameroom::MapDetail;
use scavenger_gameroom::MapSummary;
use scavenger_gameroom::PlayerSummary;
use scavenger_gameroom::StateView;
use scavenger_records::RetiredPlayer;
use scavenger_world::Direction;
use serde::Deserialize;
use serde::Serialize;

#[derive(Serialize)]
pub struct MapSummaryDto {
    pub id: String,
    pub name: String,
}

impl From<MapSummary> for MapSummaryDto {
    fn from(m: MapSummary) -> Self {
        Self { id: m.id, name: m.name }
    }
}

#[derive(Serialize)]
pub struct PointDto(f64, f64);

#[derive(Serialize)]
pub struct RoadDto {
    #[serde(rename = "x0")]
    x0: f64,
    #[serde(rename = "y0")]
    y0: f64,
    #[serde(rename = "x1", skip_serializing_if = "Option::is_none")]
    x1: Option<f64>,
    #[serde(rename = "y1", skip_serializing_if = "Option::is_none")]
    y1: Option<f64>,
}

#[derive(Serialize)]
pub struct BuildingDto {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

#[derive(Serialize)]
pub struct OfficeDto {
    id: String,
    x: f64,
    y: f64,
}

#[derive(Serialize)]
pub struct LootTypeDto {
    name: String,
    value: i64,
}

#[derive(Serialize)]
pub struct MapDetailDto {
    pub id: String,
    pub name: String,
    pub roads: Vec<RoadDto>,
    pub buildings: Vec<BuildingDto>,
    pub offices: Vec<OfficeDto>,
    #[serde(rename = "lootTypes")]
    pub loot_types: Vec<LootTypeDto>,
}

impl From<MapDetail> for MapDetailDto {
    fn from(m: MapDetail) -> Self {
        Self {
            id: m.id,
            name: m.name,
            roads: m
                .roads
                .into_iter()
                .map(|r| {
                    if r.start.y == r.end.y {
                        RoadDto { x0: r.start.x, y0: r.start.y, x1: Some(r.end.x), y1: None }
                    } else {
                        RoadDto { x0: r.start.x, y0: r.start.y, x1: None, y1: Some(r.end.y) }
                    }
                })
                .collect(),
            buildings: m
                .buildings
                .into_iter()
                .map(|b| BuildingDto { x: b.position.x, y: b.position.y, w: b.width, h: b.height })
                .collect(),
            offices: m
                .offices
                .into_iter()
                .map(|o| OfficeDto { id: o.id, x: o.position.x, y: o.position.y })
                .collect(),
            loot_types: m
                .loot_types
                .into_iter()
                .map(|l| LootTypeDto { name: l.name, value: l.value })
                .collect(),
        }
    }
}

#[derive(Deserialize)]
pub struct JoinRequest {
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(rename = "mapId")]
    pub map_id: String,
}

#[derive(Serialize)]
pub struct JoinResponseDto {
    #[serde(rename = "authToken")]
    pub auth_token: String,
    #[serde(rename = "playerId")]
    pub player_id: i64,
}

#[derive(Serialize)]
pub struct PlayerDto {
    pub name: String,
}

/// `{id: {name}, ...}`, keyed by stringified player id — `BTreeMap` keeps
/// the rendered JSON in a stable, id-ascending order.
pub fn players_dto(players: Vec<PlayerSummary>) -> BTreeMap<String, PlayerDto> {
    players.into_iter().map(|p| (p.id.to_string(), PlayerDto { name: p.name })).collect()
}

fn direction_code(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "U",
        Direction::Down => "D",
        Direction::Left => "L",
        Direction::Right => "R",
        Direction::Stop => "",
    }
}

#[derive(Serialize)]
pub struct DogDto {
    pub pos: PointDto,
    pub speed: PointDto,
    pub dir: &'static str,
    pub bag: Vec<u32>,
    pub score: i64,
}

impl From<DogView> for DogDto {
    fn from(d: DogView) -> Self {
        Self {
            pos: PointDto(d.position.x, d.position.y),
            speed: PointDto(d.velocity.dx, d.velocity.dy),
            dir: direction_code(d.direction),
            bag: d.bag,
            score: d.score,
        }
    }
}

#[derive(Serialize)]
pub struct LostObjectDto {
    #[serde(rename = "type")]
    pub type_id: u32,
    pub pos: PointDto,
}

impl From<LostObjectView> for LostObjectDto {
    fn from(l: LostObjectView) -> Self {
        Self { type_id: l.type_id, pos: PointDto(l.position.x, l.position.y) }
    }
}

#[derive(Serialize)]
pub struct StateDto {
    pub players: BTreeMap<String, DogDto>,
    #[serde(rename = "lostObjects")]
    pub lost_objects: BTreeMap<String, LostObjectDto>,
}

impl From<StateView> for StateDto {
    fn from(s: StateView) -> Self {
        Self {
            players: s.players.into_iter().map(|(id, dog)| (id.to_string(), dog.into())).collect(),
            lost_objects: s.lost_objects.into_iter().map(|(id, item)| (id.to_string(), item.into())).collect(),
        }
    }
}

#[derive(Deserialize)]
pub struct ActionRequest {
    #[serde(rename = "move")]
    pub direction: String,
}

#[derive(Deserialize)]
pub struct TickRequest {
    #[serde(rename = "timeDelta")]
    pub time_delta: i64,
}

#[derive(Deserialize)]
pub struct RecordsQuery {
    pub start: Option<i64>,
    #[serde(rename = "maxItems")]
    pub max_items: Option<i64>,
}

#[derive(Serialize)]
pub struct RecordDto {
    pub name: String,
    pub score: i64,
    #[serde(rename = "playTime")]
    pub play_time: f64,
}

impl From<RetiredPlayer> for RecordDto {
    fn from(r: RetiredPlayer) -> Self {
        Self { name: r.name, score: r.score, play_time: r.play_time.as_secs_f64() }
    }
}
