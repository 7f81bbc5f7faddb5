//! The coordinator: a single-writer executor (the "strand") that owns the
//! whole simulation and serializes every mutating operation through one
//! channel (spec §4.7/§5).
//!
//! `scavenger-api` is the only other crate that should depend on this
//! one directly — it turns [`Coordinator`] calls into HTTP handlers.
mod coordinator;
mod engine;
mod errors;
mod retirement;
mod views;

pub use coordinator::ActionOutcome;
pub use coordinator::Coordinator;
pub use coordinator::CoordinatorTasks;
pub use coordinator::Settings;
pub use engine::Engine;
pub use errors::ActionError;
pub use errors::JoinError;
pub use errors::TickError;
pub use errors::UnknownToken;
pub use views::BuildingView;
pub use views::DogView;
pub use views::LootTypeView;
pub use views::LostObjectView;
pub use views::MapDetail;
pub use views::MapSummary;
pub use views::OfficeView;
pub use views::PlayerSummary;
pub use views::RoadView;
pub use views::StateView;
