//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod contact;
pub mod physics;
pub mod reaper;
pub mod registry;
pub mod spawn;
pub mod state;
pub mod targeting;
pub mod tick;
pub mod vulnerability;

pub use contact::{Contact, ContactOutcome, ContactRule, resolve_contact};
pub use physics::{CircleBackend, PhysicsBackend};
pub use reaper::{ReapReport, reap};
pub use registry::EntityRegistry;
pub use spawn::{ScreenEdge, build_enemy, build_player};
pub use state::{
    Bullet, Category, Enemy, EntityId, Explosion, GameEvent, GamePhase, PLAYER_ID, Player,
    Snapshot, Star, World,
};
pub use targeting::{aim_vector, lead_aim};
pub use tick::{TickReport, tick};
pub use vulnerability::{Vulnerability, begin_firing, cease_firing};
