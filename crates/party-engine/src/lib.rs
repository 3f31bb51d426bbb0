pub mod api;
pub mod core;
pub mod systems;
pub mod bridge;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{EntityId, SoundEvent, GameEvent, Tone, Waveform};
pub use core::time::FixedTimestep;
pub use core::scheduler::{Scheduler, TimerId, Epoch};
pub use core::trigger::{Trigger, TriggerState};
pub use core::swarm::{Swarm, Member, Phase};
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::ProtocolLayout;
pub use systems::rng::Rng;
