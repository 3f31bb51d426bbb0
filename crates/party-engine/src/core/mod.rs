pub mod scheduler;
pub mod swarm;
pub mod time;
pub mod trigger;
