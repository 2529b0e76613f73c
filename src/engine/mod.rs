// Engine orchestration — session lifecycle and frame scheduling coordination.

pub mod events;
pub mod orchestrator;
pub mod session;
pub mod stats;
