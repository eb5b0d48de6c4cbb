#![forbid(unsafe_code)]

//! Core: the scheduling port, virtual timer queue, generation tokens, and
//! terminal lifecycle shared by the termboot crates.
//!
//! # Role in termboot
//! `termboot-core` has no knowledge of the boot sequence. It defines how
//! components ask for time ([`scheduler::Scheduler`]), how a host delivers
//! fired timers back ([`scheduler::TimerQueue`]), and how stale deliveries are
//! recognised ([`generation::GenerationCounter`]).

pub mod generation;
pub mod logging;
pub mod scheduler;
#[cfg(not(target_arch = "wasm32"))]
pub mod terminal_session;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};

pub use generation::{Generation, GenerationCounter};
pub use scheduler::{Fired, Scheduler, TimerGroup, TimerId, TimerQueue};
