//! The approval state machine for join-request issues.
//!
//! The design separates:
//! - **Snapshot**: what is known about the issue ([`JoinRequest`]), fetched
//!   once per invocation together with live reviewer team membership
//!   ([`ReviewerRoster`]).
//! - **Events**: what happened ([`TriggerEvent`]).
//! - **Effects**: what to do ([`Effect`]), as pure data.
//! - **Transition**: pure function producing effects plus a [`Decision`]
//!   telling the caller whether the join-request processor should run.
//!
//! The binary crate executes effects against the real API.

pub mod approval;
pub mod effect;
pub mod event;
pub mod state;
pub mod transition;

pub use approval::*;
pub use effect::*;
pub use event::*;
pub use state::*;
pub use transition::*;
