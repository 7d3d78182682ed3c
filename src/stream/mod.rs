//! Attempt lifecycle and cache synchronization
//!
//! # Module structure
//! - `accumulator` - Partial reply text ([`ContentAccumulator`])
//! - `cancel` - One-live-attempt ownership ([`CancellationController`])
//! - `attempt` - Phases and outcomes ([`AttemptPhase`], [`AttemptOutcome`])
//! - `reconcile` - Optimistic insert, success swap and rollback ([`Reconciler`])
//! - `orchestrator` - The public [`StreamOrchestrator`]

mod accumulator;
mod attempt;
mod cancel;
mod orchestrator;
mod reconcile;

pub use accumulator::ContentAccumulator;
pub use attempt::{AttemptOutcome, AttemptPhase, StreamAttempt};
pub use cancel::{AttemptHandle, CancellationController};
pub use orchestrator::StreamOrchestrator;
pub use reconcile::{apply_success, insert_provisional_user, remove_provisional, FinalReply, Reconciler};
