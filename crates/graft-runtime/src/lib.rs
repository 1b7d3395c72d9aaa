#![forbid(unsafe_code)]

//! Dispatch loop and effects for Graft applications.
//!
//! # Role in Graft
//! `graft-runtime` owns the message loop. It holds the application model,
//! runs update/view cycles one message at a time, and drives the
//! `graft-dom` reconciler against whatever host surface the program was
//! mounted on. Timers and command effects live here too.
//!
//! # Primary responsibilities
//! - **Application**: the model/update/view contract.
//! - **Cmd**: effects returned by `update` — enqueue, batch, delay.
//! - **Program**: mount/hydrate entry points, dispatch, pump, tick.
//!
//! # How it fits in the system
//! Listeners wired by `graft-dom` send converted messages into the
//! program's inbox; `pump` turns each into a full cycle. The host decides
//! when to pump and tick — the runtime never blocks or spawns.

pub mod program;

pub use program::{Application, Cmd, Program};
