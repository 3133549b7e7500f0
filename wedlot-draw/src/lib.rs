//! Two-winner draw for the wedding lottery.
//!
//! A draw reads the name pool and winner ledger, checks that at least two
//! names have not won yet, picks a uniform pair and records it.

pub mod engine;
pub mod error;

pub use engine::{check_policy, pick_pair, plan_draw, DrawEngine, DrawResult, DrawSnapshot};
pub use error::{DrawError, Result};
