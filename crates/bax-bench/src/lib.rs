//! # bax-bench
//!
//! Synthetic benchmark objectives for the bax experiment pipeline.
//!
//! Provides the [`Objective`] trait shared by every benchmark, the
//! [`Hartmann6`] test function, and the [`Negated`] adapter that poses a
//! minimization benchmark as a maximization target.

mod hartmann;
mod objective;

pub use hartmann::Hartmann6;
pub use objective::{Negated, Objective};
