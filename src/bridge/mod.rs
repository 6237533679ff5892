//! Bridge from the `log` crate.
//!
//! Lets libraries that log through `log::info!` and friends land in the
//! same JSON stream as records emitted through a [`BoundLogger`].
//!
//! [`BoundLogger`]: crate::pipeline::BoundLogger

pub mod adapter;

pub use adapter::*;
