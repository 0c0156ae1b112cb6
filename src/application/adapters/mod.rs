//! Adapter implementations for application lifecycle ports.

pub mod memory;
pub mod postgres;
