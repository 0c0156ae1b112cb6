//! Registration application lifecycle management.
//!
//! Applications move from draft through payment and examiner review to a
//! terminal decision. Payment reconciliation and examiner decisions emit an
//! audit trail, and approval provisions a registration record. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration and boundary services in [`services`]
//! - The default payload validator in [`validation`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
pub mod validation;

#[cfg(test)]
mod tests;
