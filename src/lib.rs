//! STRR: short-term rental registration application lifecycle.
//!
//! This crate implements the status-driven workflow that moves a
//! registration application from draft through payment and examiner review
//! to a terminal decision, recording an audit trail and provisioning a
//! registration on approval.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and external services
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Lifecycle orchestration and request-boundary checks
//!
//! # Modules
//!
//! - [`application`]: Application lifecycle state machine
//! - [`config`]: Environment configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod application;
pub mod config;
pub mod telemetry;
