//! Unit tests for the application domain.
