//! Storage layer (single JSON blob on disk).

pub mod json_store;

pub use json_store::{JsonStore, PersistedState, StoreError};
