//! Youth group dashboard core.
//!
//! REST-backed record stores, a headless data table with selection-aware CSV export, and the
//! local session and cache that sit around them.

pub mod api;
pub mod attendance;
pub mod config;
pub mod errors;
pub mod export;
pub mod models;
pub mod pages;
pub mod session;
pub mod storage;
pub mod store;
pub mod table;
pub mod validation;

#[cfg(test)]
mod tests;
