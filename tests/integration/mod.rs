//! Integration Tests Module
//!
//! End-to-end tests of the console data layer against the in-memory
//! fetcher: task joins and reloads, chunk aggregation, row metrics caching,
//! the chunk table and agent views, and the config store.

// Shared fixtures
mod common;

// Join engine and tasks data source
mod tasks_test;

// Chunk aggregator and speed lookups
mod aggregator_test;

// Chunks data source and agent views
mod chunks_test;

// Config file store
mod config_test;
