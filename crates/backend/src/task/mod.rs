//! Backend task and handle.
//!
//! This module provides the task-based architecture for ledger reads:
//!
//! - [`BackendTask`] processes requests from a channel, with an LRU cache
//! - [`BackendHandle`] sends requests to the task and awaits the responses

mod cache;

mod handle;
pub use handle::BackendHandle;

mod runner;
pub use runner::BackendTask;
