// Comic fetching module.
// Provides the xkcd client, the admission gate, and bulk fetch orchestration.

#![allow(dead_code, unused_imports)]

pub mod client;
pub mod fetch;
pub mod limit;
pub mod types;

pub use client::ComicClient;
pub use fetch::FetchFailure;
pub use limit::FetchGate;
pub use types::Comic;
