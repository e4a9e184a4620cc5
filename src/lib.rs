pub mod analyzers;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod model;
pub mod output;
pub mod pager;
pub mod prompt;
pub mod session;
pub mod stats;
