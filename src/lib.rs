// Order normalizer (always available, no runtime dependencies)
pub mod order;

// Exchange access, order service and CLI plumbing
#[cfg(feature = "exchange")]
pub mod bot;

#[cfg(feature = "exchange")]
pub mod cli;

#[cfg(feature = "exchange")]
pub mod config;

#[cfg(feature = "exchange")]
pub mod exchange;

#[cfg(feature = "exchange")]
pub mod logging;

// Web API for the frontend
#[cfg(feature = "dashboard")]
pub mod web;
