/// Shared modules for the market dashboard
pub mod backend;
pub mod config;
pub mod error;
pub mod normalize;
pub mod poller;
pub mod render;
pub mod sparkline;
pub mod types;
pub mod view;
pub mod watchlist;

#[cfg(test)]
pub(crate) mod test_support;
