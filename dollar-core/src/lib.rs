pub mod aggregator;
pub mod api;
pub mod store;
pub mod types;

#[cfg(test)]
mod mock;
