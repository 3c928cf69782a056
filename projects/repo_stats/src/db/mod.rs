pub mod activity;
pub mod pool;
pub mod repos;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_support;

pub use pool::{DbPool, PoolSettings, ScopedConnection};
