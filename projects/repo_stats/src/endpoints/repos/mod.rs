pub mod activity;
pub mod top100;
