pub mod actions;
pub mod setup;
