pub mod config;
pub mod discord;
pub mod platform;
pub mod publisher;
pub mod refresh;
pub mod stats;

#[cfg(test)]
pub mod fakes;
