pub mod errors;
pub mod handler;
pub mod platform;
pub mod startup;
