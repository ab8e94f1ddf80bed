pub mod errors;
pub mod roles;
pub mod settings;
