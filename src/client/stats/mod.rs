pub mod message;
pub mod model;
pub mod renderer;
