pub mod collector;
pub mod reporter;
pub mod types;
