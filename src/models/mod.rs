// Module exports for models

pub mod catalog;
pub mod item;
pub mod settings;
