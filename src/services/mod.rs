// Service module exports

pub mod grid;
pub mod layout;
pub mod schedule;
pub mod validation;
