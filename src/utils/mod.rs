// Utility module exports

pub mod time_format;
