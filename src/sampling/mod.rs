//! Directed state samplers that bias a host exploration loop

pub mod beast;

pub use beast::*;
