//! Search & display flow over the API client and the synthetic generator.

pub mod flow;
pub mod render;
