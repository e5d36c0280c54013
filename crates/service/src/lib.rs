//! Client-side services: durable session cache, synthetic stock data and
//! the keyword assistant.

pub mod errors;
pub mod storage;
pub mod session;
pub mod synthetic;
pub mod assistant;
