//! HTTP API client for the blood-donation backend.
//! - One request-building/dispatch path for every call.
//! - Bearer auth from the durable session store.
//! - Single-attempt semantics: no retry, no backoff.

pub mod errors;
pub mod transport;
pub mod api;
