pub mod errors;
pub mod blood;
pub mod user;
pub mod locations;
