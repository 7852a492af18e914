pub mod errors;
pub mod goals;
