//! External service integrations.

pub mod postal;

pub use postal::{CepAddress, CepClient, CepLookupError};
