//! Request models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod company;
pub mod invoice;

pub use validation::ValidationError;
pub use company::{CompanyCode, CompanyName};
pub use invoice::Amount;
