pub mod fields;
pub mod metadata;
pub mod parser;
pub mod validate;

pub use fields::{FormSubmission, RawFields};
pub use metadata::ClientContext;
pub use validate::{validate, ValidationResult};
