pub mod markup;
pub mod redact;
pub mod transcript;

pub use transcript::*;
