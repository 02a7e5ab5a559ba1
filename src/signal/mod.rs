//! Signal intake: normalization, classification, and parsing.

mod classifier;
mod error;
mod normalizer;
mod parser;

pub use classifier::looks_like_signal;
pub use error::SignalError;
pub use normalizer::normalize;
pub use parser::parse;
