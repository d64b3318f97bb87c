//! Facial expression vocabulary and per-tick expression samples.

pub mod label;
pub mod sample;

pub use label::ExpressionLabel;
pub use sample::{DominantExpression, ExpressionSample};
