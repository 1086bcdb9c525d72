pub mod convert;
pub mod parametric;
pub mod quadratic;
