//! Query constraints: date ranges, filter dictionaries and their generator.

pub mod dictionary;
pub mod generator;
pub mod range;

pub use self::dictionary::*;
pub use self::generator::*;
pub use self::range::*;
