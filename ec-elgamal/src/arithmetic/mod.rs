mod field;
mod modular;
mod point;
mod polynomial;

pub use field::{FieldElement, GaloisField};
pub use point::Point;
