//#![deny(warnings)]
#![deny(clippy::dbg_macro)]
#![deny(clippy::all)]

pub mod arithmetic;
pub mod config;
pub mod curve;
pub mod elgamal;
mod error;
pub mod rng;

pub use arithmetic::{FieldElement, GaloisField, Point};
pub use config::{CurveParameters, ScanLimit};
pub use curve::Curve;
pub use elgamal::{encrypt, ElGamal};
pub use error::CurveError;
