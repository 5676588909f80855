use num_bigint::{BigInt, BigUint};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurveError {
    #[error("field size {0}^n is not a power of a single prime")]
    InvalidFieldKind(BigInt),
    #[error("field GF({p}^{n}) is too small for the curve group law")]
    DegenerateField { p: BigInt, n: u32 },
    #[error("point is not on the curve")]
    NotOnCurve,
    #[error("z is zero but (x, y) is not the canonical point at infinity (0, 1)")]
    ZInvariantViolation,
    #[error("operands belong to different curves")]
    CurveMismatch,
    #[error("no curve point found for the requested x-coordinate")]
    NoCurvePoint,
    #[error("expected a finite curve point")]
    NotAPoint,
    #[error("value {0} is not an element of the field")]
    ElementOutOfRange(BigInt),
    #[error("scalar {0} is outside of [1, q - 1]")]
    ScalarOutOfRange(BigUint),
    #[error("field size {field_size} exceeds the linear scan limit {limit}")]
    ScanLimitExceeded { field_size: BigUint, limit: u64 },
    #[error("point order exceeds the baby-step giant-step search bound")]
    OrderNotFound,
}
