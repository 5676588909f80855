use crate::curve::Curve;
use crate::error::CurveError;

use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Deserializer};

use std::str::FromStr;
use std::sync::Arc;

/// Largest field on which linear scans over every element are attempted.
///
/// `random_point`, `map_to_point`, `order_naive` and unbounded
/// `cyclic_group` walk the field (or the group) element by element, and the
/// baby-step giant-step table holds about `sqrt(q)` points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ScanLimit(u64);

impl ScanLimit {
    pub const DEFAULT: Self = Self(1 << 24);

    pub fn new(limit: u64) -> Self {
        Self(limit)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    pub fn check(&self, size: &BigUint) -> Result<(), CurveError> {
        if size > &BigUint::from(self.0) {
            Err(CurveError::ScanLimitExceeded {
                field_size: size.clone(),
                limit: self.0,
            })
        } else {
            Ok(())
        }
    }
}

impl Default for ScanLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Curve parameters as read from a settings file.
///
/// Integers may be given as JSON numbers or as decimal strings, the latter
/// for values beyond 64 bits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurveParameters {
    #[serde(deserialize_with = "decimal")]
    pub a: BigInt,
    #[serde(deserialize_with = "decimal")]
    pub b: BigInt,
    #[serde(deserialize_with = "decimal")]
    pub p: BigInt,
    #[serde(default = "prime_degree")]
    pub n: u32,
    #[serde(default)]
    pub scan_limit: ScanLimit,
}

fn prime_degree() -> u32 {
    1
}

impl CurveParameters {
    pub fn new(a: impl Into<BigInt>, b: impl Into<BigInt>, p: impl Into<BigInt>, n: u32) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            p: p.into(),
            n,
            scan_limit: ScanLimit::default(),
        }
    }

    pub fn build(&self) -> Result<Arc<Curve>, CurveError> {
        Curve::with_scan_limit(
            self.a.clone(),
            self.b.clone(),
            self.p.clone(),
            self.n,
            self.scan_limit,
        )
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Decimal {
    Number(i64),
    Text(String),
}

fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
    match Decimal::deserialize(deserializer)? {
        Decimal::Number(n) => Ok(BigInt::from(n)),
        Decimal::Text(s) => BigInt::from_str(s.trim()).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parameters_from_json() {
        let json = r#"{ "a": 1, "b": "1", "p": "1000003" }"#;
        let params: CurveParameters = serde_json::from_str(json).unwrap();
        assert_eq!(params, CurveParameters::new(1, 1, 1_000_003, 1));
        let curve = params.build().unwrap();
        assert_eq!(curve.field_size(), &BigUint::from(1_000_003u32));

        let json = r#"{ "a": -3, "b": 7, "p": 5, "n": 2, "scan_limit": 30 }"#;
        let params: CurveParameters = serde_json::from_str(json).unwrap();
        assert_eq!(params.a, BigInt::from(-3));
        assert_eq!(params.n, 2);
        assert_eq!(params.scan_limit, ScanLimit::new(30));
        assert_eq!(params.build().unwrap().scan_limit(), ScanLimit::new(30));
    }

    #[test]
    fn malformed_parameters() {
        let json = r#"{ "a": 1, "b": "one", "p": 7 }"#;
        assert!(serde_json::from_str::<CurveParameters>(json).is_err());
        let json = r#"{ "a": 1, "b": 1, "p": 4 }"#;
        let params: CurveParameters = serde_json::from_str(json).unwrap();
        assert_eq!(
            params.build().unwrap_err(),
            CurveError::InvalidFieldKind(BigInt::from(4))
        );
    }

    #[test]
    fn scan_limit() {
        let limit = ScanLimit::new(100);
        assert!(limit.check(&BigUint::from(100u32)).is_ok());
        assert_eq!(
            limit.check(&BigUint::from(101u32)).unwrap_err(),
            CurveError::ScanLimitExceeded {
                field_size: BigUint::from(101u32),
                limit: 100
            }
        );
        assert_eq!(ScanLimit::default().get(), 1 << 24);
    }
}
