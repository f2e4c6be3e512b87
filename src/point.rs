use lazy_static::lazy_static;

use crate::error::{Error, Result};
use crate::field::FieldElement;
use crate::scalar::Scalar;

lazy_static! {
    /// Coefficient a of the Stark curve y^2 = x^3 + a*x + b.
    pub static ref CURVE_A: FieldElement = FieldElement::one();

    /// Coefficient b of the Stark curve.
    pub static ref CURVE_B: FieldElement = FieldElement::from_hex(
        "0x06f21413efbe40de150e596d72f7a8c5609ad26c15c915c1f4cdfcb99cee9e89"
    )
    .unwrap();

    static ref GENERATOR_X: FieldElement = FieldElement::from_hex(
        "0x01ef15c18599971b7beced415a40f0c7deacfd9b0d1819e03d723d8bc943cfca"
    )
    .unwrap();

    static ref GENERATOR_Y: FieldElement = FieldElement::from_hex(
        "0x005668060aa49730b7be4801df46ec62de53ecd11abe43a32873000c36e8dc1f"
    )
    .unwrap();
}

/// A point on the Stark curve in affine coordinates, or the point at
/// infinity (the group identity).
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum CurvePoint {
    Infinity,
    Affine { x: FieldElement, y: FieldElement },
}

impl CurvePoint {
    pub fn generator() -> CurvePoint {
        CurvePoint::Affine {
            x: GENERATOR_X.clone(),
            y: GENERATOR_Y.clone(),
        }
    }

    /// Builds an affine point, rejecting coordinates off the curve.
    pub fn from_xy(x: FieldElement, y: FieldElement) -> Result<CurvePoint> {
        if !Self::is_on_curve(&x, &y) {
            return Error::MalformedInput("point not on the curve").into_err();
        }
        Ok(CurvePoint::Affine { x, y })
    }

    pub fn is_on_curve(x: &FieldElement, y: &FieldElement) -> bool {
        let y2 = y * y;
        let rhs = curve_rhs(x);
        y2 == rhs
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, CurvePoint::Infinity)
    }

    pub fn x(&self) -> Option<&FieldElement> {
        match self {
            CurvePoint::Infinity => None,
            CurvePoint::Affine { x, .. } => Some(x),
        }
    }

    pub fn y(&self) -> Option<&FieldElement> {
        match self {
            CurvePoint::Infinity => None,
            CurvePoint::Affine { y, .. } => Some(y),
        }
    }

    pub fn negate(&self) -> CurvePoint {
        match self {
            CurvePoint::Infinity => CurvePoint::Infinity,
            CurvePoint::Affine { x, y } => CurvePoint::Affine {
                x: x.clone(),
                y: y.negate(),
            },
        }
    }

    pub fn double(&self) -> CurvePoint {
        let (x, y) = match self {
            CurvePoint::Infinity => return CurvePoint::Infinity,
            CurvePoint::Affine { x, y } => (x, y),
        };
        if y.is_zero() {
            return CurvePoint::Infinity;
        }
        // lambda = (3x^2 + a) / 2y; the denominator is nonzero here.
        let x2 = x * x;
        let three_x2 = &(&x2 + &x2) + &x2;
        let numer = &three_x2 + &*CURVE_A;
        let denom = (y + y).invert();
        let lambda = &numer * &denom;
        let x3 = &(&lambda * &lambda) - &(x + x);
        let y3 = &(&lambda * &(x - &x3)) - y;
        CurvePoint::Affine { x: x3, y: y3 }
    }

    pub fn add(&self, other: &CurvePoint) -> CurvePoint {
        let (x1, y1) = match self {
            CurvePoint::Infinity => return other.clone(),
            CurvePoint::Affine { x, y } => (x, y),
        };
        let (x2, y2) = match other {
            CurvePoint::Infinity => return self.clone(),
            CurvePoint::Affine { x, y } => (x, y),
        };
        if x1 == x2 {
            return if y1 == y2 {
                self.double()
            } else {
                // y2 == -y1, opposite points cancel.
                CurvePoint::Infinity
            };
        }
        let lambda = &(y2 - y1) * &(x2 - x1).invert();
        let x3 = &(&(&lambda * &lambda) - x1) - x2;
        let y3 = &(&lambda * &(x1 - &x3)) - y1;
        CurvePoint::Affine { x: x3, y: y3 }
    }

    /// Scalar multiplication by double-and-add, most significant bit first.
    pub fn mul(&self, k: &Scalar) -> CurvePoint {
        let k = k.as_biguint();
        let mut acc = CurvePoint::Infinity;
        for i in (0..k.bits()).rev() {
            acc = acc.double();
            if k.bit(i) {
                acc = acc.add(self);
            }
        }
        acc
    }
}

/// Right-hand side of the curve equation, x^3 + a*x + b.
pub fn curve_rhs(x: &FieldElement) -> FieldElement {
    let x2 = x * x;
    let x3 = &x2 * x;
    &(&x3 + &(&*CURVE_A * x)) + &*CURVE_B
}
