/// Polynomials over [`GenericGF`], coefficients stored highest degree first.
use super::gf::GenericGF;
use crate::error::ReedSolomonError;

/// Immutable polynomial; leading zero terms are trimmed except for the zero polynomial
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericGFPoly<'a> {
    field: &'a GenericGF,
    coefficients: Vec<u8>,
}

impl<'a> GenericGFPoly<'a> {
    /// Build from coefficients, most significant first. An empty slice is the zero polynomial.
    pub fn new(field: &'a GenericGF, coefficients: &[u8]) -> Self {
        let coefficients = match coefficients.iter().position(|&c| c != 0) {
            Some(first_non_zero) => coefficients[first_non_zero..].to_vec(),
            None => vec![0],
        };
        Self {
            field,
            coefficients,
        }
    }

    /// Coefficients, highest degree first
    pub fn coefficients(&self) -> &[u8] {
        &self.coefficients
    }

    /// Degree of the polynomial (0 for constants, including zero)
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// True for the zero polynomial
    pub fn is_zero(&self) -> bool {
        self.coefficients[0] == 0
    }

    /// Coefficient of `x^degree`
    pub fn coefficient(&self, degree: usize) -> u8 {
        if degree > self.degree() {
            return 0;
        }
        self.coefficients[self.coefficients.len() - 1 - degree]
    }

    /// Evaluate at `a` using Horner's rule
    pub fn evaluate_at(&self, a: u8) -> u8 {
        match a {
            0 => self.coefficient(0),
            1 => self.coefficients.iter().fold(0, |acc, &c| acc ^ c),
            _ => self.coefficients[1..]
                .iter()
                .fold(self.coefficients[0], |acc, &c| self.field.multiply(a, acc) ^ c),
        }
    }

    /// Sum (which equals the difference) of two polynomials
    pub fn add_or_subtract(&self, other: &GenericGFPoly<'a>) -> GenericGFPoly<'a> {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }

        let (smaller, larger) = if self.coefficients.len() > other.coefficients.len() {
            (&other.coefficients, &self.coefficients)
        } else {
            (&self.coefficients, &other.coefficients)
        };
        let length_diff = larger.len() - smaller.len();
        let mut sum = larger.clone();
        for (slot, &c) in sum[length_diff..].iter_mut().zip(smaller.iter()) {
            *slot ^= c;
        }
        GenericGFPoly::new(self.field, &sum)
    }

    /// Product of two polynomials
    pub fn multiply(&self, other: &GenericGFPoly<'a>) -> GenericGFPoly<'a> {
        if self.is_zero() || other.is_zero() {
            return self.field.zero();
        }
        let a = &self.coefficients;
        let b = &other.coefficients;
        let mut product = vec![0u8; a.len() + b.len() - 1];
        for (i, &ac) in a.iter().enumerate() {
            for (j, &bc) in b.iter().enumerate() {
                product[i + j] ^= self.field.multiply(ac, bc);
            }
        }
        GenericGFPoly::new(self.field, &product)
    }

    /// Multiply every coefficient by a scalar
    pub fn multiply_scalar(&self, scalar: u8) -> GenericGFPoly<'a> {
        match scalar {
            0 => self.field.zero(),
            1 => self.clone(),
            _ => {
                let product: Vec<u8> = self
                    .coefficients
                    .iter()
                    .map(|&c| self.field.multiply(c, scalar))
                    .collect();
                GenericGFPoly::new(self.field, &product)
            }
        }
    }

    /// Multiply by `coefficient * x^degree`
    pub fn multiply_by_monomial(&self, degree: usize, coefficient: u8) -> GenericGFPoly<'a> {
        if coefficient == 0 {
            return self.field.zero();
        }
        let mut product = vec![0u8; self.coefficients.len() + degree];
        for (slot, &c) in product.iter_mut().zip(self.coefficients.iter()) {
            *slot = self.field.multiply(c, coefficient);
        }
        GenericGFPoly::new(self.field, &product)
    }

    /// Polynomial long division, returning `(quotient, remainder)`
    pub fn divide(
        &self,
        other: &GenericGFPoly<'a>,
    ) -> Result<(GenericGFPoly<'a>, GenericGFPoly<'a>), ReedSolomonError> {
        if other.is_zero() {
            return Err(ReedSolomonError("divide by zero polynomial"));
        }

        let mut quotient = self.field.zero();
        let mut remainder = self.clone();
        let inverse_leading = self.field.inverse(other.coefficient(other.degree()))?;

        while remainder.degree() >= other.degree() && !remainder.is_zero() {
            let degree_difference = remainder.degree() - other.degree();
            let scale = self
                .field
                .multiply(remainder.coefficient(remainder.degree()), inverse_leading);
            let term = other.multiply_by_monomial(degree_difference, scale);
            quotient = quotient.add_or_subtract(&self.field.build_monomial(degree_difference, scale));
            remainder = remainder.add_or_subtract(&term);
        }

        Ok((quotient, remainder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(coefficients: &[u8]) -> GenericGFPoly<'static> {
        GenericGFPoly::new(GenericGF::qr_code_field_256(), coefficients)
    }

    #[test]
    fn test_leading_zeros_trimmed() {
        let p = poly(&[0, 0, 3, 1]);
        assert_eq!(p.coefficients(), &[3, 1]);
        assert_eq!(p.degree(), 1);

        let zero = poly(&[0, 0, 0]);
        assert!(zero.is_zero());
        assert_eq!(zero.degree(), 0);
        assert!(poly(&[]).is_zero());
    }

    #[test]
    fn test_evaluate_at() {
        // x^2 + 1 at x=1 is 0 in characteristic 2
        let p = poly(&[1, 0, 1]);
        assert_eq!(p.evaluate_at(1), 0);
        assert_eq!(p.evaluate_at(0), 1);
        // at alpha: alpha^2 + 1 = 4 ^ 1
        assert_eq!(p.evaluate_at(2), 5);
    }

    #[test]
    fn test_add_multiply_divide() {
        let a = poly(&[1, 2, 3]);
        let b = poly(&[5, 7]);
        let product = a.multiply(&b);
        let (q, r) = product.divide(&b).unwrap();
        assert_eq!(q, a);
        assert!(r.is_zero());

        let with_remainder = product.add_or_subtract(&poly(&[9]));
        let (q, r) = with_remainder.divide(&b).unwrap();
        assert_eq!(q, a);
        assert_eq!(r.coefficients(), &[9]);

        assert_eq!(a.add_or_subtract(&a), poly(&[0]));
        assert!(a.divide(&poly(&[0])).is_err());
    }

    #[test]
    fn test_multiply_by_monomial_and_scalar() {
        let a = poly(&[1, 2]);
        let shifted = a.multiply_by_monomial(2, 1);
        assert_eq!(shifted.coefficients(), &[1, 2, 0, 0]);
        assert_eq!(a.multiply_scalar(1), a);
        assert!(a.multiply_scalar(0).is_zero());
    }
}
