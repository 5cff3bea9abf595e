/// GF(256) arithmetic backed by exp/log tables.
///
/// QR codes use the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1 (0x11D) with
/// generator base 0. The field is built once and shared read-only.
use std::sync::OnceLock;

use super::gf_poly::GenericGFPoly;
use crate::error::ReedSolomonError;

const FIELD_SIZE: usize = 256;

/// A Galois field of 256 elements
#[derive(Debug, PartialEq, Eq)]
pub struct GenericGF {
    exp_table: [u8; FIELD_SIZE],
    log_table: [u8; FIELD_SIZE],
    primitive: u32,
    generator_base: usize,
}

static QR_CODE_FIELD_256: OnceLock<GenericGF> = OnceLock::new();

impl GenericGF {
    /// Build a field from its primitive polynomial and generator base
    pub fn new(primitive: u32, generator_base: usize) -> Self {
        let mut exp_table = [0u8; FIELD_SIZE];
        let mut log_table = [0u8; FIELD_SIZE];

        let mut x: u32 = 1;
        for slot in exp_table.iter_mut() {
            *slot = x as u8;
            x <<= 1;
            if x >= FIELD_SIZE as u32 {
                x ^= primitive;
                x &= (FIELD_SIZE - 1) as u32;
            }
        }
        for (i, &value) in exp_table.iter().enumerate().take(FIELD_SIZE - 1) {
            log_table[value as usize] = i as u8;
        }

        Self {
            exp_table,
            log_table,
            primitive,
            generator_base,
        }
    }

    /// The QR code field: primitive 0x11D, generator base 0
    pub fn qr_code_field_256() -> &'static GenericGF {
        QR_CODE_FIELD_256.get_or_init(|| GenericGF::new(0x011D, 0))
    }

    /// Addition and subtraction are both XOR
    #[inline]
    pub fn add_or_subtract(a: u8, b: u8) -> u8 {
        a ^ b
    }

    /// alpha^a (exponent taken modulo 255)
    #[inline]
    pub fn exp(&self, a: usize) -> u8 {
        self.exp_table[a % (FIELD_SIZE - 1)]
    }

    /// Discrete log base alpha; zero has no logarithm
    pub fn log(&self, a: u8) -> Result<usize, ReedSolomonError> {
        if a == 0 {
            return Err(ReedSolomonError("log of zero"));
        }
        Ok(self.log_table[a as usize] as usize)
    }

    /// Multiplicative inverse; zero has none
    pub fn inverse(&self, a: u8) -> Result<u8, ReedSolomonError> {
        if a == 0 {
            return Err(ReedSolomonError("inverse of zero"));
        }
        Ok(self.exp_table[FIELD_SIZE - 1 - self.log_table[a as usize] as usize])
    }

    /// Product of two field elements
    #[inline]
    pub fn multiply(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let sum = self.log_table[a as usize] as usize + self.log_table[b as usize] as usize;
        self.exp_table[sum % (FIELD_SIZE - 1)]
    }

    /// Number of elements
    pub fn size(&self) -> usize {
        FIELD_SIZE
    }

    /// Primitive polynomial the field was built from
    pub fn primitive(&self) -> u32 {
        self.primitive
    }

    /// First exponent of the generator polynomial's roots
    pub fn generator_base(&self) -> usize {
        self.generator_base
    }

    /// The zero polynomial
    pub fn zero(&self) -> GenericGFPoly<'_> {
        GenericGFPoly::new(self, &[0])
    }

    /// The constant polynomial 1
    pub fn one(&self) -> GenericGFPoly<'_> {
        GenericGFPoly::new(self, &[1])
    }

    /// `coefficient * x^degree`
    pub fn build_monomial(&self, degree: usize, coefficient: u8) -> GenericGFPoly<'_> {
        if coefficient == 0 {
            return self.zero();
        }
        let mut coefficients = vec![0u8; degree + 1];
        coefficients[0] = coefficient;
        GenericGFPoly::new(self, &coefficients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_match_qr_field() {
        let field = GenericGF::qr_code_field_256();
        assert_eq!(field.exp(0), 1);
        assert_eq!(field.exp(1), 2);
        assert_eq!(field.exp(8), 29); // 0x11D folded back
        assert_eq!(field.exp(255), 1);
        assert_eq!(field.log(2).unwrap(), 1);
        assert_eq!(field.log(29).unwrap(), 8);
        assert!(field.log(0).is_err());
    }

    #[test]
    fn test_multiply_and_inverse() {
        let field = GenericGF::qr_code_field_256();
        assert_eq!(field.multiply(0, 5), 0);
        assert_eq!(field.multiply(5, 0), 0);
        for a in 1..=255u8 {
            let inv = field.inverse(a).unwrap();
            assert_eq!(field.multiply(a, inv), 1, "a * a^-1 should be 1 for a={}", a);
        }
        assert!(field.inverse(0).is_err());
    }

    #[test]
    fn test_multiply_commutes_and_distributes() {
        let field = GenericGF::qr_code_field_256();
        for (a, b, c) in [(3u8, 7u8, 200u8), (0x53, 0xCA, 0x01), (255, 128, 17)] {
            assert_eq!(field.multiply(a, b), field.multiply(b, a));
            assert_eq!(
                field.multiply(a, GenericGF::add_or_subtract(b, c)),
                GenericGF::add_or_subtract(field.multiply(a, b), field.multiply(a, c))
            );
        }
    }

    #[test]
    fn test_monomial() {
        let field = GenericGF::qr_code_field_256();
        let m = field.build_monomial(3, 7);
        assert_eq!(m.degree(), 3);
        assert_eq!(m.coefficient(3), 7);
        assert!(field.build_monomial(4, 0).is_zero());
    }
}
