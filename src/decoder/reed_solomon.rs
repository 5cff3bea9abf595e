/// Reed-Solomon error correction for QR codes
/// Syndromes, then the extended Euclidean algorithm for the error locator and
/// evaluator, Chien search for locations and Forney for magnitudes.
use super::gf::GenericGF;
use super::gf_poly::GenericGFPoly;
use crate::error::ReedSolomonError;

/// Reed-Solomon decoder over a fixed field
pub struct ReedSolomonDecoder<'a> {
    field: &'a GenericGF,
}

impl ReedSolomonDecoder<'static> {
    /// Decoder over the QR code field
    pub fn qr_code() -> Self {
        Self::new(GenericGF::qr_code_field_256())
    }
}

impl<'a> ReedSolomonDecoder<'a> {
    /// Decoder over `field`
    pub fn new(field: &'a GenericGF) -> Self {
        Self { field }
    }

    /// Correct `received` in place, where the last `two_s` codewords are EC codewords.
    ///
    /// Returns the number of codewords corrected.
    pub fn decode(&self, received: &mut [u8], two_s: usize) -> Result<usize, ReedSolomonError> {
        let field = self.field;
        let poly = GenericGFPoly::new(field, received);

        let mut syndrome_coefficients = vec![0u8; two_s];
        let mut no_error = true;
        for i in 0..two_s {
            let eval = poly.evaluate_at(field.exp(i + field.generator_base()));
            syndrome_coefficients[two_s - 1 - i] = eval;
            if eval != 0 {
                no_error = false;
            }
        }
        if no_error {
            return Ok(0);
        }

        let syndrome = GenericGFPoly::new(field, &syndrome_coefficients);
        let (sigma, omega) =
            self.run_euclidean_algorithm(field.build_monomial(two_s, 1), syndrome, two_s)?;
        let error_locations = self.find_error_locations(&sigma)?;
        let error_magnitudes = self.find_error_magnitudes(&omega, &error_locations)?;

        for (&location, &magnitude) in error_locations.iter().zip(error_magnitudes.iter()) {
            let log = field.log(location)?;
            if log >= received.len() {
                return Err(ReedSolomonError("bad error location"));
            }
            let position = received.len() - 1 - log;
            received[position] = GenericGF::add_or_subtract(received[position], magnitude);
        }

        Ok(error_locations.len())
    }

    fn run_euclidean_algorithm(
        &self,
        a: GenericGFPoly<'a>,
        b: GenericGFPoly<'a>,
        r_target: usize,
    ) -> Result<(GenericGFPoly<'a>, GenericGFPoly<'a>), ReedSolomonError> {
        let field = self.field;
        let (a, b) = if a.degree() < b.degree() { (b, a) } else { (a, b) };

        let mut r_last = a;
        let mut r = b;
        let mut t_last = field.zero();
        let mut t = field.one();

        // Stop once r(x) has degree below R/2
        while r.degree() >= r_target / 2 {
            let r_last_last = std::mem::replace(&mut r_last, r);
            let t_last_last = std::mem::replace(&mut t_last, t);

            if r_last.is_zero() {
                return Err(ReedSolomonError("r_{i-1} was zero"));
            }
            r = r_last_last;
            let mut q = field.zero();
            let inverse_leading = field.inverse(r_last.coefficient(r_last.degree()))?;
            while r.degree() >= r_last.degree() && !r.is_zero() {
                let degree_diff = r.degree() - r_last.degree();
                let scale = field.multiply(r.coefficient(r.degree()), inverse_leading);
                q = q.add_or_subtract(&field.build_monomial(degree_diff, scale));
                r = r.add_or_subtract(&r_last.multiply_by_monomial(degree_diff, scale));
            }

            t = q.multiply(&t_last).add_or_subtract(&t_last_last);

            if r.degree() >= r_last.degree() && !r.is_zero() {
                return Err(ReedSolomonError("division failed to reduce polynomial"));
            }
        }

        let sigma_tilde_at_zero = t.coefficient(0);
        if sigma_tilde_at_zero == 0 {
            return Err(ReedSolomonError("sigma tilde(0) was zero"));
        }

        let inverse = field.inverse(sigma_tilde_at_zero)?;
        let sigma = t.multiply_scalar(inverse);
        let omega = r.multiply_scalar(inverse);
        Ok((sigma, omega))
    }

    /// Chien search: inverses of the roots of the error locator
    fn find_error_locations(
        &self,
        error_locator: &GenericGFPoly<'a>,
    ) -> Result<Vec<u8>, ReedSolomonError> {
        let num_errors = error_locator.degree();
        if num_errors == 1 {
            return Ok(vec![error_locator.coefficient(1)]);
        }

        let mut result = Vec::with_capacity(num_errors);
        for i in 1..self.field.size() {
            if result.len() >= num_errors {
                break;
            }
            if error_locator.evaluate_at(i as u8) == 0 {
                result.push(self.field.inverse(i as u8)?);
            }
        }
        if result.len() != num_errors {
            return Err(ReedSolomonError(
                "error locator degree does not match number of roots",
            ));
        }
        Ok(result)
    }

    /// Forney's formula
    fn find_error_magnitudes(
        &self,
        error_evaluator: &GenericGFPoly<'a>,
        error_locations: &[u8],
    ) -> Result<Vec<u8>, ReedSolomonError> {
        let field = self.field;
        let mut result = Vec::with_capacity(error_locations.len());
        for (i, &location) in error_locations.iter().enumerate() {
            let xi_inverse = field.inverse(location)?;
            let mut denominator = 1u8;
            for (j, &other) in error_locations.iter().enumerate() {
                if i != j {
                    // 1 + X_j * X_i^-1
                    let term = field.multiply(other, xi_inverse);
                    denominator = field.multiply(denominator, term ^ 1);
                }
            }
            let mut magnitude = field.multiply(
                error_evaluator.evaluate_at(xi_inverse),
                field.inverse(denominator)?,
            );
            if field.generator_base() != 0 {
                magnitude = field.multiply(magnitude, xi_inverse);
            }
            result.push(magnitude);
        }
        Ok(result)
    }
}

/// Systematic RS encoder: appends `num_ecc` EC codewords to `data`.
/// Generator polynomial has roots alpha^base .. alpha^(base+num_ecc-1).
#[cfg(test)]
pub(crate) fn rs_encode(data: &[u8], num_ecc: usize) -> Vec<u8> {
    let field = GenericGF::qr_code_field_256();
    let mut generator = field.one();
    for i in 0..num_ecc {
        let root = field.exp(i + field.generator_base());
        generator = generator.multiply(&GenericGFPoly::new(field, &[1, root]));
    }

    let info = GenericGFPoly::new(field, data).multiply_by_monomial(num_ecc, 1);
    let (_, remainder) = info
        .divide(&generator)
        .expect("generator polynomial is never zero");

    let coefficients = remainder.coefficients();
    let mut codeword = data.to_vec();
    codeword.extend(std::iter::repeat_n(0u8, num_ecc - coefficients.len()));
    codeword.extend_from_slice(coefficients);
    codeword
}
