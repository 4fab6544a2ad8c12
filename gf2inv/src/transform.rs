//! The diffusion step of a byte-oriented construction, applied straight from packed rows

use crate::codec::{PackedRow, MAX_DIMENSION};
use crate::error::{Gf2Error, Result};

/// Diffuses `input` through the matrix given by `rows`
///
/// `out[j]` is the XOR of every `input[k]` for which bit `k` of `rows[j]` is set. Applying the
/// rows of the inverse matrix to the output gives back `input`.
///
/// # Errors
///
/// [`Gf2Error::InvalidDimension`] if `rows` and `input` differ in length, or the length is 0 or
/// above [`MAX_DIMENSION`].
///
/// # Examples
///
/// ```
/// use gf2inv::transform::diffuse;
///
/// let out = diffuse(&[0b11, 0b10], &[0x0f, 0xf0]).unwrap();
/// assert_eq!(out, vec![0xff, 0xf0]);
/// ```
pub fn diffuse(rows: &[PackedRow], input: &[u8]) -> Result<Vec<u8>> {
    if rows.len() != input.len() || input.is_empty() || input.len() > MAX_DIMENSION {
        return Err(Gf2Error::dimension(format!(
            "cannot diffuse {} bytes through {} rows",
            input.len(),
            rows.len()
        )));
    }
    Ok(rows
        .iter()
        .map(|&row| {
            input
                .iter()
                .enumerate()
                .filter(|&(k, _)| (row >> k) & 1 == 1)
                .fold(0, |acc, (_, &byte)| acc ^ byte)
        })
        .collect())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codec::{invert_packed, pack_matrix, unpack_matrix};
    use crate::BitMatrix;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    #[test]
    fn identity_leaves_input() {
        let rows: Vec<PackedRow> = (0..8).map(|k| 1 << k).collect();
        let input = [1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(diffuse(&rows, &input).unwrap(), input.to_vec());
    }

    #[test]
    fn agrees_with_matrix_product() {
        let mut rng = SmallRng::seed_from_u64(9);
        for n in [1, 5, 32, 64] {
            let m = BitMatrix::random(&mut rng, n, n);
            let rows = pack_matrix(&m).unwrap();
            for _ in 0..10 {
                let v: Vec<u8> = (0..n).map(|_| rng.random()).collect();
                assert_eq!(diffuse(&rows, &v).unwrap(), m.apply_bytes(&v).unwrap());
            }
        }
    }

    #[test]
    fn inverse_rows_undo_diffusion() {
        let mut rng = SmallRng::seed_from_u64(4);
        let m = BitMatrix::random_invertible(&mut rng, 32);
        let rows = pack_matrix(&m).unwrap();
        let inv = invert_packed(&rows, 32).unwrap();
        assert!(inv.invertible);
        for _ in 0..20 {
            let v: Vec<u8> = (0..32).map(|_| rng.random()).collect();
            let d = diffuse(&rows, &v).unwrap();
            assert_eq!(diffuse(&inv.rows, &d).unwrap(), v);
            let inv_m = unpack_matrix(&inv.rows, 32).unwrap();
            assert_eq!(inv_m.apply_bytes(&m.apply_bytes(&v).unwrap()).unwrap(), v);
        }
    }

    #[test]
    fn rejects_length_mismatch() {
        assert!(matches!(
            diffuse(&[1, 2], &[0]),
            Err(Gf2Error::InvalidDimension(_))
        ));
        assert!(matches!(diffuse(&[], &[]), Err(Gf2Error::InvalidDimension(_))));
    }
}
