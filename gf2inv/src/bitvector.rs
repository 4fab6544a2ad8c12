use crate::bitmatrix::BitMatrix;
use crate::bitvec::BitRange;
use crate::error::{Gf2Error, Result};
use std::fmt;
use std::ops::{BitXor, BitXorAssign, Index, Mul};

/// A wrapper around a one-row `BitMatrix`
///
/// Despite storing bits in row-major order, this struct behaves like a column vector for the
/// purposes of matrix multiplication.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitVector(BitMatrix);

impl BitVector {
    /// Gets the bit at position `i`
    #[inline]
    pub fn bit(&self, i: usize) -> bool {
        self.0.bit(0, i)
    }

    /// Sets the bit at position `i` to `b`
    #[inline]
    pub fn set_bit(&mut self, i: usize, b: bool) {
        self.0.set_bit(0, i, b);
    }

    /// Builds a `BitVector` of `length` bits from a function giving the value of each bit
    pub fn build(length: usize, mut f: impl FnMut(usize) -> bool) -> Self {
        Self(BitMatrix::build(1, length, |_, j| f(j)))
    }

    pub fn from_bool_vec(data: &[bool]) -> Self {
        Self::build(data.len(), |i| data[i])
    }

    /// Creates a new `BitVector` of size `length` initialized to zero
    pub fn zeros(length: usize) -> Self {
        Self(BitMatrix::zeros(1, length))
    }

    #[inline]
    pub fn random(rng: &mut impl rand::Rng, length: usize) -> Self {
        Self(BitMatrix::random(rng, 1, length))
    }

    pub fn is_zero(&self) -> bool {
        self.weight() == 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.cols()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of 1s in the vector (Hamming weight)
    #[inline]
    pub fn weight(&self) -> usize {
        self.0.row(0).count_ones() as usize
    }

    /// XORs another `BitVector` into this one
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    #[inline]
    pub fn xor_with(&mut self, other: &BitVector) {
        if self.len() != other.len() {
            panic!("BitVectors must have the same length for XOR");
        }
        self.0.add_bits_to_row(other.0.row(0), 0);
    }

    #[inline]
    pub fn as_slice(&self) -> &BitRange {
        self.0.row(0)
    }
}

impl BitMatrix {
    /// Multiplies the matrix by a column vector over GF(2)
    ///
    /// Bit `i` of the result is the parity of row `i` ANDed with `vector`.
    ///
    /// # Errors
    ///
    /// [`Gf2Error::InvalidDimension`] if the vector length differs from the column count.
    pub fn try_mul_vector(&self, vector: &BitVector) -> Result<BitVector> {
        if self.cols() != vector.len() {
            return Err(Gf2Error::dimension(format!(
                "cannot multiply {}x{} matrix by vector of length {}",
                self.rows(),
                self.cols(),
                vector.len()
            )));
        }
        let rhs = vector.as_slice();
        Ok(BitVector::build(self.rows(), |i| self.row(i).dot(rhs)))
    }

    /// Applies the matrix to a vector of bytes
    ///
    /// `out[i]` is the XOR of every `input[k]` for which entry `(i, k)` is set. Each of the 8
    /// bit planes of `input` is multiplied by the matrix independently.
    ///
    /// # Errors
    ///
    /// [`Gf2Error::InvalidDimension`] if `input.len()` differs from the column count.
    pub fn apply_bytes(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.rows()];
        for plane in 0..8 {
            let bits = BitVector::build(input.len(), |k| (input[k] >> plane) & 1 == 1);
            let image = self.try_mul_vector(&bits)?;
            for (i, byte) in out.iter_mut().enumerate() {
                *byte |= (image.bit(i) as u8) << plane;
            }
        }
        Ok(out)
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for i in 0..self.len() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", if self[i] { 1 } else { 0 })?;
        }
        write!(f, "]")
    }
}

impl BitXor for &BitVector {
    type Output = BitVector;

    fn bitxor(self, rhs: Self) -> Self::Output {
        let mut result = self.clone();
        result.xor_with(rhs);
        result
    }
}

impl BitXorAssign<&BitVector> for BitVector {
    fn bitxor_assign(&mut self, rhs: &BitVector) {
        self.xor_with(rhs);
    }
}

impl Index<usize> for BitVector {
    type Output = bool;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        if self.bit(index) {
            &true
        } else {
            &false
        }
    }
}

impl Mul<&BitVector> for &BitMatrix {
    type Output = BitVector;

    fn mul(self, rhs: &BitVector) -> Self::Output {
        match self.try_mul_vector(rhs) {
            Ok(v) => v,
            Err(e) => panic!("Cannot multiply matrix by vector: {}", e),
        }
    }
}
