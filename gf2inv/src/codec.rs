//! Conversion between packed rows and explicit bit grids
//!
//! A packed row is an unsigned integer whose bit `k` (counting from the least significant bit)
//! is the entry in column `k`. A square matrix of dimension `n` is `n` packed rows in row order,
//! each carrying `n` meaningful low bits.

use crate::bitmatrix::BitMatrix;
use crate::bitvec::{tail_mask, BLOCKSIZE};
use crate::error::{Gf2Error, Result};
use log::debug;

/// One row of a matrix, packed with column `k` at bit `k`
pub type PackedRow = u64;

/// Largest dimension a [`PackedRow`] can carry
pub const MAX_DIMENSION: usize = PackedRow::BITS as usize;

const _: () = assert!(MAX_DIMENSION == BLOCKSIZE);

fn check_width(width: usize) -> Result<()> {
    if width == 0 || width > MAX_DIMENSION {
        return Err(Gf2Error::dimension(format!(
            "width must be between 1 and {}, got {}",
            MAX_DIMENSION, width
        )));
    }
    Ok(())
}

/// Splits a packed row into its `width` low bits, bit 0 first
///
/// Bits at positions `>= width` are ignored.
///
/// # Examples
///
/// ```
/// use gf2inv::codec::unpack;
///
/// assert_eq!(unpack(0b110, 4).unwrap(), vec![0, 1, 1, 0]);
/// ```
pub fn unpack(row: PackedRow, width: usize) -> Result<Vec<u8>> {
    check_width(width)?;
    Ok((0..width).map(|k| ((row >> k) & 1) as u8).collect())
}

/// Packs a sequence of bits into a row, `bits[k]` landing at bit `k`
///
/// # Errors
///
/// [`Gf2Error::InvalidDimension`] if `bits` is empty or longer than [`MAX_DIMENSION`], and
/// [`Gf2Error::InvalidBitValue`] if an entry is not 0 or 1.
pub fn pack(bits: &[u8]) -> Result<PackedRow> {
    check_width(bits.len())?;
    bits.iter().enumerate().try_fold(0, |acc, (index, &value)| {
        if value > 1 {
            return Err(Gf2Error::InvalidBitValue { index, value });
        }
        Ok(acc | (PackedRow::from(value) << index))
    })
}

/// Unpacks `n` rows into an explicit `n x n` matrix
///
/// Bits at positions `>= n` in each row are ignored.
///
/// # Errors
///
/// [`Gf2Error::InvalidDimension`] if `n` is 0 or above [`MAX_DIMENSION`], or if `rows` does not
/// hold exactly `n` rows.
pub fn unpack_matrix(rows: &[PackedRow], n: usize) -> Result<BitMatrix> {
    check_width(n)?;
    if rows.len() != n {
        return Err(Gf2Error::dimension(format!(
            "expected {} rows, got {}",
            n,
            rows.len()
        )));
    }
    if rows.iter().any(|r| r & !tail_mask(n) != 0) {
        debug!("ignoring bits above position {} in packed rows", n);
    }
    Ok(BitMatrix::from_row_blocks(n, rows))
}

/// Packs every row of a matrix with at most [`MAX_DIMENSION`] columns
///
/// # Errors
///
/// [`Gf2Error::InvalidDimension`] if the matrix has no columns or too many to pack.
pub fn pack_matrix(matrix: &BitMatrix) -> Result<Vec<PackedRow>> {
    check_width(matrix.cols())?;
    Ok((0..matrix.rows()).map(|i| matrix.row_block(i)).collect())
}

/// Packed rows of an inverse, with the invertibility flag from the elimination
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedInversion {
    pub rows: Vec<PackedRow>,
    pub invertible: bool,
    pub singular_columns: Vec<usize>,
}

/// Inverts a matrix given as `n` packed rows
///
/// Unpacks the rows, runs [`BitMatrix::invert`] and packs the companion back up. When the input
/// is singular the result is best-effort and `invertible` is false.
///
/// # Examples
///
/// ```
/// use gf2inv::codec::invert_packed;
///
/// let inv = invert_packed(&[0b11, 0b10], 2).unwrap();
/// assert!(inv.invertible);
/// assert_eq!(inv.rows, vec![0b11, 0b10]);
/// ```
pub fn invert_packed(rows: &[PackedRow], n: usize) -> Result<PackedInversion> {
    let inversion = unpack_matrix(rows, n)?.invert()?;
    Ok(PackedInversion {
        rows: pack_matrix(&inversion.inverse)?,
        invertible: inversion.invertible,
        singular_columns: inversion.singular_columns,
    })
}
