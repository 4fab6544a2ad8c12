use crate::bitvec::*;
use crate::error::{Gf2Error, Result};
use log::debug;
use rand::Rng;
use std::{
    fmt,
    ops::{Index, Mul},
};

/// A matrix of bits, represented as a vector of blocks of bits
///
/// The matrix is stored in row-major order, with each row occupying `col_blocks` consecutive
/// [`BitBlock`]s. Column `j` of a row is bit `j % BLOCKSIZE` of block `j / BLOCKSIZE`, so a row
/// of a matrix with at most [`BLOCKSIZE`] columns is bit-for-bit the packed row integer.
///
/// Bits beyond `cols` in the last block of each row are always 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitMatrix {
    /// the number of logical rows in the matrix
    rows: usize,

    /// the number of logical columns in the matrix
    cols: usize,

    /// the number of [`BitBlock`]s used to store each row
    col_blocks: usize,

    /// a [`BitVec`] containing the data of the matrix, stored in row-major order
    data: BitVec,
}

/// Elementary row operations, used to mirror elimination steps onto a companion matrix
pub trait RowOps {
    /// Adds (XORs) row `from` into row `to`
    fn add_row(&mut self, from: usize, to: usize);
    fn swap_rows(&mut self, from: usize, to: usize);
}

/// Result of running Gauss-Jordan elimination against an identity companion
///
/// When `invertible` is false, `inverse` is the best-effort companion left behind by the
/// elimination and must not be trusted as an inverse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inversion {
    pub inverse: BitMatrix,
    pub invertible: bool,

    /// columns for which no pivot row was found, in increasing order
    pub singular_columns: Vec<usize>,
}

impl BitMatrix {
    #[inline]
    pub fn bit(&self, i: usize, j: usize) -> bool {
        self.data.bit(self.col_blocks * BLOCKSIZE * i + j)
    }

    #[inline]
    pub fn set_bit(&mut self, i: usize, j: usize, b: bool) {
        self.data.set_bit(self.col_blocks * BLOCKSIZE * i + j, b);
    }

    /// Builds a matrix from a function `f(i, j)` giving the value of each bit
    pub fn build(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let col_blocks = min_blocks(cols);
        let data = (0..rows)
            .flat_map(|i| (0..BLOCKSIZE * col_blocks).map(move |j| (i, j)))
            .map(|(i, j)| j < cols && f(i, j))
            .collect();
        BitMatrix {
            rows,
            cols,
            col_blocks,
            data,
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        let col_blocks = min_blocks(cols);
        BitMatrix {
            rows,
            cols,
            col_blocks,
            data: BitVec::zeros(rows * col_blocks),
        }
    }

    pub fn identity(size: usize) -> Self {
        let blocks = min_blocks(size);
        let data = (0..size * blocks)
            .map(|i| {
                let row = i / blocks;
                if row / BLOCKSIZE == i % blocks {
                    1 << (row % BLOCKSIZE)
                } else {
                    0
                }
            })
            .collect();
        BitMatrix {
            rows: size,
            cols: size,
            col_blocks: blocks,
            data,
        }
    }

    /// Builds a `rows x cols` matrix with uniformly random entries
    #[inline]
    pub fn random(rng: &mut impl Rng, rows: usize, cols: usize) -> Self {
        let col_blocks = min_blocks(cols);
        let mask = tail_mask(cols);
        let data = (0..rows * col_blocks)
            .map(|i| {
                if i % col_blocks == col_blocks - 1 {
                    mask & rng.random::<BitBlock>()
                } else {
                    rng.random::<BitBlock>()
                }
            })
            .collect();
        BitMatrix {
            rows,
            cols,
            col_blocks,
            data,
        }
    }

    /// Builds a random invertible matrix as a product of random row additions
    #[inline]
    pub fn random_invertible(rng: &mut impl Rng, size: usize) -> Self {
        let mut m = BitMatrix::identity(size);
        if size < 2 {
            return m;
        }

        for _ in 0..10 * size * size {
            let r1 = rng.random_range(0..size);
            let mut r2 = rng.random_range(0..size - 1);
            if r2 >= r1 {
                r2 += 1;
            }
            m.add_row(r1, r2);
        }

        m
    }

    /// Builds a matrix of at most [`BLOCKSIZE`] columns from one block per row
    ///
    /// Bits at positions `>= cols` are dropped.
    pub(crate) fn from_row_blocks(cols: usize, blocks: &[BitBlock]) -> Self {
        debug_assert!(cols <= BLOCKSIZE);
        if cols == 0 {
            return BitMatrix::zeros(blocks.len(), 0);
        }
        let mask = tail_mask(cols);
        BitMatrix {
            rows: blocks.len(),
            cols,
            col_blocks: 1,
            data: blocks.iter().map(|b| b & mask).collect(),
        }
    }

    /// The single block holding row `i` of a matrix with at most [`BLOCKSIZE`] columns
    #[inline]
    pub(crate) fn row_block(&self, i: usize) -> BitBlock {
        debug_assert!(self.col_blocks == 1);
        self.data[i]
    }

    /// Builds a matrix from an explicit grid of `0`/`1` entries
    ///
    /// # Errors
    ///
    /// [`Gf2Error::InvalidDimension`] if the rows have different lengths, and
    /// [`Gf2Error::InvalidBitValue`] (with the row-major index of the entry) if any entry is
    /// not 0 or 1.
    pub fn try_from_grid(grid: &[Vec<u8>]) -> Result<Self> {
        let cols = grid.first().map_or(0, Vec::len);
        for (i, row) in grid.iter().enumerate() {
            if row.len() != cols {
                return Err(Gf2Error::dimension(format!(
                    "row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            if let Some(j) = row.iter().position(|&v| v > 1) {
                return Err(Gf2Error::InvalidBitValue {
                    index: i * cols + j,
                    value: row[j],
                });
            }
        }
        Ok(Self::build(grid.len(), cols, |i, j| grid[i][j] == 1))
    }

    /// Returns the matrix as an explicit grid of `0`/`1` entries
    pub fn to_grid(&self) -> Vec<Vec<u8>> {
        (0..self.rows)
            .map(|i| (0..self.cols).map(|j| self.bit(i, j) as u8).collect())
            .collect()
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    #[inline]
    pub fn add_bits_to_row(&mut self, bits: &BitRange, row: usize) {
        self.data.xor_in(bits, row * self.col_blocks);
    }

    #[inline]
    pub fn row(&self, row: usize) -> &BitRange {
        &self.data[row * self.col_blocks..(row + 1) * self.col_blocks]
    }

    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut BitRange {
        &mut self.data[row * self.col_blocks..(row + 1) * self.col_blocks]
    }

    /// Gauss-Jordan elimination of a square matrix, one column at a time
    ///
    /// Column `j` is pivoted into row `j`, using the first row at or below `j` with a 1 in
    /// column `j`. Every swap and row addition is repeated on `proxy`. A column without a pivot
    /// is recorded and the elimination step for it still runs against row `j`, so the matrix and
    /// `proxy` stay related by the same sequence of row operations.
    ///
    /// Returns the columns without a pivot.
    fn gauss_jordan_helper(&mut self, proxy: &mut impl RowOps) -> Vec<usize> {
        let n = self.rows();
        let mut singular = vec![];
        for j in 0..n {
            let pivot = (j..n).find(|&i| self[(i, j)]);
            match pivot {
                Some(i) if i != j => {
                    self.swap_rows(i, j);
                    proxy.swap_rows(i, j);
                }
                Some(_) => {}
                None => {
                    debug!("no pivot in column {} of {}x{} matrix", j, n, n);
                    singular.push(j);
                }
            }

            let row_vec = self.row(j).to_vec();
            for i in 0..n {
                if i != j && self[(i, j)] {
                    self.add_bits_to_row(&row_vec, i);
                    proxy.add_row(j, i);
                }
            }
        }

        singular
    }

    fn check_square(&self) -> Result<()> {
        if !self.is_square() {
            return Err(Gf2Error::dimension(format!(
                "matrix must be square, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.rows == 0 {
            return Err(Gf2Error::dimension("matrix must have at least one row"));
        }
        Ok(())
    }

    /// Inverts the matrix by Gauss-Jordan elimination against an identity companion
    ///
    /// Singular input is not an error: the result reports `invertible == false` together
    /// with the best-effort companion, and the caller decides what to do with it. The
    /// matrix itself is left untouched.
    ///
    /// # Errors
    ///
    /// [`Gf2Error::InvalidDimension`] if the matrix is not square or is empty.
    pub fn invert(&self) -> Result<Inversion> {
        self.check_square()?;
        let mut inverse = BitMatrix::identity(self.cols());
        let singular_columns = self.clone().gauss_jordan_helper(&mut inverse);
        Ok(Inversion {
            inverse,
            invertible: singular_columns.is_empty(),
            singular_columns,
        })
    }

    /// Computes the inverse of an invertible matrix
    ///
    /// # Errors
    ///
    /// [`Gf2Error::InvalidDimension`] as for [`BitMatrix::invert`], and
    /// [`Gf2Error::NotInvertible`] naming the first column without a pivot.
    pub fn inverse(&self) -> Result<Self> {
        let inv = self.invert()?;
        match inv.singular_columns.first() {
            Some(&column) => Err(Gf2Error::NotInvertible { column }),
            None => Ok(inv.inverse),
        }
    }

    /// Checks invertibility without building the companion matrix
    ///
    /// Non-square and empty matrices are not invertible.
    pub fn is_invertible(&self) -> bool {
        self.check_square().is_ok() && self.clone().gauss_jordan_helper(&mut ()).is_empty()
    }
}

impl RowOps for () {
    #[inline]
    fn add_row(&mut self, _: usize, _: usize) {}

    #[inline]
    fn swap_rows(&mut self, _: usize, _: usize) {}
}

impl RowOps for BitMatrix {
    #[inline]
    fn add_row(&mut self, from: usize, to: usize) {
        self.data.xor_range(
            from * self.col_blocks,
            to * self.col_blocks,
            self.col_blocks,
        );
    }

    #[inline]
    fn swap_rows(&mut self, from: usize, to: usize) {
        self.data.swap_range(
            from * self.col_blocks,
            to * self.col_blocks,
            self.col_blocks,
        );
    }
}

impl Index<(usize, usize)> for BitMatrix {
    type Output = bool;

    #[inline]
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        if self.bit(index.0, index.1) {
            &true
        } else {
            &false
        }
    }
}

impl fmt::Display for BitMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.rows {
            for j in 0..self.cols {
                write!(f, " {} ", if self[(i, j)] { 1 } else { 0 })?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Matrix product over GF(2)
impl Mul for &BitMatrix {
    type Output = BitMatrix;
    fn mul(self, rhs: Self) -> Self::Output {
        if self.cols != rhs.rows {
            panic!(
                "Attempting to multiply matrices of incompatible dimensions: {} != {}",
                self.cols, rhs.rows
            );
        }
        let mut res = BitMatrix::zeros(self.rows, rhs.cols);

        for i in 0..self.rows {
            let row = res.row_mut(i);
            for j in (0..self.cols).filter(|&j| self.bit(i, j)) {
                *row ^= rhs.row(j);
            }
        }

        res
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    fn grid(rows: &[&[u8]]) -> BitMatrix {
        let g: Vec<Vec<u8>> = rows.iter().map(|r| r.to_vec()).collect();
        BitMatrix::try_from_grid(&g).unwrap()
    }

    #[test]
    fn identity() {
        let m = BitMatrix::identity(100);
        for i in 0..100 {
            for j in 0..100 {
                assert_eq!(m[(i, j)], i == j);
            }
        }
    }

    #[test]
    fn random_respects_padding() {
        let mut rng = SmallRng::seed_from_u64(1);
        let m = BitMatrix::random(&mut rng, 10, 70);
        for i in 0..m.rows() {
            assert_eq!(m.row(i).len(), 2);
            assert_eq!(m.row(i)[1] & !tail_mask(70), 0);
        }
    }

    #[test]
    fn grid_round_trip() {
        let g = vec![vec![1, 0, 1], vec![0, 1, 1]];
        let m = BitMatrix::try_from_grid(&g).unwrap();
        assert_eq!((m.rows(), m.cols()), (2, 3));
        assert!(m[(0, 2)]);
        assert!(!m[(1, 0)]);
        assert_eq!(m.to_grid(), g);
    }

    #[test]
    fn grid_rejects_bad_input() {
        let ragged = vec![vec![1, 0], vec![1]];
        assert!(matches!(
            BitMatrix::try_from_grid(&ragged),
            Err(Gf2Error::InvalidDimension(_))
        ));

        let not_bits = vec![vec![1, 0], vec![0, 2]];
        assert_eq!(
            BitMatrix::try_from_grid(&not_bits),
            Err(Gf2Error::InvalidBitValue { index: 3, value: 2 })
        );
    }

    #[test]
    fn matrix_mult() {
        let mut rng = SmallRng::seed_from_u64(1);
        let m1 = BitMatrix::random(&mut rng, 80, 100);
        let m2 = BitMatrix::random(&mut rng, 100, 70);
        let m3 = &m1 * &m2;

        for i in 0..m3.rows() {
            for j in 0..m3.cols() {
                let mut b = false;
                for k in 0..m1.cols() {
                    b ^= m1.bit(i, k) & m2.bit(k, j);
                }
                assert_eq!(m3.bit(i, j), b);
            }
        }
    }

    #[test]
    fn invert_identity() {
        for n in [1, 2, 7, 32, 64, 65, 130] {
            let id = BitMatrix::identity(n);
            let inv = id.invert().unwrap();
            assert!(inv.invertible);
            assert!(inv.singular_columns.is_empty());
            assert_eq!(inv.inverse, id);
        }
    }

    #[test]
    fn invert_upper_triangular_2x2() {
        // [[1,1],[0,1]] is its own inverse over GF(2)
        let m = grid(&[&[1, 1], &[0, 1]]);
        assert!(m.is_invertible());
        let inv = m.invert().unwrap();
        assert!(inv.invertible);
        assert_eq!(inv.inverse, m);
    }

    #[test]
    fn matrix_inv() {
        let mut rng = SmallRng::seed_from_u64(1);
        for sz in [3, 32, 100] {
            let m = BitMatrix::random_invertible(&mut rng, sz);
            assert!(m.is_invertible());
            let n = m.inverse().unwrap();
            let id = BitMatrix::identity(sz);

            assert_eq!(&m * &n, id);
            assert_eq!(&n * &m, id);
            assert_eq!(n.inverse().unwrap(), m);
        }
    }

    #[test]
    fn invert_does_not_touch_input() {
        let mut rng = SmallRng::seed_from_u64(7);
        let m = BitMatrix::random_invertible(&mut rng, 20);
        let before = m.clone();
        let _ = m.invert().unwrap();
        assert_eq!(m, before);
    }

    #[test]
    fn zero_row_is_singular() {
        let mut rng = SmallRng::seed_from_u64(3);
        for n in [2, 8, 32] {
            let mut m = BitMatrix::random_invertible(&mut rng, n);
            for j in 0..n {
                m.set_bit(0, j, false);
            }
            let inv = m.invert().unwrap();
            assert!(!inv.invertible);
            assert!(!inv.singular_columns.is_empty());
            assert!(!m.is_invertible());
            assert!(matches!(m.inverse(), Err(Gf2Error::NotInvertible { .. })));
        }
    }

    #[test]
    fn singular_best_effort_output() {
        // rows packed as [0b000, 0b011, 0b110]; columns 0 and 1 pivot on rows 1 and 2,
        // leaving column 2 without one
        let m = grid(&[&[0, 0, 0], &[1, 1, 0], &[0, 1, 1]]);
        let inv = m.invert().unwrap();
        assert!(!inv.invertible);
        assert_eq!(inv.singular_columns, vec![2]);
        assert_eq!(
            inv.inverse.to_grid(),
            vec![vec![1, 1, 1], vec![1, 0, 1], vec![1, 0, 0]]
        );
        assert_eq!(m.inverse(), Err(Gf2Error::NotInvertible { column: 2 }));
        assert!(!m.is_invertible());
    }

    #[test]
    fn zero_first_column_is_singular_at_zero() {
        let m = grid(&[&[0, 1], &[0, 1]]);
        let inv = m.invert().unwrap();
        assert_eq!(inv.singular_columns, vec![0]);
        assert_eq!(inv.inverse.to_grid(), vec![vec![1, 1], vec![0, 1]]);
        assert_eq!(m.inverse(), Err(Gf2Error::NotInvertible { column: 0 }));
    }

    #[test]
    fn invert_rejects_non_square() {
        let m = BitMatrix::zeros(3, 4);
        assert!(matches!(m.invert(), Err(Gf2Error::InvalidDimension(_))));
        assert!(!m.is_invertible());
        assert!(matches!(
            BitMatrix::zeros(0, 0).invert(),
            Err(Gf2Error::InvalidDimension(_))
        ));
    }

    #[test]
    fn display_grid() {
        let m = grid(&[&[1, 0], &[1, 1]]);
        assert_eq!(m.to_string(), " 1  0 \n 1  1 \n");
    }

    #[test]
    fn row_blocks() {
        let m = BitMatrix::from_row_blocks(4, &[0b1_0001, 0b0110]);
        assert_eq!(m.to_grid(), vec![vec![1, 0, 0, 0], vec![0, 1, 1, 0]]);
        assert_eq!(m.row_block(0), 0b0001);
        assert_eq!(m.row_block(1), 0b0110);
    }
}
