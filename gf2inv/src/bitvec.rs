use rand::Rng;
use ref_cast::RefCast;
use std::fmt;
pub use std::ops::{BitXorAssign, Deref, DerefMut, Index, IndexMut, Range};

/// A block of bits. This is an alias for [`u64`]
pub type BitBlock = u64;

/// Number of bits in a [`BitBlock`]
pub const BLOCKSIZE: usize = 64;

/// Returns the minimum number of [`BitBlock`]s required to store the given number of bits.
///
/// If `bits` is not a multiple of [`BLOCKSIZE`], the result is rounded up to ensure all bits fit.
#[inline]
pub fn min_blocks(bits: usize) -> usize {
    bits.div_ceil(BLOCKSIZE)
}

/// Mask selecting the bits of the last block that hold data for a row of `bits` bits
///
/// Rows whose length is a multiple of [`BLOCKSIZE`] use the whole block.
#[inline]
pub fn tail_mask(bits: usize) -> BitBlock {
    match bits % BLOCKSIZE {
        0 => BitBlock::MAX,
        r => (1 << r) - 1,
    }
}

/// A vector of bits, stored as a vector of [`BitBlock`]s.
///
/// Bit `i` lives in block `i / BLOCKSIZE` at position `i % BLOCKSIZE`, counting from the
/// least significant bit. This is the same order used by packed rows, where bit `k` of the
/// integer is column `k`, so a row of at most [`BLOCKSIZE`] columns is exactly one block.
///
/// # Examples
///
/// ```
/// use gf2inv::bitvec::*;
///
/// let mut bv = BitVec::zeros(1);
/// bv.set_bit(5, true);
/// assert!(bv.bit(5));
/// assert_eq!(bv[0], 1 << 5);
/// ```
///
/// Most methods come from dereferencing to [`BitRange`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct BitVec(Vec<BitBlock>);

/// A range of bits, represented as a slice of [`BitBlock`]s.
#[derive(RefCast, PartialEq, Eq, PartialOrd, Ord, Debug)]
#[repr(transparent)]
pub struct BitRange([BitBlock]);

/// Iterator over the bits in a [`BitRange`], starting from bit 0 of the first block.
pub struct BitRangeIter<'a> {
    inner: std::slice::Iter<'a, BitBlock>,
    c: usize,
    block: BitBlock,
}

impl Iterator for BitRangeIter<'_> {
    type Item = bool;
    fn next(&mut self) -> Option<Self::Item> {
        if self.c == BLOCKSIZE {
            self.block = self.inner.next().copied()?;
            self.c = 0;
        }
        let bit = self.block & 1 == 1;
        self.block >>= 1;
        self.c += 1;
        Some(bit)
    }
}

impl BitRange {
    /// Returns a copy of the range as a [`BitVec`].
    #[inline]
    pub fn to_vec(&self) -> BitVec {
        self.0.to_vec().into()
    }

    /// Returns an iterator over the [`BitBlock`]s in this range.
    #[inline]
    pub fn block_iter(&self) -> impl Iterator<Item = BitBlock> + '_ {
        self.0.iter().copied()
    }

    /// Returns an iterator over all bits in this range as `bool`s, padding included.
    #[inline]
    pub fn iter(&self) -> BitRangeIter<'_> {
        BitRangeIter {
            inner: self.0.iter(),
            c: BLOCKSIZE,
            block: 0,
        }
    }

    /// Counts the number of bits set to 1 in the entire range.
    #[inline]
    pub fn count_ones(&self) -> u32 {
        self.block_iter().map(BitBlock::count_ones).sum()
    }

    /// Dot product over GF(2): the parity of the AND of the two ranges
    #[inline]
    pub fn dot(&self, rhs: &BitRange) -> bool {
        self.0
            .iter()
            .zip(rhs.0.iter())
            .fold(0, |parity, (a, b)| parity ^ (a & b).count_ones())
            & 1
            == 1
    }

    /// Returns the value of the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range.
    #[inline]
    pub fn bit(&self, index: usize) -> bool {
        (self.0[index / BLOCKSIZE] >> (index % BLOCKSIZE)) & 1 == 1
    }

    /// Sets the bit at `index` to `value`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range.
    #[inline]
    pub fn set_bit(&mut self, index: usize, value: bool) {
        let mask: BitBlock = 1 << (index % BLOCKSIZE);
        let block = &mut self.0[index / BLOCKSIZE];
        if value {
            *block |= mask;
        } else {
            *block &= !mask;
        }
    }

    /// XORs the `len` blocks starting at `source` into the `len` blocks starting at `target`
    pub fn xor_range(&mut self, source: usize, target: usize, len: usize) {
        for i in 0..len {
            self.0[target + i] ^= self.0[source + i];
        }
    }

    /// XORs all of `source` into this range, starting at block `target_pos`
    pub fn xor_in(&mut self, source: &BitRange, target_pos: usize) {
        for (dst, src) in self.0[target_pos..].iter_mut().zip(source.0.iter()) {
            *dst ^= src;
        }
    }

    /// Swaps the `len` blocks starting at `source` with the `len` blocks starting at `target`
    #[inline]
    pub fn swap_range(&mut self, source: usize, target: usize, len: usize) {
        for i in 0..len {
            self.0.swap(source + i, target + i);
        }
    }

    /// Number of blocks in the range
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn num_bits(&self) -> usize {
        self.0.len() * BLOCKSIZE
    }
}

impl Index<Range<usize>> for BitRange {
    type Output = BitRange;
    fn index(&self, index: Range<usize>) -> &Self::Output {
        BitRange::ref_cast(&self.0[index])
    }
}

impl IndexMut<Range<usize>> for BitRange {
    fn index_mut(&mut self, index: Range<usize>) -> &mut Self::Output {
        BitRange::ref_cast_mut(self.0.index_mut(index))
    }
}

impl Index<usize> for BitRange {
    type Output = BitBlock;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        self.0.index(index)
    }
}

impl IndexMut<usize> for BitRange {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.0.index_mut(index)
    }
}

impl BitVec {
    #[inline]
    pub fn random(rng: &mut impl Rng, num_blocks: usize) -> Self {
        (0..num_blocks).map(|_| rng.random::<BitBlock>()).collect()
    }

    #[inline]
    pub fn zeros(num_blocks: usize) -> Self {
        BitVec(vec![0; num_blocks])
    }

    #[inline]
    pub fn ones(num_blocks: usize) -> Self {
        BitVec(vec![BitBlock::MAX; num_blocks])
    }
}

/// Prints bits in storage order, bit 0 first
impl fmt::Display for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            write!(f, "{}", if bit { 1 } else { 0 })?;
        }
        Ok(())
    }
}

impl BitXorAssign<&Self> for BitRange {
    #[inline]
    fn bitxor_assign(&mut self, rhs: &BitRange) {
        for (bits0, bits1) in self.0.iter_mut().zip(rhs.0.iter()) {
            *bits0 ^= bits1;
        }
    }
}

impl From<Vec<BitBlock>> for BitVec {
    fn from(value: Vec<BitBlock>) -> Self {
        BitVec(value)
    }
}

impl From<BitVec> for Vec<BitBlock> {
    fn from(value: BitVec) -> Self {
        value.0
    }
}

impl FromIterator<BitBlock> for BitVec {
    fn from_iter<T: IntoIterator<Item = BitBlock>>(iter: T) -> Self {
        Vec::from_iter(iter).into()
    }
}

/// Packs bools into blocks, zero-padding the final block
impl FromIterator<bool> for BitVec {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        let mut v = vec![];
        let mut c = 0;
        let mut block: BitBlock = 0;
        for bit in iter {
            block |= (bit as BitBlock) << c;
            c += 1;
            if c == BLOCKSIZE {
                v.push(block);
                block = 0;
                c = 0;
            }
        }

        if c != 0 {
            v.push(block);
        }

        BitVec(v)
    }
}

impl Deref for BitVec {
    type Target = BitRange;
    fn deref(&self) -> &Self::Target {
        BitRange::ref_cast(&self.0)
    }
}

impl DerefMut for BitVec {
    fn deref_mut(&mut self) -> &mut Self::Target {
        BitRange::ref_cast_mut(&mut self.0)
    }
}

impl From<Vec<bool>> for BitVec {
    fn from(value: Vec<bool>) -> Self {
        value.into_iter().collect()
    }
}

impl From<BitVec> for Vec<bool> {
    fn from(value: BitVec) -> Self {
        value.iter().collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn xor_self_is_zero() {
        let sz = 8;
        let mut rng = SmallRng::seed_from_u64(1);
        let vec = BitVec::random(&mut rng, sz);
        let mut vec1 = vec.clone();
        *vec1 ^= &vec;
        assert_eq!(vec1, BitVec::zeros(sz));
    }

    #[test]
    fn display_low_bit_first() {
        let vec = BitVec::from(vec![0b1011 as BitBlock]);
        let s = vec.to_string();
        assert_eq!(s.len(), BLOCKSIZE);
        assert!(s.starts_with("11010"));
        assert_eq!(s.matches('1').count(), 3);
    }

    #[test]
    fn bit_get_set() {
        let sz = 4;
        let bits = vec![0, 3, 63, 64, 100, 201, 255];

        let mut vec0 = BitVec::zeros(sz);
        for &b in &bits {
            vec0.set_bit(b, true);
        }

        for i in 0..(sz * BLOCKSIZE) {
            assert_eq!(vec0.bit(i), bits.contains(&i));
        }

        let mut vec1 = BitVec::ones(sz);
        for &b in &bits {
            vec1.set_bit(b, false);
        }

        for i in 0..(sz * BLOCKSIZE) {
            assert_eq!(vec1.bit(i), !bits.contains(&i));
        }
    }

    #[test]
    fn low_bit_is_index_zero() {
        let vec: BitVec = vec![true, false, true, true].into();
        assert_eq!(vec.len(), 1);
        assert_eq!(vec[0], 0b1101);
    }

    #[test]
    fn bool_vec() {
        let mut rng = SmallRng::seed_from_u64(1);
        let bool_vec: Vec<bool> = (0..300).map(|_| rng.random()).collect();
        let vec: BitVec = bool_vec.clone().into();
        let bool_vec1: Vec<bool> = vec.clone().into();

        for (i, &b) in bool_vec.iter().enumerate() {
            assert_eq!((i, vec.bit(i)), (i, b));
            assert_eq!((i, bool_vec1[i]), (i, b));
        }

        // converting to BitVec pads to a multiple of BLOCKSIZE with zeros
        assert_eq!(vec.num_bits(), bool_vec1.len());
        for i in bool_vec.len()..vec.num_bits() {
            assert_eq!((i, bool_vec1[i]), (i, false));
        }
    }

    #[test]
    fn xor_range() {
        let i = BitBlock::MAX;
        let vec0: BitVec = vec![0, i, 0, i, 0, 0, i, i, 0, 0].into();

        let mut vec1 = vec0.clone();
        vec1.xor_range(1, 5, 3);

        let vec2: BitVec = vec![0, i, 0, i, 0, i, i, 0, 0, 0].into();
        assert_eq!(vec1, vec2);

        vec1.xor_range(1, 5, 3);
        assert_eq!(vec0, vec1);
    }

    #[test]
    fn swap_range() {
        let vec0: BitVec = vec![1, 2, 3, 4, 5, 6].into();
        let mut vec1 = vec0.clone();
        vec1.swap_range(0, 3, 3);
        assert_eq!(vec1, BitVec::from(vec![4, 5, 6, 1, 2, 3]));
        vec1.swap_range(3, 0, 3);
        assert_eq!(vec1, vec0);
    }

    #[test]
    fn dot_is_parity() {
        let a: BitVec = vec![0b1011, 0b1].into();
        let b: BitVec = vec![0b0011, 0b1].into();
        // overlap is bits {0, 1} of block 0 and bit 0 of block 1
        assert!(a.dot(&b));
        let c: BitVec = vec![0b0011, 0].into();
        assert!(!a.dot(&c));
    }

    #[test]
    fn tail_masks() {
        assert_eq!(tail_mask(0), BitBlock::MAX);
        assert_eq!(tail_mask(64), BitBlock::MAX);
        assert_eq!(tail_mask(32), 0xffff_ffff);
        assert_eq!(tail_mask(67), 0b111);
        assert_eq!(min_blocks(0), 0);
        assert_eq!(min_blocks(64), 1);
        assert_eq!(min_blocks(65), 2);
    }

    #[test]
    fn block_index() {
        let mut rng = SmallRng::seed_from_u64(1);
        let vec: BitVec = BitVec::random(&mut rng, 10);
        let r1: &BitRange = &vec[4..9];

        for i in 0..r1.len() {
            assert_eq!(vec[4 + i], r1[i]);
        }
    }
}
