//! `gf2inv` inverts linear diffusion layers given as square bit matrices over GF(2), the
//! 2-element field where addition is XOR and multiplication is AND.
//!
//! A diffusion layer of dimension `n` is supplied as `n` packed rows (bit `k` of row `i` is the
//! matrix entry in column `k`). The crate provides:
//! - [`codec`]: conversion between packed rows and explicit bit matrices
//! - [`BitMatrix::invert`]: Gauss-Jordan elimination against an identity companion, reporting
//!   singular input instead of failing on it ([`BitMatrix::inverse`] is the strict variant)
//! - [`transform::diffuse`] and [`BitMatrix::apply_bytes`]: applying a layer to a byte vector
//!
//! ```
//! use gf2inv::{codec, transform};
//!
//! let rows = [0b011, 0b110, 0b100];
//! let inv = codec::invert_packed(&rows, 3).unwrap();
//! assert!(inv.invertible);
//!
//! let input = [0x12, 0x34, 0x56];
//! let mixed = transform::diffuse(&rows, &input).unwrap();
//! assert_eq!(transform::diffuse(&inv.rows, &mixed).unwrap(), input);
//! ```

#![allow(
    clippy::needless_range_loop,
    clippy::uninlined_format_args,
    clippy::bool_assert_comparison,
    clippy::cast_possible_truncation,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::bool_to_int_with_if
)]
pub mod bitmatrix;
pub mod bitvec;
pub mod bitvector;
pub mod codec;
pub mod error;
pub mod transform;

pub use bitmatrix::{BitMatrix, Inversion, RowOps};
pub use bitvec::{BitBlock, BitRange, BitVec};
pub use bitvector::BitVector;
pub use codec::{
    invert_packed, pack, pack_matrix, unpack, unpack_matrix, PackedInversion, PackedRow,
};
pub use error::{Gf2Error, Result};
