use thiserror::Error;

/// Errors raised at the boundary of the codec and the inverter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Gf2Error {
    /// A dimension was zero, too large, or disagreed with another operand
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    /// A bit-grid entry was something other than 0 or 1
    #[error("invalid bit value {value} at index {index}")]
    InvalidBitValue { index: usize, value: u8 },

    /// Elimination found no pivot for `column`
    #[error("matrix is not invertible: no pivot in column {column}")]
    NotInvertible { column: usize },
}

impl Gf2Error {
    pub(crate) fn dimension(msg: impl Into<String>) -> Self {
        Gf2Error::InvalidDimension(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Gf2Error>;
