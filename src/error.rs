use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("varint longer than {} bytes", crate::reader::MAX_VARINT_BYTES)]
    VarintOverflow,

    #[error("invalid wire type {0}")]
    InvalidWireType(u8),

    #[error("invalid field number {0}")]
    InvalidFieldNumber(u64),

    #[error("length {len} exceeds the {remaining} remaining bytes")]
    LengthOverflow { len: u64, remaining: usize },

    #[error("empty payload")]
    Empty,
}

impl DecodeError {
    /// True when the input simply ran out, as opposed to holding bytes that
    /// can't be a field.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
            || matches!(self, Self::LengthOverflow { .. })
    }
}
