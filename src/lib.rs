//! Schema-less protobuf decoding, plus the `Test` message fixture used to
//! exercise it.
//!
//! ```
//! use pbtrace::{decode_message, trace_lines};
//!
//! let (fields, rest) = decode_message(&[0x08, 0x96, 0x01]);
//! assert!(rest.is_empty());
//! assert_eq!(trace_lines(&fields), vec!["pb_1 : 150"]);
//! ```

mod decode;
mod error;
pub mod fixture;
mod reader;
mod trace;

pub use decode::{
    decode_message, decode_nested, peek_field, Field, FieldValue, WireType, MAX_FIELD_NUMBER,
    RECURSION_LIMIT,
};
pub use error::DecodeError;
pub use reader::MAX_VARINT_BYTES;
pub use trace::{trace_lines, write_trace};
