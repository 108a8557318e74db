use log::{debug, trace};
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::reader::ProtoBufReader;

/// Top-level fields numbered above this end the decode.
pub const MAX_FIELD_NUMBER: u32 = 512;

/// Deepest level at which a length-delimited payload is still tried as a
/// message. Payloads below it are kept as bytes.
pub const RECURSION_LIMIT: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialize",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum WireType {
    Varint,
    Fixed64,
    LengthDelimited,
    Fixed32,
}

impl TryFrom<u64> for WireType {
    type Error = DecodeError;

    fn try_from(v: u64) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::Varint),
            1 => Ok(Self::Fixed64),
            2 => Ok(Self::LengthDelimited),
            5 => Ok(Self::Fixed32),
            // groups (3, 4) are deprecated and never guessed at
            other => Err(DecodeError::InvalidWireType(other as u8)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialize",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase", tag = "type", content = "value")
)]
pub enum FieldValue {
    Varint(u64),
    Fixed64(u64),
    Fixed32(u32),
    Bytes(#[cfg_attr(feature = "serialize", serde(with = "lossy_string"))] Vec<u8>),
    Message(Vec<Field>),
}

impl FieldValue {
    /// Signed view of a numeric value, the way a `int32`/`int64` schema
    /// field would read it. `None` for bytes and messages.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Varint(v) | Self::Fixed64(v) => Some(v as i64),
            Self::Fixed32(v) => Some(i64::from(v as i32)),
            Self::Bytes(_) | Self::Message(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&[Field]> {
        match self {
            Self::Message(fields) => Some(fields),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialize",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub struct Field {
    pub number: u32,
    pub wire_type: WireType,
    /// Offset of the value (past the tag and any length prefix) within the
    /// buffer it was decoded from.
    #[cfg_attr(feature = "serialize", serde(skip))]
    pub offset: usize,
    #[cfg_attr(feature = "serialize", serde(flatten))]
    pub value: FieldValue,
}

/// Decodes `buffer` as a top-level message and returns the fields along
/// with whatever could not be decoded.
///
/// Decoding stops at the first field that is invalid or numbered above
/// [`MAX_FIELD_NUMBER`]; everything decoded before it is kept.
pub fn decode_message(buffer: &[u8]) -> (Vec<Field>, &[u8]) {
    let mut reader = ProtoBufReader::new(buffer);
    let mut fields = Vec::new();

    while !reader.remaining_bytes().is_empty() {
        reader.checkpoint();
        match decode_field(&mut reader, 0) {
            Ok(field) if field.number <= MAX_FIELD_NUMBER => fields.push(field),
            Ok(field) => {
                debug!("field number {} out of range at top level", field.number);
                reader.reset_checkpoint();
                break;
            }
            Err(e) => {
                debug!("stopped at offset {}: {}", reader.pos(), e);
                reader.reset_checkpoint();
                break;
            }
        }
    }
    (fields, reader.remaining_bytes())
}

/// Decodes `buffer` as a nested message. Unlike [`decode_message`] every
/// byte must belong to a valid field.
pub fn decode_nested(buffer: &[u8]) -> Result<Vec<Field>, DecodeError> {
    decode_nested_at(buffer, 1)
}

/// Decodes the single field at the start of `buffer`, ignoring the top-level
/// field number limit. Useful to find out why [`decode_message`] stopped.
pub fn peek_field(buffer: &[u8]) -> Result<Field, DecodeError> {
    decode_field(&mut ProtoBufReader::new(buffer), 0)
}

fn decode_nested_at(buffer: &[u8], depth: u32) -> Result<Vec<Field>, DecodeError> {
    if buffer.is_empty() {
        return Err(DecodeError::Empty);
    }
    let mut reader = ProtoBufReader::new(buffer);
    let mut fields = Vec::new();
    while !reader.remaining_bytes().is_empty() {
        fields.push(decode_field(&mut reader, depth)?);
    }
    Ok(fields)
}

/// `depth` is the nesting level of the message the field belongs to.
fn decode_field(reader: &mut ProtoBufReader, depth: u32) -> Result<Field, DecodeError> {
    let tag = reader.read_varint()?;
    let number = tag >> 3;
    if number == 0 || number > u64::from(u32::MAX >> 3) {
        return Err(DecodeError::InvalidFieldNumber(number));
    }
    let number = number as u32;
    let wire_type = WireType::try_from(tag & 0x7)?;

    let (offset, value) = match wire_type {
        WireType::Varint => (reader.pos(), FieldValue::Varint(reader.read_varint()?)),
        WireType::Fixed64 => (reader.pos(), FieldValue::Fixed64(reader.read_fixed64()?)),
        WireType::Fixed32 => (reader.pos(), FieldValue::Fixed32(reader.read_fixed32()?)),
        WireType::LengthDelimited => {
            let payload = reader.read_delimited()?;
            let offset = reader.pos() - payload.len();
            if depth >= RECURSION_LIMIT {
                debug!("field {} at depth {} kept as bytes", number, depth);
                (offset, FieldValue::Bytes(payload.to_vec()))
            } else {
                match decode_nested_at(payload, depth + 1) {
                    Ok(fields) => (offset, FieldValue::Message(fields)),
                    Err(e) => {
                        debug!("field {} is not a message ({}), keeping bytes", number, e);
                        (offset, FieldValue::Bytes(payload.to_vec()))
                    }
                }
            }
        }
    };
    trace!("field {} {:?} at {}", number, wire_type, offset);

    Ok(Field {
        number,
        wire_type,
        offset,
        value,
    })
}

#[cfg(feature = "serialize")]
mod lossy_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&String::from_utf8_lossy(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        Ok(String::deserialize(d)?.into_bytes())
    }
}
