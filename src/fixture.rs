//! The `Test` message and the `test_data_pb` fixture built from it.
//!
//! Scalar and string fields are proto2 `optional`, so an empty string that
//! was explicitly set is encoded while an unset one is not.

use std::fs;
use std::io;
use std::path::Path;

use log::info;
use prost::Message;

pub const FIXTURE_PATH: &str = "test_data_pb";

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Test {
    #[prost(int32, optional, tag = "1")]
    pub test_int32_1: Option<i32>,
    #[prost(int32, optional, tag = "2")]
    pub test_int32_2: Option<i32>,
    #[prost(int32, optional, tag = "3")]
    pub test_int32_3: Option<i32>,
    #[prost(string, optional, tag = "4")]
    pub test_string_1: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub test_string_2: Option<String>,
    #[prost(string, optional, tag = "6")]
    pub test_string_3: Option<String>,
    #[prost(string, repeated, tag = "7")]
    pub test_array: Vec<String>,
    #[prost(message, repeated, tag = "8")]
    pub r#struct: Vec<Struct>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Struct {
    #[prost(string, optional, tag = "1")]
    pub struct_string: Option<String>,
    #[prost(int32, optional, tag = "2")]
    pub struct_int32: Option<i32>,
}

pub fn sample_message() -> Test {
    let mut message = Test {
        test_int32_1: Some(1),
        test_int32_2: Some(-1024),
        test_int32_3: Some(123456789),
        test_string_1: Some("test_string_1".to_owned()),
        test_string_3: Some(String::new()),
        ..Default::default()
    };
    message.test_array.push("array1".to_owned());
    message.test_array.push("array2".to_owned());
    message.r#struct.push(Struct {
        struct_string: Some("struct_string".to_owned()),
        struct_int32: Some(520),
    });
    message
}

pub fn encode_fixture() -> Vec<u8> {
    sample_message().encode_to_vec()
}

/// Writes the encoded fixture to `path`, replacing any existing file.
pub fn write_fixture<P: AsRef<Path>>(path: P) -> io::Result<()> {
    let bytes = encode_fixture();
    fs::write(path.as_ref(), &bytes)?;
    info!("wrote {} bytes to {}", bytes.len(), path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_message;
    use crate::trace::trace_lines;
    use pretty_assertions::assert_eq;

    fn expected_bytes() -> Vec<u8> {
        let mut buf = vec![0x08, 0x01];
        buf.extend_from_slice(&[0x10, 0x80, 0xf8, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01]);
        buf.extend_from_slice(&[0x18, 0x95, 0x9a, 0xef, 0x3a]);
        buf.extend_from_slice(&[0x22, 0x0d]);
        buf.extend_from_slice(b"test_string_1");
        buf.extend_from_slice(&[0x32, 0x00]);
        buf.extend_from_slice(&[0x3a, 0x06]);
        buf.extend_from_slice(b"array1");
        buf.extend_from_slice(&[0x3a, 0x06]);
        buf.extend_from_slice(b"array2");
        buf.extend_from_slice(&[0x42, 0x12, 0x0a, 0x0d]);
        buf.extend_from_slice(b"struct_string");
        buf.extend_from_slice(&[0x10, 0x88, 0x04]);
        buf
    }

    #[test]
    fn encoding_is_byte_exact() {
        assert_eq!(encode_fixture(), expected_bytes());
    }

    #[test]
    fn decodes_with_schema() {
        let msg = Test::decode(encode_fixture().as_slice()).unwrap();
        assert_eq!(msg.test_int32_1, Some(1));
        assert_eq!(msg.test_int32_2, Some(-1024));
        assert_eq!(msg.test_int32_3, Some(123456789));
        assert_eq!(msg.test_string_1.as_deref(), Some("test_string_1"));
        assert_eq!(msg.test_string_2, None);
        assert_eq!(msg.test_string_3.as_deref(), Some(""));
        assert_eq!(msg.test_array, vec!["array1", "array2"]);
        assert_eq!(msg.r#struct.len(), 1);
        assert_eq!(msg.r#struct[0].struct_string.as_deref(), Some("struct_string"));
        assert_eq!(msg.r#struct[0].struct_int32, Some(520));
        assert_eq!(msg, sample_message());
    }

    #[test]
    fn empty_string_differs_from_unset() {
        let mut unset = sample_message();
        unset.test_string_3 = None;
        assert_eq!(unset.encoded_len() + 2, encode_fixture().len());
    }

    #[test]
    fn decodes_without_schema() {
        let bytes = encode_fixture();
        let (fields, rest) = decode_message(&bytes);
        assert!(rest.is_empty());
        assert_eq!(
            trace_lines(&fields),
            vec![
                "pb_1 : 1",
                "pb_2 : -1024",
                "pb_3 : 123456789",
                "pb_4 : test_string_1",
                "pb_6 : ",
                "pb_7 : array1",
                "pb_7 : array2",
                "pb_8_1 : struct_string",
                "pb_8_2 : 520",
            ]
        );
    }

    #[test]
    fn write_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FIXTURE_PATH);
        write_fixture(&path).unwrap();
        let first = std::fs::read(&path).unwrap();
        std::fs::write(&path, b"stale contents that are longer than the fixture itself, much longer").unwrap();
        write_fixture(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), first);
    }
}
