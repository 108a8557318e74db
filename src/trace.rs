use std::convert::Infallible;
use std::io::{self, Write};

use crate::decode::{Field, FieldValue};

const ROOT: &str = "pb";

/// Writes one `path : value` line per leaf field. Nested messages extend
/// the path with their field number instead of printing a line themselves.
/// Bytes are written as they are.
pub fn write_trace<W: Write>(fields: &[Field], out: &mut W) -> io::Result<()> {
    for_each_leaf(fields, &mut String::from(ROOT), &mut |path, value| {
        out.write_all(path.as_bytes())?;
        out.write_all(b" : ")?;
        match value {
            FieldValue::Bytes(bytes) => out.write_all(bytes)?,
            number => write!(out, "{}", number.as_i64().unwrap_or_default())?,
        }
        out.write_all(b"\n")
    })
}

/// Same lines as [`write_trace`], one entry per leaf. Bytes are decoded as
/// lossy UTF-8 and may span several lines within one entry.
pub fn trace_lines(fields: &[Field]) -> Vec<String> {
    let mut lines = Vec::new();
    for_each_leaf::<Infallible, _>(fields, &mut String::from(ROOT), &mut |path, value| {
        let line = match value {
            FieldValue::Bytes(bytes) => format!("{} : {}", path, String::from_utf8_lossy(bytes)),
            number => format!("{} : {}", path, number.as_i64().unwrap_or_default()),
        };
        lines.push(line);
        Ok(())
    })
    .unwrap_or_else(|never| match never {});
    lines
}

fn for_each_leaf<E, F>(fields: &[Field], path: &mut String, f: &mut F) -> Result<(), E>
where
    F: FnMut(&str, &FieldValue) -> Result<(), E>,
{
    for field in fields {
        let parent_len = path.len();
        path.push('_');
        path.push_str(&field.number.to_string());

        let res = match &field.value {
            FieldValue::Message(children) => for_each_leaf(children, path, f),
            leaf => f(path, leaf),
        };

        path.truncate(parent_len);
        res?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_message;
    use pretty_assertions::assert_eq;

    #[test]
    fn flat_fields() {
        let (fields, _) = decode_message(&[0x08, 0x01, 0x12, 0x02, b'a', b'b']);
        assert_eq!(trace_lines(&fields), vec!["pb_1 : 1", "pb_2 : ab"]);
    }

    #[test]
    fn short_text_traced_as_message() {
        let (fields, _) = decode_message(&[0x12, 0x02, b'h', b'i']);
        assert_eq!(trace_lines(&fields), vec!["pb_2_13 : 105"]);
    }

    #[test]
    fn newline_stays_in_one_entry() {
        let (fields, _) = decode_message(&[0x0a, 0x03, b'a', b'\n', b'b', 0x10, 0x02]);
        assert_eq!(trace_lines(&fields), vec!["pb_1 : a\nb", "pb_2 : 2"]);

        let mut out = Vec::new();
        write_trace(&fields, &mut out).unwrap();
        assert_eq!(out, b"pb_1 : a\nb\npb_2 : 2\n");
    }

    #[test]
    fn nested_paths_restore_parent() {
        // 3: { 1: 5, 2: { 1: 6 } }, 4: 7
        let buf = [0x1a, 0x06, 0x08, 0x05, 0x12, 0x02, 0x08, 0x06, 0x20, 0x07];
        let (fields, _) = decode_message(&buf);
        assert_eq!(
            trace_lines(&fields),
            vec!["pb_3_1 : 5", "pb_3_2_1 : 6", "pb_4 : 7"]
        );
    }

    #[test]
    fn bytes_are_written_raw() {
        let (fields, _) = decode_message(&[0x0a, 0x02, 0xff, 0xfe]);
        let mut out = Vec::new();
        write_trace(&fields, &mut out).unwrap();
        assert_eq!(out, b"pb_1 : \xff\xfe\n");
    }

    #[test]
    fn negative_fixed32() {
        let (fields, _) = decode_message(&[0x0d, 0x00, 0xfc, 0xff, 0xff]);
        assert_eq!(trace_lines(&fields), vec!["pb_1 : -1024"]);
    }
}
