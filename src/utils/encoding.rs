use std::io::{self, Read, Write};

/// Write a u64 in little-endian format
pub fn write_u64_le<W: Write>(writer: &mut W, value: u64) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Read a u64 in little-endian format
pub fn read_u64_le<R: Read>(reader: &mut R) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Read a single byte
pub fn read_u8<R: Read>(reader: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Iterate the lines of a byte buffer, stripping `\n` and a trailing `\r`.
///
/// A final line without a newline is yielded; an empty trailing segment is not.
pub fn split_lines(buf: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut rest = buf;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let (line, next) = match memchr::memchr(b'\n', rest) {
            Some(pos) => (&rest[..pos], &rest[pos + 1..]),
            None => (rest, &rest[rest.len()..]),
        };
        rest = next;
        Some(line.strip_suffix(b"\r").unwrap_or(line))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u64_roundtrip() {
        let mut buf = Vec::new();
        write_u64_le(&mut buf, 0x0102_0304_0506_0708).unwrap();
        assert_eq!(buf[0], 0x08);
        let mut cursor = buf.as_slice();
        assert_eq!(read_u64_le(&mut cursor).unwrap(), 0x0102_0304_0506_0708);
        assert!(read_u8(&mut cursor).is_err());
    }

    #[test]
    fn test_split_lines() {
        let lines: Vec<&[u8]> = split_lines(b"smith\r\nsmyth\n\njones").collect();
        assert_eq!(lines, vec![&b"smith"[..], b"smyth", b"", b"jones"]);

        let trailing: Vec<&[u8]> = split_lines(b"smith\n").collect();
        assert_eq!(trailing, vec![&b"smith"[..]]);

        assert_eq!(split_lines(b"").count(), 0);
    }
}
