// Leading "0x" marker the upstream encoding puts in front of the digits.
pub const HEX_MARKER_LEN: usize = 2;

/// `None` when the input is shorter than the marker or the rest is not hex.
pub fn decode_hex_payload(input: &str) -> Option<String> {
    let (offset, _) = input.char_indices().nth(HEX_MARKER_LEN)?;
    let digits = input.get(offset..)?;
    let bytes = hex::decode(digits).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::decode_hex_payload;

    #[test]
    fn decodes_after_marker() {
        assert_eq!(decode_hex_payload("0x34322e35").as_deref(), Some("42.5"));
        assert_eq!(decode_hex_payload("0X3535").as_deref(), Some("55"));
    }

    #[test]
    fn short_or_garbled_input_yields_none() {
        assert_eq!(decode_hex_payload(""), None);
        assert_eq!(decode_hex_payload("0"), None);
        assert_eq!(decode_hex_payload("0x"), None);
        assert_eq!(decode_hex_payload("0xzz"), None);
        assert_eq!(decode_hex_payload("0x353"), None);
        assert_eq!(decode_hex_payload("é"), None);
        assert_eq!(decode_hex_payload("éé35"), Some("5".to_string()));
    }

    #[test]
    fn missing_marker_loses_the_first_byte() {
        // the first two digits are taken as the marker
        assert_eq!(decode_hex_payload("3535").as_deref(), Some("5"));
    }
}
