use bytes::Bytes;

#[derive(Debug, Clone, PartialEq)]
pub enum PduValue {
    OctetString(Bytes),
    Integer(i64),
    Counter32(u32),
    Gauge32(u32),
    Counter64(u64),
    TimeTicks(u32),
    ObjectIdentifier(String),
    IpAddress([u8; 4]),
    Null,
}

impl PduValue {
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::OctetString(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            Self::Integer(value) => Some(value.to_string()),
            Self::Counter32(value) | Self::Gauge32(value) | Self::TimeTicks(value) => {
                Some(value.to_string())
            }
            Self::Counter64(value) => Some(value.to_string()),
            Self::ObjectIdentifier(oid) => Some(oid.clone()),
            Self::IpAddress([a, b, c, d]) => Some(format!("{a}.{b}.{c}.{d}")),
            Self::Null => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pdu {
    pub oid: String,
    pub value: PduValue,
}

impl Pdu {
    pub fn octet_string(oid: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            oid: oid.into(),
            value: PduValue::OctetString(Bytes::from(text.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::{Pdu, PduValue};

    #[test]
    fn octet_strings_read_as_text() {
        let pdu = Pdu::octet_string(".1.3.6.1.4.1.99999.1.2.2.2.1.2.3", "eth0");
        assert_eq!(pdu.value.as_text().as_deref(), Some("eth0"));

        let invalid = PduValue::OctetString(Bytes::from_static(&[0x65, 0xff]));
        assert_eq!(invalid.as_text().as_deref(), Some("e\u{fffd}"));
    }

    #[test]
    fn numeric_values_render_in_decimal() {
        assert_eq!(PduValue::Integer(-4).as_text().as_deref(), Some("-4"));
        assert_eq!(PduValue::IpAddress([10, 0, 0, 1]).as_text().as_deref(), Some("10.0.0.1"));
        assert_eq!(PduValue::Null.as_text(), None);
    }
}
