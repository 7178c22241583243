#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskRecord {
    pub filesystem: String,
    pub size: String,
    pub used: String,
    pub available: String,
    pub usage_percent: String,
    pub mountpoint: String,
}

pub const DISK_RECORD_FIELDS: usize = 6;

impl DiskRecord {
    /// Fewer than six tokens is no record; tokens past the sixth are ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let tokens = tokenize(text);
        if tokens.len() < DISK_RECORD_FIELDS {
            return None;
        }

        let mut fields = tokens.into_iter().map(str::to_string);
        Some(Self {
            filesystem: fields.next()?,
            size: fields.next()?,
            used: fields.next()?,
            available: fields.next()?,
            usage_percent: fields.next()?,
            mountpoint: fields.next()?,
        })
    }

    pub fn usage(&self) -> Option<f64> {
        self.usage_percent
            .trim_end_matches('%')
            .parse::<f64>()
            .ok()
    }
}

// Empty tokens are dropped before newlines are trimmed, so a lone "\n"
// still occupies a field.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(' ')
        .filter(|token| !token.is_empty())
        .map(|token| token.trim_end_matches('\n'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{DiskRecord, tokenize};

    #[test]
    fn parses_padded_report_line() {
        let record = DiskRecord::parse("ext4  100G   45G   55G  45% /data\n").unwrap();
        assert_eq!(record.filesystem, "ext4");
        assert_eq!(record.size, "100G");
        assert_eq!(record.used, "45G");
        assert_eq!(record.available, "55G");
        assert_eq!(record.mountpoint, "/data");
        assert_eq!(record.usage(), Some(45.0));
    }

    #[test]
    fn short_lines_are_not_records() {
        assert_eq!(DiskRecord::parse("ext4 100G 45G 55G 45%"), None);
        assert_eq!(DiskRecord::parse(""), None);
        assert_eq!(DiskRecord::parse("\n"), None);
    }

    #[test]
    fn trailing_newline_token_counts_as_a_field() {
        let record = DiskRecord::parse("ext4 100G 45G 55G 45% \n").unwrap();
        assert_eq!(record.filesystem, "ext4");
        assert_eq!(record.usage(), Some(45.0));
        assert_eq!(record.mountpoint, "");
        assert_eq!(tokenize("ext4 100G 45G 55G 45% \n").len(), 6);
    }

    #[test]
    fn extra_tokens_are_ignored() {
        let record = DiskRecord::parse("xfs 1T 1G 1T 0% /srv extra tokens").unwrap();
        assert_eq!(record.mountpoint, "/srv");
        assert_eq!(tokenize("xfs 1T 1G 1T 0% /srv extra tokens").len(), 8);
    }

    #[test]
    fn non_numeric_usage_has_no_value() {
        let record = DiskRecord::parse("tmpfs 1G 0 1G -% /run").unwrap();
        assert_eq!(record.usage(), None);
    }
}
