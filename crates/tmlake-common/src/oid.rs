use crate::error::{Result, TmlakeError};

pub fn last_sub_identifier(oid: &str) -> Option<&str> {
    oid.trim_end_matches('.')
        .rsplit('.')
        .next()
        .filter(|component| !component.is_empty())
}

pub fn parse_oid(oid: &str) -> Result<Vec<u32>> {
    let trimmed = oid.strip_prefix('.').unwrap_or(oid);
    if trimmed.is_empty() {
        return Err(TmlakeError::InvalidOid(oid.to_string()));
    }

    trimmed
        .split('.')
        .map(|component| {
            component
                .parse::<u32>()
                .map_err(|_| TmlakeError::InvalidOid(oid.to_string()))
        })
        .collect()
}

pub fn is_within(oid: &str, subtree: &str) -> bool {
    let oid = oid.strip_prefix('.').unwrap_or(oid);
    let subtree = subtree.strip_prefix('.').unwrap_or(subtree);

    oid == subtree
        || oid
            .strip_prefix(subtree)
            .is_some_and(|rest| rest.starts_with('.'))
}
