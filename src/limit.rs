/// Number of issues listed when neither `--limit` nor `--all` is given.
pub const DEFAULT_LIMIT: u32 = 10;

/// Resolve the maximum number of items to list.
///
/// An explicit non-zero limit always wins; otherwise `all` means no ceiling
/// (`None`) and anything else falls back to [`DEFAULT_LIMIT`].
pub fn resolve(explicit_limit: Option<u32>, all: bool) -> Option<u32> {
    match explicit_limit {
        Some(limit) if limit > 0 => Some(limit),
        _ if all => None,
        _ => Some(DEFAULT_LIMIT),
    }
}
