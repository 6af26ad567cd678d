use crate::models::Quota;

/// Number of records to collect given what the source reports
pub fn effective_count(total: u64, requested: Quota) -> usize {
    let total = usize::try_from(total).unwrap_or(usize::MAX);
    match requested {
        Quota::AtMost(n) if n <= total => n,
        _ => total,
    }
}
