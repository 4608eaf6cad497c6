//! Size-based splitting of a work list across a fixed number of workers.

use crate::error::CoreError;

/// Split `items` into exactly `n` contiguous partitions.
///
/// Partition sizes differ by at most one; the first `items.len() % n`
/// partitions carry the extra element. Concatenating the result in order
/// yields `items` again. When `n` exceeds the number of items the trailing
/// partitions are empty.
///
/// Returns [`CoreError::Validation`] when `n` is zero.
pub fn partition<T: Clone>(items: &[T], n: usize) -> Result<Vec<Vec<T>>, CoreError> {
    if n == 0 {
        return Err(CoreError::Validation(
            "Cannot partition work across zero workers".to_string(),
        ));
    }

    let base = items.len() / n;
    let remainder = items.len() % n;

    let mut result = Vec::with_capacity(n);
    let mut cursor = 0;
    for i in 0..n {
        let size = if i < remainder { base + 1 } else { base };
        result.push(items[cursor..cursor + size].to_vec());
        cursor += size;
    }

    Ok(result)
}
