use {
    crate::{ImmutableRange, ImmutableReferences, RelocationError},
    tracing::trace,
};

/// Carries immutable values out of `historical` bytecode into the freshly compiled `bytecode`.
///
/// `references` are the immutable ranges of `bytecode`, `paired` the ranges of the same source
/// compiled with the toolchain `historical` was deployed with. Occurrences of an immutable are
/// matched by position. Each splice rewrites the working buffer in place, later occurrences see
/// the result of earlier ones. Ranges are expected to be disjoint.
///
/// Fails without returning partial bytecode if the two reference tables disagree on an id,
/// on the number or length of occurrences, or if a range does not fit its bytecode.
pub fn relocate_immutables(
    mut bytecode: Vec<u8>,
    references: &ImmutableReferences,
    paired: &ImmutableReferences,
    historical: &[u8],
) -> Result<Vec<u8>, RelocationError> {
    for (id, ranges) in references {
        let paired_ranges = paired
            .get(id)
            .ok_or_else(|| RelocationError::MissingReference(id.clone()))?;
        if ranges.len() != paired_ranges.len() {
            return Err(RelocationError::OccurrenceMismatch {
                id: id.clone(),
                new: ranges.len(),
                paired: paired_ranges.len(),
            });
        }

        for (index, (range, paired_range)) in ranges.iter().zip(paired_ranges).enumerate() {
            if range.length != paired_range.length {
                return Err(RelocationError::LengthMismatch {
                    id: id.clone(),
                    index,
                    new: range.length,
                    paired: paired_range.length,
                });
            }
            let value = slice(historical, paired_range, id, index)?;
            splice(&mut bytecode, range, value, id, index)?;
            trace!(
                id = %id,
                index,
                start = range.start,
                length = range.length,
                "Relocated immutable"
            );
        }
    }

    Ok(bytecode)
}

fn slice<'a>(
    bytecode: &'a [u8],
    range: &ImmutableRange,
    id: &str,
    index: usize,
) -> Result<&'a [u8], RelocationError> {
    range
        .start
        .checked_add(range.length)
        .and_then(|end| bytecode.get(range.start..end))
        .ok_or_else(|| RelocationError::OutOfBounds {
            id: id.to_string(),
            index,
            start: range.start,
            length: range.length,
            size: bytecode.len(),
        })
}

fn splice(
    bytecode: &mut Vec<u8>,
    range: &ImmutableRange,
    value: &[u8],
    id: &str,
    index: usize,
) -> Result<(), RelocationError> {
    slice(bytecode, range, id, index)?;

    let expected = bytecode.len();
    bytecode.splice(range.start..range.start + range.length, value.iter().copied());
    if bytecode.len() != expected {
        return Err(RelocationError::LengthChanged {
            id: id.to_string(),
            expected,
            actual: bytecode.len(),
        });
    }

    Ok(())
}
