use crate::color::{ColorKey, RankedEntry};
use crate::errors::{PaletteError, Result};

/// How many dominant colors each output record carries.
pub const DOMINANT_COLORS: usize = 3;

/// Extract the `k` most frequent colors from a histogram snapshot.
///
/// Entries are ordered by count descending; equal counts are broken by
/// color ascending (red, then green, then blue), so the result is
/// deterministic regardless of map iteration order or thread scheduling.
/// Fails with `InsufficientDistinctColors` when the snapshot holds fewer
/// than `k` distinct colors rather than returning a short list.
pub fn select_top(snapshot: Vec<(ColorKey, u64)>, k: usize) -> Result<Vec<RankedEntry>> {
    if snapshot.len() < k {
        return Err(PaletteError::InsufficientDistinctColors {
            found: snapshot.len(),
            required: k,
        });
    }

    let mut entries = snapshot;
    entries.sort_unstable_by(|(key_a, count_a), (key_b, count_b)| {
        count_b.cmp(count_a).then_with(|| key_a.cmp(key_b))
    });

    Ok(entries
        .into_iter()
        .take(k)
        .map(|(color, count)| RankedEntry { color, count })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_by_count_descending() {
        let snapshot = vec![
            (ColorKey::new(1, 1, 1), 5),
            (ColorKey::new(2, 2, 2), 9),
            (ColorKey::new(3, 3, 3), 7),
        ];
        let ranked = select_top(snapshot, 3).unwrap();
        assert_eq!(
            ranked,
            vec![
                RankedEntry { color: ColorKey::new(2, 2, 2), count: 9 },
                RankedEntry { color: ColorKey::new(3, 3, 3), count: 7 },
                RankedEntry { color: ColorKey::new(1, 1, 1), count: 5 },
            ]
        );
    }

    #[test]
    fn test_equal_counts_break_ties_by_ascending_color() {
        let snapshot = vec![
            (ColorKey::new(255, 255, 255), 4),
            (ColorKey::new(0, 0, 0), 4),
        ];
        let ranked = select_top(snapshot, 1).unwrap();
        assert_eq!(ranked[0].color, ColorKey::new(0, 0, 0));

        // Same input in the opposite order picks the same winner
        let snapshot = vec![
            (ColorKey::new(0, 0, 0), 4),
            (ColorKey::new(255, 255, 255), 4),
        ];
        let ranked = select_top(snapshot, 1).unwrap();
        assert_eq!(ranked[0].color, ColorKey::new(0, 0, 0));
    }

    #[test]
    fn test_too_few_distinct_colors_is_an_error() {
        let snapshot = vec![(ColorKey::new(0, 0, 0), 100)];
        let err = select_top(snapshot, DOMINANT_COLORS).unwrap_err();
        match err {
            PaletteError::InsufficientDistinctColors { found, required } => {
                assert_eq!(found, 1);
                assert_eq!(required, 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(select_top(Vec::new(), DOMINANT_COLORS).is_err());
    }

    #[test]
    fn test_exactly_k_distinct_colors_succeeds() {
        let snapshot = vec![
            (ColorKey::new(255, 0, 0), 2),
            (ColorKey::new(0, 0, 255), 1),
            (ColorKey::new(0, 255, 0), 1),
        ];
        let ranked = select_top(snapshot, 3).unwrap();
        assert_eq!(ranked[0].color, ColorKey::new(255, 0, 0));
        assert_eq!(ranked[0].count, 2);
        // Ascending tie-break between green and blue at count 1
        assert_eq!(ranked[1].color, ColorKey::new(0, 255, 0));
        assert_eq!(ranked[2].color, ColorKey::new(0, 0, 255));
    }
}
