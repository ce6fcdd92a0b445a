//! Percentage-exact population partitioning
//!
//! `segregate` underlies every admin/regular, enabled/misconfigured and
//! tier-eligible split in the pipeline. It is deterministic and
//! order-preserving: bucket i takes the next `floor(n * p_i / 100)` elements
//! of the input, and whatever flooring leaves over goes to the last bucket so
//! the bucket sizes always sum to exactly n.

/// Split `population` into `percentages.len()` disjoint, order-preserving
/// buckets. Percentages must sum to at most 100; the flooring remainder is
/// appended to the last bucket.
pub fn segregate<T: Clone>(population: &[T], percentages: &[u32]) -> Vec<Vec<T>> {
    let n = population.len();
    let mut buckets: Vec<Vec<T>> = Vec::with_capacity(percentages.len());
    let mut cursor = 0usize;

    for &p in percentages {
        let size = n * p as usize / 100;
        let end = (cursor + size).min(n);
        buckets.push(population[cursor..end].to_vec());
        cursor = end;
    }

    if let Some(last) = buckets.last_mut() {
        last.extend_from_slice(&population[cursor..]);
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_sum_to_population() {
        let items: Vec<u32> = (0..37).collect();
        let buckets = segregate(&items, &[20, 30, 50]);
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].len(), 7);
        assert_eq!(buckets[1].len(), 11);
        assert_eq!(buckets[2].len(), 19);
        assert_eq!(buckets.iter().map(Vec::len).sum::<usize>(), 37);
    }

    #[test]
    fn test_order_preserving_and_disjoint() {
        let items: Vec<u32> = (0..100).collect();
        let buckets = segregate(&items, &[10, 90]);

        let mut rebuilt: Vec<u32> = Vec::new();
        for bucket in &buckets {
            rebuilt.extend_from_slice(bucket);
        }
        assert_eq!(rebuilt, items);
    }

    #[test]
    fn test_remainder_goes_to_last_bucket() {
        let items: Vec<u32> = (0..10).collect();
        // 33% of 10 floors to 3; the last bucket absorbs the extra element
        let buckets = segregate(&items, &[33, 33, 33]);
        assert_eq!(buckets[0].len(), 3);
        assert_eq!(buckets[1].len(), 3);
        assert_eq!(buckets[2].len(), 4);
    }

    #[test]
    fn test_percentages_below_100_still_cover_population() {
        let items: Vec<u32> = (0..20).collect();
        let buckets = segregate(&items, &[25, 25]);
        assert_eq!(buckets[0].len(), 5);
        assert_eq!(buckets[1].len(), 15);
    }

    #[test]
    fn test_empty_population() {
        let items: Vec<u32> = Vec::new();
        let buckets = segregate(&items, &[50, 50]);
        assert_eq!(buckets.len(), 2);
        assert!(buckets.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_single_bucket_takes_everything() {
        let items: Vec<u32> = (0..9).collect();
        let buckets = segregate(&items, &[100]);
        assert_eq!(buckets[0].len(), 9);
    }

    #[test]
    fn test_population_smaller_than_bucket_count() {
        let items = vec![1u32];
        let buckets = segregate(&items, &[40, 40, 20]);
        assert_eq!(buckets.iter().map(Vec::len).sum::<usize>(), 1);
    }
}
