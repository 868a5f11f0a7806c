use std::collections::BTreeMap;

/// Smallest max-minus-min category spread any table of `table_size` can reach.
///
/// Each category is allotted its proportional share `count * table_size / total`,
/// which has to be rounded to whole people. The bound is the widest ceiling minus
/// the narrowest floor across categories, so it only depends on the roster and the
/// table size, never on who actually sits at the table.
pub fn fairness_bound(counts: &BTreeMap<String, usize>, total: usize, table_size: usize) -> usize {
    if counts.len() <= 1 || total == 0 {
        return 0;
    }

    let mut max_ceiling = 0;
    let mut min_floor = usize::MAX;

    for &count in counts.values() {
        let scaled = count * table_size;
        let floor = scaled / total;
        let ceiling = scaled.div_ceil(total);

        max_ceiling = max_ceiling.max(ceiling);
        min_floor = min_floor.min(floor);
    }

    max_ceiling.saturating_sub(min_floor)
}

/// Actual spread at one table, measured over the roster-wide category set.
///
/// Categories the roster has but the table lacks count as zero; values the
/// roster never saw are ignored.
pub(crate) fn actual_deviation<'a, I>(roster_counts: &BTreeMap<String, usize>, values: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    if roster_counts.is_empty() {
        return 0;
    }

    let mut table_counts: BTreeMap<&str, usize> = roster_counts
        .keys()
        .map(|category| (category.as_str(), 0))
        .collect();

    for value in values {
        if let Some(count) = table_counts.get_mut(value) {
            *count += 1;
        }
    }

    let max = table_counts.values().copied().max().unwrap_or(0);
    let min = table_counts.values().copied().min().unwrap_or(0);
    max - min
}
