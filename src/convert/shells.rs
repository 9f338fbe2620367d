//! Row filters over shell tables bound for TARDIS.

use crate::io::tardis::ShellTable;

/// Number of shells (the length of the first column).
pub fn len(table: &ShellTable) -> usize {
    table.first().map_or(0, |(_, values)| values.len())
}

/// Keeps the rows where `keep` is true.
pub fn retain(table: &mut ShellTable, keep: &[bool]) {
    for values in table.values_mut() {
        let mut flags = keep.iter();
        values.retain(|_| flags.next().copied().unwrap_or(false));
    }
}

/// Keeps the rows whose `column` satisfies `predicate`; a missing column
/// keeps every row.
pub fn retain_by(table: &mut ShellTable, column: &str, predicate: impl Fn(f64) -> bool) {
    let Some(values) = table.get(column) else {
        return;
    };
    let keep: Vec<bool> = values.iter().map(|&v| predicate(v)).collect();
    retain(table, &keep);
}

/// One pass of neighbour removal: keeps the rows whose `column` exceeds the
/// previous row's, plus the first row when it lies below the first kept one.
///
/// When no row increases, only the first row survives.
pub fn delete_non_increasing_neighbour(table: &mut ShellTable, column: &str) {
    let Some(values) = table.get(column) else {
        return;
    };
    let mut keep: Vec<bool> = std::iter::once(false)
        .chain(values.windows(2).map(|w| w[1] - w[0] > 0.0))
        .collect();
    match keep.iter().position(|&k| k) {
        Some(first_kept) if values[0] < values[first_kept] => keep[0] = true,
        Some(_) => {}
        None => {
            if let Some(first) = keep.first_mut() {
                *first = true;
            }
        }
    }
    retain(table, &keep);
}

/// Repeats [`delete_non_increasing_neighbour`] until `column` is strictly
/// increasing.
pub fn remove_non_increasing(table: &mut ShellTable, column: &str) {
    while table
        .get(column)
        .is_some_and(|values| values.windows(2).any(|w| w[1] - w[0] <= 0.0))
    {
        delete_non_increasing_neighbour(table, column);
    }
}

/// Drops every column whose values are all zero.
pub fn drop_zero_columns(table: &mut ShellTable) {
    table.retain(|_, values| values.iter().any(|&v| v != 0.0));
}

/// Averages consecutive blocks of `gap` rows (the last block may be shorter).
pub fn group_mean(table: &ShellTable, gap: usize) -> ShellTable {
    let gap = gap.max(1);
    table
        .iter()
        .map(|(name, values)| {
            let means = values
                .chunks(gap)
                .map(|chunk| chunk.iter().sum::<f64>() / chunk.len() as f64)
                .collect();
            (name.clone(), means)
        })
        .collect()
}

/// Block size that leaves roughly `target` shells.
pub fn gap_for(rows: usize, target: usize) -> usize {
    if target == 0 {
        return 1;
    }
    (rows / target).max(1)
}

/// Keeps every `step`-th row starting from the first.
pub fn stride(table: &mut ShellTable, step: usize) {
    let step = step.max(1);
    let keep: Vec<bool> = (0..len(table)).map(|i| i % step == 0).collect();
    retain(table, &keep);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(velocity: &[f64]) -> ShellTable {
        let mut table = ShellTable::new();
        table.insert("velocity".into(), velocity.to_vec());
        table.insert(
            "index".into(),
            (0..velocity.len()).map(|i| i as f64).collect(),
        );
        table
    }

    #[test]
    fn retain_by_filters_every_column() {
        let mut t = table(&[1.0, -2.0, 3.0]);
        retain_by(&mut t, "velocity", |v| v > 0.0);
        assert_eq!(t["velocity"], vec![1.0, 3.0]);
        assert_eq!(t["index"], vec![0.0, 2.0]);
        retain_by(&mut t, "tau", |_| false);
        assert_eq!(len(&t), 2);
    }

    #[test]
    fn neighbour_pass_keeps_increasing_rows() {
        let mut t = table(&[1.0, 3.0, 2.0, 4.0]);
        delete_non_increasing_neighbour(&mut t, "velocity");
        assert_eq!(t["velocity"], vec![1.0, 3.0, 4.0]);
    }

    #[test]
    fn first_row_is_dropped_when_above_the_next_kept() {
        let mut t = table(&[5.0, 1.0, 2.0]);
        delete_non_increasing_neighbour(&mut t, "velocity");
        assert_eq!(t["velocity"], vec![2.0]);
    }

    #[test]
    fn flat_profile_collapses_to_its_first_row() {
        let mut t = table(&[2.0, 2.0, 1.0]);
        remove_non_increasing(&mut t, "velocity");
        assert_eq!(t["velocity"], vec![2.0]);
    }

    #[test]
    fn repeated_passes_reach_a_strictly_increasing_profile() {
        let mut t = table(&[1.0, 4.0, 3.0, 2.0, 5.0, 6.0]);
        remove_non_increasing(&mut t, "velocity");
        assert_eq!(t["velocity"], vec![1.0, 4.0, 5.0, 6.0]);
        assert_eq!(t["index"], vec![0.0, 1.0, 4.0, 5.0]);
    }

    #[test]
    fn zero_columns_are_dropped() {
        let mut t = table(&[1.0, 2.0]);
        t.insert("Ni56".into(), vec![0.0, 0.0]);
        t.insert("Fe56".into(), vec![0.0, 1e-30]);
        drop_zero_columns(&mut t);
        assert!(!t.contains_key("Ni56"));
        assert!(t.contains_key("Fe56"));
    }

    #[test]
    fn group_mean_averages_blocks() {
        let t = table(&[1.0, 3.0, 5.0, 7.0, 9.0]);
        let means = group_mean(&t, 2);
        assert_eq!(means["velocity"], vec![2.0, 6.0, 9.0]);
        assert_eq!(gap_for(100, 45), 2);
        assert_eq!(gap_for(30, 45), 1);
    }

    #[test]
    fn stride_keeps_every_nth_row() {
        let mut t = table(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        stride(&mut t, 2);
        assert_eq!(t["velocity"], vec![1.0, 3.0, 5.0]);
    }
}
