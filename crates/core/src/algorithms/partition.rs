use crate::{Result, SortOps};

/// Quick sort with a Lomuto partition around the last element of each range.
pub(super) fn quick(ops: &mut SortOps<'_>) -> Result<()> {
    let last = ops.len() - 1;
    quick_range(ops, 0, last)
}

fn quick_range(ops: &mut SortOps<'_>, low: usize, high: usize) -> Result<()> {
    if low >= high {
        return Ok(());
    }
    let pivot = lomuto(ops, low, high)?;
    if pivot > low {
        quick_range(ops, low, pivot - 1)?;
    }
    quick_range(ops, pivot + 1, high)
}

fn lomuto(ops: &mut SortOps<'_>, low: usize, high: usize) -> Result<usize> {
    let pivot = ops.get(high);
    let mut store = low;
    for j in low..high {
        ops.probe(&[j, high])?;
        if ops.is_greater(pivot, ops.get(j)) {
            ops.swap(store, j)?;
            store += 1;
        }
    }
    ops.swap(store, high)?;
    Ok(store)
}

/// Top-down merge sort. Runs are copied out and merged back into the
/// positions they came from; ties take the left run, which keeps it stable.
pub(super) fn merge(ops: &mut SortOps<'_>) -> Result<()> {
    let last = ops.len() - 1;
    merge_range(ops, 0, last)
}

fn merge_range(ops: &mut SortOps<'_>, left: usize, right: usize) -> Result<()> {
    if left >= right {
        return Ok(());
    }
    let mid = left + (right - left) / 2;
    merge_range(ops, left, mid)?;
    merge_range(ops, mid + 1, right)?;
    merge_runs(ops, left, mid, right)
}

fn merge_runs(ops: &mut SortOps<'_>, left: usize, mid: usize, right: usize) -> Result<()> {
    let lower = ops.values()[left..=mid].to_vec();
    let upper = ops.values()[mid + 1..=right].to_vec();

    let (mut i, mut j, mut k) = (0, 0, left);
    while i < lower.len() && j < upper.len() {
        ops.probe(&[k])?;
        let value = if ops.is_greater(lower[i], upper[j]) {
            j += 1;
            upper[j - 1]
        } else {
            i += 1;
            lower[i - 1]
        };
        ops.write(k, value)?;
        k += 1;
    }

    for &value in lower[i..].iter().chain(&upper[j..]) {
        ops.write(k, value)?;
        k += 1;
    }
    Ok(())
}
