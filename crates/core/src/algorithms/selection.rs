use crate::{Result, SortOps};

/// Scans for the minimum of the unsorted suffix, then swaps it into place.
/// The scan decides inline but still counts and shows every comparison.
pub(super) fn selection(ops: &mut SortOps<'_>) -> Result<()> {
    let n = ops.len();
    for i in 0..n {
        let mut min = i;
        for j in i + 1..n {
            ops.probe(&[j, min])?;
            if ops.is_greater(ops.get(min), ops.get(j)) {
                min = j;
            }
        }
        if min != i {
            ops.swap(i, min)?;
        }
    }
    Ok(())
}

/// Builds a binary max-heap, then repeatedly moves the root behind the heap.
pub(super) fn heap(ops: &mut SortOps<'_>) -> Result<()> {
    let n = ops.len();
    for root in (0..n / 2).rev() {
        sift_down(ops, n, root)?;
    }
    for end in (1..n).rev() {
        ops.swap(0, end)?;
        sift_down(ops, end, 0)?;
    }
    Ok(())
}

fn sift_down(ops: &mut SortOps<'_>, heap_len: usize, root: usize) -> Result<()> {
    let mut largest = root;
    let left = 2 * root + 1;
    let right = left + 1;

    if left < heap_len {
        ops.probe(&[left, largest])?;
        if ops.is_greater(ops.get(left), ops.get(largest)) {
            largest = left;
        }
    }
    if right < heap_len {
        ops.probe(&[right, largest])?;
        if ops.is_greater(ops.get(right), ops.get(largest)) {
            largest = right;
        }
    }

    if largest != root {
        ops.swap(root, largest)?;
        sift_down(ops, heap_len, largest)?;
    }
    Ok(())
}
