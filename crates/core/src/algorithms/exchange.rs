use crate::{Result, SortOps};

const COMB_SHRINK: f64 = 1.3;

/// Adjacent compare and swap; each pass is one element shorter.
pub(super) fn bubble(ops: &mut SortOps<'_>) -> Result<()> {
    let n = ops.len();
    for pass in 0..n {
        for j in 0..n - pass - 1 {
            if ops.compare(j, j + 1)? {
                ops.swap(j, j + 1)?;
            }
        }
    }
    Ok(())
}

/// Bidirectional bubble sort. Stops as soon as a forward pass is clean.
pub(super) fn cocktail(ops: &mut SortOps<'_>) -> Result<()> {
    let mut start = 0;
    let mut end = ops.len();

    loop {
        let mut swapped = false;
        for i in start..end - 1 {
            if ops.compare(i, i + 1)? {
                ops.swap(i, i + 1)?;
                swapped = true;
            }
        }
        if !swapped {
            break;
        }

        swapped = false;
        end -= 1;
        for i in (start..end).rev() {
            if ops.compare(i, i + 1)? {
                ops.swap(i, i + 1)?;
                swapped = true;
            }
        }
        start += 1;

        if !swapped {
            break;
        }
    }
    Ok(())
}

/// Bubble sort over a gap that shrinks by 1.3 each pass until it reaches 1
/// and a full pass makes no swap.
pub(super) fn comb(ops: &mut SortOps<'_>) -> Result<()> {
    let n = ops.len();
    let mut gap = n;
    let mut swapped = true;

    while gap > 1 || swapped {
        gap = ((gap as f64 / COMB_SHRINK).floor() as usize).max(1);
        swapped = false;
        for i in 0..n.saturating_sub(gap) {
            if ops.compare(i, i + gap)? {
                ops.swap(i, i + gap)?;
                swapped = true;
            }
        }
    }
    Ok(())
}

/// Shuffles until sorted. Unbounded; callers confirm long runs up front.
pub(super) fn bogo(ops: &mut SortOps<'_>) -> Result<()> {
    while !in_order(ops)? {
        for i in (1..ops.len()).rev() {
            let j = ops.random_index(i);
            ops.swap(i, j)?;
        }
    }
    Ok(())
}

fn in_order(ops: &mut SortOps<'_>) -> Result<bool> {
    for i in 1..ops.len() {
        if ops.compare(i - 1, i)? {
            return Ok(false);
        }
    }
    Ok(true)
}
