use crate::{Result, SortOps};

/// Shifts larger elements right with writes, then drops the held element
/// into the hole. Elements already in place are not written back.
pub(super) fn insertion(ops: &mut SortOps<'_>) -> Result<()> {
    for i in 1..ops.len() {
        let held = ops.get(i);
        ops.count_access();

        let mut hole = i;
        while hole > 0 {
            let j = hole - 1;
            ops.probe(&[j, i])?;
            let candidate = ops.get(j);
            if !ops.is_greater(candidate, held) {
                break;
            }
            ops.write(hole, candidate)?;
            hole = j;
        }

        if hole != i {
            ops.write(hole, held)?;
        }
    }
    Ok(())
}

/// Gapped insertion sort with the gap halving each round down to 1.
pub(super) fn shell(ops: &mut SortOps<'_>) -> Result<()> {
    let n = ops.len();
    let mut gap = n / 2;

    while gap > 0 {
        for i in gap..n {
            let held = ops.get(i);
            ops.count_access();

            let mut j = i;
            while j >= gap {
                ops.probe(&[j, j - gap])?;
                let candidate = ops.get(j - gap);
                if !ops.is_greater(candidate, held) {
                    break;
                }
                ops.write(j, candidate)?;
                j -= gap;
            }

            if j != i {
                ops.write(j, held)?;
            }
        }
        gap /= 2;
    }
    Ok(())
}
