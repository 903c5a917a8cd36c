//! Per-variable-node channel LLRs (`intrinsic`) and running soft output
//! (`APP`), both dense length-q vectors.

/// Channel LLRs for every variable node, `intrinsic[n][g] = -log p(y|x=g) - K`.
/// Produced externally by a `ChannelModel` and consumed read-only by the
/// scheduler for the whole frame.
#[derive(Debug, Clone)]
pub struct IntrinsicStore {
    q: usize,
    values: Vec<f32>,
}

impl IntrinsicStore {
    pub fn from_rows(q: usize, rows: Vec<Vec<f32>>) -> Self {
        let mut values = Vec::with_capacity(rows.len() * q);
        for row in rows {
            debug_assert_eq!(row.len(), q);
            values.extend(row);
        }
        IntrinsicStore { q, values }
    }

    pub fn row(&self, n: usize) -> &[f32] {
        &self.values[n * self.q..(n + 1) * self.q]
    }

    pub fn n(&self) -> usize {
        self.values.len() / self.q.max(1)
    }

    pub fn q(&self) -> usize {
        self.q
    }
}

/// Running per-variable-node soft output, seeded from `intrinsic` and updated
/// in place as check-node updates are folded in (§4.5).
#[derive(Debug, Clone)]
pub struct AppStore {
    q: usize,
    values: Vec<f32>,
}

impl AppStore {
    pub fn seed_from_intrinsic(intrinsic: &IntrinsicStore) -> Self {
        AppStore {
            q: intrinsic.q(),
            values: intrinsic.values.clone(),
        }
    }

    pub fn row(&self, n: usize) -> &[f32] {
        &self.values[n * self.q..(n + 1) * self.q]
    }

    pub fn row_mut(&mut self, n: usize) -> &mut [f32] {
        &mut self.values[n * self.q..(n + 1) * self.q]
    }

    pub fn q(&self) -> usize {
        self.q
    }

    /// `decide[n] = argmin_g APP[n][g]`.
    pub fn hard_decision(&self) -> Vec<u16> {
        let n = self.values.len() / self.q.max(1);
        (0..n)
            .map(|i| {
                let row = self.row(i);
                let mut best = 0usize;
                for g in 1..row.len() {
                    if row[g] < row[best] {
                        best = g;
                    }
                }
                best as u16
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_decision_picks_argmin_per_row() {
        let intrinsic = IntrinsicStore::from_rows(4, vec![vec![3.0, 0.0, 5.0, 1.0], vec![0.0, 1.0, 2.0, 3.0]]);
        let app = AppStore::seed_from_intrinsic(&intrinsic);
        assert_eq!(app.hard_decision(), vec![1, 0]);
    }

    #[test]
    fn row_accessors_index_contiguous_blocks() {
        let intrinsic = IntrinsicStore::from_rows(2, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(intrinsic.row(0), &[1.0, 2.0]);
        assert_eq!(intrinsic.row(1), &[3.0, 4.0]);
    }
}
