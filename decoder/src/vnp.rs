//! Variable-node processor: combines the channel intrinsic for a variable
//! node with its incoming `Mcv` messages to produce a new, truncated `Mvc`
//! for each incident edge.

use crate::code::CodeParams;
use crate::intrinsic::AppStore;
use crate::message::{GfList, Mcv};

/// The direct, edge-centric formula of §4.2: for variable node `n` and each
/// incident edge `e`, sum the intrinsic with every *other* incident edge's
/// densified `Mcv`, then keep the `nm` smallest entries.
///
/// This is algebraically the same quantity the horizontal scheduler computes
/// via `APP[n] - densify(Mcv[e])` once `APP[n]` equals the intrinsic plus the
/// sum of all incident `Mcv`s (true at every point within a sweep, since APP
/// is updated alongside Mcv). Kept as a standalone entry point because the
/// original edge-centric decoder computes it this way directly, without
/// maintaining a running APP.
pub fn update_variable_node(
    n: usize,
    code: &CodeParams,
    intrinsic_row: &[f32],
    mcv_of: impl Fn(usize) -> Mcv,
    q: usize,
    nm: usize,
    offset: f32,
) -> Vec<GfList> {
    let edges = &code.n_to_b()[n];
    let densified: Vec<Vec<f32>> = edges
        .iter()
        .map(|&e| mcv_of(e).to_dense(q, offset))
        .collect();

    edges
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let mut tmp = intrinsic_row.to_vec();
            for (j, other) in densified.iter().enumerate() {
                if j == i {
                    continue;
                }
                for g in 0..q {
                    tmp[g] += other[g];
                }
            }
            GfList::truncate_dense(&tmp, nm)
        })
        .collect()
}

/// Derives `Mvc[e]` directly from the running `APP` and the edge's current
/// `Mcv`, as `Mvc = APP - Mcv` (dense), then truncates. This is the formula
/// the horizontal scheduler uses in its main sweep (§4.5); it is equivalent
/// to [`update_variable_node`] while avoiding re-summing every incident edge
/// on each visit.
pub fn mvc_from_app(app: &AppStore, app_var: usize, mcv_dense: &[f32], nm: usize) -> GfList {
    let row = app.row(app_var);
    let tmp: Vec<f32> = row.iter().zip(mcv_dense).map(|(a, c)| a - c).collect();
    GfList::truncate_dense(&tmp, nm)
}

/// Two-column (`dv = 2`) specialization: a toggle flag selects which of the
/// two incident edges receives the update on a given visit, alternating each
/// time the variable node is visited within a frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToggleFlag(bool);

impl ToggleFlag {
    pub fn current(&self) -> usize {
        self.0 as usize
    }

    pub fn advance(&mut self) {
        self.0 = !self.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::CodeParams;
    use crate::message::DenseMcv;

    #[test]
    fn toggle_flag_alternates() {
        let mut flag = ToggleFlag::default();
        assert_eq!(flag.current(), 0);
        flag.advance();
        assert_eq!(flag.current(), 1);
        flag.advance();
        assert_eq!(flag.current(), 0);
    }

    #[test]
    fn update_variable_node_sums_all_other_edges() {
        // n=0 has two incident edges (dv=2); intrinsic favors symbol 0.
        let code = CodeParams::new(2, 4, vec![vec![0, 1], vec![0, 1]], vec![vec![1, 1], vec![1, 1]])
            .unwrap();
        let intrinsic_row = vec![0.0, 5.0, 5.0, 5.0];
        // n_to_b[0] = [0, 2] given row_degree = 2 over two rows of [var0, var1].
        let mut mcv_values = vec![Mcv::Dense(DenseMcv { llr: vec![0.0, 0.0, 0.0, 0.0] }); 4];
        mcv_values[0] = Mcv::Dense(DenseMcv { llr: vec![0.0, 1.0, 2.0, 3.0] });
        let out = update_variable_node(
            0,
            &code,
            &intrinsic_row,
            |e| mcv_values[e].clone(),
            4,
            4,
            0.0,
        );
        // edge 0's Mvc excludes edge 0's own Mcv, so only intrinsic + edge 1's Mcv (all zero).
        assert_eq!(out[0].gf[0], 0);
        assert_eq!(out[0].llr[0], 0.0);
        // edge 1's Mvc includes edge 0's Mcv contribution.
        assert_eq!(out[1].gf[0], 0);
    }
}
