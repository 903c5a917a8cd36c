//! EMS forward-backward check-node processing with the L-Bubble-Check
//! elementary step (§4.3).

use crate::gf::{GfTables, GF_NONE, LLR_POS_INF};
use crate::message::GfList;
use crate::rotation::{rotate_in, rotate_out};

use super::CheckNodeProcessor;

/// Candidate position in the comparator register: which row of `U` and
/// column of `V` it currently points at.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    row: usize,
    col: usize,
}

impl Candidate {
    fn value(&self, u: &GfList, v: &GfList, tables: &GfTables) -> (f32, u16) {
        if self.row >= u.nm() || self.col >= v.nm() {
            return (LLR_POS_INF, GF_NONE);
        }
        let ug = u.gf[self.row];
        let vg = v.gf[self.col];
        if ug == GF_NONE || vg == GF_NONE {
            return (LLR_POS_INF, GF_NONE);
        }
        (u.llr[self.row] + v.llr[self.col], tables.add(ug, vg))
    }
}

/// Approximates the GF(q)-marginalized sum of two truncated sorted list
/// messages `U`, `V`, bounding work by `nb_oper` comparator advances.
pub fn elementary_step(tables: &GfTables, u: &GfList, v: &GfList, nb_oper: usize) -> GfList {
    let nm = u.nm().max(v.nm());
    let mut out_llr = Vec::with_capacity(nm);
    let mut out_gf = Vec::with_capacity(nm);
    let mut seen = std::collections::HashSet::new();

    // Bubble of four candidates: (0,0), (1,0), (2,0), (0,1).
    let mut candidates = [
        Candidate { row: 0, col: 0 },
        Candidate { row: 1, col: 0 },
        Candidate { row: 2, col: 0 },
        Candidate { row: 0, col: 1 },
    ];

    for _ in 0..nb_oper {
        if out_gf.len() >= nm {
            break;
        }
        // Pick the candidate with minimum LLR.
        let mut best_idx = 0usize;
        let mut best_val = candidates[0].value(u, v, tables);
        for (i, c) in candidates.iter().enumerate().skip(1) {
            let val = c.value(u, v, tables);
            if val.0 < best_val.0 {
                best_val = val;
                best_idx = i;
            }
        }
        let (llr, gf) = best_val;
        if gf == GF_NONE {
            // Both operands exhausted at every live candidate: terminate early.
            break;
        }
        if seen.insert(gf) {
            out_llr.push(llr);
            out_gf.push(gf);
        }
        if out_gf.len() >= nm {
            break;
        }
        // Advance the picked candidate: bit (p>>1) of its position selects
        // +1 row vs +1 col. Positions 0 and 1 (bit 0) move right; positions
        // 2 and 3 (bit 1) move down.
        let picked = candidates[best_idx];
        let advanced = if best_idx >> 1 == 0 {
            Candidate {
                row: picked.row,
                col: picked.col + 1,
            }
        } else {
            Candidate {
                row: picked.row + 1,
                col: picked.col,
            }
        };
        if advanced.row >= u.nm() && advanced.col >= v.nm() {
            break;
        }
        candidates[best_idx] = advanced;
    }

    while out_llr.len() < nm {
        out_llr.push(crate::gf::LLR_SAT);
        out_gf.push(GF_NONE);
    }

    let mut result = GfList {
        llr: out_llr,
        gf: out_gf,
    };
    result.normalize();
    result
}

/// Forward-backward composition over a full row of `dc` incoming lists
/// (§4.3 steps 2-4), producing `dc` outgoing lists, all still in
/// coefficient-free (rotated-in) form.
fn forward_backward(tables: &GfTables, rotated: &[GfList], nb_oper: usize) -> Vec<GfList> {
    let dc = rotated.len();
    if dc == 1 {
        return vec![rotated[0].clone()];
    }
    if dc == 2 {
        // Single elementary step each way: swap operand order.
        return vec![rotated[1].clone(), rotated[0].clone()];
    }

    let mut forward = Vec::with_capacity(dc - 1);
    forward.push(rotated[0].clone());
    for i in 1..dc - 1 {
        let next = elementary_step(tables, &forward[i - 1], &rotated[i], nb_oper);
        forward.push(next);
    }

    let mut backward = vec![GfList::empty(0); dc];
    backward[dc - 1] = rotated[dc - 1].clone();
    for i in (1..dc - 1).rev() {
        backward[i] = elementary_step(tables, &backward[i + 1], &rotated[i], nb_oper);
    }

    let mut out = Vec::with_capacity(dc);
    out.push(backward[1].clone());
    for i in 1..dc - 1 {
        out.push(elementary_step(tables, &forward[i - 1], &backward[i + 1], nb_oper));
    }
    out.push(forward[dc - 2].clone());
    out
}

/// The L-Bubble-Check forward-backward check-node processor.
pub struct BubbleForwardBackward<'a> {
    pub tables: &'a GfTables,
    pub nb_oper: usize,
}

impl<'a> CheckNodeProcessor for BubbleForwardBackward<'a> {
    type Output = GfList;

    fn process_row(&mut self, rotated_mvc: &[GfList]) -> Vec<GfList> {
        forward_backward(self.tables, rotated_mvc, self.nb_oper)
    }
}

/// Runs a full row through rotation-in, forward-backward composition, and
/// rotation-out, as described by §4.3 end to end.
pub fn process_row_with_rotation(
    tables: &GfTables,
    mvc: &[GfList],
    mat_value: &[u16],
    nb_oper: usize,
) -> Vec<GfList> {
    let rotated_in = rotate_in(tables, mvc, mat_value);
    let mcv_rotated = forward_backward(tables, &rotated_in, nb_oper);
    rotate_out(tables, &mcv_rotated, mat_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s4_bubble_determinism() {
        let tables = GfTables::build(64).unwrap();
        let u = GfList {
            llr: vec![0.0, 1.0, 3.0, 7.0],
            gf: vec![3, 5, 1, 7],
        };
        let v = GfList {
            llr: vec![0.0, 2.0, 4.0, 6.0],
            gf: vec![2, 6, 4, 0],
        };
        let s = elementary_step(&tables, &u, &v, 16);
        assert_eq!(s.llr[0], 0.0);
        assert_eq!(s.gf[0], tables.add(3, 2));
        assert_eq!(s.gf[0], 1);
        for w in s.llr.windows(2) {
            assert!(w[0] <= w[1]);
        }
        let occupied: Vec<u16> = s.gf.iter().copied().filter(|&g| g != GF_NONE).collect();
        let mut deduped = occupied.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(occupied.len(), deduped.len());
    }

    #[test]
    fn elementary_step_handles_single_entry_lists() {
        let tables = GfTables::build(64).unwrap();
        let u = GfList {
            llr: vec![0.0],
            gf: vec![2],
        };
        let v = GfList {
            llr: vec![0.0],
            gf: vec![3],
        };
        let s = elementary_step(&tables, &u, &v, 4);
        assert_eq!(s.gf[0], tables.add(2, 3));
        assert_eq!(s.llr[0], 0.0);
    }

    #[test]
    fn two_edge_row_swaps_operands() {
        let tables = GfTables::build(64).unwrap();
        let a = GfList {
            llr: vec![0.0, 1.0],
            gf: vec![1, 2],
        };
        let b = GfList {
            llr: vec![0.0, 3.0],
            gf: vec![4, 5],
        };
        let out = forward_backward(&tables, &[a.clone(), b.clone()], 8);
        assert_eq!(out[0], b);
        assert_eq!(out[1], a);
    }

    #[test]
    fn commutativity_up_to_reordering() {
        // Law 5: permuting input order and correspondingly permuting the
        // output yields the same Mcv set up to ties.
        let tables = GfTables::build(64).unwrap();
        let a = GfList { llr: vec![0.0, 2.0], gf: vec![1, 2] };
        let b = GfList { llr: vec![0.0, 1.0], gf: vec![3, 4] };
        let c = GfList { llr: vec![0.0, 3.0], gf: vec![5, 6] };
        let forward_order = forward_backward(&tables, &[a.clone(), b.clone(), c.clone()], 16);
        let reordered = forward_backward(&tables, &[c.clone(), b.clone(), a.clone()], 16);
        // The set of (min-llr, min-gf) pairs of the outgoing messages for a
        // given physical edge should match regardless of row traversal order;
        // check the edge fed by `a` produces consistent output in both calls.
        assert_eq!(forward_order[0].llr[0], reordered[2].llr[0]);
    }
}
