//! Truncated, sorted GF(q) message lists (`Mvc`/`Mcv`) and the edge-indexed
//! store that holds one of each per edge of the Tanner graph.

use crate::gf::{GF_NONE, LLR_SAT};

/// A truncated sorted list-form message: `nm` (cost, symbol) pairs with
/// `llr[0] == 0`, non-decreasing costs, and pairwise distinct symbols among
/// occupied slots.
#[derive(Debug, Clone, PartialEq)]
pub struct GfList {
    pub llr: Vec<f32>,
    pub gf: Vec<u16>,
}

impl GfList {
    pub fn empty(nm: usize) -> Self {
        GfList {
            llr: vec![LLR_SAT; nm],
            gf: vec![GF_NONE; nm],
        }
    }

    pub fn nm(&self) -> usize {
        self.llr.len()
    }

    pub fn len_occupied(&self) -> usize {
        self.gf.iter().filter(|&&g| g != GF_NONE).count()
    }

    /// Checks the sort invariant: `llr[0] == 0`, non-decreasing, distinct
    /// occupied symbols.
    pub fn check_invariants(&self) -> bool {
        if self.llr.is_empty() {
            return true;
        }
        if self.gf[0] != GF_NONE && self.llr[0] != 0.0 {
            return false;
        }
        for w in self.llr.windows(2) {
            if w[0] > w[1] {
                return false;
            }
        }
        let mut seen = std::collections::HashSet::new();
        for &g in &self.gf {
            if g == GF_NONE {
                continue;
            }
            if !seen.insert(g) {
                return false;
            }
        }
        true
    }

    /// Expands this list to a dense length-`q` vector, filling absent symbols
    /// with `LLR_SAT + offset`.
    pub fn densify(&self, q: usize, offset: f32) -> Vec<f32> {
        let mut dense = vec![LLR_SAT + offset; q];
        for (i, &g) in self.gf.iter().enumerate() {
            if g != GF_NONE {
                dense[g as usize] = self.llr[i];
            }
        }
        dense
    }

    /// Extracts the `nm` smallest entries of a dense length-`q` vector into a
    /// normalized (zero-shifted) sorted list.
    pub fn truncate_dense(dense: &[f32], nm: usize) -> Self {
        let mut idx: Vec<u16> = (0..dense.len() as u16).collect();
        idx.sort_by(|&a, &b| {
            dense[a as usize]
                .partial_cmp(&dense[b as usize])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let take = nm.min(idx.len());
        let min = if take > 0 { dense[idx[0] as usize] } else { 0.0 };
        let mut llr = Vec::with_capacity(nm);
        let mut gf = Vec::with_capacity(nm);
        for &i in idx.iter().take(take) {
            llr.push(dense[i as usize] - min);
            gf.push(i);
        }
        while llr.len() < nm {
            llr.push(LLR_SAT);
            gf.push(GF_NONE);
        }
        GfList { llr, gf }
    }

    /// Re-derives this list so its minimum entry is exactly zero.
    pub fn normalize(&mut self) {
        let min = self
            .llr
            .iter()
            .copied()
            .fold(f32::INFINITY, f32::min);
        if min.is_finite() {
            for v in self.llr.iter_mut() {
                *v -= min;
            }
        }
    }
}

/// Check-to-variable message in dense form, used by the syndrome CNP variant.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMcv {
    pub llr: Vec<f32>,
}

impl DenseMcv {
    pub fn zero(q: usize) -> Self {
        DenseMcv { llr: vec![0.0; q] }
    }

    pub fn to_list(&self, nm: usize) -> GfList {
        GfList::truncate_dense(&self.llr, nm)
    }
}

/// The two representations an outgoing `Mcv` can take, matching §3: a
/// truncated list in the bubble-check variant, a dense length-q vector in the
/// syndrome variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Mcv {
    List(GfList),
    Dense(DenseMcv),
}

impl Mcv {
    pub fn to_dense(&self, q: usize, offset: f32) -> Vec<f32> {
        match self {
            Mcv::List(list) => list.densify(q, offset),
            Mcv::Dense(dense) => dense.llr.clone(),
        }
    }
}

/// Per-edge storage of `Mvc` (always list form) and `Mcv` (list or dense,
/// depending on the configured CNP variant), addressed by a single global
/// edge label shared by both the variable-side (`n_to_b`) and check-side
/// (`row_edge_start`) views of the Tanner graph.
#[derive(Debug, Clone)]
pub struct EdgeStore {
    mvc: Vec<GfList>,
    mcv: Vec<Mcv>,
    nm: usize,
}

impl EdgeStore {
    pub fn new(num_edges: usize, nm: usize, q: usize, dense_mcv: bool) -> Self {
        let mvc = vec![GfList::empty(nm); num_edges];
        let mcv = if dense_mcv {
            vec![Mcv::Dense(DenseMcv::zero(q)); num_edges]
        } else {
            vec![Mcv::List(GfList::empty(nm)); num_edges]
        };
        EdgeStore { mvc, mcv, nm }
    }

    pub fn nm(&self) -> usize {
        self.nm
    }

    pub fn mvc(&self, edge: usize) -> &GfList {
        &self.mvc[edge]
    }

    pub fn set_mvc(&mut self, edge: usize, list: GfList) {
        self.mvc[edge] = list;
    }

    pub fn mcv(&self, edge: usize) -> &Mcv {
        &self.mcv[edge]
    }

    pub fn set_mcv(&mut self, edge: usize, mcv: Mcv) {
        self.mcv[edge] = mcv;
    }

    /// Resets all `Mcv` entries to zero, as at the start of each frame (§4.5
    /// step 1).
    pub fn reset_mcv(&mut self, q: usize, dense: bool) {
        for m in self.mcv.iter_mut() {
            *m = if dense {
                Mcv::Dense(DenseMcv::zero(q))
            } else {
                Mcv::List(GfList::empty(self.nm))
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_satisfies_invariants_vacuously() {
        let list = GfList::empty(4);
        assert_eq!(list.len_occupied(), 0);
    }

    #[test]
    fn truncate_dense_picks_nm_smallest_and_zero_shifts() {
        let dense = vec![5.0, 2.0, 0.0, 9.0, 3.0];
        let list = GfList::truncate_dense(&dense, 3);
        assert_eq!(list.gf, vec![2, 1, 4]);
        assert_eq!(list.llr, vec![0.0, 2.0, 3.0]);
        assert!(list.check_invariants());
    }

    #[test]
    fn densify_fills_absent_with_saturation_plus_offset() {
        let list = GfList {
            llr: vec![0.0, 1.0],
            gf: vec![3, 5],
        };
        let dense = list.densify(8, 0.5);
        assert_eq!(dense[3], 0.0);
        assert_eq!(dense[5], 1.0);
        assert_eq!(dense[0], LLR_SAT + 0.5);
    }

    #[test]
    fn normalize_shifts_minimum_to_zero() {
        let mut list = GfList {
            llr: vec![2.0, 3.0, 5.0],
            gf: vec![0, 1, 2],
        };
        list.normalize();
        assert_eq!(list.llr[0], 0.0);
    }

    #[test]
    fn edge_store_round_trips_list_and_dense() {
        let mut store = EdgeStore::new(2, 4, 64, false);
        let list = GfList::truncate_dense(&[1.0, 0.0, 3.0], 4);
        store.set_mvc(0, list.clone());
        assert_eq!(store.mvc(0), &list);
    }
}
