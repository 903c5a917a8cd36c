//! Syndrome-based check-node processing: configuration-table enumeration
//! followed by per-edge decorrelation (§4.4).

use crate::gf::{GfTables, GF_NONE, LLR_SAT};
use crate::message::{DenseMcv, GfList};

use super::CheckNodeProcessor;

/// How the saturation value filling unreached GF symbols is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaturationPolicy {
    /// The `(nm + 3*dc)`-th smallest decorrelated LLR.
    Selection,
    /// A two-level median-of-medians estimate over the per-symbol minimum
    /// array (group size 8 for GF(64), 16 for GF(256)).
    MedianOfMedians,
}

/// Configuration for the syndrome CNP: deviation budgets for the
/// configuration table plus the optional policies of §4.4.
#[derive(Debug, Clone)]
pub struct SyndromeCnpConfig {
    pub d1: usize,
    pub d2: usize,
    pub d3: usize,
    pub d4: Option<usize>,
    pub saturation: SaturationPolicy,
    pub bayes: bool,
    pub presort: bool,
    pub presort_border: usize,
    pub offset: f32,
}

impl Default for SyndromeCnpConfig {
    fn default() -> Self {
        SyndromeCnpConfig {
            d1: 4,
            d2: 4,
            d3: 4,
            d4: None,
            saturation: SaturationPolicy::Selection,
            bayes: false,
            presort: false,
            presort_border: 0,
            offset: 0.0,
        }
    }
}

/// A precomputed configuration table: `rows[t][j]` is the deviation index
/// (into edge `j`'s sorted `Mvc` list) used by configuration `t`.
#[derive(Debug, Clone)]
pub struct ConfigTable {
    pub rows: Vec<Vec<u8>>,
    pub dc: usize,
}

impl ConfigTable {
    /// Builds the table for a row of degree `dc`, bounding deviation indices
    /// by `max_dev = nm - 1` and gating row membership by the `(d1, d2, d3,
    /// d4)` budgets of §4.4.
    pub fn build(dc: usize, nm: usize, cfg: &SyndromeCnpConfig) -> Self {
        let max_dev = nm.saturating_sub(1);
        let mut rows = vec![vec![0u8; dc]];

        for p in 0..dc {
            for k in 1..=cfg.d1.min(max_dev) {
                let mut row = vec![0u8; dc];
                row[p] = k as u8;
                rows.push(row);
            }
        }

        for p in 0..dc {
            for q in (p + 1)..dc {
                for k in 1..=max_dev {
                    for l in 1..=max_dev {
                        if k + l < cfg.d2 {
                            let mut row = vec![0u8; dc];
                            row[p] = k as u8;
                            row[q] = l as u8;
                            rows.push(row);
                        }
                    }
                }
            }
        }

        for p in 0..dc {
            for q in (p + 1)..dc {
                for r in (q + 1)..dc {
                    for k in 1..=max_dev {
                        for l in 1..=max_dev {
                            for m in 1..=max_dev {
                                if k + l + m < cfg.d3 {
                                    let mut row = vec![0u8; dc];
                                    row[p] = k as u8;
                                    row[q] = l as u8;
                                    row[r] = m as u8;
                                    rows.push(row);
                                }
                            }
                        }
                    }
                }
            }
        }

        if let Some(d4) = cfg.d4 {
            for p in 0..dc {
                for q in (p + 1)..dc {
                    for r in (q + 1)..dc {
                        for s in (r + 1)..dc {
                            for k in 1..=max_dev {
                                for l in 1..=max_dev {
                                    for m in 1..=max_dev {
                                        for n in 1..=max_dev {
                                            if k + l + m + n < d4 {
                                                let mut row = vec![0u8; dc];
                                                row[p] = k as u8;
                                                row[q] = l as u8;
                                                row[r] = m as u8;
                                                row[s] = n as u8;
                                                rows.push(row);
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }

        ConfigTable { rows, dc }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One enumerated syndrome: its total LLR cost and its resulting GF symbol.
#[derive(Debug, Clone, Copy)]
struct Syndrome {
    llr: f32,
    gf: u16,
}

fn enumerate_syndromes(tables: &GfTables, rotated_mvc: &[GfList], table: &ConfigTable) -> Vec<Option<Syndrome>> {
    table
        .rows
        .iter()
        .map(|row| {
            let mut llr = 0.0f32;
            let mut gf = 0u16;
            for (j, &dev) in row.iter().enumerate() {
                let dev = dev as usize;
                let entry_gf = rotated_mvc[j].gf[dev];
                if entry_gf == GF_NONE {
                    return None;
                }
                llr += rotated_mvc[j].llr[dev];
                gf = tables.add(gf, entry_gf);
            }
            Some(Syndrome { llr, gf })
        })
        .collect()
}

fn median_of_slice(values: &[f32]) -> f32 {
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    v[v.len() / 2]
}

fn median_of_medians(values: &[f32], q: usize) -> f32 {
    let group_size = if q <= 64 { 8 } else { 16 };
    if values.is_empty() {
        return LLR_SAT;
    }
    let level1: Vec<f32> = values.chunks(group_size).map(median_of_slice).collect();
    median_of_slice(&level1)
}

fn bayes_factor(diff: f32) -> f32 {
    if diff < 0.1 {
        0.5
    } else if diff < 0.2 {
        0.75
    } else if diff < 1.0 {
        0.825
    } else if diff < 2.0 {
        0.9375
    } else {
        1.0
    }
}

fn bayes_combine(a: f32, b: f32) -> f32 {
    a.min(b) * bayes_factor((a - b).abs())
}

/// Reorders the row's edges (not symbols) ascending by `Mvc.LLR[.][1]`, then
/// re-sorts the top `border` of those by `Mvc.LLR[.][2]`. Returns a total
/// permutation over all `dc` edges; the inverse is applied on output (§9:
/// the permutation composes both stages into one array up front).
fn presort_order(mvc: &[GfList], border: usize) -> Vec<usize> {
    let dc = mvc.len();
    if dc == 0 || mvc.iter().any(|m| m.nm() < 2) {
        return (0..dc).collect();
    }
    let mut order: Vec<usize> = (0..dc).collect();
    order.sort_by(|&a, &b| {
        mvc[a].llr[1]
            .partial_cmp(&mvc[b].llr[1])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let b = border.min(dc);
    if b > 0 && mvc.iter().all(|m| m.nm() >= 3) {
        let mut top = order[0..b].to_vec();
        top.sort_by(|&a, &b2| {
            mvc[a].llr[2]
                .partial_cmp(&mvc[b2].llr[2])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        order[0..b].copy_from_slice(&top);
    }
    order
}

/// Decorrelates the enumerated syndrome set for a single outgoing edge,
/// producing its dense length-q `Mcv`.
fn decorrelate_edge(
    tables: &GfTables,
    mvc: &[GfList],
    table: &ConfigTable,
    syndromes: &[Option<Syndrome>],
    edge: usize,
    q: usize,
    cfg: &SyndromeCnpConfig,
) -> DenseMcv {
    let mut min_per_symbol = vec![f32::INFINITY; q];
    let mut accum_per_symbol: Vec<Vec<f32>> = vec![Vec::new(); q];
    let mut decorrelated_llrs = Vec::new();

    for (t, maybe_syn) in syndromes.iter().enumerate() {
        if table.rows[t][edge] != 0 {
            continue;
        }
        let Some(syn) = maybe_syn else { continue };
        let own = mvc[edge].gf[0];
        if own == GF_NONE {
            continue;
        }
        let g = tables.add(syn.gf, own);
        decorrelated_llrs.push(syn.llr);
        if syn.llr < min_per_symbol[g as usize] {
            min_per_symbol[g as usize] = syn.llr;
        }
        if cfg.bayes {
            accum_per_symbol[g as usize].push(syn.llr);
        }
    }

    let sat = match cfg.saturation {
        SaturationPolicy::Selection => {
            if decorrelated_llrs.is_empty() {
                LLR_SAT
            } else {
                let mut sorted = decorrelated_llrs.clone();
                sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                let idx = (table.dc * 3 + mvc[edge].nm()).min(sorted.len() - 1);
                sorted[idx]
            }
        }
        SaturationPolicy::MedianOfMedians => {
            let finite: Vec<f32> = min_per_symbol
                .iter()
                .map(|&v| if v.is_finite() { v } else { LLR_SAT })
                .collect();
            median_of_medians(&finite, q)
        }
    };

    let mut llr = vec![sat + cfg.offset; q];
    for g in 0..q {
        if cfg.bayes && accum_per_symbol[g].len() > 1 {
            let mut vals = accum_per_symbol[g].clone();
            vals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let combined = vals
                .into_iter()
                .reduce(bayes_combine)
                .unwrap_or(min_per_symbol[g]);
            llr[g] = combined;
        } else if min_per_symbol[g].is_finite() {
            llr[g] = min_per_symbol[g];
        }
    }

    DenseMcv { llr }
}

/// The syndrome-based check-node processor.
pub struct SyndromeCnp<'a> {
    pub tables: &'a GfTables,
    pub q: usize,
    pub cfg: SyndromeCnpConfig,
}

impl<'a> CheckNodeProcessor for SyndromeCnp<'a> {
    type Output = DenseMcv;

    fn process_row(&mut self, rotated_mvc: &[GfList]) -> Vec<DenseMcv> {
        let dc = rotated_mvc.len();
        let nm = rotated_mvc.first().map(|l| l.nm()).unwrap_or(1);

        let order = if self.cfg.presort {
            presort_order(rotated_mvc, self.cfg.presort_border)
        } else {
            (0..dc).collect()
        };
        let permuted: Vec<GfList> = order.iter().map(|&i| rotated_mvc[i].clone()).collect();

        let table = ConfigTable::build(dc, nm, &self.cfg);
        let syndromes = enumerate_syndromes(self.tables, &permuted, &table);

        let mut permuted_out = Vec::with_capacity(dc);
        for edge in 0..dc {
            permuted_out.push(decorrelate_edge(
                self.tables,
                &permuted,
                &table,
                &syndromes,
                edge,
                self.q,
                &self.cfg,
            ));
        }

        // Invert the permutation: edge `order[i]` receives `permuted_out[i]`.
        let mut out = vec![DenseMcv::zero(self.q); dc];
        for (i, &orig) in order.iter().enumerate() {
            out[orig] = permuted_out[i].clone();
        }
        out
    }
}

/// Runs a full row through rotation-in, configuration-table decorrelation,
/// and rotation-out, mirroring [`super::bubble::process_row_with_rotation`].
pub fn process_row_with_rotation(
    tables: &GfTables,
    mvc: &[GfList],
    mat_value: &[u16],
    q: usize,
    cfg: &SyndromeCnpConfig,
) -> Vec<DenseMcv> {
    let rotated_in = crate::rotation::rotate_in(tables, mvc, mat_value);
    let mut cnp = SyndromeCnp {
        tables,
        q,
        cfg: cfg.clone(),
    };
    let dense_rotated = cnp.process_row(&rotated_in);
    dense_rotated
        .iter()
        .zip(mat_value)
        .map(|(d, &coeff)| DenseMcv {
            llr: crate::rotation::rotate_out_dense(tables, &d.llr, coeff),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(entries: &[(f32, u16)], nm: usize) -> GfList {
        let mut l = GfList::empty(nm);
        for (i, &(llr, gf)) in entries.iter().enumerate() {
            l.llr[i] = llr;
            l.gf[i] = gf;
        }
        l
    }

    #[test]
    fn config_table_always_has_all_zero_row() {
        let cfg = SyndromeCnpConfig::default();
        let table = ConfigTable::build(3, 2, &cfg);
        assert!(table.rows.iter().any(|r| r.iter().all(|&v| v == 0)));
    }

    #[test]
    fn s5_syndrome_decorrelation() {
        let tables = GfTables::build(64).unwrap();
        // dc = 3, nm = 2, config table [0,0,0],[1,0,0],[0,1,0],[0,0,1].
        // Rigged so only configuration [0,1,0] (C[.][2] = 0, LLR = 3) maps
        // to GF symbol 0 on edge 2; [0,0,0] maps to 7 at LLR 0, [1,0,0] maps
        // to 6 at LLR 2, and [0,0,1] is excluded (C[.][2] = 1).
        let mvc = vec![
            list(&[(0.0, 5), (2.0, 4)], 2),
            list(&[(0.0, 2), (3.0, 5)], 2),
            list(&[(0.0, 0), (9.0, 6)], 2),
        ];
        let table = ConfigTable {
            rows: vec![vec![0, 0, 0], vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1]],
            dc: 3,
        };
        let cfg = SyndromeCnpConfig {
            d1: 1,
            d2: 0,
            d3: 0,
            d4: None,
            saturation: SaturationPolicy::Selection,
            bayes: false,
            presort: false,
            presort_border: 0,
            offset: 0.0,
        };
        let syndromes = enumerate_syndromes(&tables, &mvc, &table);
        let mcv = decorrelate_edge(&tables, &mvc, &table, &syndromes, 2, 64, &cfg);
        assert_eq!(mcv.llr[0], 3.0);
        assert_eq!(mcv.llr[7], 0.0);
        // Symbol 2 is unreached by any decorrelated syndrome: saturation fallback
        // (here the selection index clips to the largest decorrelated LLR, 3.0).
        assert_eq!(mcv.llr[2], 3.0);
    }

    #[test]
    fn bayes_factor_is_monotone_in_diff() {
        assert_eq!(bayes_factor(0.05), 0.5);
        assert_eq!(bayes_factor(0.15), 0.75);
        assert_eq!(bayes_factor(0.5), 0.825);
        assert_eq!(bayes_factor(1.5), 0.9375);
        assert_eq!(bayes_factor(5.0), 1.0);
    }

    #[test]
    fn presort_order_is_total_permutation() {
        let mvc = vec![
            list(&[(0.0, 0), (5.0, 1), (9.0, 2)], 3),
            list(&[(0.0, 0), (1.0, 1), (2.0, 2)], 3),
            list(&[(0.0, 0), (3.0, 1), (4.0, 2)], 3),
        ];
        let order = presort_order(&mvc, 2);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2]);
    }
}
