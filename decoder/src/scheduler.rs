//! The horizontal / layered scheduler that drives one full frame of decoding
//! (§4.5), dispatching to whichever check-node processor the decoder is
//! configured with.

use getset::{CopyGetters, Getters};

use crate::cnp::bubble;
use crate::cnp::syndrome::{self, SyndromeCnpConfig};
use crate::cnp::CnpVariant;
use crate::code::CodeParams;
use crate::decision::check_syndrome;
use crate::error::ConfigError;
use crate::gf::GfTables;
use crate::intrinsic::{AppStore, IntrinsicStore};
use crate::message::{DenseMcv, EdgeStore, Mcv};
use crate::vnp::{self, ToggleFlag};

/// Configuration shared by both check-node processor families plus the
/// scheduler-level knobs (truncation size, iteration budget).
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    pub variant: CnpVariant,
    pub nm: usize,
    pub nb_iter_max: usize,
    /// Bubble-variant operation budget (`NbOper`); unused by the syndrome variant.
    pub nb_oper: usize,
    pub syndrome_cfg: SyndromeCnpConfig,
    pub offset: f32,
    /// Iterations at which the simulation driver may request a progress
    /// checkpoint; purely advisory, consulted only by callers that inspect
    /// it.
    pub checkpoint_iterations: Vec<usize>,
    /// Opts into the edge-centric, two-column (`dv = 2`) VNP specialization
    /// of §4.2 rather than the general on-the-fly `APP - Mcv` derivation the
    /// scheduler otherwise uses; the two are semantically equivalent (§4.5),
    /// but the specialization only applies to codes with constant column
    /// degree 2, so requesting it is rejected for any other code.
    pub require_dv2_specialization: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            variant: CnpVariant::BubbleForwardBackward,
            nm: 16,
            nb_iter_max: 20,
            nb_oper: 64,
            syndrome_cfg: SyndromeCnpConfig::default(),
            offset: 0.3,
            checkpoint_iterations: Vec::new(),
            require_dv2_specialization: false,
        }
    }
}

/// Result of decoding one frame: the hard decision, how many iterations it
/// took, and whether the returned decision is a valid codeword.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct DecodeResult {
    #[getset(get = "pub")]
    decide: Vec<u16>,
    #[getset(get_copy = "pub")]
    iterations_used: usize,
    #[getset(get_copy = "pub")]
    syndrome_zero: bool,
}

/// Owns all per-frame and read-only state for one code/table/config
/// combination; buffers are allocated once and reused across frames (§5).
pub struct Decoder {
    code: CodeParams,
    tables: GfTables,
    config: DecoderConfig,
    store: EdgeStore,
    /// Local position (0 or 1) of each edge within its variable's `n_to_b`
    /// incidence list; only meaningful when `require_dv2_specialization` is
    /// set, but cheap enough to build unconditionally.
    edge_local_index: Vec<usize>,
    /// Per-variable toggle selecting which of its two edges the `dv = 2`
    /// specialization refreshes on the next sweep; unused otherwise.
    toggle_flags: Vec<ToggleFlag>,
}

impl Decoder {
    pub fn new(code: CodeParams, tables: GfTables, config: DecoderConfig) -> Result<Self, ConfigError> {
        if config.nm == 0 {
            return Err(ConfigError::InvalidMessageSize(0));
        }
        if matches!(config.variant, CnpVariant::BubbleForwardBackward) && config.nb_oper == 0 {
            return Err(ConfigError::InvalidOperationBudget(0));
        }
        if config.require_dv2_specialization {
            if let Some(&bad) = code.column_degree().iter().find(|&&d| d != 2) {
                return Err(ConfigError::UnsupportedColumnDegree(bad));
            }
        }
        let dense_mcv = matches!(config.variant, CnpVariant::Syndrome);
        let q = tables.q() as usize;
        let store = EdgeStore::new(code.num_edges(), config.nm, q, dense_mcv);
        let mut edge_local_index = vec![0usize; code.num_edges()];
        for edges in code.n_to_b() {
            for (local, &edge) in edges.iter().enumerate() {
                edge_local_index[edge] = local;
            }
        }
        let toggle_flags = vec![ToggleFlag::default(); code.n()];
        Ok(Decoder {
            code,
            tables,
            config,
            store,
            edge_local_index,
            toggle_flags,
        })
    }

    pub fn code(&self) -> &CodeParams {
        &self.code
    }

    pub fn tables(&self) -> &GfTables {
        &self.tables
    }

    /// Decodes one frame of channel observations end to end (§4.5).
    pub fn decode_frame(&mut self, intrinsic: &IntrinsicStore) -> DecodeResult {
        let q = self.tables.q() as usize;
        let dense_mcv = matches!(self.config.variant, CnpVariant::Syndrome);
        self.store.reset_mcv(q, dense_mcv);
        if self.config.require_dv2_specialization {
            self.toggle_flags.iter_mut().for_each(|flag| *flag = ToggleFlag::default());
        }

        let mut app = AppStore::seed_from_intrinsic(intrinsic);
        let mut decide = app.hard_decision();
        let mut syndrome_zero = check_syndrome(&self.code, &self.tables, &decide);
        let mut iterations_used = 0;

        if syndrome_zero || self.code.m() == 0 {
            return DecodeResult {
                decide,
                iterations_used,
                syndrome_zero: true,
            };
        }

        'outer: for iter in 0..self.config.nb_iter_max {
            iterations_used = iter + 1;
            for m in 0..self.code.m() {
                self.process_check_node(m, &mut app, intrinsic);
            }
            if self.config.require_dv2_specialization {
                self.toggle_flags.iter_mut().for_each(ToggleFlag::advance);
            }
            decide = app.hard_decision();
            syndrome_zero = check_syndrome(&self.code, &self.tables, &decide);
            if syndrome_zero {
                break 'outer;
            }
        }

        DecodeResult {
            decide,
            iterations_used,
            syndrome_zero,
        }
    }

    fn process_check_node(&mut self, m: usize, app: &mut AppStore, intrinsic: &IntrinsicStore) {
        let q = self.tables.q() as usize;
        let dc = self.code.row_degree();
        let start = self.code.row_edge_start()[m];
        let vars = self.code.mat()[m].clone();
        let coeffs = self.code.mat_value()[m].clone();

        let mut row_mvc = Vec::with_capacity(dc);
        for i in 0..dc {
            let edge = start + i;
            let var = vars[i];
            if self.config.require_dv2_specialization {
                let local = self.edge_local_index[edge];
                if local == self.toggle_flags[var].current() {
                    let mvc = vnp::update_variable_node(
                        var,
                        &self.code,
                        intrinsic.row(var),
                        |e| self.store.mcv(e).clone(),
                        q,
                        self.config.nm,
                        self.config.offset,
                    )
                    .swap_remove(local);
                    self.store.set_mvc(edge, mvc.clone());
                    row_mvc.push(mvc);
                } else {
                    row_mvc.push(self.store.mvc(edge).clone());
                }
            } else {
                let mcv_dense = self.store.mcv(edge).to_dense(q, self.config.offset);
                row_mvc.push(vnp::mvc_from_app(app, var, &mcv_dense, self.config.nm));
            }
        }

        match self.config.variant {
            CnpVariant::BubbleForwardBackward => {
                let mcv_out =
                    bubble::process_row_with_rotation(&self.tables, &row_mvc, &coeffs, self.config.nb_oper);
                for i in 0..dc {
                    let edge = start + i;
                    let new_dense = mcv_out[i].densify(q, self.config.offset);
                    let mvc_dense = row_mvc[i].densify(q, self.config.offset);
                    update_app_row(app, vars[i], &mvc_dense, &new_dense);
                    self.store.set_mcv(edge, Mcv::List(mcv_out[i].clone()));
                }
            }
            CnpVariant::Syndrome => {
                let mcv_out = syndrome::process_row_with_rotation(
                    &self.tables,
                    &row_mvc,
                    &coeffs,
                    q,
                    &self.config.syndrome_cfg,
                );
                for i in 0..dc {
                    let edge = start + i;
                    let mvc_dense = row_mvc[i].densify(q, self.config.offset);
                    update_app_row(app, vars[i], &mvc_dense, &mcv_out[i].llr);
                    self.store
                        .set_mcv(edge, Mcv::Dense(DenseMcv { llr: mcv_out[i].llr.clone() }));
                }
            }
        }
    }
}

/// `APP[var][g] <- Mvc[g] + new_Mcv[g]` for every symbol.
fn update_app_row(app: &mut AppStore, var: usize, mvc_dense: &[f32], new_mcv_dense: &[f32]) {
    let row = app.row_mut(var);
    for g in 0..row.len() {
        row[g] = mvc_dense[g] + new_mcv_dense[g];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intrinsic_favoring(q: usize, rows: &[u16]) -> IntrinsicStore {
        let rows = rows
            .iter()
            .map(|&best| {
                let mut row = vec![10.0f32; q];
                row[best as usize] = 0.0;
                row
            })
            .collect();
        IntrinsicStore::from_rows(q, rows)
    }

    #[test]
    fn s1_trivial_no_parity_converges_in_zero_iterations() {
        let tables = GfTables::build(64).unwrap();
        let code = CodeParams::new(1, 64, vec![], vec![]).unwrap();
        let config = DecoderConfig {
            nm: 4,
            ..DecoderConfig::default()
        };
        let mut decoder = Decoder::new(code, tables, config).unwrap();
        let intrinsic = intrinsic_favoring(64, &[0]);
        let result = decoder.decode_frame(&intrinsic);
        assert_eq!(result.decide(), &vec![0]);
        assert_eq!(result.iterations_used(), 0);
        assert!(result.syndrome_zero());
    }

    #[test]
    fn s2_single_check_bubble_converges() {
        let tables = GfTables::build(64).unwrap();
        let code = CodeParams::new(2, 64, vec![vec![0, 1]], vec![vec![1, 1]]).unwrap();
        let config = DecoderConfig {
            nm: 8,
            nb_iter_max: 2,
            ..DecoderConfig::default()
        };
        let mut decoder = Decoder::new(code, tables, config).unwrap();
        let intrinsic = intrinsic_favoring(64, &[5, 5]);
        let result = decoder.decode_frame(&intrinsic);
        assert_eq!(result.decide(), &vec![5, 5]);
        assert!(result.syndrome_zero());
        assert!(result.iterations_used() <= 2);
    }

    #[test]
    fn s2_single_check_syndrome_converges() {
        let tables = GfTables::build(64).unwrap();
        let code = CodeParams::new(2, 64, vec![vec![0, 1]], vec![vec![1, 1]]).unwrap();
        let config = DecoderConfig {
            nm: 8,
            nb_iter_max: 2,
            variant: CnpVariant::Syndrome,
            syndrome_cfg: SyndromeCnpConfig {
                d1: 4,
                d2: 4,
                d3: 4,
                ..SyndromeCnpConfig::default()
            },
            ..DecoderConfig::default()
        };
        let mut decoder = Decoder::new(code, tables, config).unwrap();
        let intrinsic = intrinsic_favoring(64, &[5, 5]);
        let result = decoder.decode_frame(&intrinsic);
        assert_eq!(result.decide(), &vec![5, 5]);
        assert!(result.syndrome_zero());
    }

    #[test]
    fn s6_non_convergence_is_deterministic() {
        let tables = GfTables::build(64).unwrap();
        let code = CodeParams::new(
            3,
            64,
            vec![vec![0, 1, 2]],
            vec![vec![1, 1, 1]],
        )
        .unwrap();
        let config = DecoderConfig {
            nm: 4,
            nb_iter_max: 5,
            nb_oper: 16,
            ..DecoderConfig::default()
        };
        // All-zero intrinsic: every symbol equally likely for every variable.
        let flat_intrinsic = || IntrinsicStore::from_rows(64, vec![vec![0.0; 64]; 3]);
        let mut decoder = Decoder::new(code, tables, config).unwrap();
        let r1 = decoder.decode_frame(&flat_intrinsic());
        let r2 = decoder.decode_frame(&flat_intrinsic());
        assert_eq!(r1.decide(), r2.decide());
        assert_eq!(r1.iterations_used(), r2.iterations_used());
    }

    #[test]
    fn rejects_bubble_variant_on_unsupported_column_degree() {
        let tables = GfTables::build(64).unwrap();
        // Column degree 3 for variable 0 (appears in three rows), not 2.
        let code = CodeParams::new(
            3,
            64,
            vec![vec![0, 1], vec![0, 2], vec![0, 1]],
            vec![vec![1, 1], vec![1, 1], vec![1, 1]],
        )
        .unwrap();
        let config = DecoderConfig {
            require_dv2_specialization: true,
            ..DecoderConfig::default()
        };
        let err = Decoder::new(code, tables, config).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedColumnDegree(3)));
    }
}
