//! Rotation of a row's incoming/outgoing messages into and out of
//! "coefficient-free" form, shared by both check-node processor variants
//! (§4.3 steps 1 and 5; §4.4 "Rotations: identical to §4.3").

use crate::gf::GfTables;
use crate::message::GfList;

/// `Mvc.GF[i][k] <- MULGF[Mvc.GF[i][k]][matValue[m][i]]` for every entry of
/// every list in the row.
pub fn rotate_in(tables: &GfTables, mvc: &[GfList], mat_value: &[u16]) -> Vec<GfList> {
    mvc.iter()
        .zip(mat_value)
        .map(|(list, &coeff)| {
            let gf = list
                .gf
                .iter()
                .map(|&g| if g == crate::gf::GF_NONE { g } else { tables.mul(g, coeff) })
                .collect();
            GfList {
                llr: list.llr.clone(),
                gf,
            }
        })
        .collect()
}

/// `Mcv.GF[i][k] <- DIVGF[Mcv.GF[i][k]][matValue[m][i]]` for every entry of
/// every list in the row.
pub fn rotate_out(tables: &GfTables, mcv: &[GfList], mat_value: &[u16]) -> Vec<GfList> {
    mcv.iter()
        .zip(mat_value)
        .map(|(list, &coeff)| {
            let gf = list
                .gf
                .iter()
                .map(|&g| if g == crate::gf::GF_NONE { g } else { tables.div(g, coeff) })
                .collect();
            GfList {
                llr: list.llr.clone(),
                gf,
            }
        })
        .collect()
}

/// Rotation of a dense length-q `Mcv` vector out of coefficient-free form:
/// `Mcv[g] <- Mcv_rotated[MULGF[g][matValue]]`, the dense analogue of
/// `rotate_out` used by the syndrome variant.
pub fn rotate_out_dense(tables: &GfTables, dense: &[f32], coeff: u16) -> Vec<f32> {
    let q = dense.len();
    let mut out = vec![0.0; q];
    for g in 0..q as u16 {
        out[tables.div(g, coeff) as usize] = dense[g as usize];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::GfList;

    #[test]
    fn rotate_in_then_out_is_identity() {
        let tables = GfTables::build(64).unwrap();
        let list = GfList {
            llr: vec![0.0, 1.0],
            gf: vec![3, 7],
        };
        let coeff = 5u16;
        let rotated = rotate_in(&tables, std::slice::from_ref(&list), &[coeff]);
        let back = rotate_out(&tables, &rotated, &[coeff]);
        assert_eq!(back[0].gf, list.gf);
    }
}
