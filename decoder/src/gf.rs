//! GF(q) arithmetic tables (q in {64, 256}) and the small value types used to
//! carry a (cost, symbol) pair through the message-passing core.

use crate::error::ConfigError;

/// Reserved symbol marking an empty slot in a truncated message list.
/// Never a valid GF(q) element, since valid elements are strictly less than `q`.
pub const GF_NONE: u16 = u16::MAX;

/// Saturation cost assigned to slots that are absent from a truncated message,
/// after densification. Mirrors the `-1e5`/`+1e5` literals of the source this
/// decoder is modeled on.
pub const LLR_SAT: f32 = 1.0e5;

/// Cost assigned to genuinely unreachable entries (e.g. both operands of an
/// elementary step exhausted), distinct from ordinary saturation.
pub const LLR_POS_INF: f32 = f32::INFINITY;

/// A single (cost, symbol) pair as carried on an edge of the Tanner graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GfMsg {
    pub llr: f32,
    pub gf: u16,
}

impl GfMsg {
    pub const NONE: GfMsg = GfMsg {
        llr: LLR_SAT,
        gf: GF_NONE,
    };

    pub fn is_none(&self) -> bool {
        self.gf == GF_NONE
    }
}

/// Primitive polynomials (as the integer below the top bit) used to build the
/// exponential/logarithm tables for each supported field order. These are the
/// standard primitive polynomials for GF(2^6) and GF(2^8):
/// x^6 + x + 1 and x^8 + x^4 + x^3 + x^2 + 1.
fn primitive_polynomial(log_gf: u32) -> Option<u32> {
    match log_gf {
        6 => Some(0b100_0011),
        8 => Some(0b1_0001_1101),
        _ => None,
    }
}

/// Read-only GF(q) arithmetic tables: addition (XOR), multiplication, division,
/// and the canonical binary image of each element.
#[derive(Debug, Clone)]
pub struct GfTables {
    q: u32,
    log_gf: u32,
    mul: Vec<u16>,
    div: Vec<u16>,
}

impl GfTables {
    /// Builds the tables for field order `q` (64 or 256) from a fixed
    /// primitive polynomial, via the standard exp/log construction.
    pub fn build(q: u32) -> Result<Self, ConfigError> {
        let log_gf = match q {
            64 => 6,
            256 => 8,
            other => return Err(ConfigError::UnsupportedField(other)),
        };
        let poly = primitive_polynomial(log_gf).expect("checked by match above");
        let qu = q as usize;

        let mut exp = vec![0u16; 2 * qu];
        let mut log = vec![0u16; qu];
        let mut x: u32 = 1;
        for i in 0..(qu - 1) {
            exp[i] = x as u16;
            log[x as usize] = i as u16;
            x <<= 1;
            if x & q != 0 {
                x ^= poly;
            }
        }
        for i in 0..(qu - 1) {
            exp[i + qu - 1] = exp[i];
        }

        let mut mul = vec![0u16; qu * qu];
        let mut div = vec![0u16; qu * qu];
        for a in 0..qu {
            for b in 0..qu {
                mul[a * qu + b] = if a == 0 || b == 0 {
                    0
                } else {
                    exp[(log[a] as usize) + (log[b] as usize)]
                };
                div[a * qu + b] = if b == 0 {
                    // DIVGF[x][0] is undefined and never queried; filled with 0
                    // so the table stays total without signaling a false DomainError.
                    0
                } else if a == 0 {
                    0
                } else {
                    let diff = (qu - 1) + log[a] as usize - log[b] as usize;
                    exp[diff % (qu - 1)]
                };
            }
        }

        Ok(GfTables {
            q,
            log_gf,
            mul,
            div,
        })
    }

    pub fn q(&self) -> u32 {
        self.q
    }

    pub fn log_gf(&self) -> u32 {
        self.log_gf
    }

    #[inline]
    pub fn add(&self, a: u16, b: u16) -> u16 {
        a ^ b
    }

    #[inline]
    pub fn mul(&self, a: u16, b: u16) -> u16 {
        self.mul[a as usize * self.q as usize + b as usize]
    }

    #[inline]
    pub fn div(&self, a: u16, b: u16) -> u16 {
        debug_assert!(b != 0, "DIVGF[x][0] is undefined and must never be queried");
        self.div[a as usize * self.q as usize + b as usize]
    }

    /// The canonical binary image of `g`: its `log_gf`-bit representation,
    /// least significant bit first.
    pub fn bingf(&self, g: u16) -> Vec<u8> {
        (0..self.log_gf)
            .map(|bit| ((g >> bit) & 1) as u8)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unsupported_field_order() {
        assert_eq!(
            GfTables::build(16).unwrap_err(),
            ConfigError::UnsupportedField(16)
        );
    }

    #[test]
    fn addition_is_xor_and_self_inverse() {
        for q in [64u32, 256] {
            let t = GfTables::build(q).unwrap();
            for x in 0..q as u16 {
                assert_eq!(t.add(x, x), 0);
                assert_eq!(t.add(x, 0), x);
            }
        }
    }

    #[test]
    fn multiplicative_identity_and_division_roundtrip() {
        for q in [64u32, 256] {
            let t = GfTables::build(q).unwrap();
            for x in 1..q as u16 {
                assert_eq!(t.mul(x, 1), x);
                for y in 1..q as u16 {
                    let p = t.mul(x, y);
                    assert_eq!(t.div(p, y), x);
                }
            }
        }
    }

    #[test]
    fn zero_absorbs_multiplication() {
        let t = GfTables::build(64).unwrap();
        for x in 0..64u16 {
            assert_eq!(t.mul(x, 0), 0);
            assert_eq!(t.mul(0, x), 0);
        }
    }

    #[test]
    fn bingf_round_trips_through_bit_value() {
        let t = GfTables::build(64).unwrap();
        for g in 0..64u16 {
            let bits = t.bingf(g);
            assert_eq!(bits.len(), 6);
            let v: u16 = bits.iter().enumerate().fold(0, |acc, (i, &b)| acc | ((b as u16) << i));
            assert_eq!(v, g);
        }
    }
}
