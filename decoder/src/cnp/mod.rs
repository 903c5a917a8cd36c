//! Check-node processing: the two algorithm families that approximate the
//! exact GF(q) convolution over a check node's incident edges.

pub mod bubble;
pub mod syndrome;

use crate::message::GfList;

/// Which check-node processor a decoder instance is configured to use. Both
/// variants share the same rotated-Mvc-in / Mcv-out contract (§4.3, §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CnpVariant {
    BubbleForwardBackward,
    Syndrome,
}

/// Common contract for a check-node processor: given the row's rotated `Mvc`
/// lists (coefficient-free, i.e. already multiplied by the edge's
/// `matValue`), produce the row's outgoing `Mcv` messages, one per edge,
/// still in coefficient-free form (rotation back to `DIVGF[.][matValue]` is
/// the caller's responsibility, shared by both variants).
pub trait CheckNodeProcessor {
    type Output;

    fn process_row(&mut self, rotated_mvc: &[GfList]) -> Vec<Self::Output>;
}
