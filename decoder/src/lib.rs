//! Core message-passing engine for a non-binary LDPC decoder over GF(64) or
//! GF(256): GF(q) arithmetic, the per-edge message store, the variable-node
//! processor, two check-node processor families (EMS forward-backward with
//! L-Bubble-Check, and syndrome-based configuration-table decorrelation),
//! the horizontal/layered scheduler, and hard decision / syndrome check.
//!
//! Parity-check-matrix file loading, the channel model, command-line
//! handling, and result-file output are external collaborators; this crate
//! only specifies the interfaces they must satisfy (`channel::ChannelModel`)
//! plus one concrete, tested construction for the GF(q) tables themselves.

pub mod channel;
pub mod cnp;
pub mod code;
pub mod decision;
pub mod error;
pub mod gf;
pub mod intrinsic;
pub mod message;
pub mod rotation;
pub mod scheduler;
pub mod vnp;

pub use cnp::CnpVariant;
pub use code::CodeParams;
pub use error::{AllocationError, ConfigError, DecoderError, DomainError, MatrixError};
pub use gf::GfTables;
pub use scheduler::{Decoder, DecoderConfig, DecodeResult};
