//! Candidate encoding: chromosome codec and precedence sequencer.
//!
//! The search engines operate on flat real vectors; this module fixes
//! their interpretation. [`Chromosome`] splits a vector into operation
//! priorities and machine selectors and decodes them against an
//! [`Instance`](crate::models::Instance); [`sequence`] linearizes the
//! decoded operations under intra-order stage precedence. Together they
//! form the representation half of the decoder → simulator pipeline.
//!
//! # Reference
//! Bierwirth (1995), "A generalized permutation approach to JSSP"

mod chromosome;
mod sequencer;

pub use chromosome::{select_machine_slot, Chromosome, DecodedOp, GENE_EPSILON, GENE_MAX};
pub use sequencer::{sequence, SequencedOps};
