//! txlens-decode: decimal codec, event decoding and fee resolution.
//!
//! Every function here is total over its input: malformed numbers become
//! zero, unrecognized events are skipped, and nothing returns an error.

pub mod events;
pub mod fees;
pub mod units;

pub use events::{count_created, decode_transfers};
pub use fees::resolve_fees;
pub use units::{format_units, parse_integer_or_zero};
