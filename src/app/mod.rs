//! Application boundary — port traits and outbound diagnostics.
//!
//! Everything the dispatch core needs from the outside world is expressed
//! as a trait in [`ports`]; everything it tells the outside world is a
//! [`events::Diagnostic`].

pub mod events;
pub mod ports;
