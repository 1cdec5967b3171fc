//! Various general-purpose collection types.
//!
//! # Purpose
//! At the moment this is home to the circular buffers in [`circ`]. Applicable types expose their
//! contents as slices where they can, which saves writing some of the more repetitive
//! functionality.

#[cfg(feature = "circ")]
pub mod circ;
