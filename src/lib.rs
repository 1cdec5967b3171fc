//! A small utility crate, written in the style of a standard library.
//!
//! # Purpose
//! The centrepiece is a growable circular byte buffer which sits underneath higher-level I/O, such
//! as pipe readers and character decoders. Those consumers push raw bytes in at either end, pull
//! them back out into their own buffers and poll the length to decide when to go back upstream for
//! more input.
//!
//! # Error Handling
//! Like the rest of the crate, errors are strongly typed: each failure is its own struct (often a
//! ZST) implementing [`Error`](std::error::Error), and operations which can fail in more than one
//! way return an enum of exactly the failures that apply to them. Allocation failure while growing
//! is reported as an error rather than aborting the process, because it is recoverable in
//! principle and the caller is in a better position to decide what to do about it.
//!
//! Indexing with `[]` panics when out of bounds, the same way slices do. The `get`/`set` methods
//! are the non-panicking alternative.
//!
//! # Dependencies
//! - `derive_more` removes the repetitive parts of declaring error types.
//! - `parking_lot` provides the reentrant mutex behind the thread-safe
//!   [`RingBuffer`](collections::circ::RingBuffer), enabled by the `sync` feature.
//! - `tracing-subscriber` is only pulled in by the `demo` feature, for the demo binary.
//! - `tracing` is used for the occasional diagnostic when storage is resized. No subscriber is
//!   installed by the library.
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

#[cfg(feature = "collections")]
pub mod collections;

pub(crate) mod util;
