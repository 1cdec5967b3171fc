//! A module containing circular byte buffers and associated types.
//!
//! [`ByteRing`] is the buffer itself, owned and mutated through `&mut self` like any other
//! collection. [`RingBuffer`] wraps a [`ByteRing`] in a reentrant mutex so that it can be shared
//! between threads, with every method taking the lock for its whole duration. For operations that
//! need to be indivisible across several calls, hold the guard from [`RingBuffer::lock`] while
//! making them.
//!
//! Both types grow on demand rather than refusing writes, and reads never wait for data: an empty
//! buffer simply yields nothing.

mod error;
mod iter;
mod io;
mod byte_ring;
#[cfg(feature = "sync")]
mod ring_buffer;
mod storage;

mod tests;
mod proptests;

pub use byte_ring::*;
pub use error::*;
pub use iter::*;
#[cfg(feature = "sync")]
pub use ring_buffer::*;
