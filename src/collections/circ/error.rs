use derive_more::{Display, Error, From, IsVariant};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("ring buffer capacity must be greater than zero")]
pub struct ZeroCapacity;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("out of memory")]
pub struct OutOfMemory;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("capacity overflow")]
pub struct CapacityOverflow;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("index {index} out of bounds for ring buffer with {len} bytes")]
pub struct IndexOutOfBounds {
    pub index: usize,
    pub len: usize,
}

/// The ways in which storage for a ring buffer can fail to be allocated.
///
/// Operations returning this error are all-or-nothing: on failure the buffer is left exactly as it
/// was before the call.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error, IsVariant)]
pub enum AllocError {
    OutOfMemory(OutOfMemory),
    CapacityOverflow(CapacityOverflow),
}

/// The ways in which constructing a ring buffer can fail.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error, IsVariant)]
pub enum NewError {
    ZeroCapacity(ZeroCapacity),
    OutOfMemory(OutOfMemory),
    CapacityOverflow(CapacityOverflow),
}

impl From<AllocError> for NewError {
    fn from(value: AllocError) -> Self {
        match value {
            AllocError::OutOfMemory(e) => e.into(),
            AllocError::CapacityOverflow(e) => e.into(),
        }
    }
}
