//! [`Read`] and [`Write`] adapters, so that pipe readers and decoders can move bytes through a ring
//! with the standard traits. Reads never block; an empty ring reads as `Ok(0)`.

use std::io::{self, Read, Write};

use super::byte_ring::ByteRing;
use super::error::AllocError;
#[cfg(feature = "sync")]
use super::ring_buffer::RingBuffer;

impl From<AllocError> for io::Error {
    fn from(value: AllocError) -> Self {
        io::Error::new(io::ErrorKind::OutOfMemory, value)
    }
}

impl Read for ByteRing {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.get_next(buf))
    }
}

impl Write for ByteRing {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(feature = "sync")]
impl Read for &RingBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.get_next(buf))
    }
}

#[cfg(feature = "sync")]
impl Write for &RingBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
