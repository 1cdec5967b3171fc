use std::error::Error;

use stdkit::collections::circ::RingBuffer;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")))
        .init();

    let ring = RingBuffer::with_cap(4)?;
    info!(cap = ring.cap(), "created ring");

    ring.append(&[1, 2, 3])?;
    info!(len = ring.len(), cap = ring.cap(), "appended [1, 2, 3]");

    // Doesn't fit in 4 bytes, so this grows the storage.
    ring.append(&[4, 5])?;
    info!(len = ring.len(), cap = ring.cap(), "appended [4, 5]");

    let front = ring.take_next(2);
    info!(?front, len = ring.len(), "took 2 from the front");

    let back = ring.take_last(1);
    info!(?back, len = ring.len(), "took 1 from the back");

    ring.prepend(&[0])?;
    let rest = ring.take_next(usize::MAX);
    info!(?rest, len = ring.len(), "prepended [0] and drained");

    ring.clear(false);
    info!(?ring, "cleared");

    Ok(())
}
