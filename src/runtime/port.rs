// ABOUTME: Host port allocation for published container ports.
// ABOUTME: Asks the OS for a free port by binding port 0 and releasing it.

use std::io;
use std::net::{Ipv4Addr, TcpListener};
use std::sync::Arc;

use parking_lot::Mutex;

/// Attempts before accepting a repeated port from the OS.
const MAX_REBIND_ATTEMPTS: usize = 8;

/// Hands out a host port that was free at the time of the call.
///
/// Nothing reserves the port afterwards; another process may take it before
/// the engine binds it.
pub trait PortAllocator: Send + Sync {
    fn allocate(&self) -> io::Result<u16>;
}

impl<T: PortAllocator + ?Sized> PortAllocator for Arc<T> {
    fn allocate(&self) -> io::Result<u16> {
        (**self).allocate()
    }
}

/// Allocator backed by the operating system's ephemeral range.
#[derive(Debug, Default)]
pub struct OsPortAllocator {
    last: Mutex<Option<u16>>,
}

impl OsPortAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    fn probe() -> io::Result<u16> {
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        let port = listener.local_addr()?.port();
        drop(listener);
        Ok(port)
    }
}

impl PortAllocator for OsPortAllocator {
    fn allocate(&self) -> io::Result<u16> {
        let mut last = self.last.lock();
        let mut port = Self::probe()?;
        for _ in 0..MAX_REBIND_ATTEMPTS {
            if Some(port) != *last {
                break;
            }
            port = Self::probe()?;
        }
        *last = Some(port);
        tracing::debug!(port, "allocated host port");
        Ok(port)
    }
}
