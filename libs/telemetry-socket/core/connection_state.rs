use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of the single feed connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    Connecting = 0,
    Open = 1,
    /// Terminal: there is no reconnection
    Disconnected = 2,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ConnectionState::Connecting,
            1 => ConnectionState::Open,
            _ => ConnectionState::Disconnected,
        }
    }
}

/// Lock-free connection state shared between the I/O task and observers
#[derive(Debug)]
pub struct AtomicConnectionState {
    inner: AtomicU8,
}

impl AtomicConnectionState {
    pub fn new(state: ConnectionState) -> Self {
        Self {
            inner: AtomicU8::new(state as u8),
        }
    }

    #[inline]
    pub fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.inner.load(Ordering::Acquire))
    }

    /// Move `Connecting → Open`. Returns false if the state was anything else.
    pub fn mark_open(&self) -> bool {
        self.inner
            .compare_exchange(
                ConnectionState::Connecting as u8,
                ConnectionState::Open as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Enter `Disconnected`. Returns true only for the call that performed the
    /// transition, so each disconnect is reported once.
    pub fn mark_disconnected(&self) -> bool {
        let previous = self
            .inner
            .swap(ConnectionState::Disconnected as u8, Ordering::AcqRel);
        previous != ConnectionState::Disconnected as u8
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.get() == ConnectionState::Open
    }

    #[inline]
    pub fn is_disconnected(&self) -> bool {
        self.get() == ConnectionState::Disconnected
    }
}
