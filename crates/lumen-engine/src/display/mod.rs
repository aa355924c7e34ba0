//! Process-wide display connection.
//!
//! The display is connected lazily by the first context and shared by every
//! context after that. It is only torn down by an explicit release, never as a
//! side effect of disposing a context.

use log::{info, warn};

use crate::driver::{DisplayHandle, Driver};
use crate::error::{Error, Result};

/// Lazily initialized display connection.
#[derive(Debug, Default)]
pub struct Display {
    handle: Option<DisplayHandle>,
}

impl Display {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn handle(&self) -> Option<DisplayHandle> {
        self.handle
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.handle.is_some()
    }

    /// Returns the display, connecting and initializing it on first use.
    pub fn acquire<D: Driver>(&mut self, driver: &mut D) -> Result<DisplayHandle> {
        if let Some(handle) = self.handle {
            return Ok(handle);
        }

        let Some(handle) = driver.get_display() else {
            warn!("driver has no display");
            return Err(Error::DisplayUnavailable);
        };
        if !driver.initialize(handle) {
            warn!("display {handle:?} failed to initialize");
            return Err(Error::DisplayUnavailable);
        }

        info!("display {handle:?} connected");
        self.handle = Some(handle);
        Ok(handle)
    }

    /// Terminates the connection. Does nothing when not connected.
    pub fn release<D: Driver>(&mut self, driver: &mut D) {
        if let Some(handle) = self.handle.take() {
            driver.terminate(handle);
            info!("display {handle:?} terminated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{SoftwareDriver, SoftwareOptions};

    #[test]
    fn acquire_connects_once() {
        let mut driver = SoftwareDriver::default();
        let mut display = Display::new();
        let first = display.acquire(&mut driver).unwrap();
        let second = display.acquire(&mut driver).unwrap();
        assert_eq!(first, second);
        assert!(driver.is_initialized());
    }

    #[test]
    fn missing_display_is_unavailable() {
        let mut driver = SoftwareDriver::new(SoftwareOptions {
            display_available: false,
            ..SoftwareOptions::default()
        });
        let mut display = Display::new();
        assert_eq!(display.acquire(&mut driver), Err(Error::DisplayUnavailable));
        assert!(!display.is_connected());
    }

    #[test]
    fn failed_initialize_is_unavailable() {
        let mut driver = SoftwareDriver::new(SoftwareOptions {
            initialize_ok: false,
            ..SoftwareOptions::default()
        });
        let mut display = Display::new();
        assert_eq!(display.acquire(&mut driver), Err(Error::DisplayUnavailable));
    }

    #[test]
    fn release_is_idempotent() {
        let mut driver = SoftwareDriver::default();
        let mut display = Display::new();
        display.acquire(&mut driver).unwrap();
        display.release(&mut driver);
        display.release(&mut driver);
        assert!(!display.is_connected());
        assert!(!driver.is_initialized());
    }

    #[test]
    fn reacquire_after_release() {
        let mut driver = SoftwareDriver::default();
        let mut display = Display::new();
        display.acquire(&mut driver).unwrap();
        display.release(&mut driver);
        display.acquire(&mut driver).unwrap();
        assert!(driver.is_initialized());
    }
}
