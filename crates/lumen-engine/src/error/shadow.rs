use crate::driver::gl::{self, GlEnum};

/// One-slot cache for errors raised above the driver.
///
/// The validation layer reports errors the driver never sees. They are parked
/// here and merged with the driver's own queue when the caller asks for the
/// error state, so a query reports at most one error and never drops either
/// source.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ErrorShadow {
    pending: GlEnum,
}

impl ErrorShadow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the parked error, `NO_ERROR` if none.
    #[inline]
    pub fn pending(&self) -> GlEnum {
        self.pending
    }

    /// Records `code` unless it is `NO_ERROR` or an error is already parked.
    ///
    /// `driver_error` is queried (and thereby cleared) before recording. If the
    /// driver had an error of its own, that error is parked instead so it
    /// keeps precedence and is still reported by the next [`take`](Self::take).
    pub fn record(&mut self, code: GlEnum, driver_error: impl FnOnce() -> GlEnum) {
        if code == gl::NO_ERROR || self.pending != gl::NO_ERROR {
            return;
        }
        let previous = driver_error();
        self.pending = if previous == gl::NO_ERROR { code } else { previous };
    }

    /// Returns the parked error, or the driver's when nothing is parked.
    ///
    /// The slot is always clear afterwards.
    pub fn take(&mut self, driver_error: impl FnOnce() -> GlEnum) -> GlEnum {
        let parked = std::mem::replace(&mut self.pending, gl::NO_ERROR);
        if parked != gl::NO_ERROR {
            parked
        } else {
            driver_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR: fn() -> GlEnum = || gl::NO_ERROR;

    #[test]
    fn parked_error_is_reported_once() {
        let mut s = ErrorShadow::new();
        s.record(gl::INVALID_ENUM, CLEAR);
        assert_eq!(s.take(CLEAR), gl::INVALID_ENUM);
        assert_eq!(s.take(CLEAR), gl::NO_ERROR);
    }

    #[test]
    fn first_recorded_error_wins() {
        let mut s = ErrorShadow::new();
        s.record(gl::INVALID_VALUE, CLEAR);
        s.record(gl::INVALID_OPERATION, CLEAR);
        assert_eq!(s.take(CLEAR), gl::INVALID_VALUE);
    }

    #[test]
    fn no_error_is_ignored() {
        let mut s = ErrorShadow::new();
        s.record(gl::NO_ERROR, || panic!("driver must not be queried"));
        assert_eq!(s.pending(), gl::NO_ERROR);
    }

    #[test]
    fn driver_is_not_queried_once_parked() {
        let mut s = ErrorShadow::new();
        s.record(gl::INVALID_ENUM, CLEAR);
        s.record(gl::INVALID_VALUE, || panic!("driver must not be queried"));
        assert_eq!(s.take(|| panic!("driver must not be queried")), gl::INVALID_ENUM);
    }

    #[test]
    fn driver_error_takes_precedence() {
        let mut s = ErrorShadow::new();
        s.record(gl::INVALID_ENUM, || gl::OUT_OF_MEMORY);
        assert_eq!(s.take(CLEAR), gl::OUT_OF_MEMORY);
    }

    #[test]
    fn take_falls_through_to_driver() {
        let mut s = ErrorShadow::new();
        assert_eq!(s.take(|| gl::INVALID_FRAMEBUFFER_OPERATION), gl::INVALID_FRAMEBUFFER_OPERATION);
    }
}
