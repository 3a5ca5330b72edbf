//! Logging macros
//!
//! Firmware builds log through `defmt`, host builds through the `log` facade.
//! Call sites stay identical on both targets, so arguments must implement both
//! `defmt::Format` and `core::fmt::Debug`/`Display`. Use `{:?}` for crate types.

#[doc(hidden)]
pub mod __private {
    #[cfg(feature = "defmt")]
    pub use defmt;
    pub use log;
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        $crate::logging::__private::defmt::info!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        $crate::logging::__private::log::info!($($arg)*);
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        $crate::logging::__private::defmt::warn!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        $crate::logging::__private::log::warn!($($arg)*);
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        $crate::logging::__private::defmt::error!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        $crate::logging::__private::log::error!($($arg)*);
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        $crate::logging::__private::defmt::debug!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        $crate::logging::__private::log::debug!($($arg)*);
    }};
}
