//! Logging shim: forwards to `defmt` when the `defmt` feature is enabled, compiles to nothing otherwise.
#![allow(unused_macros)]

/// Debug level log
macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::debug!($s $(, $x)*);
            #[cfg(not(feature = "defmt"))]
            { $( let _ = &$x; )* }
        }
    };
}

/// Info level log
macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::info!($s $(, $x)*);
            #[cfg(not(feature = "defmt"))]
            { $( let _ = &$x; )* }
        }
    };
}

/// Warn level log
macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::warn!($s $(, $x)*);
            #[cfg(not(feature = "defmt"))]
            { $( let _ = &$x; )* }
        }
    };
}
