//! Logging shims. Declared with `#[macro_use]` so the macros are visible crate-wide.
//!
//! Forward to `defmt` when the `defmt` feature is enabled. Host test builds have no global
//! logger, so there the macros only borrow their arguments and expand to nothing.

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(all(feature = "defmt", not(test)))]
            ::defmt::trace!($s $(, $x)*);
            #[cfg(not(all(feature = "defmt", not(test))))]
            {
                $( let _ = &$x; )*
            }
        }
    };
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(all(feature = "defmt", not(test)))]
            ::defmt::debug!($s $(, $x)*);
            #[cfg(not(all(feature = "defmt", not(test))))]
            {
                $( let _ = &$x; )*
            }
        }
    };
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(all(feature = "defmt", not(test)))]
            ::defmt::warn!($s $(, $x)*);
            #[cfg(not(all(feature = "defmt", not(test))))]
            {
                $( let _ = &$x; )*
            }
        }
    };
}
