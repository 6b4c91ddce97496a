//! Logging shims.
//!
//! With the `defmt` feature the macros forward to `defmt`, with `log` they
//! forward to `log`, and with neither they expand to nothing.
#![allow(unused_macros)]

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        macro_rules! trace { ($($arg:tt)*) => { ::defmt::trace!($($arg)*) }; }
        macro_rules! debug { ($($arg:tt)*) => { ::defmt::debug!($($arg)*) }; }
        macro_rules! info { ($($arg:tt)*) => { ::defmt::info!($($arg)*) }; }
        macro_rules! warn { ($($arg:tt)*) => { ::defmt::warn!($($arg)*) }; }
    } else if #[cfg(feature = "log")] {
        macro_rules! trace { ($($arg:tt)*) => { ::log::trace!($($arg)*) }; }
        macro_rules! debug { ($($arg:tt)*) => { ::log::debug!($($arg)*) }; }
        macro_rules! info { ($($arg:tt)*) => { ::log::info!($($arg)*) }; }
        macro_rules! warn { ($($arg:tt)*) => { ::log::warn!($($arg)*) }; }
    } else {
        macro_rules! trace { ($($arg:tt)*) => {{}}; }
        macro_rules! debug { ($($arg:tt)*) => {{}}; }
        macro_rules! info { ($($arg:tt)*) => {{}}; }
        macro_rules! warn { ($($arg:tt)*) => {{}}; }
    }
}
