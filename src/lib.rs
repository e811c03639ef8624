//! Driver crate for the AX5043 sub-GHz transceiver
//!
//! The recommended way to use this driver is the [high-level interface]. If you
//! require a higher degree of flexibility, you can use the
//! [register-level interface] instead.
//!
//! The high-level interface covers the transmit path of the chip: power-mode
//! sequencing, frequency synthesis with PLL autoranging, and FIFO framing of
//! packets. Reception is not implemented.
//!
//! This driver is built on top of [`embedded-hal`], which means it is portable
//! and can be used on any platform that implements the `embedded-hal` API.
//! With the default `async` feature the driver is written against
//! `embedded-hal-async` instead.
//!
//! [high-level interface]: hl/index.html
//! [register-level interface]: ll/index.html
//! [`embedded-hal`]: https://crates.io/crates/embedded-hal
#![cfg_attr(not(any(test, feature = "std")), no_main)]
#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(feature = "async")]
use maybe_async::must_be_async as maybe_async_attr;
#[cfg(not(feature = "async"))]
use maybe_async::must_be_sync as maybe_async_attr;

#[cfg(not(feature = "async"))]
use embedded_hal as spi_type;
#[cfg(feature = "async")]
use embedded_hal_async as spi_type;

pub mod configs;
pub mod fifo;
pub mod hl;
pub mod ll;
pub mod synth;
pub mod time;

#[cfg(test)]
mod mock;

/// Redirection of nb::block
pub mod block {
    pub use nb::block;
}

pub use crate::{
    block::block,
    configs::{Config, Modulation, Oscillator},
    fifo::FifoCommand,
    hl::{
        Error, OperatingMode, PllRangingResult, Ready, Sending, Sleeping, Uninitialized, AX5043,
    },
    time::Clock,
};
