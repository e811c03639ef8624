//! High-level interface to the AX5043
//!
//! The entry point to this API is the [AX5043] struct. Please refer to the
//! documentation there for more details.
//!
//! This module implements a high-level interface to the AX5043. This is the
//! recommended way to access the AX5043 using this crate, unless you need the
//! greater flexibility provided by the [register-level interface].
//!
//! [register-level interface]: ../ll/index.html

use core::fmt;

#[allow(unused_imports)]
pub use awake::*;
pub use error::*;
pub use mode::*;
pub use ready::*;
#[allow(unused_imports)]
pub use sending::*;
#[allow(unused_imports)]
pub use sleeping::*;
pub use state_impls::*;
pub use synth::*;
#[allow(unused_imports)]
pub use uninitialized::*;

use crate::{ll, Config};

mod awake;
mod error;
mod fifo;
mod mode;
mod ready;
mod sending;
mod sleeping;
mod state_impls;
mod synth;
mod uninitialized;

/// Entry point to the AX5043 driver API
///
/// The driver owns the SPI device and a `CLOCK` that provides both the
/// [`Clock`] time source and the `DelayNs` sleep used by every bounded wait.
/// Its `State` parameter tracks at compile time whether the chip has been
/// initialized, is sending, or is powered down.
///
/// [`Clock`]: ../time/trait.Clock.html
pub struct AX5043<SPI, CLOCK, State> {
    ll: ll::AX5043<SPI>,
    clock: CLOCK,
    config: Config,
    mode: OperatingMode,
    ranged_frequency: Option<f64>,
    state: State,
}

// Can't be derived without putting requirements on `SPI` and `CLOCK`.
impl<SPI, CLOCK, State> fmt::Debug for AX5043<SPI, CLOCK, State>
where
    State: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AX5043 {{ state: ")?;
        self.state.fmt(f)?;
        write!(f, ", mode: {:?}, .. }}", self.mode)?;

        Ok(())
    }
}

impl<SPI, CLOCK, State> AX5043<SPI, CLOCK, State> {
    /// Move the driver into another state, keeping everything else
    fn into_state<Next>(self, state: Next) -> AX5043<SPI, CLOCK, Next> {
        AX5043 {
            ll: self.ll,
            clock: self.clock,
            config: self.config,
            mode: self.mode,
            ranged_frequency: self.ranged_frequency,
            state,
        }
    }
}
