//! Test doubles shared by the unit tests

use embedded_hal_mock::eh1::spi::Transaction as SpiTransaction;

use crate::{
    ll::{Register, PLLRANGINGA, PWRMODE, XTALSTATUS},
    time::{Clock, Instant},
};

/// A clock that moves forward by `step` every time it is read
///
/// Delays advance it by the requested amount, so bounded waits terminate
/// after a predictable number of polls.
#[derive(Debug, Default)]
pub struct FakeClock {
    pub now: u64,
    pub step: u64,
    pub yields: usize,
}

impl FakeClock {
    pub fn new(step: u64) -> Self {
        FakeClock {
            step,
            ..Default::default()
        }
    }
}

impl Clock for FakeClock {
    fn now(&mut self) -> Instant {
        self.now += self.step;
        Instant::from_micros(self.now)
    }

    fn yield_now(&mut self) {
        self.yields += 1;
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::delay::DelayNs for FakeClock {
    async fn delay_ns(&mut self, ns: u32) {
        self.now += u64::from(ns) / 1_000;
    }
}

#[cfg(not(feature = "async"))]
impl embedded_hal::delay::DelayNs for FakeClock {
    fn delay_ns(&mut self, ns: u32) {
        self.now += u64::from(ns) / 1_000;
    }
}

fn header(write: bool, addr: u16) -> Vec<u8> {
    let rw = (write as u8) << 7;

    if addr < 0x70 {
        vec![rw | addr as u8]
    } else {
        vec![rw | 0x70 | (addr >> 8) as u8, addr as u8]
    }
}

/// A register read returning `value`
pub fn read(addr: u16, value: u8) -> Vec<SpiTransaction<u8>> {
    let mut request = header(false, addr);
    let mut response = vec![0; request.len()];
    request.push(0);
    response.push(value);

    vec![
        SpiTransaction::transaction_start(),
        SpiTransaction::transfer_in_place(request, response),
        SpiTransaction::transaction_end(),
    ]
}

/// A plain register write
pub fn write(addr: u16, value: u8) -> Vec<SpiTransaction<u8>> {
    let mut bytes = header(true, addr);
    bytes.push(value);

    vec![
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(bytes),
        SpiTransaction::transaction_end(),
    ]
}

/// A register write followed by a readback of the same value
pub fn write_checked(addr: u16, value: u8) -> Vec<SpiTransaction<u8>> {
    [write(addr, value), read(addr, value)].concat()
}

/// Checked writes to consecutive registers
pub fn write_many(first: u16, values: &[u8]) -> Vec<SpiTransaction<u8>> {
    values
        .iter()
        .zip(first..)
        .flat_map(|(value, addr)| write_checked(addr, *value))
        .collect()
}

/// PLL ranging at the default power flags: standby, crystal running, start,
/// one busy poll, `result` as the final PLLRANGINGA value, standby again
pub fn pll_ranging(result: u8) -> Vec<SpiTransaction<u8>> {
    [
        write_checked(PWRMODE::ADDR, 0x65),
        read(XTALSTATUS::ADDR, 0x01),
        write(PLLRANGINGA::ADDR, 0x18),
        read(PLLRANGINGA::ADDR, 0x18),
        read(PLLRANGINGA::ADDR, result),
        write_checked(PWRMODE::ADDR, 0x65),
    ]
    .concat()
}
