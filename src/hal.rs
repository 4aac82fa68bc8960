//! # Collaborator Interfaces
//!
//! The timebase calls out to two board services and knows nothing else about
//! the hardware:
//!
//! - [`OutputPins`]: logical output pins addressed by an opaque id
//! - [`ByteTx`]: a transmit-only byte stream for diagnostics
//!
//! [`PinTable`] implements [`OutputPins`] as a lookup table from a logical id
//! to an `embedded-hal` pin. Remapping a board means editing the table, not
//! the application.

use core::fmt;
use core::marker::PhantomData;

use embedded_hal::digital::StatefulOutputPin;

/// Logical pin level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl core::ops::Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Level {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Level::Low => defmt::write!(fmt, "Low"),
            Level::High => defmt::write!(fmt, "High"),
        }
    }
}

/// Output pin service over logical ids.
///
/// Pin operations have no failure signal: a driver error or an id outside the
/// table is ignored, and `read` reports [`Level::Low`].
pub trait OutputPins {
    type Id: Copy;

    /// Put every pin in its startup state.
    fn initialize_all(&mut self);

    fn write(&mut self, id: Self::Id, level: Level);

    fn toggle(&mut self, id: Self::Id);

    /// Currently driven level.
    fn read(&mut self, id: Self::Id) -> Level;
}

/// Fixed table mapping logical ids to physical output pins.
///
/// `Id` converts to the table index. Pins start low after
/// [`OutputPins::initialize_all`].
pub struct PinTable<Id, P, const N: usize> {
    pins: [P; N],
    _id: PhantomData<Id>,
}

impl<Id, P, const N: usize> PinTable<Id, P, N>
where
    Id: Copy + Into<usize>,
    P: StatefulOutputPin,
{
    /// Table over `pins`, indexed by `Id`. Pins are not touched until
    /// [`OutputPins::initialize_all`].
    pub const fn new(pins: [P; N]) -> Self {
        Self {
            pins,
            _id: PhantomData,
        }
    }

    fn pin(&mut self, id: Id) -> Option<&mut P> {
        self.pins.get_mut(id.into())
    }

    /// Hand the pins back.
    pub fn release(self) -> [P; N] {
        self.pins
    }
}

impl<Id, P, const N: usize> OutputPins for PinTable<Id, P, N>
where
    Id: Copy + Into<usize>,
    P: StatefulOutputPin,
{
    type Id = Id;

    fn initialize_all(&mut self) {
        for pin in self.pins.iter_mut() {
            let _ = pin.set_low();
        }
    }

    fn write(&mut self, id: Id, level: Level) {
        if let Some(pin) = self.pin(id) {
            let _ = match level {
                Level::High => pin.set_high(),
                Level::Low => pin.set_low(),
            };
        }
    }

    fn toggle(&mut self, id: Id) {
        if let Some(pin) = self.pin(id) {
            let _ = pin.toggle();
        }
    }

    fn read(&mut self, id: Id) -> Level {
        self.pin(id)
            .and_then(|pin| pin.is_set_high().ok())
            .map(Level::from)
            .unwrap_or(Level::Low)
    }
}

/// Transmit-only byte stream. Used for diagnostics during initialization,
/// never on a timing-critical path.
pub trait ByteTx {
    /// Send one byte, waiting for room in the transmitter if needed.
    fn send_byte(&mut self, byte: u8);

    fn send_str(&mut self, s: &str) {
        for byte in s.bytes() {
            self.send_byte(byte);
        }
    }
}

impl<T: ByteTx + ?Sized> ByteTx for &mut T {
    fn send_byte(&mut self, byte: u8) {
        (**self).send_byte(byte);
    }

    fn send_str(&mut self, s: &str) {
        (**self).send_str(s);
    }
}

/// `core::fmt::Write` on top of a [`ByteTx`], for `write!` formatting.
pub struct TxWriter<T>(pub T);

impl<T: ByteTx> fmt::Write for TxWriter<T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.send_str(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use core::convert::Infallible;
    use core::fmt::Write;
    use embedded_hal::digital::{ErrorType, OutputPin};
    use std::vec::Vec;

    struct FakePin {
        high: bool,
    }

    impl ErrorType for FakePin {
        type Error = Infallible;
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }
    }

    impl StatefulOutputPin for FakePin {
        fn is_set_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.high)
        }

        fn is_set_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.high)
        }
    }

    #[derive(Clone, Copy)]
    enum Gpio {
        Led,
        Buzzer,
        Missing,
    }

    impl From<Gpio> for usize {
        fn from(id: Gpio) -> usize {
            match id {
                Gpio::Led => 0,
                Gpio::Buzzer => 1,
                Gpio::Missing => 7,
            }
        }
    }

    fn table() -> PinTable<Gpio, FakePin, 2> {
        PinTable::new([FakePin { high: true }, FakePin { high: true }])
    }

    #[test]
    fn test_initialize_drives_low() {
        let mut pins = table();
        pins.initialize_all();
        assert_eq!(pins.read(Gpio::Led), Level::Low);
        assert_eq!(pins.read(Gpio::Buzzer), Level::Low);
    }

    #[test]
    fn test_write_and_toggle() {
        let mut pins = table();
        pins.initialize_all();

        pins.write(Gpio::Buzzer, Level::High);
        assert_eq!(pins.read(Gpio::Buzzer), Level::High);
        assert_eq!(pins.read(Gpio::Led), Level::Low);

        pins.toggle(Gpio::Led);
        assert_eq!(pins.read(Gpio::Led), Level::High);
        pins.toggle(Gpio::Led);
        assert_eq!(pins.read(Gpio::Led), Level::Low);
    }

    #[test]
    fn test_unknown_id_ignored() {
        let mut pins = table();
        pins.initialize_all();
        pins.write(Gpio::Missing, Level::High);
        pins.toggle(Gpio::Missing);
        assert_eq!(pins.read(Gpio::Missing), Level::Low);

        let [led, buzzer] = pins.release();
        assert!(!led.high && !buzzer.high);
    }

    #[test]
    fn test_level_helpers() {
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(!Level::High, Level::Low);
    }

    #[derive(Default)]
    struct Capture(Vec<u8>);

    impl ByteTx for Capture {
        fn send_byte(&mut self, byte: u8) {
            self.0.push(byte);
        }
    }

    #[test]
    fn test_send_str_and_writer() {
        let mut tx = Capture::default();
        tx.send_str("APP INIT OK\r\n");
        write!(TxWriter(&mut tx), "tick={}", 42).unwrap();
        assert_eq!(tx.0, b"APP INIT OK\r\ntick=42");
    }
}
