//! `log` backend writing text lines to a [`ByteTx`].
//!
//! Records are formatted as `LEVEL target: message\r\n`. The transmitter is
//! taken out of its slot for the duration of a write, so interrupts stay
//! enabled while bytes go out and the tick counter keeps counting. A record
//! logged while another write is in progress (from an interrupt handler) is
//! dropped.

use core::cell::RefCell;
use core::fmt::Write;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::hal::{ByteTx, TxWriter};
use crate::sync::{self, Mutex};

pub struct TxLogger<T> {
    tx: Mutex<RefCell<Option<T>>>,
    level: LevelFilter,
}

impl<T: ByteTx + Send> TxLogger<T> {
    /// A logger with no transmitter attached yet. Records up to `level`
    /// are written once one is.
    pub const fn new(level: LevelFilter) -> Self {
        Self {
            tx: Mutex::new(RefCell::new(None)),
            level,
        }
    }

    /// Hand the transmitter to the logger.
    pub fn attach(&self, tx: T) {
        sync::critical_section(|cs| {
            self.tx.borrow_ref_mut(cs).replace(tx);
        });
    }

    /// Take the transmitter back.
    pub fn detach(&self) -> Option<T> {
        sync::critical_section(|cs| self.tx.borrow_ref_mut(cs).take())
    }

    /// Send `s` as is, bypassing level filtering and formatting. Dropped
    /// when no transmitter is attached.
    pub fn write_raw(&self, s: &str) {
        if let Some(mut tx) = self.detach() {
            tx.send_str(s);
            self.attach(tx);
        }
    }

    /// Maximum level written.
    pub fn level(&self) -> LevelFilter {
        self.level
    }
}

impl<T: ByteTx + Send> Log for TxLogger<T> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let Some(mut tx) = self.detach() else {
            return;
        };
        let mut out = TxWriter(&mut tx);
        let _ = write!(
            out,
            "{} {}: {}\r\n",
            record.level(),
            record.target(),
            record.args()
        );
        self.attach(tx);
    }

    fn flush(&self) {}
}

/// Install `logger` as the global `log` backend.
pub fn init<T: ByteTx + Send>(logger: &'static TxLogger<T>) -> Result<(), SetLoggerError> {
    log::set_logger(logger)?;
    log::set_max_level(logger.level());
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use log::Level;
    use std::vec::Vec;

    #[derive(Default)]
    struct Capture(Vec<u8>);

    impl ByteTx for Capture {
        fn send_byte(&mut self, byte: u8) {
            self.0.push(byte);
        }
    }

    #[test]
    fn test_formats_record() {
        let logger = TxLogger::new(LevelFilter::Info);
        logger.attach(Capture::default());

        logger.log(
            &Record::builder()
                .args(format_args!("timebase up, {} tasks", 4))
                .level(Level::Info)
                .target("tickloop::kernel")
                .build(),
        );

        let tx = logger.detach().unwrap();
        assert_eq!(tx.0, b"INFO tickloop::kernel: timebase up, 4 tasks\r\n");
    }

    #[test]
    fn test_filters_by_level() {
        let logger = TxLogger::new(LevelFilter::Warn);
        logger.attach(Capture::default());

        logger.log(
            &Record::builder()
                .args(format_args!("chatty"))
                .level(Level::Debug)
                .target("t")
                .build(),
        );

        assert!(logger.detach().unwrap().0.is_empty());
    }

    #[test]
    fn test_raw_banners_interleave_with_records() {
        let logger = TxLogger::new(LevelFilter::Debug);
        logger.write_raw("lost\r\n");
        logger.attach(Capture::default());

        logger.write_raw("APP INIT OK\r\n");
        logger.log(
            &Record::builder()
                .args(format_args!("task #0 registered"))
                .level(Level::Debug)
                .target("tickloop::dispatcher")
                .build(),
        );
        logger.write_raw("APP MAIN START\r\n");

        let tx = logger.detach().unwrap();
        assert_eq!(
            tx.0,
            b"APP INIT OK\r\nDEBUG tickloop::dispatcher: task #0 registered\r\nAPP MAIN START\r\n"
        );
    }

    #[test]
    fn test_without_transmitter_is_silent() {
        let logger: TxLogger<Capture> = TxLogger::new(LevelFilter::Trace);
        logger.log(
            &Record::builder()
                .args(format_args!("dropped"))
                .level(Level::Error)
                .target("t")
                .build(),
        );
        assert!(logger.detach().is_none());
    }
}
