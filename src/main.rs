//! # Tickloop Demo Firmware
//!
//! Runs on an STM32F401 Nucleo-64. Three periodic tasks share one superloop:
//!
//! | Task | Period | Behavior |
//! |------|--------|----------|
//! | `task_1ms` | 1 ms | Counts its own runs (superloop health) |
//! | `task_50ms` | 50 ms | Reports uptime and 1 ms task rate every 10 s |
//! | `task_500ms` | 500 ms | Toggles the user LED |
//!
//! On reset the UART (38400 8N1, ST-LINK VCP) prints `APP INIT OK` once the
//! board is up, then the startup log, then `APP MAIN START` just before the
//! superloop takes over.

#![no_std]
#![no_main]

use core::cell::{Cell, RefCell};
use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m_rt::entry;
use log::{info, LevelFilter};
use panic_halt as _;

use tickloop::board::{Board, BoardPins, Gpio, Usart2Tx};
use tickloop::config::MAX_TASKS;
use tickloop::hal::{ByteTx, OutputPins};
use tickloop::logger::{self, TxLogger};
use tickloop::sync::{self, Mutex};
use tickloop::{kernel, Dispatcher, SoftTimer};

/// Status report interval for `task_50ms`.
const STATUS_INTERVAL_MS: u32 = 10_000;

static LOGGER: TxLogger<Usart2Tx> = TxLogger::new(LevelFilter::Debug);

/// Output pins, shared by the task handlers.
static PINS: Mutex<RefCell<Option<BoardPins>>> = Mutex::new(RefCell::new(None));

static FAST_RUNS: AtomicU32 = AtomicU32::new(0);

static STATUS_TIMER: Mutex<Cell<SoftTimer>> = Mutex::new(Cell::new(SoftTimer::new()));

// ---------------------------------------------------------------------------
// Task bodies
// ---------------------------------------------------------------------------

fn task_1ms() {
    FAST_RUNS.fetch_add(1, Ordering::Relaxed);
}

fn task_50ms() {
    let now = kernel::now_ms();
    let due = sync::critical_section(|cs| {
        let cell = STATUS_TIMER.borrow(cs);
        let mut timer = cell.get();
        let due = timer.is_elapsed_and_reset_at(now);
        cell.set(timer);
        due
    });

    if due {
        let runs = FAST_RUNS.swap(0, Ordering::Relaxed);
        info!(
            "uptime {} s, 1 ms task ran {} times in the last {} s",
            now.raw() / 1000,
            runs,
            STATUS_INTERVAL_MS / 1000
        );
    }
}

fn task_500ms() {
    sync::critical_section(|cs| {
        if let Some(pins) = PINS.borrow_ref_mut(cs).as_mut() {
            pins.toggle(Gpio::Led);
        }
    });
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

#[entry]
fn main() -> ! {
    let cp = cortex_m::Peripherals::take().unwrap();
    let Board { mut pins, mut uart } = Board::take().unwrap();

    pins.initialize_all();
    uart.send_str("APP INIT OK\r\n");

    // From here on the UART belongs to the logger.
    LOGGER.attach(uart);
    logger::init(&LOGGER).ok();

    let clock = kernel::init(cp.SYST);

    sync::critical_section(|cs| {
        PINS.borrow_ref_mut(cs).replace(pins);
        let mut status = SoftTimer::new();
        status.start_at(kernel::now_ms(), STATUS_INTERVAL_MS);
        STATUS_TIMER.borrow(cs).set(status);
    });

    let mut dispatcher: Dispatcher<MAX_TASKS> = Dispatcher::new();
    dispatcher
        .register_task(task_1ms, 1)
        .expect("Failed to register task_1ms");
    dispatcher
        .register_task(task_50ms, 50)
        .expect("Failed to register task_50ms");
    dispatcher
        .register_task(task_500ms, 500)
        .expect("Failed to register task_500ms");

    info!("{} tasks registered", dispatcher.len());
    LOGGER.write_raw("APP MAIN START\r\n");

    // Does not return
    dispatcher.run_forever(&clock)
}
