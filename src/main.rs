//! midiroute firmware entry point (nRF52840).
//!
//! Brings up the SSD1306 over TWIM and the MIDI UARTE, spawns the button
//! and UART tasks, then runs the menu loop once per `TICK_MS`.

#![no_std]
#![no_main]

use defmt::{info, unwrap};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{AnyPin, Pin};
use embassy_nrf::uarte::{self, UarteRx, UarteTx};
use embassy_nrf::{bind_interrupts, peripherals, twim};
use embassy_time::{Duration, Instant, Ticker};
use panic_probe as _;

use midiroute::config::{DEVICES, TICK_MS};
use midiroute::midi::uart::{self as midi_uart, ChannelMidiIn, ChannelMidiOut, MIDI_IN, MIDI_OUT};
use midiroute::ticks::{Clock, Ticks};
use midiroute::ui::buttons::{self, ChannelInput, BUTTONS};
use midiroute::ui::display::{self, OledRenderer};
use midiroute::ui::ButtonEvent;
use midiroute::{Registry, Session};

bind_interrupts!(struct Irqs {
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
    UARTE0_UART0 => uarte::InterruptHandler<peripherals::UARTE0>;
});

/// Embassy time driver as the session clock.
struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Ticks {
        Ticks::from_millis(Instant::now().as_millis())
    }
}

#[embassy_executor::task(pool_size = 4)]
async fn button(pin: AnyPin, event: ButtonEvent) -> ! {
    buttons::button_task(pin, event, BUTTONS.sender()).await
}

#[embassy_executor::task]
async fn midi_rx(rx: UarteRx<'static, peripherals::UARTE0>) -> ! {
    midi_uart::rx_task(rx, MIDI_IN.sender()).await
}

#[embassy_executor::task]
async fn midi_tx(tx: UarteTx<'static, peripherals::UARTE0>) -> ! {
    midi_uart::tx_task(tx, MIDI_OUT.receiver()).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("midiroute starting on nRF52840");

    let registry = unwrap!(Registry::from_config(&DEVICES));
    for (i, device) in registry.iter().enumerate() {
        info!(
            "T{} ch {}: {} ({} banks, bank {})",
            i,
            device.midi_channel,
            device.name,
            device.max_bank,
            device.selected_bank()
        );
    }

    // Display
    let i2c = twim::Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let mut renderer = OledRenderer::new(unwrap!(display::init(i2c)));

    // MIDI DIN
    let mut uart_config = uarte::Config::default();
    uart_config.parity = uarte::Parity::EXCLUDED;
    uart_config.baudrate = uarte::Baudrate::BAUD31250;
    let uart = uarte::Uarte::new(p.UARTE0, Irqs, p.P0_08, p.P0_06, uart_config);
    let (tx, rx) = uart.split();
    unwrap!(spawner.spawn(midi_rx(rx)));
    unwrap!(spawner.spawn(midi_tx(tx)));

    // Buttons
    unwrap!(spawner.spawn(button(p.P0_11.degrade(), ButtonEvent::Cancel)));
    unwrap!(spawner.spawn(button(p.P0_12.degrade(), ButtonEvent::Left)));
    unwrap!(spawner.spawn(button(p.P0_24.degrade(), ButtonEvent::Right)));
    unwrap!(spawner.spawn(button(p.P0_25.degrade(), ButtonEvent::Ok)));

    let clock = SystemClock;
    let mut session = Session::new(registry, &clock);
    let mut input = ChannelInput::new(BUTTONS.receiver());
    let mut midi_in = ChannelMidiIn::new(MIDI_IN.receiver());
    let mut midi_out = ChannelMidiOut::new(MIDI_OUT.sender());

    info!(
        "Ready, output channel {}",
        session.menu().selected_channel(session.registry()) + 1
    );

    let mut ticker = Ticker::every(Duration::from_millis(TICK_MS));
    loop {
        session.tick(&mut input, &mut midi_in, &mut midi_out, &mut renderer, &clock);
        ticker.next().await;
    }
}
