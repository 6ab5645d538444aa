//! GPIO button input with async debouncing.
//!
//! Four physical buttons (active-low with internal pull-up):
//!   - CANCEL - up one menu level
//!   - LEFT   - previous entry
//!   - RIGHT  - next entry
//!   - OK     - confirm / send
//!
//! Each button is handled by an async task that waits for a GPIO edge,
//! debounces it, and sends a `ButtonEvent` to the UI channel. The main
//! loop collects whatever arrived since the last tick through
//! [`ChannelInput`].

use crate::config::BUTTON_DEBOUNCE_MS;
use crate::ui::{ButtonEdges, ButtonEvent, InputSource};
use defmt::debug;
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_time::{Duration, Timer};

/// Depth of the button event queue.
pub const BUTTON_QUEUE: usize = 4;

/// Debounced button edges, filled by the button tasks.
pub static BUTTONS: Channel<CriticalSectionRawMutex, ButtonEvent, BUTTON_QUEUE> = Channel::new();

/// Run a single button polling loop.
///
/// Waits for the pin to go low (pressed), debounces, sends the event,
/// then waits for release before repeating.
pub async fn button_task(
    pin: AnyPin,
    event: ButtonEvent,
    tx: Sender<'static, CriticalSectionRawMutex, ButtonEvent, BUTTON_QUEUE>,
) -> ! {
    let mut btn = Input::new(pin, Pull::Up);

    loop {
        // Wait for falling edge (button press, active-low).
        btn.wait_for_falling_edge().await;

        // Debounce: wait and re-check.
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;

        if btn.is_low() {
            debug!("Button: {}", event);
            tx.send(event).await;

            // Wait for release to avoid repeat triggers.
            btn.wait_for_rising_edge().await;
            Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
        }
    }
}

/// [`InputSource`] draining the button channel without waiting.
pub struct ChannelInput {
    rx: Receiver<'static, CriticalSectionRawMutex, ButtonEvent, BUTTON_QUEUE>,
}

impl ChannelInput {
    pub fn new(rx: Receiver<'static, CriticalSectionRawMutex, ButtonEvent, BUTTON_QUEUE>) -> Self {
        Self { rx }
    }
}

impl InputSource for ChannelInput {
    fn poll(&mut self) -> ButtonEdges {
        let mut edges = ButtonEdges::NONE;
        while let Ok(event) = self.rx.try_receive() {
            edges.set(event);
        }
        edges
    }
}
