use std::time::{Duration, Instant};

use tracing::trace;

use crate::error::{HwError, Result};
use crate::util::wait_for_level_with_timeout;

/// Speed of sound in air, cm per microsecond.
const SOUND_CM_PER_US: f32 = 0.034;
/// Upper bound on a plausible echo pulse; anything longer reads as a miss.
const MAX_ECHO: Duration = Duration::from_millis(40);

pub struct HcSr04 {
    trigger: rppal::gpio::OutputPin,
    echo: rppal::gpio::InputPin,
}

impl HcSr04 {
    pub fn new(trigger_pin: u8, echo_pin: u8) -> Result<Self> {
        let gpio = rppal::gpio::Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))?;
        let mut trigger = gpio
            .get(trigger_pin)
            .map_err(|e| HwError::Gpio(e.to_string()))?
            .into_output();
        let echo = gpio
            .get(echo_pin)
            .map_err(|e| HwError::Gpio(e.to_string()))?
            .into_input();
        trigger.set_low(); // trigger idle low
        Ok(Self { trigger, echo })
    }

    /// Fire a 10 us trigger pulse and time the echo. Sound covers the
    /// distance twice, at `SOUND_CM_PER_US`.
    pub fn measure_cm(&mut self, timeout: Duration) -> Result<f32> {
        self.trigger.set_low();
        spin_wait(Duration::from_micros(2));
        self.trigger.set_high();
        spin_wait(Duration::from_micros(10));
        self.trigger.set_low();

        // Rising edge of the echo pulse
        let echo = &self.echo;
        wait_for_level_with_timeout(|| echo.is_high(), timeout, Duration::ZERO)?;

        // Pulse width = round-trip time
        let start = Instant::now();
        while echo.is_high() {
            if start.elapsed() >= MAX_ECHO {
                return Err(HwError::EchoTimeout);
            }
            std::hint::spin_loop();
        }

        let duration_us = start.elapsed().as_micros() as f32;
        let distance_cm = duration_us * SOUND_CM_PER_US / 2.0;
        trace!(distance_cm, "hc-sr04 raw read");
        Ok(distance_cm)
    }
}

#[inline(always)]
fn spin_wait(d: Duration) {
    let deadline = Instant::now() + d;
    while Instant::now() < deadline {
        std::hint::spin_loop();
    }
}
