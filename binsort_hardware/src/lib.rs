pub mod error;
#[cfg(feature = "hardware")]
pub mod hc_sr04;
pub mod util;

use binsort_traits::{Connectivity, Diverter, MoistureProbe, RangeFinder};

/// Simulated ultrasonic range finder.
///
/// Reads out of range most of the time and drops an object into the
/// detection window every `period`-th call, so the full pipeline can be
/// exercised without hardware.
pub struct SimulatedRangeFinder {
    calls: u32,
    period: u32,
}

impl SimulatedRangeFinder {
    pub fn new() -> Self {
        Self::with_period(4)
    }

    pub fn with_period(period: u32) -> Self {
        Self {
            calls: 0,
            period: period.max(1),
        }
    }
}

impl Default for SimulatedRangeFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeFinder for SimulatedRangeFinder {
    fn measure(
        &mut self,
        _timeout: std::time::Duration,
    ) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
        self.calls += 1;
        let d = if self.calls % self.period == 0 {
            12.0
        } else {
            40.0
        };
        println!("Reading distance (simulated): {d:.1} cm");
        Ok(d)
    }
}

/// Simulated soil-moisture probe alternating between a wet and a dry
/// object on successive 5-sample bursts.
pub struct SimulatedMoistureProbe {
    reads: u32,
}

impl SimulatedMoistureProbe {
    pub fn new() -> Self {
        Self { reads: 0 }
    }
}

impl Default for SimulatedMoistureProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MoistureProbe for SimulatedMoistureProbe {
    fn read_raw(&mut self) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        let burst = self.reads / 5;
        self.reads += 1;
        let raw = if burst % 2 == 0 { 620 } else { 940 };
        Ok(raw)
    }
}

/// Simulated diverter servo.
pub struct SimulatedDiverter;

impl Diverter for SimulatedDiverter {
    fn move_to(&mut self, angle_deg: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        println!("Diverter moved to {angle_deg} deg (simulated)");
        Ok(())
    }
}

/// Loopback connectivity: accepts every publish and logs it locally.
/// Stands in for the broker session on development machines.
pub struct LoopbackConnectivity {
    connected: bool,
}

impl LoopbackConnectivity {
    pub fn new() -> Self {
        Self { connected: false }
    }
}

impl Default for LoopbackConnectivity {
    fn default() -> Self {
        Self::new()
    }
}

impl Connectivity for LoopbackConnectivity {
    fn connect(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.connected = true;
        tracing::info!("loopback link established");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn publish(
        &mut self,
        topic: &str,
        payload: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !self.connected {
            return Err(Box::new(error::HwError::Gpio("not connected".into())));
        }
        println!("[{topic}] {payload}");
        Ok(())
    }
}

#[cfg(feature = "hardware")]
pub struct HardwareRangeFinder {
    sensor: hc_sr04::HcSr04,
}

#[cfg(feature = "hardware")]
impl HardwareRangeFinder {
    pub fn new(trigger_pin: u8, echo_pin: u8) -> Result<Self, error::HwError> {
        Ok(Self {
            sensor: hc_sr04::HcSr04::new(trigger_pin, echo_pin)?,
        })
    }
}

#[cfg(feature = "hardware")]
impl RangeFinder for HardwareRangeFinder {
    fn measure(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
        match self.sensor.measure_cm(timeout) {
            Ok(d) => {
                tracing::debug!(distance_cm = d, "hc-sr04 sample");
                Ok(d)
            }
            // A missing echo is "nothing in front of the sensor".
            Err(error::HwError::EchoTimeout) => Ok(0.0),
            Err(e) => {
                tracing::error!("range read error: {}", e);
                Err(Box::new(e))
            }
        }
    }
}

#[cfg(feature = "hardware")]
pub struct HardwareMoistureProbe {
    adc: adc::Mcp3008,
    channel: u8,
}

#[cfg(feature = "hardware")]
impl HardwareMoistureProbe {
    pub fn new(channel: u8) -> Result<Self, error::HwError> {
        Ok(Self {
            adc: adc::Mcp3008::new()?,
            channel,
        })
    }
}

#[cfg(feature = "hardware")]
impl MoistureProbe for HardwareMoistureProbe {
    fn read_raw(&mut self) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        let raw = self.adc.read(self.channel)?;
        tracing::trace!(raw, "soil probe sample");
        Ok(raw)
    }
}

#[cfg(feature = "hardware")]
pub struct HardwareDiverter {
    servo: servo::Servo,
}

#[cfg(feature = "hardware")]
impl HardwareDiverter {
    /// The servo must sit on a hardware-PWM pin (GPIO 18 or 19).
    pub fn new(servo_pin: u8) -> Result<Self, error::HwError> {
        Ok(Self {
            servo: servo::Servo::new(servo_pin)?,
        })
    }
}

#[cfg(feature = "hardware")]
impl Diverter for HardwareDiverter {
    fn move_to(&mut self, angle_deg: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.servo.set_angle(angle_deg)?;
        Ok(())
    }
}

#[cfg(feature = "hardware")]
mod servo {
    use crate::error::HwError;
    use rppal::pwm::{Channel, Polarity, Pwm};
    use std::time::Duration;

    const PERIOD: Duration = Duration::from_millis(20); // 50 Hz
    const PULSE_MIN_US: u64 = 500; // 0 deg
    const PULSE_MAX_US: u64 = 2500; // 180 deg

    pub struct Servo {
        pwm: Pwm,
    }

    impl Servo {
        pub fn new(servo_pin: u8) -> Result<Self, HwError> {
            let channel = match servo_pin {
                18 => Channel::Pwm0,
                19 => Channel::Pwm1,
                other => {
                    return Err(HwError::Pwm(format!(
                        "servo pin must be GPIO 18 or 19, got {other}"
                    )));
                }
            };
            let pwm = Pwm::with_period(
                channel,
                PERIOD,
                Duration::from_micros(PULSE_MIN_US),
                Polarity::Normal,
                true,
            )
            .map_err(|e| HwError::Pwm(e.to_string()))?;
            Ok(Servo { pwm })
        }

        pub fn set_angle(&mut self, angle_deg: u8) -> Result<(), HwError> {
            let deg = u64::from(angle_deg.min(180));
            let pulse_us = PULSE_MIN_US + (PULSE_MAX_US - PULSE_MIN_US) * deg / 180;
            self.pwm
                .set_pulse_width(Duration::from_micros(pulse_us))
                .map_err(|e| HwError::Pwm(e.to_string()))
        }
    }
}

#[cfg(feature = "hardware")]
mod adc {
    use crate::error::HwError;
    use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

    pub struct Mcp3008 {
        spi: Spi,
    }

    impl Mcp3008 {
        pub fn new() -> Result<Self, HwError> {
            let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, 1_000_000, Mode::Mode0)
                .map_err(|e| HwError::Spi(e.to_string()))?;
            Ok(Mcp3008 { spi })
        }

        /// Single-ended read of one channel, 10-bit result.
        pub fn read(&mut self, channel: u8) -> Result<u16, HwError> {
            let tx = [0x01, (0x08 | (channel & 0x07)) << 4, 0x00];
            let mut rx = [0u8; 3];
            self.spi
                .transfer(&mut rx, &tx)
                .map_err(|e| HwError::Spi(e.to_string()))?;
            Ok((u16::from(rx[1] & 0x03) << 8) | u16::from(rx[2]))
        }
    }
}
