pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Ultrasonic ranging port. Returns the measured distance in centimeters.
///
/// A reading of 0.0 (echo never came back within `timeout`) is a valid
/// return value and means "nothing in front of the sensor", not an error.
pub trait RangeFinder {
    fn measure(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<f32, Box<dyn std::error::Error + Send + Sync>>;
}

/// Analog soil-moisture probe. Returns one raw ADC sample (10-bit, 0..=1023).
pub trait MoistureProbe {
    fn read_raw(&mut self) -> Result<u16, Box<dyn std::error::Error + Send + Sync>>;
}

/// Diverter servo port. Commands an absolute horn angle in degrees.
pub trait Diverter {
    fn move_to(&mut self, angle_deg: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Connectivity provider: an open publish channel to the telemetry backend.
///
/// Implementations own session management; callers only ever see
/// connect / is_connected / publish. Reconnection policy (backoff, retry)
/// lives with the caller, which blocks until `connect` succeeds.
pub trait Connectivity {
    fn connect(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn is_connected(&self) -> bool;
    fn publish(
        &mut self,
        topic: &str,
        payload: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

// Boxed trait objects forward to the inner implementation, so cores can be
// generic over either concrete ports or `Box<dyn ...>`.

impl<T: RangeFinder + ?Sized> RangeFinder for Box<T> {
    fn measure(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
        (**self).measure(timeout)
    }
}

impl<T: MoistureProbe + ?Sized> MoistureProbe for Box<T> {
    fn read_raw(&mut self) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read_raw()
    }
}

impl<T: Diverter + ?Sized> Diverter for Box<T> {
    fn move_to(&mut self, angle_deg: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).move_to(angle_deg)
    }
}

impl<T: Connectivity + ?Sized> Connectivity for Box<T> {
    fn connect(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).connect()
    }
    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
    fn publish(
        &mut self,
        topic: &str,
        payload: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).publish(topic, payload)
    }
}
