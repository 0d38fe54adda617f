// Model of the ranging data read on the cane

use core::fmt;

/// Which rangefinder produced a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSensor {
    /// Forward-facing HC-SR04
    Ultrasonic,
    /// Downward-facing VL53L0X on the I2C bus
    TimeOfFlight,
}

impl RangeSensor {
    pub const fn name(self) -> &'static str {
        match self {
            RangeSensor::Ultrasonic => "ultrasonic",
            RangeSensor::TimeOfFlight => "tof",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceReading {
    pub sensor: RangeSensor,
    pub distance_cm: u16,
}

impl DistanceReading {
    pub const fn new(sensor: RangeSensor, distance_cm: u16) -> Self {
        Self {
            sensor,
            distance_cm,
        }
    }
}

/// What a reading means for the person holding the cane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hazard {
    Clear,
    /// Something ahead, closer than the ultrasonic threshold
    Obstacle,
    /// Floor dropped away below the cane (stairs, kerb)
    Drop,
    /// No echo, or beyond the maximum ranging distance
    OutOfRange,
}

impl Hazard {
    pub const fn is_alert(self) -> bool {
        matches!(self, Hazard::Obstacle | Hazard::Drop)
    }
}

impl fmt::Display for Hazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Hazard::Clear => "clear",
            Hazard::Obstacle => "OBSTACLE",
            Hazard::Drop => "DROP",
            Hazard::OutOfRange => "no echo",
        };
        f.write_str(label)
    }
}
