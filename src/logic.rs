//! Hazard classification (hardware-independent)

use crate::config::RangingConfig;
use crate::model::{DistanceReading, Hazard, RangeSensor};
use core::fmt::Write;

const WINDOW: usize = 5;

/// Classify a single reading against the configured thresholds.
pub fn classify(reading: DistanceReading, ranging: &RangingConfig) -> Hazard {
    let distance = reading.distance_cm;
    if distance == 0 || distance > ranging.max_distance_cm {
        return Hazard::OutOfRange;
    }

    match reading.sensor {
        RangeSensor::Ultrasonic if distance < ranging.ultrasonic_threshold_cm => Hazard::Obstacle,
        RangeSensor::TimeOfFlight if distance > ranging.tof_threshold_cm => Hazard::Drop,
        _ => Hazard::Clear,
    }
}

/// Rolling window over one sensor's in-range readings
pub struct RangeFilter {
    sensor: RangeSensor,
    readings: [Option<u16>; WINDOW],
    reading_index: usize,
}

impl RangeFilter {
    pub fn new(sensor: RangeSensor) -> Self {
        Self {
            sensor,
            readings: [None; WINDOW],
            reading_index: 0,
        }
    }

    pub fn sensor(&self) -> RangeSensor {
        self.sensor
    }

    /// Record a distance. Out-of-range samples are dropped and reported as such.
    pub fn record(&mut self, distance_cm: u16, ranging: &RangingConfig) -> Hazard {
        let reading = DistanceReading::new(self.sensor, distance_cm);
        let hazard = classify(reading, ranging);
        if hazard != Hazard::OutOfRange {
            self.readings[self.reading_index] = Some(distance_cm);
            self.reading_index = (self.reading_index + 1) % WINDOW;
        }
        hazard
    }

    /// Rounded mean of the recorded readings
    pub fn average_cm(&self) -> Option<u16> {
        let mut sum: u32 = 0;
        let mut count: u32 = 0;

        for distance in self.readings.iter().flatten() {
            sum += u32::from(*distance);
            count += 1;
        }

        if count == 0 {
            None
        } else {
            Some(((sum + count / 2) / count) as u16)
        }
    }

    /// Hazard for the smoothed distance
    pub fn hazard(&self, ranging: &RangingConfig) -> Option<Hazard> {
        self.average_cm()
            .map(|avg| classify(DistanceReading::new(self.sensor, avg), ranging))
    }

    pub fn clear(&mut self) {
        self.readings = [None; WINDOW];
        self.reading_index = 0;
    }
}

/// Format a reading for the serial console
pub fn format_alert(reading: &DistanceReading, hazard: Hazard) -> heapless::String<48> {
    let mut buffer = heapless::String::new();
    let _ = write!(
        buffer,
        "{} {}cm {}",
        reading.sensor.name(),
        reading.distance_cm,
        hazard
    );
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEVICE_CONFIG;

    fn ranging() -> RangingConfig {
        DEVICE_CONFIG.ranging
    }

    fn ultrasonic(cm: u16) -> DistanceReading {
        DistanceReading::new(RangeSensor::Ultrasonic, cm)
    }

    fn tof(cm: u16) -> DistanceReading {
        DistanceReading::new(RangeSensor::TimeOfFlight, cm)
    }

    #[test]
    fn ultrasonic_below_threshold_is_obstacle() {
        assert_eq!(classify(ultrasonic(45), &ranging()), Hazard::Obstacle);
        assert_eq!(classify(ultrasonic(99), &ranging()), Hazard::Obstacle);
        assert_eq!(classify(ultrasonic(100), &ranging()), Hazard::Clear);
        assert_eq!(classify(ultrasonic(250), &ranging()), Hazard::Clear);
    }

    #[test]
    fn tof_beyond_threshold_is_drop() {
        assert_eq!(classify(tof(30), &ranging()), Hazard::Clear);
        assert_eq!(classify(tof(50), &ranging()), Hazard::Clear);
        assert_eq!(classify(tof(51), &ranging()), Hazard::Drop);
        assert_eq!(classify(tof(80), &ranging()), Hazard::Drop);
    }

    #[test]
    fn zero_and_beyond_max_are_out_of_range() {
        assert_eq!(classify(ultrasonic(0), &ranging()), Hazard::OutOfRange);
        assert_eq!(classify(ultrasonic(401), &ranging()), Hazard::OutOfRange);
        assert_eq!(classify(tof(0), &ranging()), Hazard::OutOfRange);
        assert_eq!(classify(ultrasonic(400), &ranging()), Hazard::Clear);
    }

    #[test]
    fn thresholds_follow_config() {
        let custom = RangingConfig {
            max_distance_cm: 200,
            ultrasonic_threshold_cm: 150,
            tof_threshold_cm: 20,
        };
        assert_eq!(classify(ultrasonic(120), &custom), Hazard::Obstacle);
        assert_eq!(classify(tof(30), &custom), Hazard::Drop);
        assert_eq!(classify(ultrasonic(300), &custom), Hazard::OutOfRange);
    }

    #[test]
    fn empty_filter_has_no_average() {
        let filter = RangeFilter::new(RangeSensor::Ultrasonic);
        assert_eq!(filter.average_cm(), None);
        assert_eq!(filter.hazard(&ranging()), None);
    }

    #[test]
    fn filter_averages_and_rounds() {
        let mut filter = RangeFilter::new(RangeSensor::Ultrasonic);
        filter.record(90, &ranging());
        filter.record(95, &ranging());
        assert_eq!(filter.average_cm(), Some(93));
        assert_eq!(filter.hazard(&ranging()), Some(Hazard::Obstacle));
    }

    #[test]
    fn filter_window_rolls_over() {
        let mut filter = RangeFilter::new(RangeSensor::Ultrasonic);
        for _ in 0..WINDOW {
            filter.record(50, &ranging());
        }
        for _ in 0..WINDOW {
            filter.record(300, &ranging());
        }
        assert_eq!(filter.average_cm(), Some(300));
        assert_eq!(filter.hazard(&ranging()), Some(Hazard::Clear));
    }

    #[test]
    fn filter_skips_out_of_range_samples() {
        let mut filter = RangeFilter::new(RangeSensor::TimeOfFlight);
        assert_eq!(filter.record(0, &ranging()), Hazard::OutOfRange);
        assert_eq!(filter.record(1000, &ranging()), Hazard::OutOfRange);
        assert_eq!(filter.average_cm(), None);

        assert_eq!(filter.record(70, &ranging()), Hazard::Drop);
        assert_eq!(filter.average_cm(), Some(70));

        filter.clear();
        assert_eq!(filter.average_cm(), None);
    }

    #[test]
    fn alert_line_names_sensor_distance_and_hazard() {
        let reading = ultrasonic(45);
        let line = format_alert(&reading, classify(reading, &ranging()));
        assert_eq!(line.as_str(), "ultrasonic 45cm OBSTACLE");

        let reading = tof(80);
        let line = format_alert(&reading, classify(reading, &ranging()));
        assert_eq!(line.as_str(), "tof 80cm DROP");
    }

    #[test]
    fn only_obstacles_and_drops_alert() {
        assert!(Hazard::Obstacle.is_alert());
        assert!(Hazard::Drop.is_alert());
        assert!(!Hazard::Clear.is_alert());
        assert!(!Hazard::OutOfRange.is_alert());
    }
}
