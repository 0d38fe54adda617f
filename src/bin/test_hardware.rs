#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use esp_backtrace as _;
use esp_hal::{rng::Rng, timer::timg::TimerGroup};

use navistick::{
    config::{DEVICE_CONFIG, DeviceConfig},
    hardware::{BusHardware, TOF_ADDRESS, VibratorHardware},
    logic::{RangeFilter, classify, format_alert},
    model::{DistanceReading, Hazard, RangeSensor},
    network,
};

esp_bootloader_esp_idf::esp_app_desc!();

// Test result tracking
struct TestResults {
    passed: u32,
    failed: u32,
    total: u32,
}

impl TestResults {
    fn new() -> Self {
        Self {
            passed: 0,
            failed: 0,
            total: 0,
        }
    }

    fn assert(&mut self, condition: bool, test_name: &str) {
        self.total += 1;
        if condition {
            self.passed += 1;
            esp_println::println!("  ✓ {}", test_name);
        } else {
            self.failed += 1;
            esp_println::println!("  ✗ {} FAILED", test_name);
        }
    }

    fn assert_eq<T: PartialEq + core::fmt::Debug>(&mut self, left: T, right: T, test_name: &str) {
        self.total += 1;
        if left == right {
            self.passed += 1;
            esp_println::println!("  ✓ {}", test_name);
        } else {
            self.failed += 1;
            esp_println::println!("  ✗ {} FAILED: {:?} != {:?}", test_name, left, right);
        }
    }

    fn print_summary(&self) {
        esp_println::println!("\n==========================================");
        esp_println::println!("Test Summary:");
        esp_println::println!("  Total:  {}", self.total);
        esp_println::println!("  Passed: {}", self.passed);
        esp_println::println!("  Failed: {}", self.failed);
        if self.failed == 0 {
            esp_println::println!("\n✓ ALL TESTS PASSED!");
        } else {
            esp_println::println!("\n✗ SOME TESTS FAILED");
        }
        esp_println::println!("==========================================");
    }
}

fn test_config(results: &mut TestResults, config: &DeviceConfig) {
    esp_println::println!("\n[TEST] Configuration Tests");

    if let Err(e) = config.validate() {
        esp_println::println!("    {}", e);
    }
    results.assert(config.validate().is_ok(), "startup self-check passes");

    let pins = config.pins.assignments();
    let mut distinct = true;
    for (i, (_, a)) in pins.iter().enumerate() {
        distinct &= pins[i + 1..].iter().all(|(_, b)| a != b);
    }
    results.assert(distinct, "pins pairwise distinct");

    results.assert(
        config.server.http_port != config.server.websocket_port,
        "http and websocket ports differ",
    );
    results.assert(
        config.ranging.ultrasonic_threshold_cm <= config.ranging.max_distance_cm,
        "ultrasonic threshold within range",
    );
    results.assert(
        config.ranging.tof_threshold_cm <= config.ranging.max_distance_cm,
        "tof threshold within range",
    );
    results.assert(config.server.send_interval_ms > 0, "send interval positive");
    results.assert_eq(
        config.wifi.ssid.is_empty(),
        config.wifi.password.is_empty(),
        "credentials fully set or empty",
    );
    results.assert_eq(*config, DEVICE_CONFIG, "re-read yields identical config");
}

fn test_classification(results: &mut TestResults, config: &DeviceConfig) {
    esp_println::println!("\n[TEST] Hazard Classification Tests");
    let ranging = &config.ranging;

    let cases = [
        (RangeSensor::Ultrasonic, 45, Hazard::Obstacle),
        (RangeSensor::Ultrasonic, 150, Hazard::Clear),
        (RangeSensor::TimeOfFlight, 30, Hazard::Clear),
        (RangeSensor::TimeOfFlight, 80, Hazard::Drop),
        (RangeSensor::Ultrasonic, 0, Hazard::OutOfRange),
    ];
    for (sensor, distance_cm, expected) in cases {
        let reading = DistanceReading::new(sensor, distance_cm);
        let hazard = classify(reading, ranging);
        results.assert_eq(hazard, expected, format_alert(&reading, expected).as_str());
    }

    let mut filter = RangeFilter::new(RangeSensor::Ultrasonic);
    for distance in [80, 90, 100] {
        filter.record(distance, ranging);
    }
    results.assert_eq(filter.sensor(), RangeSensor::Ultrasonic, "filter sensor kept");
    results.assert_eq(filter.average_cm(), Some(90), "filter average");
    results.assert_eq(
        filter.hazard(ranging),
        Some(Hazard::Obstacle),
        "filter hazard",
    );
}

async fn test_vibrator<MOTOR>(results: &mut TestResults, motor_gpio: MOTOR)
where
    MOTOR: Into<esp_hal::gpio::AnyPin<'static>>,
{
    esp_println::println!("\n[TEST] Vibrator Tests");

    let mut vibrator = VibratorHardware::new(motor_gpio);
    results.assert(!vibrator.is_active(), "vibrator starts off");

    vibrator.set_active(true);
    results.assert(vibrator.is_active(), "vibrator switches on");
    Timer::after(Duration::from_millis(200)).await;
    vibrator.set_active(false);
    results.assert(!vibrator.is_active(), "vibrator switches off");

    vibrator.pulse(100);
    results.assert(!vibrator.is_active(), "vibrator off after pulse");
}

fn test_i2c_bus<SDA, SCL>(
    results: &mut TestResults,
    i2c0: esp_hal::peripherals::I2C0<'static>,
    sda: SDA,
    scl: SCL,
) where
    SDA: Into<esp_hal::gpio::AnyPin<'static>>,
    SCL: Into<esp_hal::gpio::AnyPin<'static>>,
{
    esp_println::println!("\n[TEST] I2C Bus Tests");

    match BusHardware::new(i2c0, sda, scl) {
        Ok(mut bus) => {
            results.assert(true, "I2C bus initialization");
            let found = bus.scan();
            for addr in found.iter() {
                esp_println::println!("    Found device at 0x{:02X}", addr);
            }
            results.assert(found.contains(&TOF_ADDRESS), "time-of-flight sensor present");
        }
        Err(e) => {
            esp_println::println!("  Failed to initialize I2C: {}", e);
            results.assert(false, "I2C bus initialization");
        }
    }
}

async fn test_wifi_init(
    results: &mut TestResults,
    spawner: Spawner,
    config: &DeviceConfig,
    wifi: esp_hal::peripherals::WIFI<'static>,
) {
    esp_println::println!("\n[TEST] Wifi Init Tests");

    if config.wifi.is_empty() {
        esp_println::println!("  No credentials configured, skipping");
        return;
    }

    let rng = Rng::new();
    let seed = (u64::from(rng.random()) << 32) | u64::from(rng.random());

    // A rejected client config fails here, before any task is spawned
    match network::init_network(spawner, config.wifi, wifi, seed) {
        Ok(stack) => {
            results.assert(true, "wifi accepts client config");
            let joined = embassy_time::with_timeout(
                Duration::from_secs(20),
                network::wait_for_address(stack, config),
            )
            .await;
            results.assert(joined.is_ok(), "dhcp address within 20s");
        }
        Err(e) => {
            esp_println::println!("    {}", e);
            results.assert(false, "wifi accepts client config");
        }
    }
}

#[esp_rtos::main]
async fn main(spawner: Spawner) {
    esp_println::logger::init_logger_from_env();
    let peripherals = esp_hal::init(esp_hal::Config::default());
    esp_alloc::heap_allocator!(size: 72 * 1024);

    esp_println::println!("\n==========================================");
    esp_println::println!("=== Hardware Unit Test Runner ===");
    esp_println::println!("==========================================");

    let mut results = TestResults::new();
    let config = &DEVICE_CONFIG;

    // Run tests that don't need hardware
    test_config(&mut results, config);
    test_classification(&mut results, config);

    // Initialize RTOS timer for embassy (this consumes TIMG0)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Run hardware tests
    test_vibrator(&mut results, peripherals.GPIO4).await;
    test_i2c_bus(&mut results, peripherals.I2C0, peripherals.GPIO21, peripherals.GPIO22);
    test_wifi_init(&mut results, spawner, config, peripherals.WIFI).await;

    results.print_summary();

    esp_println::println!("\nTest run complete. Looping...");
    loop {
        Timer::after(Duration::from_millis(1000)).await;
    }
}
