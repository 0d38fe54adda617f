#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use esp_backtrace as _;
use esp_hal::{rng::Rng, timer::timg::TimerGroup};

use navistick::{
    config::{DEVICE_CONFIG, DeviceConfig},
    hardware::{BatteryHardware, BusHardware, RangingHardware, TOF_ADDRESS, VibratorHardware},
    network,
};

/// Heartbeat every 25 telemetry periods
const HEART_BEAT_TICKS: u64 = 25;
const BOOT_PULSE_MS: u64 = 150;

esp_bootloader_esp_idf::esp_app_desc!();

#[embassy_executor::task]
async fn run_heartbeat(config: &'static DeviceConfig) {
    let interval = config.server.send_interval_ms * HEART_BEAT_TICKS;
    loop {
        esp_println::println!("[HEARTBEAT] System is alive");
        Timer::after(Duration::from_millis(interval)).await;
    }
}

async fn halt() -> ! {
    loop {
        Timer::after(Duration::from_secs(1)).await;
    }
}

#[esp_rtos::main]
async fn main(spawner: Spawner) {
    esp_println::logger::init_logger_from_env();
    let peripherals = esp_hal::init(esp_hal::Config::default());
    esp_alloc::heap_allocator!(size: 72 * 1024);

    esp_println::println!("=== NaviStick ===");

    // Initialize RTOS timer for embassy
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let config: &'static DeviceConfig = &DEVICE_CONFIG;
    config.log_summary();

    if let Err(e) = config.validate() {
        log::error!("[FATAL] Configuration error: {}", e);
        halt().await;
    }

    if let Err(e) = spawner.spawn(run_heartbeat(config)) {
        esp_println::println!("[ERROR] Failed to spawn task: {:?}", e);
    }

    // Claim every pin in its electrical mode before anything else runs
    let _ranging = RangingHardware::new(peripherals.GPIO5, peripherals.GPIO18);
    let mut vibrator = VibratorHardware::new(peripherals.GPIO4);
    let mut battery = BatteryHardware::new(peripherals.ADC1, peripherals.GPIO36);

    match BusHardware::new(peripherals.I2C0, peripherals.GPIO21, peripherals.GPIO22) {
        Ok(mut bus) => {
            if bus.has_device(TOF_ADDRESS) {
                log::info!("[I2C] Time-of-flight sensor at 0x{:02X}", TOF_ADDRESS);
            } else {
                log::warn!("[I2C] No time-of-flight sensor at 0x{:02X}", TOF_ADDRESS);
            }
        }
        Err(e) => log::error!("[I2C] Bus init failed: {}", e),
    }

    log::info!("[BATTERY] Raw ADC: {}", battery.read_raw());

    // One short buzz so the user knows the cane is up
    vibrator.set_active(true);
    Timer::after(Duration::from_millis(BOOT_PULSE_MS)).await;
    vibrator.set_active(false);

    if config.wifi.is_empty() {
        log::warn!("[WIFI] No credentials configured, staying offline");
    } else {
        let seed = {
            let rng = Rng::new();
            (u64::from(rng.random()) << 32) | u64::from(rng.random())
        };
        match network::init_network(spawner, config.wifi, peripherals.WIFI, seed) {
            Ok(stack) => {
                network::wait_for_address(stack, config).await;
            }
            Err(e) => log::error!("[WIFI] {}", e),
        }
    }

    halt().await
}
