//! I2C bus scan
//!
//! Probes every 7-bit address on the cane's I2C bus and reports whether the
//! time-of-flight sensor answers.
//!
//! Following pins are used:
//! - SDA => GPIO21
//! - SCL => GPIO22

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use esp_backtrace as _;
use esp_hal::timer::timg::TimerGroup;

use navistick::{
    config::{I2C_SCL_PIN, I2C_SDA_PIN},
    hardware::{BusHardware, TOF_ADDRESS},
};

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_rtos::main]
async fn main(_spawner: Spawner) {
    esp_println::logger::init_logger_from_env();
    let peripherals = esp_hal::init(esp_hal::Config::default());
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    esp_println::println!(
        "I2C scan start (SDA=GPIO{}, SCL=GPIO{})",
        I2C_SDA_PIN,
        I2C_SCL_PIN
    );

    match BusHardware::new(peripherals.I2C0, peripherals.GPIO21, peripherals.GPIO22) {
        Ok(mut bus) => {
            let found = bus.scan();
            for address in found.iter() {
                esp_println::println!("Found device at address 0x{:02X}", address);
            }
            if found.contains(&TOF_ADDRESS) {
                esp_println::println!("Time-of-flight sensor OK");
            } else {
                esp_println::println!("Time-of-flight sensor missing at 0x{:02X}", TOF_ADDRESS);
            }
            esp_println::println!("I2C scan done, {} device(s)", found.len());
        }
        Err(e) => esp_println::println!("[ERROR] {}", e),
    }

    loop {
        Timer::after(Duration::from_millis(100)).await;
    }
}
