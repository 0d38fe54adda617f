use esp_hal::gpio::AnyPin;
use esp_hal::{
    Blocking,
    analog::adc::{Adc, AdcConfig, AdcPin, Attenuation},
    delay::Delay,
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    i2c::master::{Config as I2cConfig, I2c},
    peripherals::{ADC1, GPIO36, I2C0},
    time::Rate,
};

use crate::config;

const I2C_FREQ_KHZ: u32 = 400;

/// VL53L0X default address
pub const TOF_ADDRESS: u8 = 0x29;

// esp-hal hands out one type per GPIO, so the binaries pick peripherals by
// name. Keep those names in step with the pin map.
const _: () = {
    assert!(config::TRIGGER_PIN == 5, "main.rs passes GPIO5 as trigger");
    assert!(config::ECHO_PIN == 18, "main.rs passes GPIO18 as echo");
    assert!(config::VIBRATOR_PIN == 4, "main.rs passes GPIO4 as vibrator");
    assert!(config::I2C_SDA_PIN == 21, "GPIO21 is passed as SDA");
    assert!(config::I2C_SCL_PIN == 22, "GPIO22 is passed as SCL");
    assert!(config::BATTERY_MONITOR_PIN.gpio() == 36, "battery ADC expects GPIO36");
};

/// HC-SR04 trigger/echo lines. Pulse timing lives in the sensor driver.
pub struct RangingHardware<'a> {
    pub trigger: Output<'a>,
    pub echo: Input<'a>,
}

impl<'a> RangingHardware<'a> {
    pub fn new<TRIG, ECHO>(trigger_gpio: TRIG, echo_gpio: ECHO) -> Self
    where
        TRIG: Into<AnyPin<'a>>,
        ECHO: Into<AnyPin<'a>>,
    {
        let trigger_pin: AnyPin<'a> = trigger_gpio.into();
        let echo_pin: AnyPin<'a> = echo_gpio.into();

        // GPIO5 is a strapping pin; hold it low once out of reset
        let trigger = Output::new(trigger_pin, Level::Low, OutputConfig::default());
        let echo = Input::new(echo_pin, InputConfig::default().with_pull(Pull::Down));

        Self { trigger, echo }
    }
}

pub struct VibratorHardware<'a> {
    motor: Output<'a>,
    delay: Delay,
}

impl<'a> VibratorHardware<'a> {
    pub fn new<MOTOR>(motor_gpio: MOTOR) -> Self
    where
        MOTOR: Into<AnyPin<'a>>,
    {
        let motor = Output::new(motor_gpio.into(), Level::Low, OutputConfig::default());

        Self {
            motor,
            delay: Delay::new(),
        }
    }

    pub fn set_active(&mut self, active: bool) {
        self.motor.set_level(Level::from(active));
    }

    pub fn is_active(&self) -> bool {
        self.motor.is_set_high()
    }

    /// Blocking on/off pulse
    pub fn pulse(&mut self, on_ms: u32) {
        self.set_active(true);
        self.delay.delay_millis(on_ms);
        self.set_active(false);
    }
}

/// Shared I2C bus (time-of-flight sensor)
pub struct BusHardware<'a> {
    pub i2c: I2c<'a, Blocking>,
}

impl<'a> BusHardware<'a> {
    pub fn new<SDA, SCL>(i2c_periph: I2C0<'a>, sda: SDA, scl: SCL) -> Result<Self, &'static str>
    where
        SDA: Into<AnyPin<'a>>,
        SCL: Into<AnyPin<'a>>,
    {
        let i2c = I2c::new(
            i2c_periph,
            I2cConfig::default().with_frequency(Rate::from_khz(I2C_FREQ_KHZ)),
        )
        .map_err(|_| "Invalid I2C configuration")?
        .with_sda(sda.into())
        .with_scl(scl.into());

        Ok(Self { i2c })
    }

    pub fn has_device(&mut self, addr: u8) -> bool {
        self.i2c.write(addr, &[]).is_ok()
    }

    /// Addresses that ACK an empty write
    pub fn scan(&mut self) -> heapless::Vec<u8, 16> {
        let mut found = heapless::Vec::new();
        for addr in 0x03..=0x77 {
            if self.has_device(addr) && found.push(addr).is_err() {
                break;
            }
        }
        found
    }
}

/// Battery divider on ADC1
pub struct BatteryHardware<'a> {
    adc: Adc<'a, ADC1<'a>, Blocking>,
    pin: AdcPin<GPIO36<'a>, ADC1<'a>>,
}

impl<'a> BatteryHardware<'a> {
    pub fn new(adc_periph: ADC1<'a>, gpio: GPIO36<'a>) -> Self {
        let mut adc_config = AdcConfig::new();
        let pin = adc_config.enable_pin(gpio, Attenuation::_11dB);
        let adc = Adc::new(adc_periph, adc_config);

        Self { adc, pin }
    }

    /// Raw 12-bit sample
    pub fn read_raw(&mut self) -> u16 {
        self.adc.read_blocking(&mut self.pin)
    }
}
