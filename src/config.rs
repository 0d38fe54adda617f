//! Device configuration (hardware-independent)
//!
//! Single source of truth for the Wi-Fi credentials, the pin map, the
//! ranging thresholds and the server/system parameters. Other modules read
//! these values by name, either through the flat constants or through the
//! grouped [`DeviceConfig`] published as [`DEVICE_CONFIG`].
//!
//! Nothing here is checked at definition time. The firmware calls
//! [`DeviceConfig::validate`] once at startup before touching any pin.

use core::fmt;

/// Credential taken from the build environment, falling back to the
/// development default only when debug assertions are on.
macro_rules! credential {
    ($env:literal, $dev_default:literal) => {
        match option_env!($env) {
            Some(val) => val,
            None if cfg!(debug_assertions) => $dev_default,
            None => "",
        }
    };
}

// ===== Wi-Fi =====

/// Network to join in station mode (`NAVISTICK_WIFI_SSID`).
pub const WIFI_SSID: &str = credential!("NAVISTICK_WIFI_SSID", "Laboratorios_ITZ");
/// Pre-shared key for [`WIFI_SSID`] (`NAVISTICK_WIFI_PASSWORD`).
pub const WIFI_PASSWORD: &str = credential!("NAVISTICK_WIFI_PASSWORD", "itzacatepec");

// ===== Pins (ESP32 GPIO numbers) =====

/// HC-SR04 trigger
pub const TRIGGER_PIN: u8 = 5;
/// HC-SR04 echo
pub const ECHO_PIN: u8 = 18;
pub const VIBRATOR_PIN: u8 = 4;
/// UART2 RX, wired to the GPS module's TX
pub const GPS_RX_PIN: u8 = 16;
/// UART2 TX, wired to the GPS module's RX
pub const GPS_TX_PIN: u8 = 17;
pub const I2C_SDA_PIN: u8 = 21;
pub const I2C_SCL_PIN: u8 = 22;

// ===== Ranging =====

pub const MAX_DISTANCE_CM: u16 = 400;
/// Ultrasonic readings closer than this are obstacles.
pub const ULTRASONIC_THRESHOLD_CM: u16 = 100;
/// Downward time-of-flight readings farther than this are drops.
pub const TOF_THRESHOLD_CM: u16 = 50;

// ===== Server =====

pub const HTTP_PORT: u16 = 80;
pub const WEBSOCKET_PORT: u16 = 81;
pub const DATA_SEND_INTERVAL_MS: u64 = 200;

// ===== System =====

pub const SERIAL_BAUD: u32 = 115_200;
pub const BATTERY_MONITOR_PIN: AnalogPin = AnalogPin::A0;

/// Highest GPIO number on the ESP32.
const MAX_GPIO: u8 = 39;
/// Longest SSID allowed by 802.11.
const MAX_SSID_LEN: usize = 32;
/// Shortest WPA2 passphrase.
const MIN_PASSWORD_LEN: usize = 8;
/// Longest WPA2 passphrase; one byte more is a raw PSK in hex.
const MAX_PASSWORD_LEN: usize = 63;
const RAW_PSK_LEN: usize = 64;

/// The process-wide configuration, built from the constants above.
pub static DEVICE_CONFIG: DeviceConfig = DeviceConfig::compiled();

/// ESP32 SAR ADC unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcUnit {
    Adc1,
    /// Unavailable while the Wi-Fi radio is running.
    Adc2,
}

/// Arduino-ESP32 analog pin label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogPin {
    A0,
    A3,
    A4,
    A5,
    A6,
    A7,
    A10,
    A11,
    A12,
    A13,
    A14,
    A15,
    A16,
    A17,
    A18,
    A19,
}

impl AnalogPin {
    /// GPIO behind the label
    pub const fn gpio(self) -> u8 {
        match self {
            AnalogPin::A0 => 36,
            AnalogPin::A3 => 39,
            AnalogPin::A4 => 32,
            AnalogPin::A5 => 33,
            AnalogPin::A6 => 34,
            AnalogPin::A7 => 35,
            AnalogPin::A10 => 4,
            AnalogPin::A11 => 0,
            AnalogPin::A12 => 2,
            AnalogPin::A13 => 15,
            AnalogPin::A14 => 13,
            AnalogPin::A15 => 12,
            AnalogPin::A16 => 14,
            AnalogPin::A17 => 27,
            AnalogPin::A18 => 25,
            AnalogPin::A19 => 26,
        }
    }

    pub const fn adc_unit(self) -> AdcUnit {
        match self {
            AnalogPin::A0
            | AnalogPin::A3
            | AnalogPin::A4
            | AnalogPin::A5
            | AnalogPin::A6
            | AnalogPin::A7 => AdcUnit::Adc1,
            _ => AdcUnit::Adc2,
        }
    }
}

impl fmt::Display for AnalogPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} (GPIO{})", self, self.gpio())
    }
}

/// Logical function a pin serves on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinRole {
    Trigger,
    Echo,
    Vibrator,
    GpsRx,
    GpsTx,
    I2cSda,
    I2cScl,
    BatteryMonitor,
}

impl PinRole {
    /// Whether the role drives the line (push-pull or open-drain).
    pub const fn needs_output(self) -> bool {
        matches!(
            self,
            PinRole::Trigger | PinRole::Vibrator | PinRole::GpsTx | PinRole::I2cSda | PinRole::I2cScl
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            PinRole::Trigger => "trigger",
            PinRole::Echo => "echo",
            PinRole::Vibrator => "vibrator",
            PinRole::GpsRx => "gps rx",
            PinRole::GpsTx => "gps tx",
            PinRole::I2cSda => "i2c sda",
            PinRole::I2cScl => "i2c scl",
            PinRole::BatteryMonitor => "battery monitor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WifiCredentials {
    pub ssid: &'static str,
    pub password: &'static str,
}

impl WifiCredentials {
    /// No network configured; Wi-Fi stays off.
    pub const fn is_empty(&self) -> bool {
        self.ssid.is_empty() && self.password.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    pub trigger: u8,
    pub echo: u8,
    pub vibrator: u8,
    pub gps_rx: u8,
    pub gps_tx: u8,
    pub i2c_sda: u8,
    pub i2c_scl: u8,
    pub battery: AnalogPin,
}

impl PinMap {
    /// Every role with the GPIO it occupies
    pub const fn assignments(&self) -> [(PinRole, u8); 8] {
        [
            (PinRole::Trigger, self.trigger),
            (PinRole::Echo, self.echo),
            (PinRole::Vibrator, self.vibrator),
            (PinRole::GpsRx, self.gps_rx),
            (PinRole::GpsTx, self.gps_tx),
            (PinRole::I2cSda, self.i2c_sda),
            (PinRole::I2cScl, self.i2c_scl),
            (PinRole::BatteryMonitor, self.battery.gpio()),
        ]
    }
}

/// Distances in centimetres
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangingConfig {
    pub max_distance_cm: u16,
    pub ultrasonic_threshold_cm: u16,
    pub tof_threshold_cm: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub http_port: u16,
    pub websocket_port: u16,
    pub send_interval_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemConfig {
    pub serial_baud: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    pub wifi: WifiCredentials,
    pub pins: PinMap,
    pub ranging: RangingConfig,
    pub server: ServerConfig,
    pub system: SystemConfig,
}

/// First violation found by [`DeviceConfig::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Only one of SSID and password is set.
    HalfConfiguredCredentials,
    SsidTooLong(usize),
    PasswordTooShort(usize),
    PasswordTooLong(usize),
    /// 64-byte password that is not a hex PSK.
    RawPskNotHex,
    /// GPIO number does not exist on the ESP32.
    NoSuchPin { role: PinRole, pin: u8 },
    /// GPIO 6-11 are wired to the SPI flash.
    FlashPin { role: PinRole, pin: u8 },
    /// GPIO 34-39 cannot drive a line.
    InputOnlyPin { role: PinRole, pin: u8 },
    PinConflict { first: PinRole, second: PinRole, pin: u8 },
    /// Analog pin on ADC2 while Wi-Fi is configured.
    AnalogPinOnAdc2(AnalogPin),
    ZeroMaxDistance,
    ThresholdOutOfRange { sensor: &'static str, threshold_cm: u16, max_cm: u16 },
    ZeroPort,
    PortConflict(u16),
    ZeroSendInterval,
    ZeroBaud,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ConfigError::HalfConfiguredCredentials => {
                write!(f, "wifi ssid and password must both be set or both be empty")
            }
            ConfigError::SsidTooLong(len) => {
                write!(f, "wifi ssid is {} bytes, limit is {}", len, MAX_SSID_LEN)
            }
            ConfigError::PasswordTooShort(len) => {
                write!(f, "wifi password is {} bytes, minimum is {}", len, MIN_PASSWORD_LEN)
            }
            ConfigError::PasswordTooLong(len) => write!(
                f,
                "wifi password is {} bytes, limit is {} ({} for a hex psk)",
                len, MAX_PASSWORD_LEN, RAW_PSK_LEN
            ),
            ConfigError::RawPskNotHex => {
                write!(f, "64-byte wifi password must be hex digits only")
            }
            ConfigError::NoSuchPin { role, pin } => {
                write!(f, "{} pin GPIO{} does not exist", role.name(), pin)
            }
            ConfigError::FlashPin { role, pin } => {
                write!(f, "{} pin GPIO{} is reserved for flash", role.name(), pin)
            }
            ConfigError::InputOnlyPin { role, pin } => {
                write!(f, "{} pin GPIO{} is input-only", role.name(), pin)
            }
            ConfigError::PinConflict { first, second, pin } => write!(
                f,
                "{} and {} both use GPIO{}",
                first.name(),
                second.name(),
                pin
            ),
            ConfigError::AnalogPinOnAdc2(pin) => {
                write!(f, "analog pin {} is on ADC2, unusable with wifi", pin)
            }
            ConfigError::ZeroMaxDistance => write!(f, "max ranging distance is 0"),
            ConfigError::ThresholdOutOfRange {
                sensor,
                threshold_cm,
                max_cm,
            } => write!(
                f,
                "{} threshold {}cm must be in 1..={}cm",
                sensor, threshold_cm, max_cm
            ),
            ConfigError::ZeroPort => write!(f, "server port is 0"),
            ConfigError::PortConflict(port) => {
                write!(f, "http and websocket both use port {}", port)
            }
            ConfigError::ZeroSendInterval => write!(f, "send interval is 0ms"),
            ConfigError::ZeroBaud => write!(f, "serial baud rate is 0"),
        }
    }
}

/// Strapping pins sample their level at reset.
const fn is_strapping(pin: u8) -> bool {
    matches!(pin, 0 | 2 | 5 | 12 | 15)
}

const fn is_flash(pin: u8) -> bool {
    matches!(pin, 6..=11)
}

const fn is_input_only(pin: u8) -> bool {
    matches!(pin, 34..=39)
}

const fn exists(pin: u8) -> bool {
    pin <= MAX_GPIO && !matches!(pin, 20 | 24 | 28..=31)
}

impl DeviceConfig {
    pub const fn compiled() -> Self {
        Self {
            wifi: WifiCredentials {
                ssid: WIFI_SSID,
                password: WIFI_PASSWORD,
            },
            pins: PinMap {
                trigger: TRIGGER_PIN,
                echo: ECHO_PIN,
                vibrator: VIBRATOR_PIN,
                gps_rx: GPS_RX_PIN,
                gps_tx: GPS_TX_PIN,
                i2c_sda: I2C_SDA_PIN,
                i2c_scl: I2C_SCL_PIN,
                battery: BATTERY_MONITOR_PIN,
            },
            ranging: RangingConfig {
                max_distance_cm: MAX_DISTANCE_CM,
                ultrasonic_threshold_cm: ULTRASONIC_THRESHOLD_CM,
                tof_threshold_cm: TOF_THRESHOLD_CM,
            },
            server: ServerConfig {
                http_port: HTTP_PORT,
                websocket_port: WEBSOCKET_PORT,
                send_interval_ms: DATA_SEND_INTERVAL_MS,
            },
            system: SystemConfig {
                serial_baud: SERIAL_BAUD,
            },
        }
    }

    /// Startup self-check. Returns the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_wifi()?;
        self.validate_pins()?;
        self.validate_ranging()?;
        self.validate_server()?;

        if self.system.serial_baud == 0 {
            return Err(ConfigError::ZeroBaud);
        }
        Ok(())
    }

    fn validate_wifi(&self) -> Result<(), ConfigError> {
        let wifi = &self.wifi;
        if wifi.ssid.is_empty() != wifi.password.is_empty() {
            return Err(ConfigError::HalfConfiguredCredentials);
        }
        if wifi.ssid.len() > MAX_SSID_LEN {
            return Err(ConfigError::SsidTooLong(wifi.ssid.len()));
        }

        let len = wifi.password.len();
        match len {
            0 => Ok(()),
            1..MIN_PASSWORD_LEN => Err(ConfigError::PasswordTooShort(len)),
            MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN => Ok(()),
            RAW_PSK_LEN if wifi.password.bytes().all(|b| b.is_ascii_hexdigit()) => Ok(()),
            RAW_PSK_LEN => Err(ConfigError::RawPskNotHex),
            _ => Err(ConfigError::PasswordTooLong(len)),
        }
    }

    fn validate_pins(&self) -> Result<(), ConfigError> {
        let assignments = self.pins.assignments();

        for &(role, pin) in assignments.iter() {
            if !exists(pin) {
                return Err(ConfigError::NoSuchPin { role, pin });
            }
            if is_flash(pin) {
                return Err(ConfigError::FlashPin { role, pin });
            }
            if role.needs_output() && is_input_only(pin) {
                return Err(ConfigError::InputOnlyPin { role, pin });
            }
        }

        for (i, &(first, pin)) in assignments.iter().enumerate() {
            if let Some(&(second, _)) = assignments[i + 1..].iter().find(|(_, p)| *p == pin) {
                return Err(ConfigError::PinConflict { first, second, pin });
            }
        }

        let battery = self.pins.battery;
        if battery.adc_unit() == AdcUnit::Adc2 && !self.wifi.is_empty() {
            return Err(ConfigError::AnalogPinOnAdc2(battery));
        }
        Ok(())
    }

    fn validate_ranging(&self) -> Result<(), ConfigError> {
        let ranging = &self.ranging;
        if ranging.max_distance_cm == 0 {
            return Err(ConfigError::ZeroMaxDistance);
        }

        let thresholds = [
            ("ultrasonic", ranging.ultrasonic_threshold_cm),
            ("tof", ranging.tof_threshold_cm),
        ];
        for (sensor, threshold_cm) in thresholds {
            if threshold_cm == 0 || threshold_cm > ranging.max_distance_cm {
                return Err(ConfigError::ThresholdOutOfRange {
                    sensor,
                    threshold_cm,
                    max_cm: ranging.max_distance_cm,
                });
            }
        }
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;
        if server.http_port == 0 || server.websocket_port == 0 {
            return Err(ConfigError::ZeroPort);
        }
        if server.http_port == server.websocket_port {
            return Err(ConfigError::PortConflict(server.http_port));
        }
        if server.send_interval_ms == 0 {
            return Err(ConfigError::ZeroSendInterval);
        }
        Ok(())
    }

    /// Roles placed on strapping pins; legal but worth a warning.
    pub fn strapping_pins(&self) -> impl Iterator<Item = (PinRole, u8)> {
        self.pins
            .assignments()
            .into_iter()
            .filter(|&(_, pin)| is_strapping(pin))
    }

    /// Log the configuration, password masked.
    pub fn log_summary(&self) {
        if self.wifi.is_empty() {
            log::warn!("[CONFIG] No wifi credentials, network disabled");
        } else {
            log::info!(
                "[CONFIG] Wifi ssid={} password=<{} bytes>",
                self.wifi.ssid,
                self.wifi.password.len()
            );
        }

        for (role, pin) in self.pins.assignments() {
            log::info!("[CONFIG] {} -> GPIO{}", role.name(), pin);
        }
        for (role, pin) in self.strapping_pins() {
            log::warn!(
                "[CONFIG] {} uses strapping pin GPIO{}, keep it released at reset",
                role.name(),
                pin
            );
        }

        let ranging = &self.ranging;
        log::info!(
            "[CONFIG] Range max={}cm ultrasonic<{}cm tof>{}cm",
            ranging.max_distance_cm,
            ranging.ultrasonic_threshold_cm,
            ranging.tof_threshold_cm
        );
        log::info!(
            "[CONFIG] HTTP :{} WebSocket :{} every {}ms, serial {} baud",
            self.server.http_port,
            self.server.websocket_port,
            self.server.send_interval_ms,
            self.system.serial_baud
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DeviceConfig {
        DeviceConfig::compiled()
    }

    #[test]
    fn compiled_config_is_valid() {
        assert_eq!(DEVICE_CONFIG.validate(), Ok(()));
    }

    #[test]
    fn pins_are_pairwise_distinct() {
        let assignments = DEVICE_CONFIG.pins.assignments();
        for (i, (_, a)) in assignments.iter().enumerate() {
            for (_, b) in &assignments[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn ports_differ() {
        assert_ne!(HTTP_PORT, WEBSOCKET_PORT);
    }

    #[test]
    fn thresholds_within_range() {
        assert!(ULTRASONIC_THRESHOLD_CM <= MAX_DISTANCE_CM);
        assert!(TOF_THRESHOLD_CM <= MAX_DISTANCE_CM);
    }

    #[test]
    fn send_interval_positive() {
        assert!(DATA_SEND_INTERVAL_MS > 0);
    }

    #[test]
    fn credentials_fully_set_or_empty() {
        assert_eq!(WIFI_SSID.is_empty(), WIFI_PASSWORD.is_empty());
    }

    #[test]
    fn dev_build_falls_back_to_lab_network() {
        if option_env!("NAVISTICK_WIFI_SSID").is_none() {
            assert_eq!(WIFI_SSID, "Laboratorios_ITZ");
        }
        if option_env!("NAVISTICK_WIFI_PASSWORD").is_none() {
            assert_eq!(WIFI_PASSWORD, "itzacatepec");
        }
    }

    #[test]
    fn rereads_are_identical() {
        let first = DEVICE_CONFIG;
        let second = DEVICE_CONFIG;
        assert_eq!(first, second);
        assert_eq!(first, DeviceConfig::compiled());
        assert_eq!(TRIGGER_PIN, TRIGGER_PIN);
    }

    #[test]
    fn battery_pin_is_a0_on_adc1() {
        assert_eq!(BATTERY_MONITOR_PIN.gpio(), 36);
        assert_eq!(BATTERY_MONITOR_PIN.adc_unit(), AdcUnit::Adc1);
    }

    #[test]
    fn rejects_half_configured_credentials() {
        let mut cfg = config();
        cfg.wifi = WifiCredentials {
            ssid: "lab",
            password: "",
        };
        assert_eq!(cfg.validate(), Err(ConfigError::HalfConfiguredCredentials));

        cfg.wifi = WifiCredentials {
            ssid: "",
            password: "secret",
        };
        assert_eq!(cfg.validate(), Err(ConfigError::HalfConfiguredCredentials));
    }

    #[test]
    fn accepts_empty_credentials() {
        let mut cfg = config();
        cfg.wifi = WifiCredentials {
            ssid: "",
            password: "",
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn rejects_long_ssid() {
        let mut cfg = config();
        cfg.wifi = WifiCredentials {
            ssid: "an-ssid-that-is-way-past-32-bytes-long",
            password: "secret-pass",
        };
        assert_eq!(cfg.validate(), Err(ConfigError::SsidTooLong(38)));
    }

    #[test]
    fn rejects_short_password() {
        let mut cfg = config();
        cfg.wifi = WifiCredentials {
            ssid: "lab",
            password: "abc",
        };
        assert_eq!(cfg.validate(), Err(ConfigError::PasswordTooShort(3)));

        cfg.wifi.password = "12345678";
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn rejects_long_password() {
        let mut cfg = config();
        cfg.wifi = WifiCredentials {
            ssid: "lab",
            password: "0123456789012345678901234567890123456789012345678901234567890123456789",
        };
        assert_eq!(cfg.validate(), Err(ConfigError::PasswordTooLong(70)));

        cfg.wifi.password = "abcdefghijabcdefghijabcdefghijabcdefghijabcdefghijabcdefghijabc";
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn raw_psk_must_be_hex() {
        let mut cfg = config();
        cfg.wifi = WifiCredentials {
            ssid: "lab",
            password: "zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz",
        };
        assert_eq!(cfg.validate(), Err(ConfigError::RawPskNotHex));

        cfg.wifi.password = "0123456789abcdef0123456789ABCDEF0123456789abcdef0123456789ABCDEF";
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_max_distance() {
        let mut cfg = config();
        cfg.ranging.max_distance_cm = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroMaxDistance));
    }

    #[test]
    fn rejects_shared_pin() {
        let mut cfg = config();
        cfg.pins.vibrator = cfg.pins.echo;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::PinConflict {
                first: PinRole::Echo,
                second: PinRole::Vibrator,
                pin: 18,
            })
        );
    }

    #[test]
    fn rejects_digital_pin_on_battery_gpio() {
        let mut cfg = config();
        cfg.pins.gps_rx = 36;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::PinConflict {
                first: PinRole::GpsRx,
                second: PinRole::BatteryMonitor,
                pin: 36,
            })
        );
    }

    #[test]
    fn rejects_output_on_input_only_pin() {
        let mut cfg = config();
        cfg.pins.trigger = 35;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InputOnlyPin {
                role: PinRole::Trigger,
                pin: 35,
            })
        );
    }

    #[test]
    fn echo_may_use_input_only_pin() {
        let mut cfg = config();
        cfg.pins.echo = 34;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn rejects_flash_and_missing_pins() {
        let mut cfg = config();
        cfg.pins.i2c_sda = 7;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::FlashPin {
                role: PinRole::I2cSda,
                pin: 7,
            })
        );

        let mut cfg = config();
        cfg.pins.i2c_scl = 20;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NoSuchPin {
                role: PinRole::I2cScl,
                pin: 20,
            })
        );
    }

    #[test]
    fn adc2_battery_pin_only_without_wifi() {
        let mut cfg = config();
        cfg.pins.battery = AnalogPin::A18;
        if cfg.wifi.is_empty() {
            assert_eq!(cfg.validate(), Ok(()));
        } else {
            assert_eq!(
                cfg.validate(),
                Err(ConfigError::AnalogPinOnAdc2(AnalogPin::A18))
            );
        }

        cfg.wifi = WifiCredentials {
            ssid: "",
            password: "",
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn rejects_threshold_beyond_range() {
        let mut cfg = config();
        cfg.ranging.tof_threshold_cm = 450;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ThresholdOutOfRange {
                sensor: "tof",
                threshold_cm: 450,
                max_cm: 400,
            })
        );

        let mut cfg = config();
        cfg.ranging.ultrasonic_threshold_cm = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ThresholdOutOfRange {
                sensor: "ultrasonic",
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_server_parameters() {
        let mut cfg = config();
        cfg.server.websocket_port = cfg.server.http_port;
        assert_eq!(cfg.validate(), Err(ConfigError::PortConflict(80)));

        let mut cfg = config();
        cfg.server.http_port = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroPort));

        let mut cfg = config();
        cfg.server.websocket_port = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroPort));

        let mut cfg = config();
        cfg.server.send_interval_ms = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroSendInterval));

        let mut cfg = config();
        cfg.system.serial_baud = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroBaud));
    }

    #[test]
    fn trigger_on_strapping_pin_is_reported() {
        let strapping: Vec<_> = DEVICE_CONFIG.strapping_pins().collect();
        assert_eq!(strapping, vec![(PinRole::Trigger, 5)]);
    }

    #[test]
    fn error_messages_name_the_role() {
        let err = ConfigError::InputOnlyPin {
            role: PinRole::Vibrator,
            pin: 39,
        };
        assert_eq!(err.to_string(), "vibrator pin GPIO39 is input-only");
    }
}
