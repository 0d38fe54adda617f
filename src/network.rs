//! Wi-Fi station join (ESP32 only)
//!
//! Brings the cane onto the configured network and reports the addresses the
//! phone app connects to. Serving those endpoints is not done here.

use core::net::Ipv4Addr;

use embassy_executor::Spawner;
use embassy_net::{Runner, Stack, StackResources};
use embassy_time::{Duration, Timer};
use esp_hal::peripherals::WIFI;
use esp_radio::Controller;
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent, WifiStaState};
use static_cell::StaticCell;

use crate::config::{DeviceConfig, WifiCredentials};

const RECONNECT_DELAY_MS: u64 = 5_000;
const ADDRESS_POLL_MS: u64 = 500;

static RADIO: StaticCell<Controller<'static>> = StaticCell::new();
static RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();

/// Start the radio, spawn the connection and stack tasks, and return the
/// station stack. Fails when the radio cannot be brought up or rejects the
/// credentials.
pub fn init_network(
    spawner: Spawner,
    credentials: WifiCredentials,
    wifi_peripheral: WIFI<'static>,
    seed: u64,
) -> Result<Stack<'static>, &'static str> {
    let radio = RADIO.init(esp_radio::init().map_err(|_| "Failed to initialize radio")?);

    let (mut controller, interfaces) =
        esp_radio::wifi::new(radio, wifi_peripheral, esp_radio::wifi::Config::default())
            .map_err(|_| "Failed to initialize wifi controller")?;

    let client_config = ModeConfig::Client(
        ClientConfig::default()
            .with_ssid(credentials.ssid.into())
            .with_password(credentials.password.into()),
    );
    controller
        .set_config(&client_config)
        .map_err(|_| "Wifi rejected client config")?;

    let (stack, runner) = embassy_net::new(
        interfaces.sta,
        embassy_net::Config::dhcpv4(Default::default()),
        RESOURCES.init(StackResources::new()),
        seed,
    );

    spawner
        .spawn(connection(controller, credentials))
        .map_err(|_| "Failed to spawn wifi connection task")?;
    spawner
        .spawn(net_task(runner))
        .map_err(|_| "Failed to spawn network task")?;

    Ok(stack)
}

/// Wait for DHCP and log the endpoints the app expects.
pub async fn wait_for_address(stack: Stack<'static>, config: &DeviceConfig) -> Ipv4Addr {
    log::info!("[WIFI] Waiting for IP address...");
    let address = loop {
        if let Some(v4) = stack.config_v4() {
            break v4.address.address();
        }
        Timer::after(Duration::from_millis(ADDRESS_POLL_MS)).await;
    };

    log::info!("[WIFI] Got IP {}", address);
    log::info!("[WIFI] HTTP      http://{}:{}/", address, config.server.http_port);
    log::info!("[WIFI] WebSocket ws://{}:{}/", address, config.server.websocket_port);
    address
}

#[embassy_executor::task]
async fn connection(mut controller: WifiController<'static>, credentials: WifiCredentials) {
    log::info!("[WIFI] Joining '{}'", credentials.ssid);

    loop {
        if esp_radio::wifi::sta_state() == WifiStaState::Connected {
            controller.wait_for_event(WifiEvent::StaDisconnected).await;
            log::warn!("[WIFI] Disconnected");
            Timer::after(Duration::from_millis(RECONNECT_DELAY_MS)).await;
        }

        if !matches!(controller.is_started(), Ok(true)) {
            if let Err(e) = controller.start_async().await {
                log::error!("[WIFI] Failed to start: {:?}", e);
                Timer::after(Duration::from_millis(RECONNECT_DELAY_MS)).await;
                continue;
            }
            log::info!("[WIFI] Started");
        }

        match controller.connect_async().await {
            Ok(()) => log::info!("[WIFI] Connected"),
            Err(e) => {
                log::warn!("[WIFI] Failed to connect: {:?}", e);
                Timer::after(Duration::from_millis(RECONNECT_DELAY_MS)).await;
            }
        }
    }
}

#[embassy_executor::task]
async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await
}
