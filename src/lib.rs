//! NaviStick cane firmware
//!
//! `config`, `model` and `logic` are plain `no_std` code and are tested on
//! the host with `cargo test --lib`. `hardware` and `network` only exist when
//! building for the ESP32 (`--features firmware`).

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod logic;
pub mod model;

#[cfg(target_arch = "xtensa")]
pub mod hardware;
#[cfg(target_arch = "xtensa")]
pub mod network;
