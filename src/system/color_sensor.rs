//! APDS-9151 Color/Proximity Sensor
//!
//! Async driver for the digital proximity and RGB sensor that looks into the
//! intake. Generic over any `embedded-hal-async` I2C bus.
//!
//! # Configuration
//! - Proximity: 11-bit resolution, 100 ms rate, 32 LED pulses
//! - Color: 18-bit resolution, 100 ms rate, gain 3x
//!
//! # Reset Detection
//! The power-on status bit is set whenever the device comes out of reset with
//! its default configuration. Every read checks it (reading clears it) and
//! reports [`SensorError::DeviceReset`] so the caller can run `init` again.
//! [`SensorLink`] does that on its own and puts a time bound on every access.

use core::future::Future;

use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Timer};
use embedded_hal_async::i2c::I2c;

use crate::system::config::Timing;
use crate::system::error::SensorError;
use crate::system::sensor::RawSensorSample;

/// Fixed I2C address
pub const APDS9151_ADDR: u8 = 0x52;
/// Content of the part id register
pub const PART_ID: u8 = 0xC2;

const REG_MAIN_CTRL: u8 = 0x00;
const REG_PS_LED: u8 = 0x01;
const REG_PS_PULSES: u8 = 0x02;
const REG_PS_MEAS_RATE: u8 = 0x03;
const REG_LS_MEAS_RATE: u8 = 0x04;
const REG_LS_GAIN: u8 = 0x05;
const REG_PART_ID: u8 = 0x06;
const REG_MAIN_STATUS: u8 = 0x07;
/// Proximity (2 bytes) followed by IR, green, blue and red (3 bytes each)
const REG_DATA: u8 = 0x08;

const MAIN_CTRL_PS_ENABLE: u8 = 0x01;
const MAIN_CTRL_LS_ENABLE: u8 = 0x02;
const MAIN_CTRL_RGB_MODE: u8 = 0x04;

/// LED at 60 kHz, 125 mA
const PS_LED_60KHZ_125MA: u8 = 0x36;
const PS_PULSES: u8 = 32;
/// 11-bit resolution, 100 ms
const PS_MEAS_11BIT_100MS: u8 = 0x18 | 0x05;
/// 18-bit resolution, 100 ms
const LS_MEAS_18BIT_100MS: u8 = 0x20 | 0x02;
const LS_GAIN_3X: u8 = 0x01;

const STATUS_POWER_ON: u8 = 1 << 5;

const PROXIMITY_MASK: u32 = 0x7FF;
const COLOR_MASK: u32 = 0xF_FFFF;

pub struct Apds9151<I> {
    i2c: I,
}

impl<I: I2c> Apds9151<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Checks the part id and writes the measurement configuration
    pub async fn init(&mut self) -> Result<(), SensorError> {
        let part_id = self.read_register(REG_PART_ID).await?;
        if part_id != PART_ID {
            log_error!("APDS-9151 part id mismatch: {:x}", part_id);
            return Err(SensorError::UnexpectedPartId(part_id));
        }

        self.write_register(
            REG_MAIN_CTRL,
            MAIN_CTRL_RGB_MODE | MAIN_CTRL_LS_ENABLE | MAIN_CTRL_PS_ENABLE,
        )
        .await?;
        self.write_register(REG_PS_LED, PS_LED_60KHZ_125MA).await?;
        self.write_register(REG_PS_PULSES, PS_PULSES).await?;
        self.write_register(REG_PS_MEAS_RATE, PS_MEAS_11BIT_100MS).await?;
        self.write_register(REG_LS_MEAS_RATE, LS_MEAS_18BIT_100MS).await?;
        self.write_register(REG_LS_GAIN, LS_GAIN_3X).await?;

        // Clear the power-on flag left over from startup
        self.read_register(REG_MAIN_STATUS).await?;

        log_info!("APDS-9151 initialized");
        Ok(())
    }

    /// Reads one sample of all channels
    pub async fn read(&mut self) -> Result<RawSensorSample, SensorError> {
        let status = self.read_register(REG_MAIN_STATUS).await?;
        if status & STATUS_POWER_ON != 0 {
            log_warn!("APDS-9151 reset detected");
            return Err(SensorError::DeviceReset);
        }

        let mut data = [0u8; 14];
        self.i2c
            .write_read(APDS9151_ADDR, &[REG_DATA], &mut data)
            .await
            .map_err(|_| {
                log_error!("APDS-9151 data read error");
                SensorError::Bus
            })?;

        let proximity = u32::from(u16::from_le_bytes([data[0], data[1]])) & PROXIMITY_MASK;
        let color = |offset: usize| {
            u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], 0]) & COLOR_MASK
        };

        Ok(RawSensorSample {
            proximity,
            infrared: color(2),
            green: color(5),
            blue: color(8),
            red: color(11),
        })
    }

    /// Hands the bus back
    pub fn release(self) -> I {
        self.i2c
    }

    async fn write_register(&mut self, register: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(APDS9151_ADDR, &[register, value])
            .await
            .map_err(|_| {
                log_error!("APDS-9151 write error");
                SensorError::Bus
            })
    }

    async fn read_register(&mut self, register: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(APDS9151_ADDR, &[register], &mut buf)
            .await
            .map_err(|_| {
                log_error!("APDS-9151 read error");
                SensorError::Bus
            })?;
        Ok(buf[0])
    }
}

/// Keeps the sensor configured for the control loop
///
/// Every bus access is cut off after `sensor_timeout` and reported as
/// [`SensorError::Bus`]. A reset or bus error triggers setup on the next
/// sample; a failed setup is not attempted again before `sensor_retry` has
/// passed, and samples in between report [`SensorError::Unavailable`].
pub struct SensorLink<I> {
    sensor: Apds9151<I>,
    timeout: Duration,
    retry: Duration,
    ready: bool,
    next_setup: Instant,
}

impl<I: I2c> SensorLink<I> {
    pub fn new(sensor: Apds9151<I>, timing: &Timing) -> Self {
        Self {
            sensor,
            timeout: timing.sensor_timeout,
            retry: timing.sensor_retry,
            ready: false,
            next_setup: Instant::from_ticks(0),
        }
    }

    /// Whether the last setup succeeded and no error has been seen since
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Reads one sample, configuring the sensor first when needed
    pub async fn sample(&mut self, now: Instant) -> Result<RawSensorSample, SensorError> {
        if !self.ready {
            if now < self.next_setup {
                return Err(SensorError::Unavailable);
            }
            if let Err(e) = bounded(self.timeout, self.sensor.init()).await {
                log_warn!("APDS-9151 setup failed, retrying in {} ms", self.retry.as_millis());
                self.next_setup = now + self.retry;
                return Err(e);
            }
            self.ready = true;
        }

        let reading = bounded(self.timeout, self.sensor.read()).await;
        if let Err(SensorError::DeviceReset | SensorError::Bus) = reading {
            self.ready = false;
            self.next_setup = now;
        }
        reading
    }

    /// Hands the bus back
    pub fn release(self) -> I {
        self.sensor.release()
    }
}

async fn bounded<T>(
    limit: Duration,
    access: impl Future<Output = Result<T, SensorError>>,
) -> Result<T, SensorError> {
    match select(access, Timer::after(limit)).await {
        Either::First(result) => result,
        Either::Second(()) => {
            log_error!("APDS-9151 bus timeout");
            Err(SensorError::Bus)
        }
    }
}
