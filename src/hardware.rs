//! Board drivers for the mechanism traits

use embassy_rp::gpio::Output;
use embassy_rp::pwm::{self, Pwm, SetDutyCycle};
use intake_control::log_warn;
use intake_control::system::actuator::MotorController;
use intake_control::system::config::IdleMode;
use intake_control::system::indicator::{IndicatorLed, LedColor};
use tb6612fng::{DriveCommand, Motor};

/// Motors run at 10 kHz; cheap DC motors behave better at low frequencies
pub const MOTOR_PWM_HZ: u32 = 10_000;
/// LED PWM frequency
pub const LED_PWM_HZ: u32 = 100;

pub type BoardMotor = Motor<Output<'static>, Output<'static>, Pwm<'static>>;

/// PWM configuration for `desired_freq_hz` at the current system clock
pub fn pwm_config(desired_freq_hz: u32) -> pwm::Config {
    let clock_freq_hz = embassy_rp::clocks::clk_sys_freq();

    // Smallest divider that keeps the period within 16 bits
    let divider = ((clock_freq_hz / desired_freq_hz) / 65535 + 1) as u8;
    let period = (clock_freq_hz / (desired_freq_hz * divider as u32)) as u16 - 1;

    let mut config = pwm::Config::default();
    config.divider = divider.into();
    config.top = period;
    config
}

/// One TB6612FNG channel
pub struct DriverMotor {
    motor: BoardMotor,
    idle: IdleMode,
}

impl DriverMotor {
    pub fn new(motor: BoardMotor, idle: IdleMode) -> Self {
        Self { motor, idle }
    }
}

impl MotorController for DriverMotor {
    fn set(&mut self, speed: f32) {
        let duty = (libm::fabsf(speed) * 100.0) as u8;
        let command = if speed < 0.0 {
            DriveCommand::Backward(duty.min(100))
        } else {
            DriveCommand::Forward(duty.min(100))
        };
        if self.motor.drive(command).is_err() {
            log_warn!("Motor drive failed");
        }
    }

    fn stop_motor(&mut self) {
        let command = match self.idle {
            IdleMode::Brake => DriveCommand::Brake,
            IdleMode::Coast => DriveCommand::Stop,
        };
        if self.motor.drive(command).is_err() {
            log_warn!("Motor stop failed");
        }
    }
}

/// Red/green LED on two PWM outputs
pub struct PwmLed {
    red: Pwm<'static>,
    green: Pwm<'static>,
}

impl PwmLed {
    pub fn new(red: Pwm<'static>, green: Pwm<'static>) -> Self {
        Self { red, green }
    }
}

impl IndicatorLed for PwmLed {
    fn set_color(&mut self, color: LedColor) {
        let (red, green) = match color {
            LedColor::Off => (false, false),
            LedColor::Red => (true, false),
            LedColor::Green => (false, true),
        };
        let _ = if red {
            self.red.set_duty_cycle_fully_on()
        } else {
            self.red.set_duty_cycle_fully_off()
        };
        let _ = if green {
            self.green.set_duty_cycle_fully_on()
        } else {
            self.green.set_duty_cycle_fully_off()
        };
    }
}
