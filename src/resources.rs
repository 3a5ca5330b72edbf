//! Hardware Resource Assignment
//!
//! Splits the RP2350 peripherals into one group per consumer so each task
//! owns exactly the pins it drives.
//!
//! # Resource Groups
//! - Intake: TB6612FNG driving the arm and ground rollers
//! - Shooter: second TB6612FNG, channel A only
//! - Indicator: red/green LED on two PWM slices
//! - Color sensor: APDS-9151 on I2C0
//! - Buttons: four trigger inputs

use assign_resources::assign_resources;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::InterruptHandler as I2cInterruptHandler;
use embassy_rp::peripherals::{self, I2C0};

assign_resources! {
    /// TB6612FNG for the intake rollers
    intake_motors: IntakeMotorResources {
        standby_pin: PIN_22,
        // Arm roller (motor A)
        arm_slice: PWM_SLICE6,
        arm_pwm_pin: PIN_28,
        arm_forward_pin: PIN_21,
        arm_backward_pin: PIN_20,
        // Ground roller (motor B)
        ground_slice: PWM_SLICE5,
        ground_pwm_pin: PIN_27,
        ground_forward_pin: PIN_19,
        ground_backward_pin: PIN_18,
    },
    /// TB6612FNG for the shooter flywheel
    shooter_motor: ShooterMotorResources {
        standby_pin: PIN_5,
        slice: PWM_SLICE3,
        pwm_pin: PIN_6,
        forward_pin: PIN_7,
        backward_pin: PIN_8,
    },
    /// Red/green status LED
    indicator_led: IndicatorLedResources {
        pwm_red: PWM_SLICE1,
        pwm_green: PWM_SLICE2,
        red_pin: PIN_2,
        green_pin: PIN_4,
    },
    /// APDS-9151 color/proximity sensor
    color_sensor: ColorSensorResources {
        i2c: I2C0,
        scl: PIN_13,
        sda: PIN_12,
    },
    /// Routine trigger buttons
    buttons: ButtonResources {
        btn_a: PIN_16,
        btn_b: PIN_17,
        btn_c: PIN_10,
        btn_d: PIN_11,
    },
}

bind_interrupts!(pub struct Irqs {
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
});
