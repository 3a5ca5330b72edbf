//! Control Loop Task
//!
//! Runs the robot at a fixed period. Each tick, in this order:
//! 1. Read the color sensor and hand the sample to the robot
//! 2. Take a pending routine request and schedule it
//! 3. Tick every scheduled command once
//! 4. Publish telemetry
//! 5. Stop and restart the pose feedback loop if it stopped reporting
//!
//! Sensor trouble never stalls the loop: every sensor access is time bounded,
//! a failed read counts as "no object" and a reset sensor is reconfigured on
//! the next tick. A sensor that fails setup is retried after a pause.

use alloc::boxed::Box;

use embassy_executor::Spawner;
use embassy_rp::gpio::{self, Level};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::pwm::Pwm;
use embassy_time::{Instant, Ticker};
use intake_control::system::actuator::ActuatorPair;
use intake_control::system::color_sensor::{Apds9151, SensorLink};
use intake_control::system::command::Requirements;
use intake_control::system::config::RobotConfig;
use intake_control::system::detector::ObjectDetector;
use intake_control::system::indicator::{self, Indicator};
use intake_control::system::intake::IntakeController;
use intake_control::system::pose::{Recovery, Supervisor};
use intake_control::system::robot::Robot;
use intake_control::system::routines;
use intake_control::system::scheduler::Scheduler;
use intake_control::system::shooter::Shooter;
use intake_control::system::telemetry;
use intake_control::{log_info, log_warn};
use tb6612fng::Motor;

use crate::hardware::{pwm_config, DriverMotor, PwmLed, LED_PWM_HZ, MOTOR_PWM_HZ};
use crate::resources::{
    ColorSensorResources, IndicatorLedResources, IntakeMotorResources, Irqs, ShooterMotorResources,
};
use crate::task::pose_feedback::{pose_feedback, POSE_FEEDBACK};

/// I2C bus speed for the color sensor
const I2C_FREQUENCY_HZ: u32 = 400_000;

#[embassy_executor::task]
pub async fn control_loop(
    spawner: Spawner,
    intake_r: IntakeMotorResources,
    shooter_r: ShooterMotorResources,
    led_r: IndicatorLedResources,
    sensor_r: ColorSensorResources,
) {
    let config = RobotConfig::DEFAULT;

    // Both drivers stay out of standby for the lifetime of the loop
    let _intake_standby = gpio::Output::new(intake_r.standby_pin, Level::High);
    let _shooter_standby = gpio::Output::new(shooter_r.standby_pin, Level::High);

    let motor_pwm = pwm_config(MOTOR_PWM_HZ);
    let arm = Motor::new(
        gpio::Output::new(intake_r.arm_forward_pin, Level::Low),
        gpio::Output::new(intake_r.arm_backward_pin, Level::Low),
        Pwm::new_output_a(intake_r.arm_slice, intake_r.arm_pwm_pin, motor_pwm.clone()),
    )
    .expect("arm motor");
    let ground = Motor::new(
        gpio::Output::new(intake_r.ground_forward_pin, Level::Low),
        gpio::Output::new(intake_r.ground_backward_pin, Level::Low),
        Pwm::new_output_b(intake_r.ground_slice, intake_r.ground_pwm_pin, motor_pwm.clone()),
    )
    .expect("ground motor");
    let flywheel = Motor::new(
        gpio::Output::new(shooter_r.forward_pin, Level::Low),
        gpio::Output::new(shooter_r.backward_pin, Level::Low),
        Pwm::new_output_a(shooter_r.slice, shooter_r.pwm_pin, motor_pwm),
    )
    .expect("shooter motor");

    let led_pwm = pwm_config(LED_PWM_HZ);
    let led = PwmLed::new(
        Pwm::new_output_a(led_r.pwm_red, led_r.red_pin, led_pwm.clone()),
        Pwm::new_output_a(led_r.pwm_green, led_r.green_pin, led_pwm),
    );

    let intake = IntakeController::new(
        ActuatorPair::new(
            Box::new(DriverMotor::new(arm, config.intake.arm_idle)),
            Box::new(DriverMotor::new(ground, config.intake.ground_idle)),
        ),
        ObjectDetector::new(config.detector),
    );
    let shooter = Shooter::new(
        Box::new(DriverMotor::new(flywheel, config.shooter.idle)),
        &config.shooter,
    );
    let mut robot = Robot::new(config, intake, shooter, Indicator::new(Box::new(led)));

    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY_HZ;
    let bus = I2c::new_async(sensor_r.i2c, sensor_r.scl, sensor_r.sda, Irqs, i2c_config);
    let mut sensor = SensorLink::new(Apds9151::new(bus), &config.timing);

    let mut scheduler = Scheduler::new();
    let mut supervisor = Supervisor::new();
    let mut ticker = Ticker::every(config.timing.tick_period);

    log_info!("Control loop running");

    loop {
        let now = Instant::now();

        let reading = sensor.sample(now).await;
        robot.begin_tick(now, reading);

        if let Some(routine) = routines::try_take() {
            log_info!("Routine requested: {:?}", routine);
            match routine.build(&config) {
                Some(command) => {
                    scheduler.schedule_boxed(&mut robot, command);
                }
                None => scheduler.cancel_all(&mut robot),
            }
        }
        if !scheduler.is_required(Requirements::INDICATOR) {
            scheduler.schedule(&mut robot, indicator::idle());
        }

        scheduler.run(&mut robot);
        telemetry::publish(robot.telemetry());

        match supervisor.check(&POSE_FEEDBACK, now, config.timing.feedback_stale_after) {
            Recovery::Stopping => log_warn!("Pose feedback went quiet, stopping it"),
            Recovery::Restart => {
                log_info!("Starting pose feedback");
                if spawner
                    .spawn(pose_feedback(&POSE_FEEDBACK, config.timing.feedback_period))
                    .is_err()
                {
                    log_warn!("Pose feedback still occupies its task slot");
                }
            }
            Recovery::Healthy | Recovery::Waiting => {}
        }

        ticker.next().await;
    }
}
