//! Telemetry Report Task
//!
//! Logs the latest intake snapshot at the telemetry rate. Snapshots published
//! in between are overwritten and never reported.

use embassy_time::Timer;
use intake_control::log_info;
use intake_control::system::config::Timing;
use intake_control::system::telemetry;

#[embassy_executor::task]
pub async fn telemetry_report() {
    loop {
        let snapshot = telemetry::wait().await;
        log_info!(
            "Intake: object {}, forced {}, applied {:?}, shooter {} ({} V)",
            snapshot.object_detected,
            snapshot.requested.forced,
            snapshot.applied,
            snapshot.shooter_speed,
            snapshot.shooter_voltage
        );
        if let Some(sample) = snapshot.sample {
            log_info!("Sensor: {:?}", sample);
        }
        Timer::after(Timing::DEFAULT.telemetry_period).await;
    }
}
