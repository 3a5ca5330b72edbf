//! Pose Feedback Task
//!
//! Republishes the pose estimate at a coarse rate, decoupled from the control
//! tick. Each pass stamps the heartbeat the control loop supervises. The task
//! returns when the control loop asks it to stop, which frees its slot for a
//! restart.

use embassy_time::Duration;
use intake_control::system::pose::PoseFeedback;

/// Pose shared between the feedback loop and the control loop
pub static POSE_FEEDBACK: PoseFeedback = PoseFeedback::new();

#[embassy_executor::task]
pub async fn pose_feedback(feedback: &'static PoseFeedback, period: Duration) {
    feedback.run(period).await;
}
