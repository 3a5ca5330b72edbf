pub mod buttons;
pub mod control_loop;
pub mod pose_feedback;
pub mod telemetry_report;
