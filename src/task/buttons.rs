//! Routine Buttons
//!
//! Each button requests one routine on a debounced press.

use embassy_rp::gpio::{Input, Level};
use embassy_time::{Duration, Timer};
use intake_control::log_debug;
use intake_control::system::routines::{self, Routine};

/// Button debounce delay
const DEBOUNCE_DURATION: Duration = Duration::from_millis(30);

#[embassy_executor::task(pool_size = 4)]
pub async fn button(mut input: Input<'static>, routine: Routine) {
    loop {
        if debounce(&mut input).await == Level::High {
            log_debug!("Button pressed: {:?}", routine);
            routines::request(routine);
        }
    }
}

/// Waits for a stable level change and returns the new level
async fn debounce(button: &mut Input<'static>) -> Level {
    loop {
        let start_level = button.get_level();
        button.wait_for_any_edge().await;
        Timer::after(DEBOUNCE_DURATION).await;
        let end_level = button.get_level();
        if start_level != end_level {
            break end_level;
        }
    }
}
