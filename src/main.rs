//! Intake controller firmware entry point
//!
//! Sets up the heap, splits the peripherals and spawns the tasks.

#![no_std]
#![no_main]

extern crate alloc;

use crate::task::{buttons::button, control_loop::control_loop, telemetry_report::telemetry_report};
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use embassy_rp::gpio::{Input, Pull};
use embedded_alloc::LlffHeap as Heap;
use intake_control::system::routines::Routine;
use resources::AssignedResources;
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

#[global_allocator]
static HEAP: Heap = Heap::empty();

/// Heap for command trees and mechanism drivers
const HEAP_SIZE: usize = 16 * 1024;

/// Board drivers
mod hardware;
/// Pin assignment
mod resources;
/// Task implementations
mod task;

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    {
        static mut HEAP_MEM: [u8; HEAP_SIZE] = [0; HEAP_SIZE];
        unsafe {
            HEAP.init(
                core::ptr::addr_of_mut!(HEAP_MEM) as *mut u8 as usize,
                HEAP_SIZE,
            )
        }
    }

    let p = embassy_rp::init(Config::default());
    let r = split_resources!(p);

    spawner
        .spawn(control_loop(
            spawner,
            r.intake_motors,
            r.shooter_motor,
            r.indicator_led,
            r.color_sensor,
        ))
        .unwrap();
    spawner.spawn(telemetry_report()).unwrap();

    let b = r.buttons;
    spawner
        .spawn(button(Input::new(b.btn_a, Pull::Down), Routine::IntakeAndBlink))
        .unwrap();
    spawner
        .spawn(button(Input::new(b.btn_b, Pull::Down), Routine::Shoot))
        .unwrap();
    spawner
        .spawn(button(Input::new(b.btn_c, Pull::Down), Routine::Eject))
        .unwrap();
    spawner
        .spawn(button(Input::new(b.btn_d, Pull::Down), Routine::Stop))
        .unwrap();
}
