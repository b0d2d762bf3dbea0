pub mod animator;
pub mod app;
pub mod camera3d;
pub mod cli;
pub mod config;
pub mod content;
pub mod input;
pub mod interaction;
pub mod island;
pub mod mesh;
pub mod picking;
pub mod renderer;
pub mod secret;
pub mod time;
pub mod world;

pub use app::{run, run_with_overrides, App};

pub(crate) fn wrap_angle(mut radians: f32) -> f32 {
    let two_pi = 2.0 * std::f32::consts::PI;
    while radians > std::f32::consts::PI {
        radians -= two_pi;
    }
    while radians < -std::f32::consts::PI {
        radians += two_pi;
    }
    radians
}
