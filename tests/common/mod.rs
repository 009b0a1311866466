#![allow(dead_code)] // Each test binary uses a different subset

pub mod fake_ffmpeg;
pub mod helpers;
