//! Skeelane game library
//!
//! A carnival skee-ball lane: drag a ball across the staging floor and fling
//! it up a sloped board studded with scoring holes.  Gesture capture, launch
//! physics, hole detection, and bounce audio are built on Bevy and Rapier.

pub mod audio;
pub mod ball;
pub mod config;
pub mod constants;
pub mod error;
pub mod graphics;
pub mod lane;
pub mod menu;
pub mod rendering;
pub mod round;
pub mod scoring;
pub mod throw;
