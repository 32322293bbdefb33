//! # GPIO Sampler Core Library
//!
//! This crate is the core library for the `gpio-sampler` tool. It polls a single
//! GPIO input pin on a Raspberry Pi-class board at a configured frequency through
//! a memory-mapped view of the GPIO peripheral, collects the observed levels into
//! an in-memory buffer, and hands the finished buffer to a CSV sink.
//!
//! ## Crate Structure
//!
//! - **`config`**: The sampling configuration and its validation step (the safety
//!   gate). Raw CLI input becomes a [`config::ValidatedConfig`] or is rejected
//!   before any hardware resource is touched.
//! - **`error`**: The [`error::ConfigError`] and [`error::SamplerError`] types used
//!   across the crate.
//! - **`gpio`**: Board-generation address resolution, the memory-mapped register
//!   window over `/dev/mem`, and the [`gpio::LevelSource`] trait that abstracts
//!   pin-level reads so the sampling loop can run against mock hardware.
//! - **`logging`**: One-shot `tracing` subscriber initialization.
//! - **`sampler`**: The sampling loop, with its two stopping policies (fixed
//!   sample count, fixed wall-clock duration).
//! - **`sink`**: The CSV writer that persists a finished sample buffer.
//!
//! The binary in `main.rs` is a thin clap front end over these modules.

pub mod config;
pub mod error;
pub mod gpio;
pub mod logging;
pub mod sampler;
pub mod sink;
