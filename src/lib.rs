//! Class Pulse - Scheduling and billing core for recurring class programs
//!
//! This crate expands course cycle definitions into dated meetings around
//! a holiday calendar, drives meetings and cycles through their lifecycle
//! state machines, computes instructor pay per meeting, and reconciles
//! cycle progress counters against the meeting records.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
