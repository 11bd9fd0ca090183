//! `huebridge` emulates a Philips Hue bridge with a set of virtual color lights.
//!
//! Clients find the bridge through SSDP, then read and change light state through the
//! v1 REST API or the CLIP v2 API. Both APIs operate on the same [registry::Registry].

#[macro_use]
extern crate tracing;

pub mod api;
pub mod color;
pub mod discovery;
pub mod models;
pub mod monitor;
pub mod registry;
pub mod web;
