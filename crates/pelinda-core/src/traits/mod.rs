//! Core traits for the Pelinda client
//!
//! This module defines the seams that keep the client free of I/O details.
//!
//! - [`Transport`]: Send one HTTP request and return the raw response
//! - [`HardwareIdProvider`]: Read the local hardware identifier (HWID)

pub mod transport;
pub mod hardware_id;

pub use transport::{Transport, HttpRequest, HttpResponse, Method};
pub use hardware_id::{HardwareIdProvider, StaticHardwareId};
