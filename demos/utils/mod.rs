//! Utility functions for the demo programs
//!
//! Interface configuration and address parsing shared by the demos.

pub mod network;
