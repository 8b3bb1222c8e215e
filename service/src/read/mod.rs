//! Read entities definitions.

pub mod booking;
