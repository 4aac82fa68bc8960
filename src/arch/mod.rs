//! # Architecture Port
//!
//! Hardware side of the timebase: the tick generator and the clock that
//! reads it. Only built for bare-metal ARM; everything above this layer
//! goes through [`crate::clock::Clock`].

pub mod cortex_m4;
