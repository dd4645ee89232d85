//! The virtual clock. Ticks are owned and advanced by the simulation
//! harness; the scheduling driver only ever reads the current tick.

/// One step of the virtual clock. `Schedule` is called once per tick.
pub type Tick = u64;
