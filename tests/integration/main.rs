//! Integration test driver for the `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against the mock bus.  All tests run on the host (x86_64) with no
//! real hardware required.

mod control_flow_tests;
mod engine_tests;
mod mock_bus;
