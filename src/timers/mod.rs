//! Wall clock timing of engine phases and CPU budget enforcement.

mod budget;
#[allow(clippy::module_inception)]
mod timers;

pub(crate) use budget::*;
pub(crate) use timers::*;

cfg_if::cfg_if! {
    if #[cfg(target_family = "wasm")] {
        pub(crate) use web_time::{Duration, Instant};
    } else {
        pub(crate) use std::time::{Duration, Instant};
    }
}
