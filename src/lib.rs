#![doc = include_str!("../readme.md")]

#[cfg(feature = "mimalloc")]
use mimalloc::MiMalloc;
#[cfg_attr(feature = "mimalloc", global_allocator)]
#[cfg(feature = "mimalloc")]
static GLOBAL: MiMalloc = MiMalloc;

pub mod config;
pub mod error;
pub mod geo;
pub mod graph;
pub mod query;
pub mod route;
pub mod spatial;
pub mod transition;
pub mod util;

#[cfg(test)]
mod fixtures;

#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use graph::{EngineBuilder, MapEngine};
#[doc(inline)]
pub use transition::{MapMatcher, MatchResult, Observation};
