pub use anyhow::Result;

use fnv::FnvHashMap;

pub type Map<K, V> = FnvHashMap<K, V>;

pub mod builtin;
pub mod metrics;
pub mod raw;

mod parsers;
pub use parsers::{ParseScenario, ReliefFmt};

pub use raw::Scenario;
