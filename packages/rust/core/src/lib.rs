//! RO-Crate generation for project templates and Jupyter notebooks.
//!
//! Two independent pipelines:
//! - [`project`]: template config → extracted metadata → one project crate
//! - [`linker`]: notebook directory → one embedded crate per notebook →
//!   a parent crate aggregating them

pub mod clock;
pub mod linker;
pub mod metadata;
pub mod notebook;
pub mod people;
pub mod project;
pub mod rocrate;

pub use clock::{Clock, FixedClock, SystemClock};
pub use rocrate::{Entity, RoCrate};
