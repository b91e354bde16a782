//! CLI command handling

pub mod console;
pub mod failure;
pub mod info;
pub mod logs;
pub mod output;
pub mod scan;
pub mod setup;

pub use console::*;
pub use failure::*;
pub use info::*;
pub use logs::*;
pub use output::*;
pub use scan::*;
pub use setup::*;
