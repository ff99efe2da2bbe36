//! # bitchain-cli
//!
//! Product file output, result presentation, the debug log, and shell completion.

pub mod completion;
pub mod debug_log;
pub mod output;
pub mod presenter;

pub use debug_log::DebugLog;
pub use presenter::CLIResultPresenter;
