pub mod error;
pub mod logging;
pub mod util;

pub mod cache;
pub mod completion;
pub mod config;
pub mod declaration;
pub mod diagnostics;
pub mod hover;
pub mod position;
pub mod references;
pub mod session;
pub mod symbols;
pub mod tables;
pub mod tokens;

pub use config::Config;
pub use error::{PickscopeError, Result};
pub use session::Session;
