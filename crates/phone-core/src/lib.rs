pub mod actions;
pub mod apps;
pub mod config;
pub mod entities;
pub mod fallback;
pub mod reducer;
pub mod registry;
pub mod remote;
pub mod state;

pub use actions::*;
pub use config::*;
pub use reducer::*;
pub use registry::*;
pub use state::*;
