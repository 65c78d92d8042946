pub mod resolver;
pub mod state;

pub use resolver::{Resolution, Resolver};
pub use state::{ResolutionState, StateTrace};
