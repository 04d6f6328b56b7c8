//! Community synthesis and a discrete-event engine to drive it
//!
//! The crate builds a synthetic community of people, homes and workplaces from a handful of
//! aggregate parameters and then runs a discrete-event simulation over it.
//!
//! The central object of a simulation is the [`Context`], which is responsible for managing all
//! the behavior of the simulation:
//! * Maintaining a notion of time for the simulation
//! * Scheduling plans to run at some point in the future and executing them at that time
//! * Passing events from the modules that emit them to the modules that subscribe to them
//! * Holding module-specific data so that the module and other modules can access it
//! * Handing out independently seeded random number generators
//!
//! The [`community`] module synthesizes the population. Synthesis is exact where it matters:
//! every person lives in exactly one home, every employee works in at most one workplace, and
//! exactly the requested number of people start out infected. Once built, every workplace opens
//! and closes on a daily cycle until the simulation ends.
//!
//! A typical run, as performed by the `epidemic` binary:
//!
//! ```no_run
//! use epidemic::community::ContextCommunityExt;
//! use epidemic::loader::load_community_file;
//! use epidemic::{Context, ContextRandomExt};
//! use std::path::Path;
//!
//! let parameters = load_community_file(Path::new("town.txt")).unwrap();
//! let mut context = Context::new();
//! context.init_random(42);
//! context.add_plan(parameters.end_time, Context::shutdown);
//! context.synthesize_community(&parameters);
//! context.execute();
//! ```
pub mod community;
pub mod context;
pub mod data_plugin;
pub mod error;
pub mod hashing;
pub mod loader;
pub mod log;
pub mod parameters;
pub mod plan;
pub mod random;
pub mod report;
pub mod runner;
pub mod time;

pub use community::{Community, ContextCommunityExt};
pub use context::{Context, Event};
pub use error::EpidemicError;
pub use parameters::CommunityParameters;
pub use random::{ContextRandomExt, RngId};
pub use report::{ContextReportExt, Report};
pub use runner::{run_with_args, BaseArgs};

// Re-exported for use in macros
pub use csv;
pub use paste;
pub use rand;
