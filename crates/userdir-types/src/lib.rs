mod criteria;
mod nationality;
mod profile;
mod profiling;

pub use criteria::*;
pub use nationality::*;
pub use profile::*;
pub use profiling::*;
