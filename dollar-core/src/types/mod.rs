pub mod asset;
pub mod contracts;
pub mod snapshot;
pub mod update;

pub use asset::*;
pub use contracts::*;
pub use snapshot::*;
pub use update::*;
