pub mod error;
pub mod id;
pub mod tolerance;
pub mod traits;

pub use error::{Result, RoadError};
pub use id::MaterialHandle;
pub use tolerance::Tolerance;
