pub mod messages;
pub mod step;
pub mod transcript;

pub use messages::*;
pub use step::*;
pub use transcript::*;
