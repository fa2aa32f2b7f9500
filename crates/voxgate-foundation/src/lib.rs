pub mod error;
pub mod locale;
pub mod state;

pub use error::*;
pub use locale::*;
pub use state::*;
