pub mod controller;
pub mod error;
pub mod questionnaire;
pub mod session;

pub use controller::*;
pub use error::SessionError;
pub use questionnaire::*;
pub use session::*;
