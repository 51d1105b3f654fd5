mod action;
mod analysis;
mod author;
mod error;
mod event;
mod message;
mod reasoning;
mod schema;
mod session;
mod upload;

pub use action::*;
pub use analysis::*;
pub use author::*;
pub use error::*;
pub use event::*;
pub use message::*;
pub use reasoning::*;
pub use schema::*;
pub use session::*;
pub use upload::*;
