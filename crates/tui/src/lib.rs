//! Interactive terminal front-end for the `hns` search session.
//!
//! The crate renders the [`hns_core::SessionSnapshot`] and translates key
//! presses into the session callbacks; it holds no search state of its own
//! beyond row selection and cosmetic widgets.

mod app;
mod input;
mod render;
mod runtime;

pub use app::{App, SearchOutcome};
pub use input::QueryInput;
pub use runtime::run;
