//! Shared pieces of the `hns` binary: the concrete Algolia transport,
//! directory resolution, and logging setup. The search state machine itself
//! lives in `hns-core`; the terminal front-end in `hns-tui`.

pub mod algolia;
pub mod app_dirs;
pub mod logging;

pub use algolia::{AlgoliaTransport, DEFAULT_ENDPOINT};
