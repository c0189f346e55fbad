//! Typed wrappers over the remote API endpoints.
//!
//! Each service holds a pipeline clone and exposes one functional area
//! of the API. All calls go through the authenticated pipeline, so
//! token refresh is transparent here.

mod charts;
mod persons;
mod profile;
mod receipts;
mod search;

pub use charts::ChartsService;
pub use persons::PersonsService;
pub use profile::ProfileService;
pub use receipts::ReceiptsService;
pub use search::SearchService;
