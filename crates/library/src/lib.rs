pub mod catalog;
pub mod detect;
pub mod error;
pub mod index;
pub mod listing;
pub mod locate;
pub mod organize;
pub mod reconcile;
pub mod record;
pub mod scan;
pub mod survey;
mod template;

pub use crate::catalog::{CatalogScope, LanguageCatalog};
pub use crate::listing::{Listing, Placement, render as render_listing};
pub use crate::survey::{Survey, SurveyOptions, survey};
pub use crate::template::{DEFAULT_TEMPLATE, PathGenerator};
use gutcat_storage::Transfer;

/// Default upper bound on organize operations in flight.
pub const MAX_PROCESS_CONCURRENCY: usize = 100;

/// Settings shared by every organize operation in a run.
#[derive(Debug)]
pub struct Context {
    pub template: PathGenerator,
    pub transfer: Transfer,
    /// Maximum number of sources processed at once.
    pub concurrency: usize,
}
impl Context {
    pub fn new(template: PathGenerator, transfer: Transfer) -> Self {
        Self {
            template,
            transfer,
            concurrency: MAX_PROCESS_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }
}
