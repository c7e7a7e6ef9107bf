use std::sync::Arc;

use crate::store::Records;

/// Shared handler state: the one record store created at startup.
#[derive(Clone)]
pub struct AppState {
    records: Arc<dyn Records>,
}

impl AppState {
    pub fn new(records: Arc<dyn Records>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &dyn Records {
        self.records.as_ref()
    }
}
