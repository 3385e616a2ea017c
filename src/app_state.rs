use crate::{
    domain::UserEmail,
    storage::{ScopedStore, Store},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Storage handle restricted to one owner's rows.
    pub fn scoped_store<'a>(&'a self, owner: &'a UserEmail) -> ScopedStore<'a> {
        ScopedStore::new(self.store.as_ref(), owner)
    }
}
