use std::sync::Arc;

use crate::database::ProductRepository;

/// Product store handle injected into every request via an `Extension` layer
#[derive(Clone)]
pub struct ProductStore(pub Arc<dyn ProductRepository>);

impl ProductStore {
    pub fn new(repository: impl ProductRepository + 'static) -> Self {
        Self(Arc::new(repository))
    }
}

impl std::ops::Deref for ProductStore {
    type Target = dyn ProductRepository;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}
