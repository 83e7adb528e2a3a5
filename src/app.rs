use crate::domain::session::SessionStore;
use crate::domain::task::TaskStore;
use crate::external_connections::ExternalConnectivity;

/// Everything a running client owns: the way out to the backend plus the two stores
pub struct AppContext<C: ExternalConnectivity> {
    pub ext_cxn: C,
    pub session: SessionStore,
    pub tasks: TaskStore,
}

impl<C: ExternalConnectivity> AppContext<C> {
    pub fn new(ext_cxn: C) -> Self {
        AppContext {
            ext_cxn,
            session: SessionStore::new(),
            tasks: TaskStore::new(),
        }
    }
}
