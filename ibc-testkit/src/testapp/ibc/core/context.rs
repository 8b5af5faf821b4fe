use crate::testapp::ibc::core::router::MockRouter;
use crate::testapp::ibc::core::types::MockIbcStore;

/// The IBC state of a host chain together with the application modules it
/// routes channel callbacks to.
///
/// The handshake handlers live in [`crate::testapp::ibc::core::handler`].
#[derive(Debug)]
pub struct MockIbcContext {
    pub store: MockIbcStore,
    pub router: MockRouter,
}

impl MockIbcContext {
    pub fn new(store: MockIbcStore, router: MockRouter) -> Self {
        Self { store, router }
    }
}
