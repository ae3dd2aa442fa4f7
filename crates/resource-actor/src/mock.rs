//! # Mock Clients
//!
//! [`MockClient<T>`] hands out a real [`ResourceClient<T>`] whose requests are answered
//! from a queue of scripted expectations instead of a running actor. Use it to test
//! the code *around* a client: domain client wrappers, or an actor whose context holds
//! clients to other actors.
//!
//! | | MockClient | Real actor |
//! |---|---|---|
//! | **State** | Scripted responses | Real store |
//! | **Determinism** | Fully deterministic | Subject to the scheduler |
//! | **Error injection** | `return_err(...)` | Needs a specific state |
//!
//! Transactions are the exception to "no state": [`MockClient::expect_transact`] takes
//! the entities the transaction should see, and the closure really runs against them.
//!
//! ```rust
//! use resource_actor::mock::MockClient;
//! use resource_actor::{ActorEntity, FrameworkError};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Crate { id: u32, units: u32 }
//! #[derive(Debug)] struct CrateCreate;
//! #[derive(Debug, thiserror::Error)] #[error("crate error")] struct CrateError;
//!
//! #[async_trait]
//! impl ActorEntity for Crate {
//!     type Id = u32; type Create = CrateCreate; type Update = ();
//!     type Action = (); type ActionResult = (); type Context = (); type Error = CrateError;
//!     fn id(&self) -> &u32 { &self.id }
//!     fn from_create_params(id: u32, _: CrateCreate) -> Result<Self, CrateError> { Ok(Self { id, units: 0 }) }
//!     async fn on_update(&mut self, _: (), _: &()) -> Result<(), CrateError> { Ok(()) }
//!     async fn handle_action(&mut self, _: (), _: &()) -> Result<(), CrateError> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Crate>::new();
//!     mock.expect_get(1).return_err(FrameworkError::ActorClosed);
//!     mock.expect_transact(vec![Crate { id: 1, units: 4 }]);
//!
//!     let client = mock.client();
//!     assert!(matches!(client.get(1).await, Err(FrameworkError::ActorClosed)));
//!
//!     let total = client
//!         .transact(|tx| Ok::<u32, CrateError>(tx.values().map(|c| c.units).sum()))
//!         .await
//!         .unwrap()
//!         .unwrap();
//!     assert_eq!(total, 4);
//!     mock.verify();
//! }
//! ```

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, Updated};
use crate::transaction::{Transaction, TransactionOp};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// A scripted answer for the next request the mock receives.
enum Expectation<T: ActorEntity> {
    Get {
        response: Result<Option<T>, FrameworkError>,
    },
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Update {
        response: Result<Updated<T>, FrameworkError>,
    },
    Delete {
        response: Result<T, FrameworkError>,
    },
    Action {
        response: Result<T::ActionResult, FrameworkError>,
    },
    Transact {
        items: Vec<T>,
    },
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with expectation tracking for fluent testing.
///
/// Expectations are consumed in order; a request that does not match the next
/// expectation panics the background task, which surfaces in the test as
/// [`FrameworkError::ActorDropped`].
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Expectations<T>,
    committed: Arc<Mutex<Vec<Vec<T>>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let committed = Arc::new(Mutex::new(Vec::new()));
        let queue = expectations.clone();
        let commits = committed.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = lock(&queue).pop_front();

                match (request, expectation) {
                    (ResourceRequest::Get { respond_to, .. }, Some(Expectation::Get { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Create { respond_to, .. },
                        Some(Expectation::Create { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::List { respond_to }, Some(Expectation::List { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Update { respond_to, .. },
                        Some(Expectation::Update { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Delete { respond_to, .. },
                        Some(Expectation::Delete { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { respond_to, .. },
                        Some(Expectation::Action { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Transact { op }, Some(Expectation::Transact { items })) => {
                        let working = items.into_iter().map(|i| (i.id().clone(), i)).collect();
                        let mut tx = Transaction::begin(working);
                        if op(&mut tx) {
                            lock(&commits).push(tx.into_inner().into_values().collect());
                        }
                    }
                    (request, _) => {
                        panic!("Unexpected request or expectation mismatch: {request:?}");
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            committed,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_get(&mut self, _id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(|response| Expectation::Get { response })
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.builder(|response| Expectation::Create { response })
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(|response| Expectation::List { response })
    }

    pub fn expect_update(&mut self, _id: T::Id) -> ExpectationBuilder<T, Updated<T>> {
        self.builder(|response| Expectation::Update { response })
    }

    pub fn expect_delete(&mut self, _id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(|response| Expectation::Delete { response })
    }

    pub fn expect_action(&mut self, _id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(|response| Expectation::Action { response })
    }

    /// Expects a transaction and runs it against `items`.
    pub fn expect_transact(&mut self, items: Vec<T>) {
        lock(&self.expectations).push_back(Expectation::Transact { items });
    }

    /// Working copies of every transaction that committed, in order.
    pub fn committed(&self) -> Vec<Vec<T>> {
        lock(&self.committed).clone()
    }

    /// Panics if any expectation was not consumed.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations).len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }

    fn builder<R>(
        &mut self,
        make: fn(Result<R, FrameworkError>) -> Expectation<T>,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            make,
            expectations: self.expectations.clone(),
        }
    }
}

/// Completes an expectation with either a value or an error.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    make: fn(Result<R, FrameworkError>) -> Expectation<T>,
    expectations: Expectations<T>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    pub fn return_ok(self, value: R) {
        lock(&self.expectations).push_back((self.make)(Ok(value)));
    }

    pub fn return_err(self, error: FrameworkError) {
        lock(&self.expectations).push_back((self.make)(Err(error)));
    }
}

fn lock<V>(mutex: &Mutex<V>) -> std::sync::MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// =============================================================================
// RAW CHANNEL HELPERS
// =============================================================================

/// Creates a client whose requests land on a receiver the test controls.
///
/// Useful when the test needs to inspect the payload of a request before
/// answering it (e.g. the quantity a client wrapper put into an update).
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next message, if it is a Create request.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next message, if it is an Update request.
pub async fn expect_update<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Update,
    oneshot::Sender<Result<Updated<T>, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update {
            id,
            update,
            respond_to,
        }) => Some((id, update, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a Transact request.
pub async fn expect_transact<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<TransactionOp<T>> {
    match receiver.recv().await {
        Some(ResourceRequest::Transact { op }) => Some(op),
        _ => None,
    }
}
