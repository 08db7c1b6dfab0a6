//! Wiring of the tracker services over a storage backend.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use domain::StatusWorkflow;

use super::{
    BugLifecycle, BugTracker, CommentThread, Directory, Discussion, IdentityDirectory, Registrar,
    RegistrationService,
};
use crate::clock::{Clock, SystemClock};
use crate::repository::{
    BugRepository, BugStore, CommentRepository, CommentStore, InMemoryStore, UserRepository,
    UserStore,
};

/// The full set of tracker services, sharing one store and one clock.
#[derive(Clone)]
pub struct TrackerServices {
    pub identity: Arc<dyn IdentityDirectory>,
    pub bugs: Arc<dyn BugLifecycle>,
    pub comments: Arc<dyn CommentThread>,
    pub registration: Arc<dyn RegistrationService>,
}

impl TrackerServices {
    /// Services backed by PostgreSQL.
    pub fn from_connection(db: DatabaseConnection, workflow: StatusWorkflow) -> Self {
        Self::assemble(
            Arc::new(UserStore::new(db.clone())),
            Arc::new(BugStore::new(db.clone())),
            Arc::new(CommentStore::new(db)),
            Arc::new(SystemClock),
            workflow,
        )
    }

    /// Services backed by a process-local store.
    pub fn in_memory(store: InMemoryStore, workflow: StatusWorkflow) -> Self {
        Self::with_clock(store, Arc::new(SystemClock), workflow)
    }

    /// In-memory services with a caller-supplied clock.
    pub fn with_clock(store: InMemoryStore, clock: Arc<dyn Clock>, workflow: StatusWorkflow) -> Self {
        Self::assemble(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store),
            clock,
            workflow,
        )
    }

    pub fn assemble(
        users: Arc<dyn UserRepository>,
        bugs: Arc<dyn BugRepository>,
        comments: Arc<dyn CommentRepository>,
        clock: Arc<dyn Clock>,
        workflow: StatusWorkflow,
    ) -> Self {
        let identity: Arc<dyn IdentityDirectory> = Arc::new(Directory::new(users.clone()));

        Self {
            bugs: Arc::new(BugTracker::new(
                bugs.clone(),
                identity.clone(),
                clock.clone(),
                workflow,
            )),
            comments: Arc::new(Discussion::new(comments, bugs, identity.clone(), clock.clone())),
            registration: Arc::new(Registrar::new(users, clock)),
            identity,
        }
    }
}
