use std::sync::Arc;

use crate::api::{ApiClient, Backend};
use crate::session::{SessionStore, SessionVault};
use crate::stores::attendance::AttendanceStore;
use crate::stores::batch_classes::BatchClassStore;
use crate::stores::batch_students::BatchStudentStore;
use crate::stores::batches::BatchStore;
use crate::stores::class_sessions::ClassSessionStore;
use crate::stores::course_batches::CourseBatchStore;
use crate::stores::courses::CourseStore;
use crate::stores::institutes::InstituteStore;
use crate::stores::locations::LocationStore;
use crate::stores::session_years::SessionYearStore;
use crate::stores::students::StudentStore;
use crate::stores::subjects::SubjectStore;
use crate::stores::teachers::TeacherStore;

/// Explicit application-state container: one session slice, one client,
/// one store per backend resource. Pages get handed this instead of
/// reaching for any ambient global, and each store stays independently
/// testable.
pub struct App {
    pub session: SessionStore,
    pub client: ApiClient,
    pub students: StudentStore,
    pub teachers: TeacherStore,
    pub institutes: InstituteStore,
    pub locations: LocationStore,
    pub subjects: SubjectStore,
    pub courses: CourseStore,
    pub session_years: SessionYearStore,
    pub batches: BatchStore,
    pub batch_classes: BatchClassStore,
    pub batch_students: BatchStudentStore,
    pub class_sessions: ClassSessionStore,
    pub attendance: AttendanceStore,
    pub course_batches: CourseBatchStore,
}

impl App {
    /// Rehydrates the session slice from the vault before any store is
    /// built, so the very first request already carries restored
    /// credentials. Domain caches always start empty.
    pub fn open(backend: Arc<dyn Backend>, vault: Option<SessionVault>) -> Self {
        let session = SessionStore::open(vault);
        let client = ApiClient::new(backend, session.handle());
        Self {
            students: StudentStore::new(client.clone()),
            teachers: TeacherStore::new(client.clone()),
            institutes: InstituteStore::new(client.clone()),
            locations: LocationStore::new(client.clone()),
            subjects: SubjectStore::new(client.clone()),
            courses: CourseStore::new(client.clone()),
            session_years: SessionYearStore::new(client.clone()),
            batches: BatchStore::new(client.clone()),
            batch_classes: BatchClassStore::new(client.clone()),
            batch_students: BatchStudentStore::new(client.clone()),
            class_sessions: ClassSessionStore::new(client.clone()),
            attendance: AttendanceStore::new(client.clone()),
            course_batches: CourseBatchStore::new(client.clone()),
            client,
            session,
        }
    }
}
