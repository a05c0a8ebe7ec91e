pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    announcement::{Announcement, AnnouncementChanges, NewAnnouncement},
    teacher::{NewTeacher, Teacher},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persistence for the `announcements` collection.
///
/// The store assigns identifiers. Listing returns records oldest first.
#[async_trait]
pub trait AnnouncementStore: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Announcement>>;

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Announcement>>;

    async fn insert(&self, new: &NewAnnouncement) -> anyhow::Result<Announcement>;

    /// Apply `changes` and return the updated record, or `None` if the id is unknown.
    async fn update(
        &self,
        id: Uuid,
        changes: &AnnouncementChanges,
    ) -> anyhow::Result<Option<Announcement>>;

    /// Returns `true` when a record was removed.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;

    async fn ping(&self) -> anyhow::Result<()>;
}

/// Persistence for the `teachers` collection, keyed by username.
#[async_trait]
pub trait TeacherStore: Send + Sync {
    async fn find_teacher(&self, username: &str) -> anyhow::Result<Option<Teacher>>;

    async fn upsert_teacher(&self, teacher: &NewTeacher) -> anyhow::Result<Teacher>;
}
