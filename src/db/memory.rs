use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AnnouncementStore, TeacherStore};
use crate::models::{
    announcement::{Announcement, AnnouncementChanges, NewAnnouncement},
    teacher::{NewTeacher, Teacher},
};

/// In-process store used by the test suite and for local runs without PostgreSQL.
/// Announcements keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    announcements: RwLock<Vec<Announcement>>,
    teachers: RwLock<HashMap<String, Teacher>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnnouncementStore for MemoryStore {
    async fn list(&self) -> anyhow::Result<Vec<Announcement>> {
        Ok(self.announcements.read().await.clone())
    }

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Announcement>> {
        let items = self.announcements.read().await;
        Ok(items.iter().find(|a| a.id == id).cloned())
    }

    async fn insert(&self, new: &NewAnnouncement) -> anyhow::Result<Announcement> {
        let announcement = Announcement {
            id: Uuid::new_v4(),
            message: new.message.clone(),
            start_date: new.start_date,
            expiration_date: new.expiration_date,
            created_by: new.created_by.clone(),
            created_at: new.created_at,
        };
        self.announcements.write().await.push(announcement.clone());
        Ok(announcement)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &AnnouncementChanges,
    ) -> anyhow::Result<Option<Announcement>> {
        let mut items = self.announcements.write().await;
        Ok(items.iter_mut().find(|a| a.id == id).map(|a| {
            changes.apply_to(a);
            a.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut items = self.announcements.write().await;
        let before = items.len();
        items.retain(|a| a.id != id);
        Ok(items.len() < before)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl TeacherStore for MemoryStore {
    async fn find_teacher(&self, username: &str) -> anyhow::Result<Option<Teacher>> {
        Ok(self.teachers.read().await.get(username).cloned())
    }

    async fn upsert_teacher(&self, teacher: &NewTeacher) -> anyhow::Result<Teacher> {
        let mut teachers = self.teachers.write().await;
        let created_at = teachers
            .get(&teacher.username)
            .map(|t| t.created_at)
            .unwrap_or_else(Utc::now);
        let row = Teacher {
            username: teacher.username.clone(),
            display_name: teacher.display_name.clone(),
            password_hash: teacher.password_hash.clone(),
            created_at,
        };
        teachers.insert(row.username.clone(), row.clone());
        Ok(row)
    }
}
