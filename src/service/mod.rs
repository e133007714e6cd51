use thiserror::Error;
use tracing::debug;

use crate::db::{Database, DbError};
use crate::models::Project;

#[derive(Debug, Error)]
pub enum ProjectError {
    /// No project has this id.
    #[error("Project with ID={0} does not exist.")]
    NotFound(i32),
    #[error(transparent)]
    Storage(#[from] DbError),
}

/// Project operations as the shell sees them. Unlike [`Database`], an
/// operation on a missing id is an error here.
pub struct ProjectService {
    db: Database,
}

impl ProjectService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn close(&self) {
        self.db.close().await;
    }

    pub async fn add_project(&self, project: Project) -> Result<Project, ProjectError> {
        let project = self.db.insert_project(project).await?;
        debug!(project_id = project.id, "project added");
        Ok(project)
    }

    pub async fn fetch_all_projects(&self) -> Result<Vec<Project>, ProjectError> {
        Ok(self.db.fetch_all_projects().await?)
    }

    pub async fn fetch_project_by_id(&self, project_id: i32) -> Result<Project, ProjectError> {
        self.db
            .fetch_project_by_id(project_id)
            .await?
            .ok_or(ProjectError::NotFound(project_id))
    }

    pub async fn modify_project_details(&self, project: &Project) -> Result<(), ProjectError> {
        if !self.db.modify_project_details(project).await? {
            return Err(ProjectError::NotFound(project.id));
        }
        debug!(project_id = project.id, "project modified");
        Ok(())
    }

    pub async fn delete_project(&self, project_id: i32) -> Result<(), ProjectError> {
        if !self.db.delete_project(project_id).await? {
            return Err(ProjectError::NotFound(project_id));
        }
        debug!(project_id, "project deleted");
        Ok(())
    }
}
