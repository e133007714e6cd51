use sqlx::sqlite::SqliteConnection;
use tracing::debug;

use super::{Database, DbError};
use crate::models::{hours_to_text, Category, Material, Project, Step};

const PROJECT_COLUMNS: &str =
    "project_id, project_name, estimated_hours, actual_hours, difficulty, notes";

impl Database {
    /// Store a new project and return it with the id the database assigned.
    pub async fn insert_project(&self, mut project: Project) -> Result<Project, DbError> {
        self.in_transaction("insert_project", async move |conn: &mut SqliteConnection| {
            let id: i32 = sqlx::query_scalar(
                r#"
                INSERT INTO project (project_name, estimated_hours, actual_hours, difficulty, notes)
                VALUES (?, ?, ?, ?, ?)
                RETURNING project_id
                "#,
            )
            .bind(&project.name)
            .bind(hours_to_text(&project.estimated_hours))
            .bind(hours_to_text(&project.actual_hours))
            .bind(project.difficulty)
            .bind(&project.notes)
            .fetch_one(&mut *conn)
            .await?;

            debug!(project_id = id, "inserted project");
            project.id = id;
            Ok(project)
        })
        .await
    }

    /// All projects ordered by name, without their materials, steps or
    /// categories.
    pub async fn fetch_all_projects(&self) -> Result<Vec<Project>, DbError> {
        self.in_transaction("fetch_all_projects", async |conn: &mut SqliteConnection| {
            let sql = format!("SELECT {PROJECT_COLUMNS} FROM project ORDER BY project_name");
            sqlx::query_as::<_, Project>(&sql)
                .fetch_all(&mut *conn)
                .await
        })
        .await
    }

    /// One project with its materials, steps and categories attached, or
    /// `None` if no project has that id.
    pub async fn fetch_project_by_id(&self, project_id: i32) -> Result<Option<Project>, DbError> {
        self.in_transaction("fetch_project_by_id", async |conn: &mut SqliteConnection| {
            let sql = format!("SELECT {PROJECT_COLUMNS} FROM project WHERE project_id = ?");
            let project = sqlx::query_as::<_, Project>(&sql)
                .bind(project_id)
                .fetch_optional(&mut *conn)
                .await?;

            let Some(mut project) = project else {
                return Ok(None);
            };

            project.materials = fetch_materials_for_project(conn, project_id).await?;
            project.steps = fetch_steps_for_project(conn, project_id).await?;
            project.categories = fetch_categories_for_project(conn, project_id).await?;

            Ok(Some(project))
        })
        .await
    }

    /// Overwrite the five stored fields of the project with `project.id`.
    /// Returns `false` when no such project exists.
    pub async fn modify_project_details(&self, project: &Project) -> Result<bool, DbError> {
        self.in_transaction("modify_project_details", async |conn: &mut SqliteConnection| {
            let result = sqlx::query(
                r#"
                UPDATE project
                SET project_name = ?, estimated_hours = ?, actual_hours = ?, difficulty = ?, notes = ?
                WHERE project_id = ?
                "#,
            )
            .bind(&project.name)
            .bind(hours_to_text(&project.estimated_hours))
            .bind(hours_to_text(&project.actual_hours))
            .bind(project.difficulty)
            .bind(&project.notes)
            .bind(project.id)
            .execute(&mut *conn)
            .await?;

            Ok(result.rows_affected() == 1)
        })
        .await
    }

    /// Delete a project together with its materials, steps and category
    /// links. Returns `false` when no such project exists.
    pub async fn delete_project(&self, project_id: i32) -> Result<bool, DbError> {
        self.in_transaction("delete_project", async |conn: &mut SqliteConnection| {
            let result = sqlx::query("DELETE FROM project WHERE project_id = ?")
                .bind(project_id)
                .execute(&mut *conn)
                .await?;

            Ok(result.rows_affected() == 1)
        })
        .await
    }
}

async fn fetch_materials_for_project(
    conn: &mut SqliteConnection,
    project_id: i32,
) -> Result<Vec<Material>, sqlx::Error> {
    sqlx::query_as::<_, Material>(
        "SELECT material_id, material_name FROM material WHERE project_id = ? ORDER BY material_id",
    )
    .bind(project_id)
    .fetch_all(&mut *conn)
    .await
}

async fn fetch_steps_for_project(
    conn: &mut SqliteConnection,
    project_id: i32,
) -> Result<Vec<Step>, sqlx::Error> {
    sqlx::query_as::<_, Step>(
        "SELECT step_id, step_text, step_order FROM step WHERE project_id = ? ORDER BY step_order, step_id",
    )
    .bind(project_id)
    .fetch_all(&mut *conn)
    .await
}

async fn fetch_categories_for_project(
    conn: &mut SqliteConnection,
    project_id: i32,
) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT c.category_id, c.category_name
        FROM category c
        JOIN project_category pc USING (category_id)
        WHERE pc.project_id = ?
        ORDER BY c.category_name
        "#,
    )
    .bind(project_id)
    .fetch_all(&mut *conn)
    .await
}
