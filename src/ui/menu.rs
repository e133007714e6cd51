use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::debug;

use crate::models::Project;
use crate::service::ProjectService;
use crate::ui::input::{required, Console};

const OPERATIONS: [&str; 5] = [
    "1) Add a project",
    "2) List projects",
    "3) Select a project",
    "4) Update project details",
    "5) Delete a project",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Exit,
    AddProject,
    ListProjects,
    SelectProject,
    UpdateProject,
    DeleteProject,
    Invalid(i32),
}

impl MenuAction {
    /// A blank selection exits.
    pub fn from_selection(selection: Option<i32>) -> Self {
        match selection {
            None => MenuAction::Exit,
            Some(1) => MenuAction::AddProject,
            Some(2) => MenuAction::ListProjects,
            Some(3) => MenuAction::SelectProject,
            Some(4) => MenuAction::UpdateProject,
            Some(5) => MenuAction::DeleteProject,
            Some(other) => MenuAction::Invalid(other),
        }
    }
}

/// What a command did to the currently selected project.
enum Selection {
    Unchanged,
    Exit,
    Cleared,
    Selected(Project),
}

pub struct Menu<'a, R, W> {
    service: &'a ProjectService,
    console: Console<R, W>,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(service: &'a ProjectService, input: R, output: W) -> Self {
        Self {
            service,
            console: Console::new(input, output),
        }
    }

    /// Reads and runs commands until the user exits. A failed command is
    /// reported and the loop carries on; only I/O errors end it early.
    pub async fn run(&mut self) -> Result<()> {
        let mut current: Option<Project> = None;

        loop {
            self.print_operations(current.as_ref())?;

            let action = match self.console.int_input("Enter a menu selection") {
                Ok(selection) => MenuAction::from_selection(selection),
                Err(err) if err.is::<io::Error>() => return Err(err),
                Err(err) => {
                    self.report(&err)?;
                    continue;
                }
            };
            debug!(?action, "menu selection");

            // Selecting drops the old selection even if the new one fails.
            if action == MenuAction::SelectProject {
                current = None;
            }

            match self.dispatch(action, current.as_ref()).await {
                Ok(Selection::Unchanged) => {}
                Ok(Selection::Exit) => return Ok(()),
                Ok(Selection::Cleared) => current = None,
                Ok(Selection::Selected(project)) => current = Some(project),
                Err(err) if err.is::<io::Error>() => return Err(err),
                Err(err) => self.report(&err)?,
            }
        }
    }

    async fn dispatch(&mut self, action: MenuAction, current: Option<&Project>) -> Result<Selection> {
        match action {
            MenuAction::AddProject => self.create_project().await,
            MenuAction::ListProjects => {
                self.list_projects().await?;
                Ok(Selection::Unchanged)
            }
            MenuAction::SelectProject => self.select_project().await,
            MenuAction::UpdateProject => self.update_project_details(current).await,
            MenuAction::DeleteProject => self.delete_project(current).await,
            MenuAction::Invalid(selection) => {
                writeln!(self.console.output(), "\n{selection} is not a valid selection.")?;
                Ok(Selection::Unchanged)
            }
            MenuAction::Exit => {
                writeln!(self.console.output(), "\nExiting the menu.")?;
                Ok(Selection::Exit)
            }
        }
    }

    fn print_operations(&mut self, current: Option<&Project>) -> io::Result<()> {
        let out = self.console.output();
        writeln!(out, "\nThese are the available selections:")?;
        for operation in OPERATIONS {
            writeln!(out, "  {operation}")?;
        }

        match current {
            None => writeln!(out, "\nYou are not working with a project."),
            Some(project) => writeln!(out, "\nYou are working with project:\n{project}"),
        }
    }

    fn report(&mut self, err: &anyhow::Error) -> io::Result<()> {
        writeln!(self.console.output(), "\nError: {err}")
    }

    async fn create_project(&mut self) -> Result<Selection> {
        let name = required(self.console.string_input("Enter the project name")?, "project name")?;
        let estimated_hours = required(
            self.console.decimal_input("Enter the estimated hours")?,
            "estimated hours",
        )?;
        let actual_hours = required(
            self.console.decimal_input("Enter the actual hours")?,
            "actual hours",
        )?;
        let difficulty = required(
            self.console.int_input("Enter the project difficulty (1-5)")?,
            "difficulty",
        )?;
        let notes = self.console.string_input("Enter the project notes")?;

        let project = Project::new(name, estimated_hours, actual_hours, difficulty, notes);
        let project = self.service.add_project(project).await?;

        writeln!(
            self.console.output(),
            "You have successfully created project:\n{project}"
        )?;
        Ok(Selection::Unchanged)
    }

    async fn list_projects(&mut self) -> Result<()> {
        let projects = self.service.fetch_all_projects().await?;

        let out = self.console.output();
        writeln!(out, "\nProjects:")?;
        for project in &projects {
            writeln!(out, "   {}: {}", project.id, project.name)?;
        }
        Ok(())
    }

    async fn select_project(&mut self) -> Result<Selection> {
        self.list_projects().await?;

        let project_id = required(
            self.console.int_input("Enter a project ID to select a project")?,
            "project ID",
        )?;
        let project = self.service.fetch_project_by_id(project_id).await?;
        Ok(Selection::Selected(project))
    }

    async fn update_project_details(&mut self, current: Option<&Project>) -> Result<Selection> {
        let Some(current) = current else {
            writeln!(self.console.output(), "\nPlease select a project.")?;
            return Ok(Selection::Unchanged);
        };

        let name = self
            .console
            .string_input(&format!("Enter the project name [{}]", current.name))?;
        let estimated_hours = self
            .console
            .decimal_input(&format!("Enter the estimated hours [{}]", current.estimated_hours))?;
        let actual_hours = self
            .console
            .decimal_input(&format!("Enter the actual hours [{}]", current.actual_hours))?;
        let difficulty = self
            .console
            .int_input(&format!("Enter the project difficulty (1-5) [{}]", current.difficulty))?;
        let notes = self.console.string_input(&format!(
            "Enter the project notes [{}]",
            current.notes.as_deref().unwrap_or("")
        ))?;

        let mut project = Project::new(
            name.unwrap_or_else(|| current.name.clone()),
            estimated_hours.unwrap_or_else(|| current.estimated_hours.clone()),
            actual_hours.unwrap_or_else(|| current.actual_hours.clone()),
            difficulty.unwrap_or(current.difficulty),
            notes.or_else(|| current.notes.clone()),
        );
        project.id = current.id;

        self.service.modify_project_details(&project).await?;

        let refreshed = self.service.fetch_project_by_id(current.id).await?;
        Ok(Selection::Selected(refreshed))
    }

    async fn delete_project(&mut self, current: Option<&Project>) -> Result<Selection> {
        self.list_projects().await?;

        let project_id = required(
            self.console.int_input("Enter the ID of the project to delete")?,
            "project ID",
        )?;
        self.service.delete_project(project_id).await?;

        writeln!(
            self.console.output(),
            "Project {project_id} was deleted successfully."
        )?;

        match current {
            Some(project) if project.id == project_id => Ok(Selection::Cleared),
            _ => Ok(Selection::Unchanged),
        }
    }
}
