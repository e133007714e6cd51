mod project;
mod category;
mod material;
mod step;

pub use project::{hours_to_text, Project, HOURS_SCALE};
pub use category::Category;
pub use material::Material;
pub use step::Step;
