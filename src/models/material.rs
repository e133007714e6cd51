/// A material used by a project. Only the identity and name are read back;
/// quantity and cost live in the table but are not part of this record.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Material {
    #[sqlx(rename = "material_id")]
    pub id: i32,
    #[sqlx(rename = "material_name")]
    pub name: String,
}
