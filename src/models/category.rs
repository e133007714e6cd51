#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Category {
    #[sqlx(rename = "category_id")]
    pub id: i32,
    #[sqlx(rename = "category_name")]
    pub name: String,
}
