#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Step {
    #[sqlx(rename = "step_id")]
    pub id: i32,
    #[sqlx(rename = "step_text")]
    pub text: String,
    #[sqlx(rename = "step_order")]
    pub order: i32,
}
