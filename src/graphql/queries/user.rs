use super::prelude::*;

#[derive(Default)]
pub struct UserQueries;

#[Object]
impl UserQueries {
    /// Get the current authenticated user
    ///
    /// Null when the token is valid but its user no longer exists.
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let user = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();

        let record = db.users().get_by_id(&user.user_id).await?;
        if record.is_none() {
            tracing::debug!(user_id = %user.user_id, "Token refers to a missing user");
        }
        Ok(record.map(User::from))
    }
}
