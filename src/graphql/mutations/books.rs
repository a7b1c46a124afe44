use super::prelude::*;

#[derive(Default)]
pub struct BookMutations;

#[Object]
impl BookMutations {
    /// Save a book to the current user's list
    ///
    /// Saving a `bookId` that is already on the list leaves the list as it is.
    async fn save_book(&self, ctx: &Context<'_>, input: BookInput) -> Result<Option<User>> {
        let user = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();

        let updated = db
            .users()
            .add_saved_book(&user.user_id, input.into())
            .await?;

        Ok(updated.map(User::from))
    }

    /// Remove a book from the current user's list
    async fn remove_book(&self, ctx: &Context<'_>, book_id: ID) -> Result<Option<User>> {
        let user = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();

        let updated = db
            .users()
            .remove_saved_book(&user.user_id, &book_id)
            .await?;

        Ok(updated.map(User::from))
    }
}
