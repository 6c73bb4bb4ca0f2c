use super::prelude::*;

#[derive(Default)]
pub struct AuthorMutations;

#[Object]
impl AuthorMutations {
    /// Set an author's birth year; `setBornTo: null` clears it
    #[graphql(guard = "AuthGuard")]
    async fn edit_author(
        &self,
        ctx: &Context<'_>,
        name: String,
        set_born_to: Option<i32>,
    ) -> Result<Option<Author>> {
        let db = ctx.data_unchecked::<Database>();

        let updated = db
            .authors()
            .set_born(&name, set_born_to)
            .await
            .map_err(|e| CatalogError::validation("Saving born year failed", &name, e).extend())?
            .ok_or_else(|| {
                CatalogError::NotFound {
                    entity: "Author",
                    invalid_args: name.clone(),
                }
                .extend()
            })?;

        tracing::info!(author_id = %updated.id, born = ?updated.born, "Author updated");
        Ok(Some(updated.into()))
    }
}
