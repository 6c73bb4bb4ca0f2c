use super::prelude::*;

#[derive(Default)]
pub struct UserQueries;

#[Object]
impl UserQueries {
    /// The authenticated caller, or null
    async fn me(&self, ctx: &Context<'_>) -> Option<User> {
        ctx.try_current_user().cloned().map(User::from)
    }
}
