use crate::plugins::stories::models::Story;

/// Exclusive-owner rule shared by replace and remove: only the recorded author may mutate a story.
pub fn can_modify(actor: &str, story: &Story) -> bool {
    !actor.is_empty() && story.author_id == actor
}
