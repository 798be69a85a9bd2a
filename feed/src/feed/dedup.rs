use std::collections::HashSet;

use crate::domain::entities::Post;

/// Remove posts whose id has already been seen, keeping the first
/// occurrence and the original order.
pub fn dedup_by_id(posts: Vec<Post>) -> Vec<Post> {
    let mut seen = HashSet::with_capacity(posts.len());
    posts
        .into_iter()
        .filter(|post| seen.insert(post.id.clone()))
        .collect()
}
