//! A blog-post table: the classic client of the indexing layer.
//!
//! Posts are stored under three indexes: the implicit `id` primary index,
//! a unique `slug` index for stable URLs, and a descending `created` index
//! for reverse-chronological listings.
//!
//! Run with: `cargo run --example posts`

use serde::{Deserialize, Serialize};
use tabledb::{Index, MemoryStore, Query, Table, TableOptions, Value};

#[derive(Debug, Serialize, Deserialize)]
struct Post {
    id: String,
    title: String,
    content: String,
    slug: String,
    created: i64,
}

/// Derive a URL slug from a title when the caller did not provide one.
fn slugify(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}

fn main() -> Result<(), tabledb::Error> {
    let created_index = Index::by_equality("created").descending();
    let slug_index = Index::by_equality("slug").unique(true);

    let posts = Table::new(
        MemoryStore::new(),
        "posts",
        vec![slug_index.clone(), created_index.clone()],
        TableOptions::new(),
    );

    for (i, title) in ["Hello World", "Secondary Indexes", "Ordered Scans"]
        .iter()
        .enumerate()
    {
        posts.save(&Post {
            id: format!("{}", i + 1),
            title: (*title).to_owned(),
            content: format!("All about {title}."),
            slug: slugify(title),
            created: 1_700_000_000 + i as i64,
        })?;
    }

    // Point read by slug.
    let post: Post = posts.read(&slug_index.to_query("secondary-indexes"))?;
    println!("by slug: {} ({})", post.title, post.slug);

    // Newest first, paged.
    let recent: Vec<Post> = posts.list(&created_index.to_query(Value::Null).limit(2))?;
    println!("recent:");
    for post in &recent {
        println!("  {} @ {}", post.title, post.created);
    }

    // Delete by id; every index entry goes with it.
    posts.delete(&Query::equals("id", "1"))?;
    let remaining: Vec<Post> = posts.list(&created_index.to_query(Value::Null))?;
    println!("{} posts remain", remaining.len());

    Ok(())
}
