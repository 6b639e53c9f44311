use super::Post;

/// Posts shown before anything has been written to the store.
pub fn default_posts() -> Vec<Post> {
    vec![
        Post {
            id: 1,
            title: "Building a Minimalist Portfolio".into(),
            date: "2025-04-20".into(),
            video: None,
            excerpt: "…".into(),
            content: String::new(),
        },
        Post {
            id: 2,
            title: "My First Design Case Study".into(),
            date: "2025-03-15".into(),
            video: None,
            excerpt: "…".into(),
            content: String::new(),
        },
    ]
}
