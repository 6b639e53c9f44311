use std::fmt;

use crate::domain::posts::{Post, format_human_date};

/// Every post, as listed on the home page.
pub struct IndexView<'a> {
    pub posts: &'a [Post],
    pub admin: bool,
    pub full: bool,
}

/// Pinned posts only.
pub struct ArchiveView<'a> {
    pub posts: &'a [Post],
    pub full: bool,
}

impl fmt::Display for IndexView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Posts")?;
        if self.posts.is_empty() {
            writeln!(f)?;
            writeln!(f, "No posts yet.")?;
        }
        for post in self.posts {
            writeln!(f)?;
            write_post(f, post, self.full)?;
        }
        if self.admin {
            writeln!(f)?;
            writeln!(f, "Admin: `folio delete <id>`, `folio pin <id>`, `folio unpin <id>`")?;
        }
        Ok(())
    }
}

impl fmt::Display for ArchiveView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pinned Posts")?;
        if self.posts.is_empty() {
            writeln!(f)?;
            writeln!(f, "Nothing pinned.")?;
        }
        for post in self.posts {
            writeln!(f)?;
            write_post(f, post, self.full)?;
        }
        Ok(())
    }
}

fn write_post(f: &mut fmt::Formatter<'_>, post: &Post, full: bool) -> fmt::Result {
    writeln!(f, "#{} {}", post.id, post.title)?;
    writeln!(f, "   {}", format_human_date(&post.date))?;
    if let Some(video) = post.video.as_deref() {
        writeln!(f, "   Video: {video}")?;
    }
    if !post.excerpt.is_empty() {
        writeln!(f, "   {}", post.excerpt)?;
    }

    if !full {
        return Ok(());
    }
    for paragraph in post.paragraphs().filter(|line| !line.trim().is_empty()) {
        writeln!(f)?;
        writeln!(f, "   {paragraph}")?;
    }
    Ok(())
}
