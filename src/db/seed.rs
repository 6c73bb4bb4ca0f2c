//! Sample catalog for a fresh database.
//!
//! Only runs against an empty `authors` table, so restarting with seeding
//! enabled never duplicates rows.

use anyhow::Result;
use tracing::{debug, info};

use super::{CreateAuthor, CreateBook, Database};

/// Result of running seed operations.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedResult {
    pub authors: usize,
    pub books: usize,
}

struct SeedAuthor {
    name: &'static str,
    born: Option<i32>,
}

struct SeedBook {
    title: &'static str,
    published: i32,
    author: &'static str,
    genres: &'static [&'static str],
}

const AUTHORS: &[SeedAuthor] = &[
    SeedAuthor {
        name: "Robert Martin",
        born: Some(1952),
    },
    SeedAuthor {
        name: "Martin Fowler",
        born: Some(1963),
    },
    SeedAuthor {
        name: "Fyodor Dostoevsky",
        born: Some(1821),
    },
    SeedAuthor {
        name: "Joshua Kerievsky",
        born: None,
    },
    SeedAuthor {
        name: "Sandi Metz",
        born: None,
    },
];

const BOOKS: &[SeedBook] = &[
    SeedBook {
        title: "Clean Code",
        published: 2008,
        author: "Robert Martin",
        genres: &["refactoring"],
    },
    SeedBook {
        title: "Agile software development",
        published: 2002,
        author: "Robert Martin",
        genres: &["agile", "patterns", "design"],
    },
    SeedBook {
        title: "Refactoring, edition 2",
        published: 2018,
        author: "Martin Fowler",
        genres: &["refactoring"],
    },
    SeedBook {
        title: "Refactoring to patterns",
        published: 2008,
        author: "Joshua Kerievsky",
        genres: &["refactoring", "patterns"],
    },
    SeedBook {
        title: "Practical Object-Oriented Design, An Agile Primer Using Ruby",
        published: 2012,
        author: "Sandi Metz",
        genres: &["refactoring", "design"],
    },
    SeedBook {
        title: "Crime and punishment",
        published: 1866,
        author: "Fyodor Dostoevsky",
        genres: &["classic", "crime"],
    },
    SeedBook {
        title: "Demons",
        published: 1872,
        author: "Fyodor Dostoevsky",
        genres: &["classic", "revolution"],
    },
];

/// Insert the sample authors and books when the catalog is empty.
pub async fn seed_sample_catalog(db: &Database) -> Result<SeedResult> {
    if db.authors().count().await? > 0 {
        debug!("Catalog already populated, skipping seed");
        return Ok(SeedResult::default());
    }

    let mut result = SeedResult::default();

    for author in AUTHORS {
        db.authors()
            .create(CreateAuthor {
                name: author.name.to_string(),
                born: author.born,
            })
            .await?;
        result.authors += 1;
    }

    for book in BOOKS {
        let (author, _) = db.authors().find_or_create(book.author).await?;
        db.books()
            .create(CreateBook {
                title: book.title.to_string(),
                published: book.published,
                author_id: author.id,
                genres: book.genres.iter().map(|g| g.to_string()).collect(),
            })
            .await?;
        result.books += 1;
    }

    info!(authors = result.authors, books = result.books, "Seeded sample catalog");
    Ok(result)
}
