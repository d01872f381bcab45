//! CRUD operations for links, scoped per owner.

use rusqlite::params;

use linkshelf_shared::{Link, LinkRecord, Principal};

use crate::accounts::now;
use crate::database::Database;
use crate::error::{Result, StoreError};

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Store `link` under `(owner, id)`. An existing link with the same id is
    /// replaced; its creation time is kept.
    pub fn put_link(&self, owner: &Principal, id: &str, link: &Link) -> Result<()> {
        let ts = now();
        self.conn()
            .execute(
                "INSERT INTO links
                     (owner, id, url, title, description, image, color, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
                 ON CONFLICT(owner, id) DO UPDATE SET
                     url = excluded.url,
                     title = excluded.title,
                     description = excluded.description,
                     image = excluded.image,
                     color = excluded.color,
                     updated_at = excluded.updated_at",
                params![
                    owner.to_hex(),
                    id,
                    link.url,
                    link.title,
                    link.description,
                    link.image,
                    link.color,
                    ts,
                ],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(err, _)
                    if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    StoreError::NotFound
                }
                other => StoreError::Sqlite(other),
            })?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    pub fn get_link(&self, owner: &Principal, id: &str) -> Result<Link> {
        self.conn()
            .query_row(
                "SELECT url, title, description, image, color
                 FROM links
                 WHERE owner = ?1 AND id = ?2",
                params![owner.to_hex(), id],
                |row| row_to_link(row, 0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// All links of `owner`, oldest first.
    pub fn list_links(&self, owner: &Principal) -> Result<Vec<LinkRecord>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, url, title, description, image, color
             FROM links
             WHERE owner = ?1
             ORDER BY created_at ASC, rowid ASC",
        )?;

        let rows = stmt.query_map(params![owner.to_hex()], |row| {
            Ok(LinkRecord {
                id: row.get(0)?,
                link: row_to_link(row, 1)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Replace an existing link. Returns `false` if `(owner, id)` is unknown.
    pub fn update_link(&self, owner: &Principal, id: &str, link: &Link) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE links
             SET url = ?3, title = ?4, description = ?5, image = ?6, color = ?7, updated_at = ?8
             WHERE owner = ?1 AND id = ?2",
            params![
                owner.to_hex(),
                id,
                link.url,
                link.title,
                link.description,
                link.image,
                link.color,
                now(),
            ],
        )?;
        Ok(affected > 0)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a link.  Returns `true` if a row was deleted.
    pub fn delete_link(&self, owner: &Principal, id: &str) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM links WHERE owner = ?1 AND id = ?2",
            params![owner.to_hex(), id],
        )?;
        Ok(affected > 0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map the five link columns starting at `offset` to a [`Link`].
fn row_to_link(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Link> {
    Ok(Link {
        url: row.get(offset)?,
        title: row.get(offset + 1)?,
        description: row.get(offset + 2)?,
        image: row.get(offset + 3)?,
        color: row.get(offset + 4)?,
    })
}
