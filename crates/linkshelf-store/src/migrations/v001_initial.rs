//! v001 -- Initial schema creation.
//!
//! Creates `accounts`, `profiles` and `links`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Accounts (registered callers and their role)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS accounts (
    principal  TEXT PRIMARY KEY NOT NULL,     -- hex-encoded 32-byte Ed25519 pubkey
    role       TEXT NOT NULL,                 -- 'admin' | 'user' | 'guest'
    created_at TEXT NOT NULL                  -- RFC-3339
);

CREATE INDEX IF NOT EXISTS idx_accounts_role ON accounts(role);

-- ----------------------------------------------------------------
-- Profiles
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS profiles (
    principal  TEXT PRIMARY KEY NOT NULL,     -- FK -> accounts(principal)
    name       TEXT NOT NULL,
    updated_at TEXT NOT NULL,

    FOREIGN KEY (principal) REFERENCES accounts(principal) ON DELETE CASCADE
);

-- ----------------------------------------------------------------
-- Links, keyed by (owner, id)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS links (
    owner       TEXT NOT NULL,                -- FK -> accounts(principal)
    id          TEXT NOT NULL,                -- opaque, caller chosen
    url         TEXT NOT NULL,
    title       TEXT NOT NULL,
    description TEXT,
    image       TEXT,                         -- data URI
    color       TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,

    PRIMARY KEY (owner, id),
    FOREIGN KEY (owner) REFERENCES accounts(principal) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_links_owner_created
    ON links(owner, created_at);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
