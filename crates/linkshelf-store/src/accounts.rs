//! Caller accounts: role assignment and user profiles.

use chrono::{SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension};

use linkshelf_shared::{Principal, UserProfile, UserRole};

use crate::database::Database;
use crate::error::{Result, StoreError};

impl Database {
    /// Register `principal` if it is unknown and return its role.
    ///
    /// The first principal ever registered becomes `admin`; every later one
    /// starts as `user`, even after admins are demoted. Already registered
    /// principals keep their role.
    pub fn register_account(&self, principal: &Principal) -> Result<UserRole> {
        let inserted = self.conn().execute(
            "INSERT INTO accounts (principal, role, created_at)
             SELECT ?1,
                    CASE WHEN EXISTS (SELECT 1 FROM accounts)
                         THEN 'user' ELSE 'admin' END,
                    ?2
             WHERE NOT EXISTS (SELECT 1 FROM accounts WHERE principal = ?1)",
            params![principal.to_hex(), now()],
        )?;

        let role = self.get_role(principal)?.ok_or(StoreError::NotFound)?;
        if inserted > 0 {
            tracing::info!(principal = %principal.short(), %role, "registered account");
        }
        Ok(role)
    }

    /// Role of a registered principal, `None` if it never registered.
    pub fn get_role(&self, principal: &Principal) -> Result<Option<UserRole>> {
        let role: Option<String> = self
            .conn()
            .query_row(
                "SELECT role FROM accounts WHERE principal = ?1",
                params![principal.to_hex()],
                |row| row.get(0),
            )
            .optional()?;

        role.map(|r| r.parse::<UserRole>().map_err(StoreError::Corrupt))
            .transpose()
    }

    /// Set the role of `principal`, registering it if needed.
    ///
    /// Fails with [`StoreError::LastAdmin`] when this would demote the only
    /// remaining admin.
    pub fn set_role(&self, principal: &Principal, role: UserRole) -> Result<()> {
        if role != UserRole::Admin && self.get_role(principal)? == Some(UserRole::Admin) {
            let admins: i64 = self.conn().query_row(
                "SELECT COUNT(*) FROM accounts WHERE role = 'admin'",
                [],
                |row| row.get(0),
            )?;
            if admins <= 1 {
                return Err(StoreError::LastAdmin);
            }
        }

        self.conn().execute(
            "INSERT INTO accounts (principal, role, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(principal) DO UPDATE SET role = excluded.role",
            params![principal.to_hex(), role.as_str(), now()],
        )?;
        Ok(())
    }

    pub fn get_profile(&self, principal: &Principal) -> Result<Option<UserProfile>> {
        let name: Option<String> = self
            .conn()
            .query_row(
                "SELECT name FROM profiles WHERE principal = ?1",
                params![principal.to_hex()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(name.map(|name| UserProfile { name }))
    }

    /// Insert or replace the profile of a registered principal.
    pub fn save_profile(&self, principal: &Principal, profile: &UserProfile) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO profiles (principal, name, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(principal) DO UPDATE SET
                     name = excluded.name,
                     updated_at = excluded.updated_at",
                params![principal.to_hex(), profile.name, now()],
            )
            .map_err(|e| match e {
                // unregistered principal trips the accounts FK
                rusqlite::Error::SqliteFailure(err, _)
                    if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    StoreError::NotFound
                }
                other => StoreError::Sqlite(other),
            })?;
        Ok(())
    }
}

pub(crate) fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
