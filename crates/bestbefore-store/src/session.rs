use anyhow::Result;
use rusqlite::Connection;

use bestbefore_types::models::Session;

use crate::Store;

const KEY_TOKEN: &str = "auth_token";
const KEY_USER_ID: &str = "user_id";
const KEY_USER_NAME: &str = "user_name";
const KEY_USER_EMAIL: &str = "user_email";

impl Store {
    /// Persist the whole session atomically. Overwrites any previous login.
    pub fn save_session(&self, session: &Session) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            for (key, value) in [
                (KEY_TOKEN, session.token.as_str()),
                (KEY_USER_ID, session.user_id.as_str()),
                (KEY_USER_NAME, session.user_name.as_str()),
                (KEY_USER_EMAIL, session.user_email.as_str()),
            ] {
                tx.execute(
                    "INSERT INTO session (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    (key, value),
                )?;
            }
            tx.commit()?;
            Ok(())
        })
    }

    /// `None` when no token is stored, i.e. the user is logged out.
    pub fn load_session(&self) -> Result<Option<Session>> {
        self.with_conn(|conn| {
            let Some(token) = get(conn, KEY_TOKEN)? else {
                return Ok(None);
            };
            Ok(Some(Session {
                token,
                user_id: get(conn, KEY_USER_ID)?.unwrap_or_default(),
                user_name: get(conn, KEY_USER_NAME)?.unwrap_or_default(),
                user_email: get(conn, KEY_USER_EMAIL)?.unwrap_or_default(),
            }))
        })
    }

    pub fn is_logged_in(&self) -> Result<bool> {
        self.with_conn(|conn| Ok(get(conn, KEY_TOKEN)?.is_some()))
    }

    /// Wholesale wipe, used on logout.
    pub fn clear_session(&self) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute("DELETE FROM session", [])?;
            Ok(())
        })
    }
}

fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
    match conn.query_row("SELECT value FROM session WHERE key = ?1", [key], |row| {
        row.get(0)
    }) {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
