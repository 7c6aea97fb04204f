use anyhow::Result;
use rusqlite::Connection;

use crate::Store;

const KEY_THEME: &str = "selected_theme";
const KEY_ACCENT_COLOR: &str = "accent_color";

pub const DEFAULT_THEME: &str = "Default";
/// iOS blue, ARGB.
pub const DEFAULT_ACCENT_COLOR: u32 = 0xFF00_7AFF;

impl Store {
    pub fn save_theme(&self, theme: &str) -> Result<()> {
        self.put_pref(KEY_THEME, theme)
    }

    pub fn theme(&self) -> Result<String> {
        Ok(self
            .get_pref(KEY_THEME)?
            .unwrap_or_else(|| DEFAULT_THEME.to_string()))
    }

    pub fn save_accent_color(&self, argb: u32) -> Result<()> {
        self.put_pref(KEY_ACCENT_COLOR, &argb.to_string())
    }

    pub fn accent_color(&self) -> Result<u32> {
        Ok(self
            .get_pref(KEY_ACCENT_COLOR)?
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_ACCENT_COLOR))
    }

    pub fn clear_preferences(&self) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute("DELETE FROM preferences", [])?;
            Ok(())
        })
    }

    fn put_pref(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO preferences (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                (key, value),
            )?;
            Ok(())
        })
    }

    fn get_pref(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| get(conn, key))
    }
}

fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
    match conn.query_row(
        "SELECT value FROM preferences WHERE key = ?1",
        [key],
        |row| row.get(0),
    ) {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store() -> Store {
        let path = std::env::temp_dir().join(format!("bestbefore_prefs_{}.db", Uuid::new_v4()));
        Store::open(&path).unwrap()
    }

    #[test]
    fn defaults_before_first_write() {
        let store = temp_store();
        assert_eq!(store.theme().unwrap(), DEFAULT_THEME);
        assert_eq!(store.accent_color().unwrap(), DEFAULT_ACCENT_COLOR);
    }

    #[test]
    fn saved_values_round_trip() {
        let store = temp_store();
        store.save_theme("Midnight").unwrap();
        store.save_accent_color(0xFFFF_4081).unwrap();

        assert_eq!(store.theme().unwrap(), "Midnight");
        assert_eq!(store.accent_color().unwrap(), 0xFFFF_4081);
    }

    #[test]
    fn preferences_survive_session_clear() {
        let store = temp_store();
        store.save_theme("Midnight").unwrap();
        store.clear_session().unwrap();
        assert_eq!(store.theme().unwrap(), "Midnight");

        store.clear_preferences().unwrap();
        assert_eq!(store.theme().unwrap(), DEFAULT_THEME);
    }
}
