use rusqlite::Connection;
use tracing::debug;

/// Current schema version.  Increment when adding new migrations.
const SCHEMA_VERSION: u32 = 1;

/// Apply all pending migrations to `conn`.
///
/// Tables are created with `IF NOT EXISTS` and the `meta` table records the
/// applied version, so calling this on every connection open is safe.
pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS meta (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )?;

    let current_version = get_schema_version(conn);

    if current_version >= SCHEMA_VERSION {
        debug!(version = current_version, "advocate schema up to date");
        return Ok(());
    }

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    debug!(version = SCHEMA_VERSION, "advocate schema migrated");
    Ok(())
}

// ---------------------------------------------------------------------------
// v1: advocates + full-text index
// ---------------------------------------------------------------------------

fn migrate_v1(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS advocates (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name          TEXT    NOT NULL,
            last_name           TEXT    NOT NULL,
            city                TEXT    NOT NULL,
            degree              TEXT    NOT NULL,
            specialties         TEXT    NOT NULL DEFAULT '[]',
            years_of_experience INTEGER NOT NULL CHECK (years_of_experience >= 0),
            phone_number        INTEGER NOT NULL,
            created_at          TEXT    NOT NULL DEFAULT CURRENT_TIMESTAMP
        );",
    )?;

    // ------------------------------------------------------------------
    // advocates_fts: one index row per advocate covering every
    // text-bearing field. Numeric fields and the specialties JSON are
    // indexed in their text form.
    // ------------------------------------------------------------------
    conn.execute_batch(
        "CREATE VIRTUAL TABLE IF NOT EXISTS advocates_fts USING fts5(
            first_name,
            last_name,
            city,
            degree,
            specialties,
            years_of_experience,
            phone_number,
            content='advocates',
            content_rowid='id',
            tokenize='porter unicode61'
        );",
    )?;

    conn.execute_batch(
        "CREATE TRIGGER IF NOT EXISTS advocates_ai AFTER INSERT ON advocates BEGIN
            INSERT INTO advocates_fts(rowid, first_name, last_name, city, degree,
                                      specialties, years_of_experience, phone_number)
            VALUES (new.id, new.first_name, new.last_name, new.city, new.degree,
                    new.specialties, CAST(new.years_of_experience AS TEXT),
                    CAST(new.phone_number AS TEXT));
        END;",
    )?;
    conn.execute_batch(
        "CREATE TRIGGER IF NOT EXISTS advocates_ad AFTER DELETE ON advocates BEGIN
            INSERT INTO advocates_fts(advocates_fts, rowid, first_name, last_name, city,
                                      degree, specialties, years_of_experience, phone_number)
            VALUES ('delete', old.id, old.first_name, old.last_name, old.city, old.degree,
                    old.specialties, CAST(old.years_of_experience AS TEXT),
                    CAST(old.phone_number AS TEXT));
        END;",
    )?;
    conn.execute_batch(
        "CREATE TRIGGER IF NOT EXISTS advocates_au AFTER UPDATE ON advocates BEGIN
            INSERT INTO advocates_fts(advocates_fts, rowid, first_name, last_name, city,
                                      degree, specialties, years_of_experience, phone_number)
            VALUES ('delete', old.id, old.first_name, old.last_name, old.city, old.degree,
                    old.specialties, CAST(old.years_of_experience AS TEXT),
                    CAST(old.phone_number AS TEXT));
            INSERT INTO advocates_fts(rowid, first_name, last_name, city, degree,
                                      specialties, years_of_experience, phone_number)
            VALUES (new.id, new.first_name, new.last_name, new.city, new.degree,
                    new.specialties, CAST(new.years_of_experience AS TEXT),
                    CAST(new.phone_number AS TEXT));
        END;",
    )?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn get_schema_version(conn: &Connection) -> u32 {
    conn.query_row(
        "SELECT value FROM meta WHERE key = 'schema_version'",
        [],
        |row| {
            let v: String = row.get(0)?;
            Ok(v.parse::<u32>().unwrap_or(0))
        },
    )
    .unwrap_or(0)
}

fn set_schema_version(conn: &Connection, version: u32) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO meta (key, value) VALUES ('schema_version', ?1)",
        [version.to_string()],
    )?;
    Ok(())
}
