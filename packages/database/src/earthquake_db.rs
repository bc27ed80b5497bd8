//! The `earthquakes` table.
//!
//! Inserts are insert-if-absent: inside one transaction the batch is
//! deduplicated, IDs already stored are skipped, and the remainder is
//! written with `ON CONFLICT (ID) DO NOTHING` so the primary key rejects
//! any duplicate that slips past the pre-check.

use std::collections::BTreeSet;
use std::path::Path;

use duckdb::Connection;
use quake_feed_database_models::StoredEarthquake;
use quake_feed_quake_models::{EarthquakeRecord, format_timestamp};

use crate::DbError;

/// Number of rows per INSERT chunk.
const CHUNK_SIZE: usize = 1_000;

/// Column order used by [`insert_new`].
const INSERT_COLUMNS: &[&str] = &[
    "ID",
    "Magnitude_Richter",
    "Location",
    "Time_UTC",
    "Last_Updated_UTC",
    "Time_MYT",
    "Last_Updated_MYT",
    "Time_Zone_Offset",
    "Detail_URL",
    "Map_URL",
    "Detail_API",
    "Reported_Felt_Count",
    "CDI",
    "MMI",
    "Alert_Level",
    "Status",
    "Tsunami_Flag",
    "Significance",
    "Network",
    "Event_Code",
    "IDs",
    "Sources",
    "Types",
    "Number_of_Stations",
    "Distance_to_Nearest_Station_Degrees",
    "RMS",
    "Gap_Degrees",
    "Magnitude_Type",
    "Event_Type",
    "Title",
    "Longitude_Degrees",
    "Latitude_Degrees",
    "Depth_km",
    "State",
    "Country",
    "Continent",
    "Locality",
];

/// Columns read into a [`StoredEarthquake`], in `map_row` order.
const SELECT_COLUMNS: &str = "ID, Magnitude_Richter, Location, Title,
    CAST(Time_UTC AS VARCHAR), CAST(Time_MYT AS VARCHAR),
    Longitude_Degrees, Latitude_Degrees, Depth_km, Alert_Level, Tsunami_Flag,
    State, Country, Continent, Locality";

/// Opens (or creates) the earthquakes `DuckDB` and ensures the schema
/// exists.
///
/// # Errors
///
/// Returns [`DbError`] if the directory, connection, or schema creation
/// fails.
pub fn open(path: &Path) -> Result<Connection, DbError> {
    if let Some(parent) = path.parent() {
        crate::paths::ensure_dir(parent)?;
    }

    let conn = Connection::open(path)?;
    ensure_schema(&conn)?;
    log::info!("Opened earthquake database at {}", path.display());
    Ok(conn)
}

/// Opens an in-memory database with the schema applied.
///
/// # Errors
///
/// Returns [`DbError`] if the connection or schema creation fails.
pub fn open_in_memory() -> Result<Connection, DbError> {
    let conn = Connection::open_in_memory()?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Creates the `earthquakes` table if it does not exist. Safe to call on
/// every cycle.
///
/// # Errors
///
/// Returns [`DbError`] if the DDL fails.
pub fn ensure_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS earthquakes (
            ID VARCHAR(50) PRIMARY KEY,
            Magnitude_Richter DOUBLE,
            Location TEXT,
            Time_UTC TIMESTAMP,
            Last_Updated_UTC TIMESTAMP,
            Time_MYT TIMESTAMP,
            Last_Updated_MYT TIMESTAMP,
            Time_Zone_Offset BIGINT,
            Detail_URL TEXT,
            Map_URL TEXT,
            Detail_API TEXT,
            Reported_Felt_Count BIGINT,
            CDI DOUBLE,
            MMI DOUBLE,
            Alert_Level VARCHAR(50),
            Status VARCHAR(50),
            Tsunami_Flag BIGINT,
            Significance BIGINT,
            Network VARCHAR(50),
            Event_Code VARCHAR(50),
            IDs TEXT,
            Sources TEXT,
            Types TEXT,
            Number_of_Stations BIGINT,
            Distance_to_Nearest_Station_Degrees DOUBLE,
            RMS DOUBLE,
            Gap_Degrees DOUBLE,
            Magnitude_Type VARCHAR(50),
            Event_Type VARCHAR(50),
            Title TEXT,
            Longitude_Degrees DOUBLE,
            Latitude_Degrees DOUBLE,
            Depth_km DOUBLE,
            State VARCHAR(100),
            Country VARCHAR(100),
            Continent VARCHAR(100),
            Locality VARCHAR(100)
        );",
    )?;
    Ok(())
}

/// Returns which of the given IDs are already stored.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn existing_ids(conn: &Connection, ids: &[&str]) -> Result<BTreeSet<String>, DbError> {
    let mut found = BTreeSet::new();

    for chunk in ids.chunks(CHUNK_SIZE) {
        let placeholders: String = chunk.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
        let sql = format!("SELECT ID FROM earthquakes WHERE ID IN ({placeholders})");
        let mut stmt = conn.prepare(&sql)?;

        for (i, id) in chunk.iter().enumerate() {
            stmt.raw_bind_parameter(i + 1, *id)?;
        }

        stmt.raw_execute()?;
        let mut rows = stmt.raw_query();
        while let Some(row) = rows.next()? {
            found.insert(row.get::<_, String>(0)?);
        }
    }

    Ok(found)
}

/// Inserts the records whose IDs are not yet stored and returns how many
/// rows were written.
///
/// Duplicate IDs within `records` keep their first occurrence. Existing
/// rows are never modified.
///
/// # Errors
///
/// Returns [`DbError`] if any statement fails; the whole batch is rolled
/// back in that case.
pub fn insert_new(conn: &mut Connection, records: &[EarthquakeRecord]) -> Result<u64, DbError> {
    if records.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;

    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let unique: Vec<&EarthquakeRecord> = records
        .iter()
        .filter(|r| seen.insert(r.id.as_str()))
        .collect();

    if unique.len() < records.len() {
        log::info!(
            "Deduplicated INSERT batch: {} -> {} rows ({} duplicates removed)",
            records.len(),
            unique.len(),
            records.len() - unique.len(),
        );
    }

    let ids: Vec<&str> = unique.iter().map(|r| r.id.as_str()).collect();
    let stored = existing_ids(&tx, &ids)?;
    let fresh: Vec<&EarthquakeRecord> = unique
        .into_iter()
        .filter(|r| !stored.contains(&r.id))
        .collect();

    if fresh.is_empty() {
        log::info!("No new records to insert ({} already stored)", stored.len());
        return Ok(0);
    }

    let mut total_inserted = 0u64;

    for chunk in fresh.chunks(CHUNK_SIZE) {
        total_inserted += insert_chunk(&tx, chunk)?;
    }

    tx.commit()?;

    log::info!(
        "Inserted {total_inserted} new records ({} already stored)",
        stored.len()
    );
    Ok(total_inserted)
}

fn insert_chunk(conn: &Connection, chunk: &[&EarthquakeRecord]) -> Result<u64, DbError> {
    let row_placeholders = format!(
        "({})",
        INSERT_COLUMNS.iter().map(|_| "?").collect::<Vec<_>>().join(", ")
    );

    let mut sql = format!(
        "INSERT INTO earthquakes ({}) VALUES ",
        INSERT_COLUMNS.join(", ")
    );
    for i in 0..chunk.len() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&row_placeholders);
    }
    sql.push_str(" ON CONFLICT (ID) DO NOTHING");

    let mut stmt = conn.prepare(&sql)?;
    let mut idx = 1usize;

    for record in chunk {
        let timestamps = [
            record.time_utc,
            record.last_updated_utc,
            record.time_local,
            record.last_updated_local,
        ]
        .map(|ts| ts.as_ref().map(format_timestamp));

        stmt.raw_bind_parameter(idx, &record.id)?;
        stmt.raw_bind_parameter(idx + 1, record.magnitude)?;
        stmt.raw_bind_parameter(idx + 2, record.place.as_deref())?;
        for (offset, ts) in timestamps.iter().enumerate() {
            stmt.raw_bind_parameter(idx + 3 + offset, ts.as_deref())?;
        }
        stmt.raw_bind_parameter(idx + 7, record.tz_offset_minutes)?;
        stmt.raw_bind_parameter(idx + 8, record.detail_url.as_deref())?;
        stmt.raw_bind_parameter(idx + 9, record.map_url.as_deref())?;
        stmt.raw_bind_parameter(idx + 10, record.detail_api.as_deref())?;
        stmt.raw_bind_parameter(idx + 11, record.felt_count)?;
        stmt.raw_bind_parameter(idx + 12, record.cdi)?;
        stmt.raw_bind_parameter(idx + 13, record.mmi)?;
        stmt.raw_bind_parameter(idx + 14, &record.alert_level)?;
        stmt.raw_bind_parameter(idx + 15, record.status.as_deref())?;
        stmt.raw_bind_parameter(idx + 16, record.tsunami_flag)?;
        stmt.raw_bind_parameter(idx + 17, record.significance)?;
        stmt.raw_bind_parameter(idx + 18, record.network.as_deref())?;
        stmt.raw_bind_parameter(idx + 19, record.event_code.as_deref())?;
        stmt.raw_bind_parameter(idx + 20, record.ids.as_deref())?;
        stmt.raw_bind_parameter(idx + 21, record.sources.as_deref())?;
        stmt.raw_bind_parameter(idx + 22, record.types.as_deref())?;
        stmt.raw_bind_parameter(idx + 23, record.station_count)?;
        stmt.raw_bind_parameter(idx + 24, record.nearest_station_degrees)?;
        stmt.raw_bind_parameter(idx + 25, record.rms)?;
        stmt.raw_bind_parameter(idx + 26, record.gap_degrees)?;
        stmt.raw_bind_parameter(idx + 27, record.magnitude_type.as_deref())?;
        stmt.raw_bind_parameter(idx + 28, record.event_type.as_deref())?;
        stmt.raw_bind_parameter(idx + 29, record.title.as_deref())?;
        stmt.raw_bind_parameter(idx + 30, record.longitude)?;
        stmt.raw_bind_parameter(idx + 31, record.latitude)?;
        stmt.raw_bind_parameter(idx + 32, record.depth_km)?;
        stmt.raw_bind_parameter(idx + 33, &record.location.region)?;
        stmt.raw_bind_parameter(idx + 34, &record.location.country)?;
        stmt.raw_bind_parameter(idx + 35, &record.location.continent)?;
        stmt.raw_bind_parameter(idx + 36, &record.location.locality)?;

        idx += INSERT_COLUMNS.len();
    }

    let inserted = stmt.raw_execute()?;
    Ok(inserted as u64)
}

/// Returns the number of stored earthquakes.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or the count is negative.
pub fn record_count(conn: &Connection) -> Result<u64, DbError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM earthquakes", [], |row| row.get(0))?;
    u64::try_from(count).map_err(|e| DbError::Conversion {
        message: format!("negative row count {count}: {e}"),
    })
}

/// Looks up a stored earthquake by ID.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn get_by_id(conn: &Connection, id: &str) -> Result<Option<StoredEarthquake>, DbError> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM earthquakes WHERE ID = ?");
    let mut stmt = conn.prepare(&sql)?;
    stmt.raw_bind_parameter(1, id)?;
    stmt.raw_execute()?;

    let mut rows = stmt.raw_query();
    match rows.next()? {
        Some(row) => Ok(Some(map_row(row)?)),
        None => Ok(None),
    }
}

/// Returns up to `limit` stored earthquakes, most recent origin time first.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn recent(conn: &Connection, limit: u32) -> Result<Vec<StoredEarthquake>, DbError> {
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM earthquakes
         ORDER BY Time_UTC DESC NULLS LAST, ID
         LIMIT {limit}"
    );
    let mut stmt = conn.prepare(&sql)?;
    stmt.raw_execute()?;

    let mut results = Vec::new();
    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        results.push(map_row(row)?);
    }
    Ok(results)
}

fn map_row(row: &duckdb::Row<'_>) -> Result<StoredEarthquake, DbError> {
    Ok(StoredEarthquake {
        id: row.get(0)?,
        magnitude: row.get(1)?,
        place: row.get(2)?,
        title: row.get(3)?,
        time_utc: row.get(4)?,
        time_local: row.get(5)?,
        longitude: row.get(6)?,
        latitude: row.get(7)?,
        depth_km: row.get(8)?,
        alert_level: row.get(9)?,
        tsunami_flag: row.get(10)?,
        region: row.get(11)?,
        country: row.get(12)?,
        continent: row.get(13)?,
        locality: row.get(14)?,
    })
}
