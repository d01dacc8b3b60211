// ==========================================
// 奶牛场管理系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免“部分模块外键开启/部分不开启”
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供统一建库入口 init_schema（级联/保护删除规则见表定义）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
///
/// 说明：
/// - 版本号用于提示/告警（不做自动迁移），避免静默在旧库上运行导致隐性错误。
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启（保护删除/级联删除依赖它）
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 初始化数据库 schema（幂等）
///
/// 删除规则:
/// - cow → weight_record / culling_record / quarantine_record / heat / recovery / treatment: 级联删除
/// - cow → insemination / pregnancy: 保护删除（存在引用时拒绝删除）
/// - pathogen / disease_category → disease: 保护删除
/// - disease → treatment: 保护删除; disease → recovery: 级联删除
/// - pregnancy → insemination.pregnancy_id: 保护删除
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_scope (
            scope_id TEXT PRIMARY KEY,
            scope_type TEXT NOT NULL,
            scope_key TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(scope_type, scope_key)
        );

        INSERT OR IGNORE INTO config_scope (scope_id, scope_type, scope_key)
        VALUES ('global', 'GLOBAL', 'global');

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL REFERENCES config_scope(scope_id) ON DELETE CASCADE,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS cow_breed (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS inseminator (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            phone_number TEXT,
            license_number TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS cow (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            breed_id INTEGER NOT NULL REFERENCES cow_breed(id) ON DELETE RESTRICT,
            gender TEXT NOT NULL,
            date_of_birth TEXT NOT NULL,
            category TEXT NOT NULL,
            availability_status TEXT NOT NULL,
            current_pregnancy_status TEXT NOT NULL,
            current_production_status TEXT NOT NULL,
            is_bought INTEGER NOT NULL DEFAULT 0,
            tag_number TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS cow_inventory (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            total_number_of_cows INTEGER NOT NULL DEFAULT 0,
            number_of_male_cows INTEGER NOT NULL DEFAULT 0,
            number_of_female_cows INTEGER NOT NULL DEFAULT 0,
            number_of_sold_cows INTEGER NOT NULL DEFAULT 0,
            number_of_dead_cows INTEGER NOT NULL DEFAULT 0,
            last_update TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS cow_inventory_update_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            number_of_cows INTEGER NOT NULL DEFAULT 0,
            date_updated TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS weight_record (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cow_id INTEGER NOT NULL REFERENCES cow(id) ON DELETE CASCADE,
            weight_kg REAL NOT NULL,
            date_taken TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE(cow_id, date_taken)
        );

        CREATE TABLE IF NOT EXISTS culling_record (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cow_id INTEGER NOT NULL UNIQUE REFERENCES cow(id) ON DELETE CASCADE,
            reason TEXT NOT NULL,
            notes TEXT,
            date_carried TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS quarantine_record (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cow_id INTEGER NOT NULL REFERENCES cow(id) ON DELETE CASCADE,
            reason TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT,
            notes TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS pathogen (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS disease_category (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS symptom (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            symptom_type TEXT NOT NULL,
            description TEXT,
            severity TEXT NOT NULL,
            location TEXT NOT NULL,
            date_observed TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS disease (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            pathogen_id INTEGER NOT NULL REFERENCES pathogen(id) ON DELETE RESTRICT,
            category_id INTEGER NOT NULL REFERENCES disease_category(id) ON DELETE RESTRICT,
            date_reported TEXT NOT NULL,
            occurrence_date TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS disease_cow (
            disease_id INTEGER NOT NULL REFERENCES disease(id) ON DELETE CASCADE,
            cow_id INTEGER NOT NULL REFERENCES cow(id) ON DELETE CASCADE,
            PRIMARY KEY (disease_id, cow_id)
        );

        CREATE TABLE IF NOT EXISTS disease_symptom (
            disease_id INTEGER NOT NULL REFERENCES disease(id) ON DELETE CASCADE,
            symptom_id INTEGER NOT NULL REFERENCES symptom(id) ON DELETE CASCADE,
            PRIMARY KEY (disease_id, symptom_id)
        );

        CREATE TABLE IF NOT EXISTS recovery (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cow_id INTEGER NOT NULL REFERENCES cow(id) ON DELETE CASCADE,
            disease_id INTEGER NOT NULL REFERENCES disease(id) ON DELETE CASCADE,
            diagnosis_date TEXT NOT NULL,
            recovery_date TEXT,
            created_at TEXT NOT NULL,
            UNIQUE(cow_id, disease_id)
        );

        CREATE TABLE IF NOT EXISTS treatment (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            disease_id INTEGER NOT NULL REFERENCES disease(id) ON DELETE RESTRICT,
            cow_id INTEGER NOT NULL REFERENCES cow(id) ON DELETE CASCADE,
            date_of_treatment TEXT NOT NULL,
            treatment_method TEXT NOT NULL,
            notes TEXT,
            treatment_status TEXT NOT NULL,
            completion_date TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS pregnancy (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cow_id INTEGER NOT NULL REFERENCES cow(id) ON DELETE RESTRICT,
            start_date TEXT NOT NULL,
            date_of_calving TEXT,
            pregnancy_status TEXT NOT NULL,
            pregnancy_notes TEXT,
            calving_notes TEXT,
            pregnancy_scan_date TEXT,
            pregnancy_failed_date TEXT,
            pregnancy_outcome TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS heat (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cow_id INTEGER NOT NULL REFERENCES cow(id) ON DELETE CASCADE,
            observation_time TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS insemination (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cow_id INTEGER NOT NULL REFERENCES cow(id) ON DELETE RESTRICT,
            pregnancy_id INTEGER UNIQUE REFERENCES pregnancy(id) ON DELETE RESTRICT,
            success INTEGER NOT NULL DEFAULT 0,
            notes TEXT,
            inseminator_id INTEGER NOT NULL REFERENCES inseminator(id) ON DELETE RESTRICT,
            date_of_insemination TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS lactation (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cow_id INTEGER NOT NULL REFERENCES cow(id) ON DELETE CASCADE,
            start_date TEXT NOT NULL,
            end_date TEXT,
            pregnancy_id INTEGER REFERENCES pregnancy(id) ON DELETE RESTRICT,
            lactation_number INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );

        INSERT OR IGNORE INTO schema_version (version) VALUES (1);
        "#,
    )?;
    Ok(())
}
