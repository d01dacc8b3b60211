// ==========================================
// 奶牛场管理系统 - 主入口
// ==========================================
// 职责: 初始化日志/数据库，打印当前盘点概要
// ==========================================

use dairy_farm_ms::api::InventoryApi;
use dairy_farm_ms::{db, logging};
use std::sync::{Arc, Mutex};

/// 默认数据库路径: {数据目录}/dairy-farm-ms/farm.db
fn get_default_db_path() -> String {
    let base = dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    let dir = base.join("dairy-farm-ms");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!("创建数据目录失败，回退当前目录: {}", e);
        return "farm.db".to_string();
    }
    dir.join("farm.db").to_string_lossy().to_string()
}

fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("奶牛场管理系统 - 领域一致性引擎");
    tracing::info!("系统版本: {}", dairy_farm_ms::VERSION);
    tracing::info!("==================================================");

    // 获取数据库路径（可被命令行参数覆盖）
    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let conn = db::open_sqlite_connection(&db_path)?;
    db::init_schema(&conn)?;

    match db::read_schema_version(&conn)? {
        Some(v) if v == db::CURRENT_SCHEMA_VERSION => {
            tracing::info!("schema_version = {}", v);
        }
        Some(v) => {
            tracing::warn!(
                "schema_version 不匹配: 数据库={}, 期望={}（不做自动迁移）",
                v,
                db::CURRENT_SCHEMA_VERSION
            );
        }
        None => {
            tracing::warn!("数据库缺少 schema_version 表");
        }
    }

    let conn = Arc::new(Mutex::new(conn));
    let inventory_api = InventoryApi::from_connection(conn);

    // 打印盘点概要（缺失是合法空态）
    match inventory_api.get_inventory()? {
        Some(inventory) => {
            tracing::info!(
                "当前盘点: 在场={} (公={}, 母={}), 已售={}, 死亡={}, 更新于 {}",
                inventory.total_number_of_cows,
                inventory.number_of_male_cows,
                inventory.number_of_female_cows,
                inventory.number_of_sold_cows,
                inventory.number_of_dead_cows,
                inventory.last_update
            );
        }
        None => {
            tracing::info!("尚无盘点数据（牛群为空）");
        }
    }

    Ok(())
}
