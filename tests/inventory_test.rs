// ==========================================
// 盘点反应器集成测试
// ==========================================
// 测试目标: 牛只增删改 → 盘点单例全量重算 + 流水追加
// ==========================================

mod test_helpers;

use dairy_farm_ms::api::{CowApi, InventoryApi};
use dairy_farm_ms::domain::types::{CowAvailabilityStatus, Sex};
use dairy_farm_ms::logging;
use chrono::{Duration, Utc};

#[test]
fn test_no_inventory_is_valid_empty_state() {
    logging::init_test();
    let (_temp_file, conn) = test_helpers::create_test_db();
    let inventory_api = InventoryApi::from_connection(conn);

    // 尚无牛只写入: 盘点缺失是合法空态，不是错误
    assert!(inventory_api.get_inventory().unwrap().is_none());
    assert_eq!(inventory_api.history_count().unwrap(), 0);
}

#[test]
fn test_cow_creation_creates_singleton_inventory() {
    logging::init_test();
    let (_temp_file, conn) = test_helpers::create_test_db();
    let cow_api = CowApi::from_connection(conn.clone());
    let inventory_api = InventoryApi::from_connection(conn);

    let breed = cow_api.create_breed("Friesian").unwrap();
    test_helpers::create_breeding_cow(&cow_api, breed.id, "Bessie");

    let inventory = inventory_api.get_inventory().unwrap().expect("盘点应已创建");
    assert_eq!(inventory.total_number_of_cows, 1);
    assert_eq!(inventory.number_of_female_cows, 1);
    assert_eq!(inventory.number_of_male_cows, 0);
    assert_eq!(inventory.number_of_sold_cows, 0);
    assert_eq!(inventory.number_of_dead_cows, 0);

    // 第二头公牛
    let dob = Utc::now().date_naive() - Duration::days(500);
    cow_api
        .create_cow(test_helpers::cow_request(breed.id, "Ferdinand", Sex::Male, dob))
        .unwrap();

    let inventory = inventory_api.get_inventory().unwrap().unwrap();
    assert_eq!(inventory.total_number_of_cows, 2);
    assert_eq!(inventory.number_of_male_cows, 1);
    assert_eq!(inventory.number_of_female_cows, 1);
}

#[test]
fn test_sold_and_dead_transitions_recount() {
    logging::init_test();
    let (_temp_file, conn) = test_helpers::create_test_db();
    let cow_api = CowApi::from_connection(conn.clone());
    let inventory_api = InventoryApi::from_connection(conn);

    let breed = cow_api.create_breed("Ayrshire").unwrap();
    let cow_a = test_helpers::create_breeding_cow(&cow_api, breed.id, "Clover");
    let cow_b = test_helpers::create_breeding_cow(&cow_api, breed.id, "Marigold");

    // Alive → Sold: 在场母牛数 -1，已售 +1
    let mut req = test_helpers::cow_request(breed.id, "Clover", Sex::Female, cow_a.date_of_birth);
    req.availability_status = CowAvailabilityStatus::Sold;
    cow_api.update_cow(cow_a.id, req).unwrap();

    let inventory = inventory_api.get_inventory().unwrap().unwrap();
    assert_eq!(inventory.total_number_of_cows, 1);
    assert_eq!(inventory.number_of_female_cows, 1);
    assert_eq!(inventory.number_of_sold_cows, 1);
    assert_eq!(inventory.number_of_dead_cows, 0);

    // Alive → Dead: 死亡 +1
    let mut req = test_helpers::cow_request(breed.id, "Marigold", Sex::Female, cow_b.date_of_birth);
    req.availability_status = CowAvailabilityStatus::Dead;
    cow_api.update_cow(cow_b.id, req).unwrap();

    let inventory = inventory_api.get_inventory().unwrap().unwrap();
    assert_eq!(inventory.total_number_of_cows, 0);
    assert_eq!(inventory.number_of_female_cows, 0);
    assert_eq!(inventory.number_of_sold_cows, 1);
    assert_eq!(inventory.number_of_dead_cows, 1);
}

#[test]
fn test_delete_cow_restores_counts() {
    logging::init_test();
    let (_temp_file, conn) = test_helpers::create_test_db();
    let cow_api = CowApi::from_connection(conn.clone());
    let inventory_api = InventoryApi::from_connection(conn);

    let breed = cow_api.create_breed("Jersey").unwrap();
    test_helpers::create_breeding_cow(&cow_api, breed.id, "Buttercup");

    let before = inventory_api.get_inventory().unwrap().unwrap();

    // 创建再删除: 盘点回到原值（从权威状态全量重算，幂等自愈）
    let cow = test_helpers::create_breeding_cow(&cow_api, breed.id, "Petunia");
    cow_api.delete_cow(cow.id).unwrap();

    let after = inventory_api.get_inventory().unwrap().unwrap();
    assert_eq!(after.total_number_of_cows, before.total_number_of_cows);
    assert_eq!(after.number_of_female_cows, before.number_of_female_cows);
    assert_eq!(after.number_of_male_cows, before.number_of_male_cows);
}

#[test]
fn test_history_appends_once_per_mutation() {
    logging::init_test();
    let (_temp_file, conn) = test_helpers::create_test_db();
    let cow_api = CowApi::from_connection(conn.clone());
    let inventory_api = InventoryApi::from_connection(conn);

    let breed = cow_api.create_breed("Guernsey").unwrap();
    let cow = test_helpers::create_breeding_cow(&cow_api, breed.id, "Primrose");
    assert_eq!(inventory_api.history_count().unwrap(), 1);

    // 逻辑计数未变的更新也追加流水（随写入次数增长，非逻辑变化次数）
    let req = test_helpers::cow_request(breed.id, "Primrose", Sex::Female, cow.date_of_birth);
    cow_api.update_cow(cow.id, req).unwrap();
    assert_eq!(inventory_api.history_count().unwrap(), 2);

    cow_api.delete_cow(cow.id).unwrap();
    assert_eq!(inventory_api.history_count().unwrap(), 3);

    let history = inventory_api.list_history().unwrap();
    assert_eq!(history.len(), 3);
    // 倒序: 最新一条在前，删除后在场数为 0
    assert_eq!(history[0].number_of_cows, 0);
}
