mod common;

use std::fs;

use common::{date, test_service, StandardCatalog};
use gestor::application::AppService;
use gestor::domain::PaymentMethod;
use gestor::io::Exporter;
use tempfile::TempDir;

#[test]
fn test_state_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("gestor.json");

    let fixture = {
        let mut service = AppService::open(&path).unwrap();
        let fixture = StandardCatalog::create(&mut service).unwrap();
        fixture
            .record_service(&mut service, date("2026-08-10"), 2, 500)
            .unwrap();
        fixture
    };

    let service = AppService::open(&path).unwrap();
    let state = service.state();
    assert_eq!(state.customers.len(), 1);
    assert_eq!(state.materials.len(), 1);
    assert_eq!(state.service_types.len(), 1);
    assert_eq!(state.services.len(), 1);
    assert_eq!(state.services[0].customer_id, fixture.customer_id);
    assert_eq!(state.services[0].total_value, 11500);
}

#[test]
fn test_missing_file_opens_empty() {
    let (service, _tmp) = test_service().unwrap();
    assert!(service.state().customers.is_empty());
    assert!(service.state().services.is_empty());
}

#[test]
fn test_partial_blob_merges_over_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("gestor.json");
    fs::write(
        &path,
        r#"{"customers": [{"id": "c1", "name": "Ana Lima"}]}"#,
    )
    .unwrap();

    let service = AppService::open(&path).unwrap();
    assert_eq!(service.state().customers.len(), 1);
    assert_eq!(service.state().customers[0].name, "Ana Lima");
    assert!(service.state().materials.is_empty());
    assert!(service.state().service_types.is_empty());
    assert!(service.state().services.is_empty());
}

#[test]
fn test_legacy_blob_with_decimal_amounts() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("gestor.json");
    fs::write(
        &path,
        r#"{
            "customers": [{"id": "c1", "name": "Ana Lima"}],
            "materials": [{"id": "m1", "name": "Cable", "purchasePrice": 6.0, "sellingPrice": 10.0, "stock": 3}],
            "serviceTypes": [{"id": "t1", "name": "Installation", "baseValue": 100.0}],
            "services": [{
                "id": "s1",
                "customerId": "c1",
                "date": "2026-08-10",
                "serviceItems": [{"serviceTypeId": "t1", "quantity": 1}],
                "materials": [{"materialId": "m1", "quantity": 2}],
                "paymentMethod": "PIX",
                "status": "Completed",
                "serviceValue": 100.0,
                "discount": 5.0,
                "totalValue": 115.0
            }]
        }"#,
    )
    .unwrap();

    let service = AppService::open(&path).unwrap();
    let state = service.state();
    assert_eq!(state.materials[0].selling_price, 1000);
    assert_eq!(state.service_types[0].base_value, 10000);

    let record = &state.services[0];
    assert_eq!(record.service_value, 10000);
    assert_eq!(record.discount, 500);
    assert_eq!(record.total_value, 11500);
    assert_eq!(record.payment_method, PaymentMethod::Pix);
    assert_eq!(record.installments, 1);
}

#[test]
fn test_written_blob_uses_wire_keys() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("gestor.json");
    {
        let mut service = AppService::open(&path).unwrap();
        let fixture = StandardCatalog::create(&mut service).unwrap();
        fixture
            .record_service(&mut service, date("2026-08-10"), 1, 0)
            .unwrap();
    }

    let raw = fs::read_to_string(&path).unwrap();
    for key in [
        "\"serviceTypes\"",
        "\"sellingPrice\"",
        "\"baseValue\"",
        "\"customerId\"",
        "\"serviceItems\"",
        "\"paymentMethod\"",
        "\"totalValue\"",
    ] {
        assert!(raw.contains(key), "missing key {} in {}", key, raw);
    }
    // Amounts are persisted in currency units, not cents
    assert!(raw.contains("110.0"));

    // The atomic-write scratch file never outlives a successful save
    assert!(!temp_dir.path().join("gestor.json.tmp").exists());
}

#[test]
fn test_backup_matches_state_blob() {
    let (mut service, _tmp) = test_service().unwrap();
    let fixture = StandardCatalog::create(&mut service).unwrap();
    fixture
        .record_service(&mut service, date("2026-08-10"), 1, 0)
        .unwrap();

    let mut buffer = Vec::new();
    Exporter::new(service.state())
        .write_backup(&mut buffer)
        .unwrap();

    let reparsed: gestor::domain::AppState = serde_json::from_slice(&buffer).unwrap();
    assert_eq!(reparsed.services.len(), 1);
    assert_eq!(reparsed.services[0].total_value, 11000);

    assert_eq!(
        Exporter::backup_file_name(date("2026-08-29")),
        "backup_gestor_2026-08-29.json"
    );
}
