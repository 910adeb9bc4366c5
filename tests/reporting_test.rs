mod common;

use common::{date, test_service, StandardCatalog};
use gestor::application::reporting;
use gestor::application::{MaterialInput, MaterialPatch};

#[test]
fn test_total_revenue_sums_stored_totals() {
    let (mut service, _tmp) = test_service().unwrap();
    let fixture = StandardCatalog::create(&mut service).unwrap();

    fixture
        .record_service(&mut service, date("2026-08-10"), 2, 500)
        .unwrap();
    fixture
        .record_service(&mut service, date("2026-08-12"), 0, 0)
        .unwrap();

    // 115.00 + 100.00
    assert_eq!(reporting::total_revenue(service.state()), 21500);
    // Recomputing from the same snapshot never drifts
    assert_eq!(reporting::total_revenue(service.state()), 21500);
}

#[test]
fn test_dashboard_stats() {
    let (mut service, _tmp) = test_service().unwrap();
    let fixture = StandardCatalog::create(&mut service).unwrap();
    fixture
        .record_service(&mut service, date("2026-08-10"), 1, 0)
        .unwrap();

    let stats = reporting::dashboard_stats(service.state());
    assert_eq!(stats.customer_count, 1);
    assert_eq!(stats.service_count, 1);
    assert_eq!(stats.total_revenue, 11000);
    // The fixture material sits at 3 units, below the restock threshold
    assert_eq!(stats.low_stock_count, 1);
}

#[test]
fn test_stock_thresholds() {
    let (mut service, _tmp) = test_service().unwrap();

    for (name, stock) in [("breaker", 4), ("conduit", 7), ("tape", 10)] {
        service
            .create_material(MaterialInput {
                name: name.into(),
                stock,
                ..Default::default()
            })
            .unwrap();
    }

    let low = reporting::low_stock(service.state());
    let names: Vec<&str> = low.iter().map(|m| m.name.as_str()).collect();
    // 10 is not low; lowest stock first
    assert_eq!(names, vec!["breaker", "conduit"]);

    let critical = reporting::critical_stock(service.state());
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].name, "breaker");
}

#[test]
fn test_negative_stock_counts_as_critical() {
    let (mut service, _tmp) = test_service().unwrap();
    let material = service
        .create_material(MaterialInput {
            name: "wire nut".into(),
            stock: 2,
            ..Default::default()
        })
        .unwrap();
    service
        .update_material(
            &material.id,
            MaterialPatch {
                stock: Some(-1),
                ..Default::default()
            },
        )
        .unwrap();

    let critical = reporting::critical_stock(service.state());
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].stock, -1);
}

#[test]
fn test_recent_services_most_recent_first() {
    let (mut service, _tmp) = test_service().unwrap();
    let fixture = StandardCatalog::create(&mut service).unwrap();

    let first = fixture
        .record_service(&mut service, date("2026-08-01"), 0, 0)
        .unwrap();
    let second = fixture
        .record_service(&mut service, date("2026-08-02"), 0, 0)
        .unwrap();
    let third = fixture
        .record_service(&mut service, date("2026-08-03"), 0, 0)
        .unwrap();

    let recent = reporting::recent_services(service.state(), 2);
    let ids: Vec<&str> = recent.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec![third.as_str(), second.as_str()]);

    let all = reporting::recent_services(service.state(), 10);
    assert_eq!(all.len(), 3);
    assert_eq!(all[2].id, first);
}

#[test]
fn test_calendar_groups_by_day_within_month() {
    let (mut service, _tmp) = test_service().unwrap();
    let fixture = StandardCatalog::create(&mut service).unwrap();

    fixture
        .record_service(&mut service, date("2026-08-10"), 0, 0)
        .unwrap();
    fixture
        .record_service(&mut service, date("2026-08-10"), 0, 0)
        .unwrap();
    fixture
        .record_service(&mut service, date("2026-08-20"), 0, 0)
        .unwrap();
    fixture
        .record_service(&mut service, date("2026-09-01"), 0, 0)
        .unwrap();

    let days = reporting::services_in_month(service.state(), 2026, 8);
    assert_eq!(days.len(), 2);
    assert_eq!(days[&date("2026-08-10")].len(), 2);
    assert_eq!(days[&date("2026-08-20")].len(), 1);

    let on_day = reporting::services_on(service.state(), date("2026-08-10"));
    assert_eq!(on_day.len(), 2);

    assert!(reporting::services_in_month(service.state(), 2026, 7).is_empty());
}
