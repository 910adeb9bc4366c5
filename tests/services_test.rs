mod common;

use common::{date, test_service, StandardCatalog};
use gestor::application::{AppError, ServiceInput, ServicePatch, ServiceTypePatch};
use gestor::domain::{Labor, MaterialItem, PaymentMethod, ServiceItem, ServiceStatus};

#[test]
fn test_record_service_derives_totals() {
    let (mut service, _tmp) = test_service().unwrap();
    let fixture = StandardCatalog::create(&mut service).unwrap();

    // 1x 100.00 labor + 2x 10.00 material - 5.00 discount
    let id = fixture
        .record_service(&mut service, date("2026-08-10"), 2, 500)
        .unwrap();

    let record = service.get_service(&id).unwrap();
    assert_eq!(record.service_value, 10000);
    assert_eq!(record.discount, 500);
    assert_eq!(record.total_value, 11500);
}

#[test]
fn test_excess_discount_clamps_total_to_zero() {
    let (mut service, _tmp) = test_service().unwrap();
    let fixture = StandardCatalog::create(&mut service).unwrap();

    let id = fixture
        .record_service(&mut service, date("2026-08-10"), 2, 99900)
        .unwrap();

    let record = service.get_service(&id).unwrap();
    assert_eq!(record.total_value, 0);
    // The entered discount is stored as-is even when absorbed
    assert_eq!(record.discount, 99900);
}

#[test]
fn test_installments_follow_payment_method() {
    let (mut service, _tmp) = test_service().unwrap();
    let fixture = StandardCatalog::create(&mut service).unwrap();

    let input = |method, installments| ServiceInput {
        customer_id: fixture.customer_id.clone(),
        description: String::new(),
        date: date("2026-08-10"),
        labor: Labor::Flat(10000),
        materials: vec![],
        payment_method: method,
        installments,
        status: ServiceStatus::Completed,
        discount: 0,
    };

    let pix = service
        .create_service(input(PaymentMethod::Pix, 5))
        .unwrap();
    assert_eq!(pix.installments, 1);

    let credit = service
        .create_service(input(PaymentMethod::CreditCard, 5))
        .unwrap();
    assert_eq!(credit.installments, 5);

    let zero = service
        .create_service(input(PaymentMethod::CreditCard, 0))
        .unwrap();
    assert_eq!(zero.installments, 1);
}

#[test]
fn test_flat_labor_stores_no_line_items() {
    let (mut service, _tmp) = test_service().unwrap();
    let fixture = StandardCatalog::create(&mut service).unwrap();

    let record = service
        .create_service(ServiceInput {
            customer_id: fixture.customer_id.clone(),
            description: "panel check".into(),
            date: date("2026-08-11"),
            labor: Labor::Flat(15000),
            materials: vec![],
            payment_method: PaymentMethod::Cash,
            installments: 1,
            status: ServiceStatus::InProgress,
            discount: 0,
        })
        .unwrap();

    assert!(record.service_items.is_empty());
    assert_eq!(record.service_value, 15000);
    assert_eq!(record.total_value, 15000);
}

#[test]
fn test_service_requires_existing_customer() {
    let (mut service, _tmp) = test_service().unwrap();
    StandardCatalog::create(&mut service).unwrap();

    let input = |customer_id: &str| ServiceInput {
        customer_id: customer_id.into(),
        description: String::new(),
        date: date("2026-08-10"),
        labor: Labor::Flat(1000),
        materials: vec![],
        payment_method: PaymentMethod::Pix,
        installments: 1,
        status: ServiceStatus::Completed,
        discount: 0,
    };

    assert!(matches!(
        service.create_service(input("")),
        Err(AppError::CustomerRequired)
    ));
    assert!(matches!(
        service.create_service(input("nope")),
        Err(AppError::CustomerNotFound(_))
    ));
}

#[test]
fn test_zero_quantity_is_rejected() {
    let (mut service, _tmp) = test_service().unwrap();
    let fixture = StandardCatalog::create(&mut service).unwrap();

    let result = service.create_service(ServiceInput {
        customer_id: fixture.customer_id.clone(),
        description: String::new(),
        date: date("2026-08-10"),
        labor: Labor::Itemized(vec![ServiceItem {
            service_type_id: fixture.service_type_id.clone(),
            quantity: 0,
        }]),
        materials: vec![],
        payment_method: PaymentMethod::Pix,
        installments: 1,
        status: ServiceStatus::Completed,
        discount: 0,
    });
    assert!(matches!(result, Err(AppError::InvalidQuantity)));
}

#[test]
fn test_edit_recomputes_totals_against_current_catalog() {
    let (mut service, _tmp) = test_service().unwrap();
    let fixture = StandardCatalog::create(&mut service).unwrap();
    let id = fixture
        .record_service(&mut service, date("2026-08-10"), 0, 0)
        .unwrap();
    assert_eq!(service.get_service(&id).unwrap().total_value, 10000);

    // Reprice the catalog entry, then touch the record: the stored total
    // follows the current price, not the one at creation time.
    service
        .update_service_type(
            &fixture.service_type_id,
            ServiceTypePatch {
                base_value: Some(12000),
                ..Default::default()
            },
        )
        .unwrap();
    let record = service
        .update_service(&id, ServicePatch::default())
        .unwrap();
    assert_eq!(record.total_value, 12000);
}

#[test]
fn test_edit_preserves_untouched_fields() {
    let (mut service, _tmp) = test_service().unwrap();
    let fixture = StandardCatalog::create(&mut service).unwrap();
    let id = fixture
        .record_service(&mut service, date("2026-08-10"), 2, 500)
        .unwrap();

    let record = service
        .update_service(
            &id,
            ServicePatch {
                status: Some(ServiceStatus::AwaitingApproval),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(record.status, ServiceStatus::AwaitingApproval);
    assert_eq!(record.date, date("2026-08-10"));
    assert_eq!(record.total_value, 11500);
    assert_eq!(record.materials.len(), 1);
}

#[test]
fn test_stock_is_not_decremented_by_usage() {
    let (mut service, _tmp) = test_service().unwrap();
    let fixture = StandardCatalog::create(&mut service).unwrap();

    fixture
        .record_service(&mut service, date("2026-08-10"), 2, 0)
        .unwrap();

    // Material consumption is informational; stock stays a manual counter
    let material = service.get_material(&fixture.material_id).unwrap();
    assert_eq!(material.stock, 3);
}

#[test]
fn test_delete_service() {
    let (mut service, _tmp) = test_service().unwrap();
    let fixture = StandardCatalog::create(&mut service).unwrap();
    let id = fixture
        .record_service(&mut service, date("2026-08-10"), 0, 0)
        .unwrap();

    service.delete_service(&id).unwrap();
    assert!(matches!(
        service.get_service(&id),
        Err(AppError::ServiceNotFound(_))
    ));
    assert!(matches!(
        service.delete_service(&id),
        Err(AppError::ServiceNotFound(_))
    ));
}

#[test]
fn test_material_items_of_deleted_material_contribute_zero() {
    let (mut service, _tmp) = test_service().unwrap();
    let fixture = StandardCatalog::create(&mut service).unwrap();

    service.delete_material(&fixture.material_id).unwrap();
    let record = service
        .create_service(ServiceInput {
            customer_id: fixture.customer_id.clone(),
            description: String::new(),
            date: date("2026-08-10"),
            labor: Labor::Flat(5000),
            materials: vec![MaterialItem {
                material_id: fixture.material_id.clone(),
                quantity: 4,
            }],
            payment_method: PaymentMethod::Pix,
            installments: 1,
            status: ServiceStatus::Completed,
            discount: 0,
        })
        .unwrap();

    assert_eq!(record.total_value, 5000);
}
