mod common;

use common::{write_xlsx, FakeOdoo};
use odoo_sheet_import::{EntityType, ImportError, Importer, SheetSelection};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

fn contacts_sheet() -> Vec<Vec<Value>> {
    vec![
        vec![json!("name"), json!("email"), json!("phone")],
        vec![json!("Alice"), json!("alice@example.com"), json!("0912345678")],
        vec![json!("Bob"), json!("bob@example.com"), Value::Null],
        vec![json!("Carol"), json!("  "), json!("0987654321")],
    ]
}

fn importer(fake: &Arc<FakeOdoo>) -> Importer {
    Importer::new(fake.clone())
}

#[tokio::test]
async fn test_import_creates_one_record_per_row() {
    let dir = TempDir::new().unwrap();
    let path = write_xlsx(dir.path(), "contacts.xlsx", &[("Contacts", contacts_sheet())]);
    let fake = Arc::new(FakeOdoo::new());

    let report = importer(&fake)
        .import_sheet(&path, SheetSelection::All, EntityType::Contacts)
        .await
        .unwrap();

    assert_eq!(report.created_ids(), vec![1, 2, 3]);
    assert!(report.failures().is_empty());
    assert_eq!(fake.created_models(), vec!["res.partner"; 3]);

    let created = fake.created();
    assert_eq!(created[0].get("phone"), Some(&json!("0912345678")));
    // 空白儲存格不送出
    assert!(created[1].get("phone").is_none());
    assert!(created[2].get("email").is_none());
}

#[tokio::test]
async fn test_rejected_rows_are_reported_and_skipped() {
    let dir = TempDir::new().unwrap();
    let path = write_xlsx(dir.path(), "contacts.xlsx", &[("Contacts", contacts_sheet())]);
    let fake = Arc::new(FakeOdoo::rejecting("name", json!("Bob")));

    let report = importer(&fake)
        .import_sheet(&path, SheetSelection::All, EntityType::Contacts)
        .await
        .unwrap();

    assert_eq!(report.created_ids(), vec![1, 2]);
    assert_eq!(fake.create_calls(), 3);

    let failures = report.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].sheet, "Contacts");
    assert_eq!(failures[0].row, 3);
    assert!(failures[0].reason.contains("invalid value for name"));
}

#[tokio::test]
async fn test_bad_order_line_aborts_before_any_create() {
    let dir = TempDir::new().unwrap();
    let path = write_xlsx(
        dir.path(),
        "orders.xlsx",
        &[(
            "Orders",
            vec![
                vec![json!("partner_id"), json!("order_line")],
                vec![json!(7), json!(r#"[{"product_id": 1, "product_uom_qty": 2}]"#)],
                vec![json!(8), json!("[{product_id: 1}")],
            ],
        )],
    );
    let fake = Arc::new(FakeOdoo::new());

    let err = importer(&fake)
        .import_sheet(&path, SheetSelection::All, EntityType::Sales)
        .await
        .unwrap_err();

    match err {
        ImportError::OrderLineError { sheet, row, .. } => {
            assert_eq!(sheet, "Orders");
            assert_eq!(row, 3);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(fake.create_calls(), 0);
}

#[tokio::test]
async fn test_sales_order_lines_become_create_commands() {
    let dir = TempDir::new().unwrap();
    let path = write_xlsx(
        dir.path(),
        "orders.xlsx",
        &[(
            "Orders",
            vec![
                vec![json!("partner_id"), json!("order_line")],
                vec![
                    json!(7),
                    json!(r#"[{"product_id": 1, "product_uom_qty": 2}, {"product_id": 3, "product_uom_qty": 1}]"#),
                ],
            ],
        )],
    );
    let fake = Arc::new(FakeOdoo::new());

    let report = importer(&fake)
        .import_sheet(&path, SheetSelection::All, EntityType::Sales)
        .await
        .unwrap();

    assert_eq!(report.created_ids(), vec![1]);
    let created = fake.created();
    assert_eq!(created[0].get("partner_id"), Some(&json!(7)));
    assert_eq!(
        created[0].get("order_line"),
        Some(&json!([
            [0, 0, {"product_id": 1, "product_uom_qty": 2}],
            [0, 0, {"product_id": 3, "product_uom_qty": 1}]
        ]))
    );
    assert_eq!(fake.created_models(), vec!["sale.order"]);
}

#[tokio::test]
async fn test_verify_reads_back_created_records() {
    let dir = TempDir::new().unwrap();
    let path = write_xlsx(
        dir.path(),
        "contacts.xlsx",
        &[(
            "Sheet1",
            vec![vec![json!("name")], vec![json!("A")], vec![json!("B")]],
        )],
    );
    let fake = Arc::new(FakeOdoo::new());
    let importer = importer(&fake);

    let report = importer
        .import_sheet(&path, SheetSelection::All, EntityType::Contacts)
        .await
        .unwrap();
    let ids = report.created_ids();
    let verified = importer.verify(EntityType::Contacts, &ids).await.unwrap();

    assert_eq!(ids.len(), 2);
    let names: Vec<&Value> = verified.iter().filter_map(|r| r.get("name")).collect();
    assert_eq!(names, vec![&json!("A"), &json!("B")]);
    assert_eq!(
        fake.last_fields(),
        vec!["id", "name", "email", "phone", "company_type"]
    );
    // 試算表沒有的欄位 Odoo 會回傳 false
    assert_eq!(verified[0].get("email"), Some(&json!(false)));
}

#[tokio::test]
async fn test_verify_fields_per_model() {
    let fake = Arc::new(FakeOdoo::new());
    let importer = importer(&fake);

    importer.verify_model("crm.lead", &[1]).await.unwrap();
    assert_eq!(
        fake.last_fields(),
        vec!["id", "name", "contact_name", "email_from", "stage_id"]
    );

    importer.verify_model("sale.order", &[1]).await.unwrap();
    assert_eq!(
        fake.last_fields(),
        vec!["id", "name", "partner_id", "amount_total"]
    );

    importer.verify_model("project.task", &[1]).await.unwrap();
    assert_eq!(fake.last_fields(), vec!["id", "name", "create_date"]);
}

#[tokio::test]
async fn test_verify_with_no_ids_skips_remote_call() {
    let fake = Arc::new(FakeOdoo::new());

    let verified = importer(&fake)
        .verify(EntityType::Leads, &[])
        .await
        .unwrap();

    assert!(verified.is_empty());
    assert_eq!(fake.search_calls(), 0);
}

#[tokio::test]
async fn test_sheet_selection() {
    let dir = TempDir::new().unwrap();
    let path = write_xlsx(
        dir.path(),
        "leads.xlsx",
        &[
            (
                "North",
                vec![
                    vec![json!("name"), json!("contact_name")],
                    vec![json!("Lead N1"), json!("Nina")],
                ],
            ),
            (
                "South",
                vec![
                    vec![json!("name"), json!("contact_name")],
                    vec![json!("Lead S1"), json!("Sam")],
                    vec![json!("Lead S2"), json!("Sue")],
                ],
            ),
        ],
    );

    let fake = Arc::new(FakeOdoo::new());
    let report = importer(&fake)
        .import_sheet(&path, SheetSelection::All, EntityType::Leads)
        .await
        .unwrap();
    assert_eq!(report.created_ids(), vec![1, 2, 3]);
    let names: Vec<Value> = fake
        .created()
        .iter()
        .filter_map(|r| r.get("name").cloned())
        .collect();
    assert_eq!(names, vec![json!("Lead N1"), json!("Lead S1"), json!("Lead S2")]);

    let fake = Arc::new(FakeOdoo::new());
    let report = importer(&fake)
        .import_sheet(
            &path,
            SheetSelection::Named("South".to_string()),
            EntityType::Leads,
        )
        .await
        .unwrap();
    assert_eq!(report.created_ids().len(), 2);
    assert_eq!(fake.created()[0].get("contact_name"), Some(&json!("Sam")));

    let fake = Arc::new(FakeOdoo::new());
    let err = importer(&fake)
        .import_sheet(
            &path,
            SheetSelection::Named("East".to_string()),
            EntityType::Leads,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::SheetNotFoundError { sheet } if sheet == "East"));
    assert_eq!(fake.create_calls(), 0);
}

#[tokio::test]
async fn test_csv_upload_is_a_single_sheet() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("contacts.csv");
    std::fs::write(
        &path,
        "name,email,phone\nAlice,alice@example.com,0912345678\n,,\nBob,,\n",
    )
    .unwrap();
    let fake = Arc::new(FakeOdoo::new());

    let report = importer(&fake)
        .import_sheet(&path, SheetSelection::All, EntityType::Contacts)
        .await
        .unwrap();

    assert_eq!(report.created_ids(), vec![1, 2]);
    let created = fake.created();
    assert_eq!(created[0].get("phone"), Some(&json!("0912345678")));
    assert_eq!(created[1].len(), 1);
}

#[tokio::test]
async fn test_reconnects_when_session_is_missing() {
    let dir = TempDir::new().unwrap();
    let path = write_xlsx(dir.path(), "contacts.xlsx", &[("Contacts", contacts_sheet())]);
    let fake = Arc::new(FakeOdoo::disconnected());

    let report = importer(&fake)
        .import_sheet(&path, SheetSelection::All, EntityType::Contacts)
        .await
        .unwrap();

    assert_eq!(fake.connect_calls(), 1);
    assert_eq!(report.created_ids().len(), 3);
}

#[tokio::test]
async fn test_import_fails_when_odoo_is_unreachable() {
    let dir = TempDir::new().unwrap();
    let path = write_xlsx(dir.path(), "contacts.xlsx", &[("Contacts", contacts_sheet())]);
    let fake = Arc::new(FakeOdoo::offline());

    let err = importer(&fake)
        .import_sheet(&path, SheetSelection::All, EntityType::Contacts)
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::NotConnectedError));
    assert_eq!(fake.connect_calls(), 1);
    assert_eq!(fake.create_calls(), 0);
}
