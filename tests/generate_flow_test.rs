// 全链路测试: 规整 → 合并 → 编号组装 → 模板渲染 → 台账追加

use bigdecimal::BigDecimal;
use freight_invoice_rust::models::ShipmentRow;
use freight_invoice_rust::{CsvLedgerSink, InvoiceGenerator, TemplateRenderer};
use std::fs;
use std::path::Path;
use std::str::FromStr;

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn sample_rows() -> Vec<ShipmentRow> {
    vec![
        // 组 A: 小票保底 10.00 + 附加费 2.00
        ShipmentRow {
            mark: "A/B:C".to_string(),
            receipt_no: Some("R-001".to_string()),
            description: Some("Box".to_string()),
            qty: Some(dec("1")),
            meas_cbm: Some(dec("0.02")),
            per_charges: Some(dec("5")),
            parking_charges: Some(dec("2")),
            contact_number: Some("555-0100".to_string()),
            ..Default::default()
        },
        // 组 B: 两行, 1.0*5 + 2.0*5 = 15.00
        ShipmentRow {
            mark: "B".to_string(),
            description: Some("Crate".to_string()),
            qty: Some(dec("3")),
            meas_cbm: Some(dec("1.0")),
            per_charges: Some(dec("5")),
            ..Default::default()
        },
        ShipmentRow {
            mark: "B".to_string(),
            qty: Some(dec("2")),
            meas_cbm: Some(dec("2.0")),
            per_charges: Some(dec("5")),
            ..Default::default()
        },
    ]
}

fn build_generator(root: &Path) -> InvoiceGenerator {
    let template_path = root.join("template.txt");
    fs::write(
        &template_path,
        "Customer: {MARK}\nGoods:\n{DESCRIPTION}\nParking: {PARKING CHARGES}\n",
    )
    .unwrap();

    let renderer = TemplateRenderer::new(&template_path, root.join("out")).unwrap();
    let ledger = CsvLedgerSink::new(root.join("out").join("ledger.csv"));
    InvoiceGenerator::new(Box::new(renderer), Box::new(ledger))
}

#[test]
fn full_pipeline_writes_documents_and_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let generator = build_generator(dir.path());

    let report = generator.generate(&sample_rows(), 200).unwrap();

    assert_eq!(report.total_groups, 2);
    assert!(report.failed.is_empty());
    assert_eq!(report.total_amount, BigDecimal::from(27));

    // 客户名中的路径非法字符已清洗
    let first = &report.generated[0];
    assert_eq!(first.invoice_number, 201);
    assert!(first.document_path.ends_with("Invoice_201_A_B_C_555-0100_12.00.txt"));

    let rendered = fs::read_to_string(&first.document_path).unwrap();
    assert!(rendered.starts_with(&format!(
        "Invoice #: 201\nDate: {}\n\n",
        report.issue_date
    )));
    assert!(rendered.contains("Customer: A/B:C"));
    assert!(rendered.contains("Parking: 2.00"));

    // 组 B 文档: 多行描述按行序拼接, 空值留空行
    let second = &report.generated[1];
    assert_eq!(second.invoice_number, 202);
    let rendered = fs::read_to_string(&second.document_path).unwrap();
    assert!(rendered.contains("Goods:\nCrate\n\n"));

    // 台账两行, 追加序 = 生成序
    let ledger = fs::read_to_string(dir.path().join("out").join("ledger.csv")).unwrap();
    let lines: Vec<&str> = ledger.lines().collect();
    assert_eq!(
        lines[0],
        "CUSTOMER,INVOICE URL,INVOICE NO,CONTACT NO,INVOICE TOTAL"
    );
    assert!(lines[1].starts_with("A/B:C,"));
    assert!(lines[1].ends_with(",201,555-0100,12.00"));
    assert!(lines[2].contains(",202,,15.00"));
}

#[test]
fn repeated_runs_append_to_the_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let generator = build_generator(dir.path());

    generator.generate(&sample_rows(), 0).unwrap();
    generator.generate(&sample_rows(), 2).unwrap();

    // 重复生成不去重: 4 条台账 + 表头
    let ledger = fs::read_to_string(dir.path().join("out").join("ledger.csv")).unwrap();
    assert_eq!(ledger.lines().count(), 5);

    let numbers: Vec<&str> = ledger
        .lines()
        .skip(1)
        .map(|l| l.split(',').nth(2).unwrap())
        .collect();
    assert_eq!(numbers, vec!["1", "2", "3", "4"]);
}
