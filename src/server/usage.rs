use axum::response::Html;

const USAGE_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Odoo Spreadsheet Import</title>
    <style>
      body { font-family: Arial, sans-serif; margin: 40px; }
      h1 { color: #2c3e50; }
      .endpoint { background: #f8f9fa; padding: 10px; margin: 10px 0; border-radius: 5px; }
    </style>
  </head>
  <body>
    <h1>Odoo Spreadsheet Import</h1>
    <p>Upload a spreadsheet (.xlsx, .xlsm, .xlsb, .xls, .ods or .csv) as the multipart field
       <code>file</code>. The first row of every sheet names the Odoo fields.
       Add <code>?sheet_name=...</code> to import a single sheet instead of all of them.</p>

    <div class="endpoint">
      <h3>Connection check</h3>
      <p><code>GET /health</code></p>
    </div>

    <div class="endpoint">
      <h3>Contacts (res.partner)</h3>
      <p><code>POST /import/contacts</code></p>
      <p>Columns: name, email, phone, company_type, street, city, zip, country_id, is_company</p>
    </div>

    <div class="endpoint">
      <h3>Leads / opportunities (crm.lead)</h3>
      <p><code>POST /import/leads</code></p>
      <p>Columns: name, contact_name, partner_id, email_from, phone, stage_id, expected_revenue, description</p>
    </div>

    <div class="endpoint">
      <h3>Sales orders (sale.order)</h3>
      <p><code>POST /import/sales</code></p>
      <p>Columns: partner_id, order_line (JSON array, e.g.
         <code>[{"product_id": 1, "product_uom_qty": 2, "price_unit": 1000000}]</code>)</p>
    </div>

    <p>Example: <code>curl -F file=@contacts.xlsx http://localhost:8000/import/contacts</code></p>
  </body>
</html>
"#;

/// GET /
pub async fn usage() -> Html<&'static str> {
    Html(USAGE_PAGE)
}
