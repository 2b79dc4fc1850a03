//! Database schema definitions and additive migrations

/// SQL to create the customers table
pub const CREATE_CUSTOMERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS customers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    phone TEXT NOT NULL UNIQUE,
    resident_id TEXT DEFAULT '',
    birth_date TEXT,
    address TEXT,
    email TEXT,
    memo TEXT,
    occupation TEXT,
    driving_type TEXT DEFAULT 'none',
    commercial_detail TEXT,
    payment_channel TEXT,
    med_medication TEXT,
    med_hospitalized INTEGER DEFAULT 0,
    med_hospital_detail TEXT,
    med_recent_exam INTEGER DEFAULT 0,
    med_recent_exam_detail TEXT,
    med_5yr_diagnosis TEXT,
    med_5yr_custom TEXT,
    notification_content TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// SQL to create the policies table
pub const CREATE_POLICIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS policies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id INTEGER NOT NULL,
    insurer TEXT NOT NULL,
    product_name TEXT NOT NULL,
    premium INTEGER NOT NULL,
    payment_method TEXT NOT NULL,
    billing_cycle TEXT NOT NULL DEFAULT 'monthly',
    billing_day INTEGER NOT NULL,
    card_issuer TEXT,
    card_number TEXT,
    card_expiry TEXT,
    contract_start_date TEXT NOT NULL,
    contract_end_date TEXT,
    status TEXT NOT NULL DEFAULT 'active',
    next_payment_date TEXT NOT NULL,
    last_payment_date TEXT,
    memo TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (customer_id) REFERENCES customers(id) ON DELETE CASCADE
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_customer_name ON customers(name)",
    "CREATE INDEX IF NOT EXISTS idx_customer_phone ON customers(phone)",
    "CREATE INDEX IF NOT EXISTS idx_policy_customer ON policies(customer_id)",
    "CREATE INDEX IF NOT EXISTS idx_policy_next_payment ON policies(next_payment_date)",
    "CREATE INDEX IF NOT EXISTS idx_policy_status ON policies(status)",
];

/// All schema creation statements, in execution order
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_CUSTOMERS_TABLE, CREATE_POLICIES_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}

/// Columns appended to `customers` after the first release.
///
/// Migration adds these with `ALTER TABLE ... ADD COLUMN` only when
/// absent, so re-running against any schema vintage is safe. New columns
/// always land at the end of the table, which is why every read uses an
/// explicit column list instead of `SELECT *`.
pub const CUSTOMER_MIGRATION_COLUMNS: &[(&str, &str)] = &[
    ("resident_id", "TEXT DEFAULT ''"),
    ("occupation", "TEXT"),
    ("driving_type", "TEXT DEFAULT 'none'"),
    ("commercial_detail", "TEXT"),
    ("payment_channel", "TEXT"),
    ("med_medication", "TEXT"),
    ("med_hospitalized", "INTEGER DEFAULT 0"),
    ("med_hospital_detail", "TEXT"),
    ("med_recent_exam", "INTEGER DEFAULT 0"),
    ("med_recent_exam_detail", "TEXT"),
    ("med_5yr_diagnosis", "TEXT"),
    ("med_5yr_custom", "TEXT"),
    ("notification_content", "TEXT"),
];

/// Columns appended to `policies` after the first release
pub const POLICY_MIGRATION_COLUMNS: &[(&str, &str)] = &[
    ("last_payment_date", "TEXT"),
    ("memo", "TEXT"),
];

/// Explicit column list for customer reads, matching the decode order
/// in the store. Never widen this with `*`.
pub const CUSTOMER_COLUMNS: &str = "id, name, phone, resident_id, birth_date, address, email, memo, \
     occupation, driving_type, commercial_detail, payment_channel, \
     med_medication, med_hospitalized, med_hospital_detail, \
     med_recent_exam, med_recent_exam_detail, med_5yr_diagnosis, med_5yr_custom, \
     notification_content, created_at, updated_at";

/// Explicit column list for policy reads
pub const POLICY_COLUMNS: &str = "id, customer_id, insurer, product_name, premium, payment_method, \
     billing_cycle, billing_day, card_issuer, card_number, card_expiry, \
     contract_start_date, contract_end_date, status, next_payment_date, \
     last_payment_date, memo, created_at, updated_at";
