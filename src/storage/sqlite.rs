//! SQLite store implementation
//!
//! One embedded connection, fully synchronous. Every mutating call
//! commits on its own; there are no transactions spanning public calls.
//! "Today" for the derived payment views is the local machine date.

use std::path::Path;

use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, params};

use super::schema;
use crate::billing::calculate_next_payment_date;
use crate::customer::{Customer, DrivingType};
use crate::policy::{BillingCycle, PaymentMethod, Policy, PolicyStatus};
use crate::{Error, Result};

/// SQLite-backed store for customers and policies
pub struct CrmStore {
    conn: Connection,
}

/// A card-paid policy due within the lookahead window
#[derive(Debug, Clone)]
pub struct UpcomingPayment {
    pub policy: Policy,
    pub customer: Customer,
    /// Calendar days until the payment date; 0 means due today
    pub days_left: i64,
}

/// A card-paid policy flipped to overdue by the sweep
#[derive(Debug, Clone)]
pub struct OverduePolicy {
    pub policy: Policy,
    pub customer: Customer,
    /// Calendar days past the missed payment date, always positive
    pub overdue_days: i64,
}

impl CrmStore {
    /// Open a database file (creates if it doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        // Cascade delete depends on this pragma; SQLite defaults it off
        // per connection.
        self.conn.execute_batch("PRAGMA foreign_keys = ON")?;

        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }

        // Legacy databases predate some columns. A failed ALTER leaves
        // the previous, still-functional shape in place.
        if let Err(e) = self.migrate_table("customers", schema::CUSTOMER_MIGRATION_COLUMNS) {
            tracing::warn!("customers migration skipped: {}", e);
        }
        if let Err(e) = self.migrate_table("policies", schema::POLICY_MIGRATION_COLUMNS) {
            tracing::warn!("policies migration skipped: {}", e);
        }

        Ok(())
    }

    /// Append missing columns to a pre-existing table. Checks the live
    /// column list first, so re-running is always safe.
    fn migrate_table(&self, table: &str, columns: &[(&str, &str)]) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", table))?;
        let existing: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .filter_map(|r| r.ok())
            .collect();

        for (name, decl) in columns {
            if !existing.iter().any(|c| c == name) {
                tracing::debug!("adding column {}.{}", table, name);
                self.conn.execute(
                    &format!("ALTER TABLE {} ADD COLUMN {} {}", table, name, decl),
                    [],
                )?;
            }
        }
        Ok(())
    }

    // ========== Customer Operations ==========

    /// Insert a new customer, returning the generated id.
    ///
    /// Both timestamps are set to the same "now". A duplicate phone
    /// surfaces as [`Error::DuplicatePhone`] so callers can report it.
    pub fn add_customer(&self, customer: &Customer) -> Result<i64> {
        let timestamp = Customer::current_timestamp();

        let result = self.conn.execute(
            r#"
            INSERT INTO customers (
                name, phone, resident_id, birth_date, address, email, memo, occupation,
                driving_type, commercial_detail, payment_channel,
                med_medication, med_hospitalized, med_hospital_detail,
                med_recent_exam, med_recent_exam_detail, med_5yr_diagnosis, med_5yr_custom,
                notification_content, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)
            "#,
            params![
                customer.name,
                customer.phone,
                customer.resident_id,
                customer.birth_date,
                customer.address,
                customer.email,
                customer.memo,
                customer.occupation,
                customer.driving_type.as_str(),
                customer.commercial_detail,
                customer.payment_channel.map(|c| c.as_str()),
                customer.med_medication,
                customer.med_hospitalized as i64,
                customer.med_hospital_detail,
                customer.med_recent_exam as i64,
                customer.med_recent_exam_detail,
                customer.med_5yr_diagnosis,
                customer.med_5yr_custom,
                customer.notification_content,
                timestamp,
                timestamp,
            ],
        );

        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(e) if is_constraint_violation(&e) => {
                Err(Error::DuplicatePhone(customer.phone.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get a customer by id
    pub fn get_customer(&self, id: i64) -> Result<Option<Customer>> {
        let sql = format!(
            "SELECT {} FROM customers WHERE id = ?1",
            schema::CUSTOMER_COLUMNS
        );
        self.conn
            .query_row(&sql, [id], row_to_customer)
            .optional()
            .map_err(Into::into)
    }

    /// Get all customers, ordered by name ascending
    pub fn get_all_customers(&self) -> Result<Vec<Customer>> {
        let sql = format!(
            "SELECT {} FROM customers ORDER BY name ASC",
            schema::CUSTOMER_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let customers = stmt
            .query_map([], row_to_customer)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(customers)
    }

    /// Search customers by name or phone substring, ordered by name
    pub fn search_customers(&self, keyword: &str) -> Result<Vec<Customer>> {
        let pattern = format!("%{}%", keyword);
        let sql = format!(
            "SELECT {} FROM customers WHERE name LIKE ?1 OR phone LIKE ?1 ORDER BY name ASC",
            schema::CUSTOMER_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let customers = stmt
            .query_map([pattern], row_to_customer)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(customers)
    }

    /// Replace every field of an existing customer except id/created_at.
    ///
    /// Returns `Ok(false)` when the customer has no id or the row is
    /// gone. `updated_at` is refreshed on success.
    pub fn update_customer(&self, customer: &Customer) -> Result<bool> {
        let Some(id) = customer.id else {
            return Ok(false);
        };

        let timestamp = Customer::current_timestamp();

        let result = self.conn.execute(
            r#"
            UPDATE customers
            SET name = ?1, phone = ?2, resident_id = ?3, birth_date = ?4, address = ?5,
                email = ?6, memo = ?7, occupation = ?8,
                driving_type = ?9, commercial_detail = ?10, payment_channel = ?11,
                med_medication = ?12, med_hospitalized = ?13, med_hospital_detail = ?14,
                med_recent_exam = ?15, med_recent_exam_detail = ?16,
                med_5yr_diagnosis = ?17, med_5yr_custom = ?18,
                notification_content = ?19, updated_at = ?20
            WHERE id = ?21
            "#,
            params![
                customer.name,
                customer.phone,
                customer.resident_id,
                customer.birth_date,
                customer.address,
                customer.email,
                customer.memo,
                customer.occupation,
                customer.driving_type.as_str(),
                customer.commercial_detail,
                customer.payment_channel.map(|c| c.as_str()),
                customer.med_medication,
                customer.med_hospitalized as i64,
                customer.med_hospital_detail,
                customer.med_recent_exam as i64,
                customer.med_recent_exam_detail,
                customer.med_5yr_diagnosis,
                customer.med_5yr_custom,
                customer.notification_content,
                timestamp,
                id,
            ],
        );

        match result {
            Ok(n) => Ok(n > 0),
            Err(e) if is_constraint_violation(&e) => {
                Err(Error::DuplicatePhone(customer.phone.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Hard-delete a customer; policies cascade
    pub fn delete_customer(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM customers WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Count all customers
    pub fn count_customers(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Policy Operations ==========

    /// Insert a new policy, returning the generated id.
    ///
    /// When the caller did not supply `next_payment_date`, it is
    /// computed from the contract start date, cycle and billing day, so
    /// the column is never null once persisted.
    pub fn add_policy(&self, policy: &Policy) -> Result<i64> {
        let timestamp = Customer::current_timestamp();

        let next_payment = policy.next_payment_date.unwrap_or_else(|| {
            calculate_next_payment_date(
                policy.contract_start_date,
                policy.billing_cycle,
                policy.billing_day,
            )
        });

        self.conn.execute(
            r#"
            INSERT INTO policies (
                customer_id, insurer, product_name, premium, payment_method,
                billing_cycle, billing_day, card_issuer, card_number, card_expiry,
                contract_start_date, contract_end_date, status, next_payment_date,
                last_payment_date, memo, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
            "#,
            params![
                policy.customer_id,
                policy.insurer,
                policy.product_name,
                policy.premium,
                policy.payment_method.as_str(),
                policy.billing_cycle.as_str(),
                policy.billing_day,
                policy.card_issuer,
                policy.card_number,
                policy.card_expiry,
                fmt_date(policy.contract_start_date),
                policy.contract_end_date.map(fmt_date),
                policy.status.as_str(),
                fmt_date(next_payment),
                policy.last_payment_date.map(fmt_date),
                policy.memo,
                timestamp,
                timestamp,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Get a policy by id
    pub fn get_policy(&self, id: i64) -> Result<Option<Policy>> {
        let sql = format!(
            "SELECT {} FROM policies WHERE id = ?1",
            schema::POLICY_COLUMNS
        );
        self.conn
            .query_row(&sql, [id], row_to_policy)
            .optional()
            .map_err(Into::into)
    }

    /// Get all policies of a customer, newest first
    pub fn get_policies_by_customer(&self, customer_id: i64) -> Result<Vec<Policy>> {
        let sql = format!(
            "SELECT {} FROM policies WHERE customer_id = ?1 ORDER BY created_at DESC, id DESC",
            schema::POLICY_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let policies = stmt
            .query_map([customer_id], row_to_policy)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(policies)
    }

    /// Replace every field of an existing policy except id/created_at
    pub fn update_policy(&self, policy: &Policy) -> Result<bool> {
        let Some(id) = policy.id else {
            return Ok(false);
        };

        let timestamp = Customer::current_timestamp();

        let next_payment = policy.next_payment_date.unwrap_or_else(|| {
            calculate_next_payment_date(
                policy.contract_start_date,
                policy.billing_cycle,
                policy.billing_day,
            )
        });

        let affected = self.conn.execute(
            r#"
            UPDATE policies
            SET customer_id = ?1, insurer = ?2, product_name = ?3, premium = ?4,
                payment_method = ?5, billing_cycle = ?6, billing_day = ?7,
                card_issuer = ?8, card_number = ?9, card_expiry = ?10,
                contract_start_date = ?11, contract_end_date = ?12, status = ?13,
                next_payment_date = ?14, last_payment_date = ?15, memo = ?16,
                updated_at = ?17
            WHERE id = ?18
            "#,
            params![
                policy.customer_id,
                policy.insurer,
                policy.product_name,
                policy.premium,
                policy.payment_method.as_str(),
                policy.billing_cycle.as_str(),
                policy.billing_day,
                policy.card_issuer,
                policy.card_number,
                policy.card_expiry,
                fmt_date(policy.contract_start_date),
                policy.contract_end_date.map(fmt_date),
                policy.status.as_str(),
                fmt_date(next_payment),
                policy.last_payment_date.map(fmt_date),
                policy.memo,
                timestamp,
                id,
            ],
        )?;

        Ok(affected > 0)
    }

    /// Delete a policy by id
    pub fn delete_policy(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM policies WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Count all policies
    pub fn count_policies(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM policies", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Billing Operations ==========

    /// Record a completed payment.
    ///
    /// Sets `last_payment_date`, recomputes `next_payment_date` from the
    /// payment date (not from the previous due date) and forces the
    /// status back to active. Returns `Ok(false)` if the policy is gone.
    pub fn mark_payment_completed(&self, policy_id: i64, payment_date: NaiveDate) -> Result<bool> {
        let billing: Option<(String, u32)> = self
            .conn
            .query_row(
                "SELECT billing_cycle, billing_day FROM policies WHERE id = ?1",
                [policy_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((cycle_str, billing_day)) = billing else {
            return Ok(false);
        };

        let cycle = BillingCycle::from_db(&cycle_str);
        let next_payment = calculate_next_payment_date(payment_date, cycle, billing_day);
        let timestamp = Customer::current_timestamp();

        let affected = self.conn.execute(
            r#"
            UPDATE policies
            SET last_payment_date = ?1, next_payment_date = ?2, status = ?3, updated_at = ?4
            WHERE id = ?5
            "#,
            params![
                fmt_date(payment_date),
                fmt_date(next_payment),
                PolicyStatus::Active.as_str(),
                timestamp,
                policy_id,
            ],
        )?;

        Ok(affected > 0)
    }

    /// Overdue sweep: flip card-paid active policies whose next payment
    /// date has passed to overdue. Uses the local machine date; run once
    /// per application session.
    ///
    /// Idempotent: a second run with no new candidates updates 0 rows.
    pub fn auto_update_payment_status(&self) -> Result<usize> {
        self.auto_update_payment_status_as_of(local_today())
    }

    /// Sweep against an explicit "today" (deterministic tests)
    pub fn auto_update_payment_status_as_of(&self, today: NaiveDate) -> Result<usize> {
        let timestamp = Customer::current_timestamp();

        let affected = self.conn.execute(
            r#"
            UPDATE policies
            SET status = ?1, updated_at = ?2
            WHERE payment_method = ?3 AND status = ?4 AND next_payment_date < ?5
            "#,
            params![
                PolicyStatus::Overdue.as_str(),
                timestamp,
                PaymentMethod::Card.as_str(),
                PolicyStatus::Active.as_str(),
                fmt_date(today),
            ],
        )?;

        if affected > 0 {
            tracing::info!("marked {} policies overdue", affected);
        }
        Ok(affected)
    }

    /// Card-paid active policies due within `[today, today + days_ahead]`
    /// inclusive, ordered by payment date. `days_left` of 0 means due
    /// today. Uses the local machine date.
    pub fn get_upcoming_payments(&self, days_ahead: i64) -> Result<Vec<UpcomingPayment>> {
        self.get_upcoming_payments_as_of(days_ahead, local_today())
    }

    /// Upcoming window against an explicit "today" (deterministic tests)
    pub fn get_upcoming_payments_as_of(
        &self,
        days_ahead: i64,
        today: NaiveDate,
    ) -> Result<Vec<UpcomingPayment>> {
        let end = today + chrono::Duration::days(days_ahead);
        let sql = format!(
            "SELECT {} FROM policies \
             WHERE payment_method = ?1 AND status = ?2 \
               AND next_payment_date >= ?3 AND next_payment_date <= ?4 \
             ORDER BY next_payment_date ASC",
            schema::POLICY_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let policies = stmt
            .query_map(
                params![
                    PaymentMethod::Card.as_str(),
                    PolicyStatus::Active.as_str(),
                    fmt_date(today),
                    fmt_date(end),
                ],
                row_to_policy,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        self.join_customers(policies, |policy, customer| {
            let due = policy.next_payment_date.unwrap_or(today);
            UpcomingPayment {
                days_left: (due - today).num_days(),
                policy,
                customer,
            }
        })
    }

    /// Card-paid policies currently overdue, ordered by the missed date.
    /// `overdue_days` is always positive: the sweep only fires when the
    /// date is strictly in the past. Uses the local machine date.
    pub fn get_overdue_policies(&self) -> Result<Vec<OverduePolicy>> {
        self.get_overdue_policies_as_of(local_today())
    }

    /// Overdue view against an explicit "today" (deterministic tests)
    pub fn get_overdue_policies_as_of(&self, today: NaiveDate) -> Result<Vec<OverduePolicy>> {
        let sql = format!(
            "SELECT {} FROM policies \
             WHERE payment_method = ?1 AND status = ?2 \
             ORDER BY next_payment_date ASC",
            schema::POLICY_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let policies = stmt
            .query_map(
                params![PaymentMethod::Card.as_str(), PolicyStatus::Overdue.as_str()],
                row_to_policy,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        self.join_customers(policies, |policy, customer| {
            let due = policy.next_payment_date.unwrap_or(today);
            OverduePolicy {
                overdue_days: (today - due).num_days(),
                policy,
                customer,
            }
        })
    }

    /// Pair each policy with its owning customer. Rows whose customer
    /// vanished mid-read are dropped rather than failing the view.
    fn join_customers<T>(
        &self,
        policies: Vec<Policy>,
        build: impl Fn(Policy, Customer) -> T,
    ) -> Result<Vec<T>> {
        let mut results = Vec::with_capacity(policies.len());
        for policy in policies {
            if let Some(customer) = self.get_customer(policy.customer_id)? {
                results.push(build(policy, customer));
            }
        }
        Ok(results)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        let overdue: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM policies WHERE status = ?1",
            [PolicyStatus::Overdue.as_str()],
            |row| row.get(0),
        )?;

        Ok(DbStats {
            customers: self.count_customers()?,
            policies: self.count_policies()?,
            overdue: overdue as usize,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DbStats {
    pub customers: usize,
    pub policies: usize,
    pub overdue: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Customers: {}", self.customers)?;
        writeln!(f, "  Policies: {}", self.policies)?;
        writeln!(f, "  Overdue: {}", self.overdue)
    }
}

/// Local machine date; the timezone policy for all derived views
fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn fmt_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Decode a customer row by column name. Reads always use the explicit
/// column list in [`schema::CUSTOMER_COLUMNS`], so appended migration
/// columns can never shift the decode.
fn row_to_customer(row: &rusqlite::Row) -> rusqlite::Result<Customer> {
    let driving: Option<String> = row.get("driving_type")?;
    let channel: Option<String> = row.get("payment_channel")?;
    let hospitalized: Option<i64> = row.get("med_hospitalized")?;
    let recent_exam: Option<i64> = row.get("med_recent_exam")?;
    let resident_id: Option<String> = row.get("resident_id")?;

    Ok(Customer {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        phone: row.get("phone")?,
        resident_id: resident_id.unwrap_or_default(),
        birth_date: row.get("birth_date")?,
        address: row.get("address")?,
        email: row.get("email")?,
        memo: row.get("memo")?,
        occupation: row.get("occupation")?,
        driving_type: DrivingType::from_db(driving.as_deref().unwrap_or("")),
        commercial_detail: row.get("commercial_detail")?,
        payment_channel: channel.as_deref().and_then(|s| s.parse().ok()),
        med_medication: row.get("med_medication")?,
        med_hospitalized: hospitalized.unwrap_or(0) != 0,
        med_hospital_detail: row.get("med_hospital_detail")?,
        med_recent_exam: recent_exam.unwrap_or(0) != 0,
        med_recent_exam_detail: row.get("med_recent_exam_detail")?,
        med_5yr_diagnosis: row.get("med_5yr_diagnosis")?,
        med_5yr_custom: row.get("med_5yr_custom")?,
        notification_content: row.get("notification_content")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Decode a policy row by column name
fn row_to_policy(row: &rusqlite::Row) -> rusqlite::Result<Policy> {
    let payment_method: String = row.get("payment_method")?;
    let billing_cycle: String = row.get("billing_cycle")?;
    let status: String = row.get("status")?;

    let start: String = row.get("contract_start_date")?;
    let end: Option<String> = row.get("contract_end_date")?;
    let next: String = row.get("next_payment_date")?;
    let last: Option<String> = row.get("last_payment_date")?;

    Ok(Policy {
        id: Some(row.get("id")?),
        customer_id: row.get("customer_id")?,
        insurer: row.get("insurer")?,
        product_name: row.get("product_name")?,
        premium: row.get("premium")?,
        payment_method: PaymentMethod::from_db(&payment_method),
        billing_cycle: BillingCycle::from_db(&billing_cycle),
        billing_day: row.get("billing_day")?,
        card_issuer: row.get("card_issuer")?,
        card_number: row.get("card_number")?,
        card_expiry: row.get("card_expiry")?,
        contract_start_date: parse_date_col("contract_start_date", &start)?,
        contract_end_date: end
            .as_deref()
            .map(|s| parse_date_col("contract_end_date", s))
            .transpose()?,
        status: PolicyStatus::from_db(&status),
        next_payment_date: Some(parse_date_col("next_payment_date", &next)?),
        last_payment_date: last
            .as_deref()
            .map(|s| parse_date_col("last_payment_date", s))
            .transpose()?,
        memo: row.get("memo")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_date_col(column: &str, value: &str) -> rusqlite::Result<NaiveDate> {
    value.parse().map_err(|e: chrono::ParseError| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("{}: {}", column, e).into(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::MAX_PREMIUM;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn sample_customer(name: &str, phone: &str) -> Customer {
        Customer::new(name, phone).with_resident_id("900101-1234567")
    }

    fn sample_policy(customer_id: i64) -> Policy {
        Policy::new(
            customer_id,
            "삼성생명",
            "종신보험",
            50_000,
            PaymentMethod::Card,
            BillingCycle::Monthly,
            25,
            date("2026-01-01"),
        )
        .with_card("신한카드", "1234-5678-9012-3456", "12/26")
    }

    #[test]
    fn test_customer_crud() {
        let store = CrmStore::open_in_memory().unwrap();

        let id = store
            .add_customer(&sample_customer("김테스트", "010-9999-0001"))
            .unwrap();
        assert!(id > 0);

        let saved = store.get_customer(id).unwrap().unwrap();
        assert_eq!(saved.name, "김테스트");
        assert_eq!(saved.resident_id, "900101-1234567");
        assert!(saved.created_at.is_some());
        assert_eq!(saved.created_at, saved.updated_at);

        let mut edited = saved.clone();
        edited.address = Some("서울시 강남구".to_string());
        edited.med_hospitalized = true;
        assert!(store.update_customer(&edited).unwrap());

        let reloaded = store.get_customer(id).unwrap().unwrap();
        assert_eq!(reloaded.address.as_deref(), Some("서울시 강남구"));
        assert!(reloaded.med_hospitalized);
        assert_eq!(reloaded.created_at, saved.created_at);

        assert!(store.delete_customer(id).unwrap());
        assert!(store.get_customer(id).unwrap().is_none());
    }

    #[test]
    fn test_customer_round_trip_all_fields() {
        let store = CrmStore::open_in_memory().unwrap();

        let mut customer = sample_customer("박라운드", "010-9999-0002");
        customer.birth_date = Some("1990-01-15".to_string());
        customer.address = Some("부산시 해운대구".to_string());
        customer.email = Some("round@example.com".to_string());
        customer.memo = Some("VIP".to_string());
        customer.occupation = Some("자영업".to_string());
        customer.driving_type = DrivingType::Commercial;
        customer.commercial_detail = Some("taxi,construction".to_string());
        customer.payment_channel = Some(crate::customer::PaymentChannel::AutoDebit);
        customer.med_medication = Some("고혈압,당뇨병".to_string());
        customer.med_hospitalized = true;
        customer.med_hospital_detail = Some("2020년 맹장수술".to_string());
        customer.med_recent_exam = true;
        customer.med_recent_exam_detail = Some("건강검진".to_string());
        customer.med_5yr_diagnosis = Some("암".to_string());
        customer.med_5yr_custom = Some("기타 진단".to_string());
        customer.notification_content = Some("고지 내용".to_string());

        let id = store.add_customer(&customer).unwrap();
        let saved = store.get_customer(id).unwrap().unwrap();

        // Everything except the auto-populated fields must survive
        let mut expected = customer.clone();
        expected.id = saved.id;
        expected.created_at = saved.created_at.clone();
        expected.updated_at = saved.updated_at.clone();
        assert_eq!(saved, expected);
    }

    #[test]
    fn test_duplicate_phone_rejected() {
        let store = CrmStore::open_in_memory().unwrap();

        store
            .add_customer(&sample_customer("첫번째", "010-1111-2222"))
            .unwrap();
        let err = store
            .add_customer(&sample_customer("두번째", "010-1111-2222"))
            .unwrap_err();

        assert!(matches!(err, Error::DuplicatePhone(p) if p == "010-1111-2222"));
        // First row intact
        assert_eq!(store.count_customers().unwrap(), 1);
    }

    #[test]
    fn test_get_all_customers_ordered_by_name() {
        let store = CrmStore::open_in_memory().unwrap();
        store.add_customer(&sample_customer("나중수", "010-0000-0002")).unwrap();
        store.add_customer(&sample_customer("가나다", "010-0000-0001")).unwrap();

        let all = store.get_all_customers().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "가나다");
    }

    #[test]
    fn test_search_by_name_and_phone() {
        let store = CrmStore::open_in_memory().unwrap();
        store.add_customer(&sample_customer("김철수", "010-1234-5678")).unwrap();
        store.add_customer(&sample_customer("이영희", "010-8765-4321")).unwrap();

        assert_eq!(store.search_customers("철수").unwrap().len(), 1);
        assert_eq!(store.search_customers("8765").unwrap().len(), 1);
        assert_eq!(store.search_customers("010").unwrap().len(), 2);
        assert!(store.search_customers("없는사람").unwrap().is_empty());
    }

    #[test]
    fn test_update_customer_without_id_is_noop() {
        let store = CrmStore::open_in_memory().unwrap();
        let customer = sample_customer("무식별", "010-0000-0003");
        assert!(!store.update_customer(&customer).unwrap());
    }

    #[test]
    fn test_policy_crud_and_auto_next_payment() {
        let store = CrmStore::open_in_memory().unwrap();
        let customer_id = store
            .add_customer(&sample_customer("김계약", "010-2222-0001"))
            .unwrap();

        let policy_id = store.add_policy(&sample_policy(customer_id)).unwrap();
        assert!(policy_id > 0);

        let saved = store.get_policy(policy_id).unwrap().unwrap();
        assert_eq!(saved.insurer, "삼성생명");
        assert_eq!(saved.premium, 50_000);
        // Auto-computed: start 2026-01-01, monthly, day 25 -> 2026-02-25
        assert_eq!(saved.next_payment_date, Some(date("2026-02-25")));

        let mut edited = saved.clone();
        edited.premium = 60_000;
        edited.billing_day = 10;
        assert!(store.update_policy(&edited).unwrap());
        let reloaded = store.get_policy(policy_id).unwrap().unwrap();
        assert_eq!(reloaded.premium, 60_000);
        assert_eq!(reloaded.billing_day, 10);

        assert!(store.delete_policy(policy_id).unwrap());
        assert!(store.get_policy(policy_id).unwrap().is_none());
        assert!(!store.delete_policy(policy_id).unwrap());
    }

    #[test]
    fn test_explicit_next_payment_date_kept() {
        let store = CrmStore::open_in_memory().unwrap();
        let customer_id = store
            .add_customer(&sample_customer("김직접", "010-2222-0002"))
            .unwrap();

        let policy = sample_policy(customer_id).with_next_payment_date(date("2026-06-15"));
        let policy_id = store.add_policy(&policy).unwrap();

        let saved = store.get_policy(policy_id).unwrap().unwrap();
        assert_eq!(saved.next_payment_date, Some(date("2026-06-15")));
    }

    #[test]
    fn test_policy_round_trip_max_premium() {
        let store = CrmStore::open_in_memory().unwrap();
        let customer_id = store
            .add_customer(&sample_customer("김최대", "010-2222-0003"))
            .unwrap();

        let policy = Policy::new(
            customer_id,
            "한화생명",
            "연금보험",
            MAX_PREMIUM,
            PaymentMethod::Transfer,
            BillingCycle::Yearly,
            15,
            date("2025-01-01"),
        )
        .with_end_date(date("2035-01-01"));

        let id = store.add_policy(&policy).unwrap();
        let saved = store.get_policy(id).unwrap().unwrap();

        assert_eq!(saved.premium, MAX_PREMIUM);
        assert_eq!(saved.billing_cycle, BillingCycle::Yearly);
        assert_eq!(saved.contract_end_date, Some(date("2035-01-01")));
        assert_eq!(saved.payment_method, PaymentMethod::Transfer);
        assert!(saved.card_issuer.is_none());
        // Yearly from 2025-01-01, day 15 -> 2026-01-15
        assert_eq!(saved.next_payment_date, Some(date("2026-01-15")));
    }

    #[test]
    fn test_policies_by_customer_newest_first() {
        let store = CrmStore::open_in_memory().unwrap();
        let customer_id = store
            .add_customer(&sample_customer("김다건", "010-2222-0004"))
            .unwrap();

        for product in ["종신보험", "실손보험", "연금보험"] {
            let mut policy = sample_policy(customer_id);
            policy.product_name = product.to_string();
            store.add_policy(&policy).unwrap();
        }

        let policies = store.get_policies_by_customer(customer_id).unwrap();
        assert_eq!(policies.len(), 3);
        // Same-second timestamps fall back to id DESC
        assert_eq!(policies[0].product_name, "연금보험");

        let other = store
            .add_customer(&sample_customer("남의고객", "010-2222-0005"))
            .unwrap();
        assert!(store.get_policies_by_customer(other).unwrap().is_empty());
    }

    #[test]
    fn test_cascade_delete() {
        let store = CrmStore::open_in_memory().unwrap();
        let customer_id = store
            .add_customer(&sample_customer("김삭제", "010-3333-0001"))
            .unwrap();

        store.add_policy(&sample_policy(customer_id)).unwrap();
        store.add_policy(&sample_policy(customer_id)).unwrap();
        assert_eq!(store.get_policies_by_customer(customer_id).unwrap().len(), 2);

        assert!(store.delete_customer(customer_id).unwrap());
        assert!(store.get_policies_by_customer(customer_id).unwrap().is_empty());
        assert_eq!(store.count_policies().unwrap(), 0);
    }

    #[test]
    fn test_mark_payment_completed() {
        let store = CrmStore::open_in_memory().unwrap();
        let customer_id = store
            .add_customer(&sample_customer("김납부", "010-4444-0001"))
            .unwrap();
        let policy_id = store.add_policy(&sample_policy(customer_id)).unwrap();

        // Pre-state: anything. Mark overdue first to prove the reset.
        store
            .auto_update_payment_status_as_of(date("2027-01-01"))
            .unwrap();
        assert_eq!(
            store.get_policy(policy_id).unwrap().unwrap().status,
            PolicyStatus::Overdue
        );

        assert!(store
            .mark_payment_completed(policy_id, date("2026-02-25"))
            .unwrap());

        let updated = store.get_policy(policy_id).unwrap().unwrap();
        assert_eq!(updated.last_payment_date, Some(date("2026-02-25")));
        assert_eq!(updated.status, PolicyStatus::Active);
        // Recomputed from the payment date, not the old due date
        assert_eq!(updated.next_payment_date, Some(date("2026-03-25")));
    }

    #[test]
    fn test_mark_payment_completed_not_found() {
        let store = CrmStore::open_in_memory().unwrap();
        assert!(!store
            .mark_payment_completed(99_999, date("2026-02-25"))
            .unwrap());
    }

    #[test]
    fn test_overdue_sweep_and_idempotence() {
        let store = CrmStore::open_in_memory().unwrap();
        let customer_id = store
            .add_customer(&sample_customer("김연체", "010-5555-0001"))
            .unwrap();

        let policy = sample_policy(customer_id).with_next_payment_date(date("2025-12-01"));
        let policy_id = store.add_policy(&policy).unwrap();

        let today = date("2026-01-10");
        assert_eq!(store.auto_update_payment_status_as_of(today).unwrap(), 1);
        assert_eq!(
            store.get_policy(policy_id).unwrap().unwrap().status,
            PolicyStatus::Overdue
        );

        // Second run with no new candidates updates nothing
        assert_eq!(store.auto_update_payment_status_as_of(today).unwrap(), 0);
    }

    #[test]
    fn test_sweep_is_strictly_before_today() {
        let store = CrmStore::open_in_memory().unwrap();
        let customer_id = store
            .add_customer(&sample_customer("김오늘", "010-5555-0002"))
            .unwrap();

        let policy = sample_policy(customer_id).with_next_payment_date(date("2026-01-10"));
        let policy_id = store.add_policy(&policy).unwrap();

        // Due exactly today: not overdue yet
        assert_eq!(
            store
                .auto_update_payment_status_as_of(date("2026-01-10"))
                .unwrap(),
            0
        );
        assert_eq!(
            store.get_policy(policy_id).unwrap().unwrap().status,
            PolicyStatus::Active
        );
    }

    #[test]
    fn test_transfer_policies_excluded_from_sweep() {
        let store = CrmStore::open_in_memory().unwrap();
        let customer_id = store
            .add_customer(&sample_customer("김이체", "010-5555-0003"))
            .unwrap();

        let mut policy = sample_policy(customer_id).with_next_payment_date(date("2025-12-01"));
        policy.payment_method = PaymentMethod::Transfer;
        policy.card_issuer = None;
        policy.card_number = None;
        policy.card_expiry = None;
        let policy_id = store.add_policy(&policy).unwrap();

        assert_eq!(
            store
                .auto_update_payment_status_as_of(date("2026-01-10"))
                .unwrap(),
            0
        );
        assert_eq!(
            store.get_policy(policy_id).unwrap().unwrap().status,
            PolicyStatus::Active
        );
        assert!(store
            .get_overdue_policies_as_of(date("2026-01-10"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_upcoming_window_boundaries() {
        let store = CrmStore::open_in_memory().unwrap();
        let customer_id = store
            .add_customer(&sample_customer("김임박", "010-6666-0001"))
            .unwrap();
        let today = date("2026-03-01");

        // Due today, due at the window edge, due one past the edge
        for (phone_suffix, due) in [("a", "2026-03-01"), ("b", "2026-03-08"), ("c", "2026-03-09")] {
            let mut policy = sample_policy(customer_id).with_next_payment_date(date(due));
            policy.memo = Some(phone_suffix.to_string());
            store.add_policy(&policy).unwrap();
        }

        let upcoming = store.get_upcoming_payments_as_of(7, today).unwrap();
        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0].days_left, 0);
        assert_eq!(upcoming[0].policy.next_payment_date, Some(today));
        assert_eq!(upcoming[1].days_left, 7);
        assert_eq!(upcoming[0].customer.name, "김임박");
    }

    #[test]
    fn test_upcoming_excludes_overdue_and_transfer() {
        let store = CrmStore::open_in_memory().unwrap();
        let customer_id = store
            .add_customer(&sample_customer("김제외", "010-6666-0002"))
            .unwrap();
        let today = date("2026-03-01");

        let mut overdue = sample_policy(customer_id).with_next_payment_date(date("2026-03-02"));
        overdue.status = PolicyStatus::Overdue;
        store.add_policy(&overdue).unwrap();

        let mut transfer = sample_policy(customer_id).with_next_payment_date(date("2026-03-03"));
        transfer.payment_method = PaymentMethod::Transfer;
        store.add_policy(&transfer).unwrap();

        assert!(store.get_upcoming_payments_as_of(7, today).unwrap().is_empty());
    }

    #[test]
    fn test_overdue_view_days_and_order() {
        let store = CrmStore::open_in_memory().unwrap();
        let customer_id = store
            .add_customer(&sample_customer("김연체왕", "010-7777-0001"))
            .unwrap();

        for due in ["2025-12-20", "2025-11-15"] {
            let policy = sample_policy(customer_id).with_next_payment_date(date(due));
            store.add_policy(&policy).unwrap();
        }

        let today = date("2026-01-10");
        store.auto_update_payment_status_as_of(today).unwrap();

        let overdue = store.get_overdue_policies_as_of(today).unwrap();
        assert_eq!(overdue.len(), 2);
        // Oldest missed date first
        assert_eq!(overdue[0].policy.next_payment_date, Some(date("2025-11-15")));
        assert_eq!(overdue[0].overdue_days, 56);
        assert_eq!(overdue[1].overdue_days, 21);
        assert!(overdue.iter().all(|o| o.overdue_days > 0));
    }

    #[test]
    fn test_legacy_table_migration() {
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("legacy.db");

        // First-release customers table, before the underwriting columns
        {
            let conn = Connection::open(&db_path).unwrap();
            conn.execute_batch(
                r#"
                CREATE TABLE customers (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    phone TEXT NOT NULL UNIQUE,
                    birth_date TEXT,
                    address TEXT,
                    email TEXT,
                    memo TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                INSERT INTO customers (name, phone, created_at, updated_at)
                VALUES ('이주민', '010-8888-0001', '2025-01-01 09:00:00', '2025-01-01 09:00:00');
                "#,
            )
            .unwrap();
        }

        let store = CrmStore::open(&db_path).unwrap();

        // Existing row survives with defaults for the appended columns
        let all = store.get_all_customers().unwrap();
        assert_eq!(all.len(), 1);
        let migrated = &all[0];
        assert_eq!(migrated.name, "이주민");
        assert_eq!(migrated.resident_id, "");
        assert_eq!(migrated.driving_type, DrivingType::None);
        assert!(!migrated.med_hospitalized);

        // Re-opening (re-running the migration) is harmless
        drop(store);
        let store = CrmStore::open(&db_path).unwrap();
        assert_eq!(store.count_customers().unwrap(), 1);
    }

    #[test]
    fn test_stats() {
        let store = CrmStore::open_in_memory().unwrap();
        let customer_id = store
            .add_customer(&sample_customer("김통계", "010-9999-1000"))
            .unwrap();
        let policy = sample_policy(customer_id).with_next_payment_date(date("2025-01-01"));
        store.add_policy(&policy).unwrap();
        store
            .auto_update_payment_status_as_of(date("2026-01-01"))
            .unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.customers, 1);
        assert_eq!(stats.policies, 1);
        assert_eq!(stats.overdue, 1);
    }
}
