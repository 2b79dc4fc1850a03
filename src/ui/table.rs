use tabled::{settings::Style, Table, Tabled};

use crate::customer::Customer;
use crate::policy::Policy;
use crate::storage::{OverduePolicy, UpcomingPayment};

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "이름")]
    name: String,
    #[tabled(rename = "전화번호")]
    phone: String,
    #[tabled(rename = "주소")]
    address: String,
    #[tabled(rename = "직업")]
    occupation: String,
    #[tabled(rename = "운전")]
    driving: String,
}

#[derive(Tabled)]
struct PolicyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "보험사")]
    insurer: String,
    #[tabled(rename = "상품명")]
    product: String,
    #[tabled(rename = "보험료")]
    premium: String,
    #[tabled(rename = "납입")]
    method: String,
    #[tabled(rename = "주기")]
    cycle: String,
    #[tabled(rename = "상태")]
    status: String,
    #[tabled(rename = "다음납입일")]
    next_payment: String,
}

#[derive(Tabled)]
struct UpcomingRow {
    #[tabled(rename = "납입일")]
    due: String,
    #[tabled(rename = "D-Day")]
    days_left: String,
    #[tabled(rename = "고객")]
    customer: String,
    #[tabled(rename = "전화번호")]
    phone: String,
    #[tabled(rename = "상품명")]
    product: String,
    #[tabled(rename = "보험료")]
    premium: String,
}

#[derive(Tabled)]
struct OverdueRow {
    #[tabled(rename = "납입일")]
    due: String,
    #[tabled(rename = "연체일수")]
    overdue_days: String,
    #[tabled(rename = "고객")]
    customer: String,
    #[tabled(rename = "전화번호")]
    phone: String,
    #[tabled(rename = "상품명")]
    product: String,
    #[tabled(rename = "보험료")]
    premium: String,
}

fn id_cell(id: Option<i64>) -> String {
    id.map(|v| v.to_string()).unwrap_or_default()
}

fn premium_cell(premium: i64) -> String {
    format!("{}원", premium)
}

fn date_cell(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(&rows).with(Style::rounded()).to_string()
}

pub fn customers_table(customers: &[Customer]) -> String {
    render(
        customers
            .iter()
            .map(|c| CustomerRow {
                id: id_cell(c.id),
                name: c.name.clone(),
                phone: c.phone.clone(),
                address: c.address.clone().unwrap_or_default(),
                occupation: c.occupation.clone().unwrap_or_default(),
                driving: c.driving_type.label().to_string(),
            })
            .collect(),
    )
}

pub fn policies_table(policies: &[Policy]) -> String {
    render(
        policies
            .iter()
            .map(|p| PolicyRow {
                id: id_cell(p.id),
                insurer: p.insurer.clone(),
                product: p.product_name.clone(),
                premium: premium_cell(p.premium),
                method: p.payment_method.to_string(),
                cycle: p.billing_cycle.to_string(),
                status: p.status.to_string(),
                next_payment: date_cell(p.next_payment_date),
            })
            .collect(),
    )
}

pub fn upcoming_table(payments: &[UpcomingPayment]) -> String {
    render(
        payments
            .iter()
            .map(|u| UpcomingRow {
                due: date_cell(u.policy.next_payment_date),
                days_left: format!("D-{}", u.days_left),
                customer: u.customer.name.clone(),
                phone: u.customer.phone.clone(),
                product: u.policy.product_name.clone(),
                premium: premium_cell(u.policy.premium),
            })
            .collect(),
    )
}

pub fn overdue_table(overdue: &[OverduePolicy]) -> String {
    render(
        overdue
            .iter()
            .map(|o| OverdueRow {
                due: date_cell(o.policy.next_payment_date),
                overdue_days: format!("{}일", o.overdue_days),
                customer: o.customer.name.clone(),
                phone: o.customer.phone.clone(),
                product: o.policy.product_name.clone(),
                premium: premium_cell(o.policy.premium),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{BillingCycle, PaymentMethod};

    #[test]
    fn test_empty_tables_render_empty() {
        assert!(customers_table(&[]).is_empty());
        assert!(policies_table(&[]).is_empty());
    }

    #[test]
    fn test_policy_table_contains_fields() {
        let policy = Policy::new(
            1,
            "삼성생명",
            "종신보험",
            50_000,
            PaymentMethod::Card,
            BillingCycle::Monthly,
            15,
            "2026-01-01".parse().unwrap(),
        );
        let table = policies_table(&[policy]);
        assert!(table.contains("삼성생명"));
        assert!(table.contains("50000원"));
        assert!(table.contains("monthly"));
    }
}
