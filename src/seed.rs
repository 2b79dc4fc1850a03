//! Demo-data seeding - random customers and policies for manual QA
//!
//! Fills a store with plausible Korean-named customers and a spread of
//! policies: monthly/yearly cycles, card/transfer methods, due dates in
//! the past and near future, so every derived view has something to show.

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::customer::{Customer, DrivingType, PaymentChannel};
use crate::policy::{BillingCycle, PaymentMethod, Policy};
use crate::storage::CrmStore;
use crate::Result;

const FIRST_NAMES: &[&str] = &[
    "민준", "서연", "지훈", "수빈", "예린", "도윤", "하은", "지안", "현우", "유진",
    "태윤", "지수", "서준", "가은", "시우", "나은", "주원", "채원", "윤서", "다은",
];
const LAST_NAMES: &[&str] = &["김", "이", "박", "최", "정", "강", "조", "윤", "장", "임"];
const OCCUPATIONS: &[&str] = &[
    "회사원", "자영업", "공무원", "교사", "간호사", "프리랜서", "기술직", "영업직",
];
const ADDRESSES: &[&str] = &[
    "서울시 강남구", "서울시 마포구", "서울시 송파구", "경기도 성남시",
    "경기도 수원시", "인천시 남동구", "대전시 유성구", "부산시 해운대구",
];
const INSURERS: &[&str] = &["삼성생명", "한화생명", "교보생명", "KB손해보험", "현대해상", "DB손해보험"];
const PRODUCTS: &[&str] = &["종신보험", "실손보험", "연금보험", "암보험", "운전자보험", "어린이보험"];
const CARD_ISSUERS: &[&str] = &["신한카드", "국민카드", "삼성카드", "현대카드"];

/// Counts of what a seeding run inserted
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedReport {
    pub customers: usize,
    pub policies: usize,
}

/// Insert `count` random customers, each with 0-3 policies.
///
/// Phones embed a serial suffix, so seeding never trips the uniqueness
/// constraint within one run; re-running against the same store can
/// collide and will surface the duplicate-phone error.
pub fn seed_store(store: &CrmStore, count: usize, rng: &mut impl Rng, today: NaiveDate) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for serial in 1..=count {
        let customer = random_customer(rng, serial);
        let customer_id = store.add_customer(&customer)?;
        report.customers += 1;

        for _ in 0..rng.gen_range(0..=3) {
            let policy = random_policy(rng, customer_id, today);
            store.add_policy(&policy)?;
            report.policies += 1;
        }
    }

    Ok(report)
}

fn pick<'a>(rng: &mut impl Rng, options: &'a [&str]) -> &'a str {
    options.choose(rng).copied().unwrap_or(options[0])
}

fn random_customer(rng: &mut impl Rng, serial: usize) -> Customer {
    let name = format!("{}{}", pick(rng, LAST_NAMES), pick(rng, FIRST_NAMES));
    let phone = format!("010-{:04}-{:04}", rng.gen_range(1000..=9999), serial);
    let resident_id = format!(
        "{:02}{:02}{:02}-{}{:06}",
        rng.gen_range(70..=99),
        rng.gen_range(1..=12),
        rng.gen_range(1..=28),
        rng.gen_range(1..=4),
        rng.gen_range(0..=999_999)
    );

    let driving_type = *[DrivingType::None, DrivingType::Personal, DrivingType::Commercial]
        .choose(rng)
        .unwrap_or(&DrivingType::None);

    let mut customer = Customer::new(name, phone).with_resident_id(resident_id);
    customer.address = Some(pick(rng, ADDRESSES).to_string());
    customer.occupation = Some(pick(rng, OCCUPATIONS).to_string());
    customer.driving_type = driving_type;
    if driving_type == DrivingType::Commercial {
        customer.commercial_detail = Some(pick(rng, &["taxi", "construction", "taxi,construction"]).to_string());
    }
    customer.payment_channel = Some(
        *[
            PaymentChannel::BankTransfer,
            PaymentChannel::CreditCard,
            PaymentChannel::AutoDebit,
        ]
        .choose(rng)
        .unwrap_or(&PaymentChannel::BankTransfer),
    );
    if rng.gen_range(0..5) == 0 {
        customer.med_medication = Some(pick(rng, &["고혈압약", "당뇨약", "고지혈증약"]).to_string());
    }
    if rng.gen_range(0..7) == 0 {
        customer.med_recent_exam = true;
        customer.med_recent_exam_detail = Some("종합건강검진".to_string());
    }
    customer.memo = Some(format!("DEMO #{}", serial));
    customer
}

fn random_policy(rng: &mut impl Rng, customer_id: i64, today: NaiveDate) -> Policy {
    let payment_method = if rng.gen_range(0..10) < 6 {
        PaymentMethod::Card
    } else {
        PaymentMethod::Transfer
    };
    let billing_cycle = if rng.gen_range(0..10) < 8 {
        BillingCycle::Monthly
    } else {
        BillingCycle::Yearly
    };
    let billing_day = rng.gen_range(1..=31);

    let start = today - Duration::days(rng.gen_range(30..730));
    let mut policy = Policy::new(
        customer_id,
        pick(rng, INSURERS),
        pick(rng, PRODUCTS),
        rng.gen_range(1..=20) * 10_000,
        payment_method,
        billing_cycle,
        billing_day,
        start,
    );

    if payment_method == PaymentMethod::Card {
        policy = policy.with_card(
            pick(rng, CARD_ISSUERS),
            format!(
                "{:04}-{:04}-{:04}-{:04}",
                rng.gen_range(1000..=9999),
                rng.gen_range(1000..=9999),
                rng.gen_range(1000..=9999),
                rng.gen_range(1000..=9999)
            ),
            format!("{:02}/{:02}", rng.gen_range(1..=12), rng.gen_range(26..=30)),
        );
    }

    // Spread due dates from two weeks overdue to a month out, so the
    // upcoming and overdue views both get a share
    let offset = rng.gen_range(-14..=30);
    policy = policy.with_next_payment_date(today + Duration::days(offset));

    policy
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_seed_inserts_requested_customers() {
        let store = CrmStore::open_in_memory().unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let report = seed_store(&store, 10, &mut rng, date("2026-03-01")).unwrap();
        assert_eq!(report.customers, 10);
        assert_eq!(store.count_customers().unwrap(), 10);
        assert_eq!(store.count_policies().unwrap(), report.policies);
    }

    #[test]
    fn test_seeded_policies_are_well_formed() {
        let store = CrmStore::open_in_memory().unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        seed_store(&store, 20, &mut rng, date("2026-03-01")).unwrap();

        for customer in store.get_all_customers().unwrap() {
            for policy in store
                .get_policies_by_customer(customer.id.unwrap())
                .unwrap()
            {
                assert!(policy.premium > 0);
                assert!((1..=31).contains(&policy.billing_day));
                assert!(policy.next_payment_date.is_some());
                if policy.payment_method == PaymentMethod::Card {
                    assert!(policy.card_number.is_some());
                } else {
                    assert!(policy.card_issuer.is_none());
                }
                crate::validate::validate_policy(&policy).unwrap();
            }
        }
    }

    #[test]
    fn test_seed_is_deterministic_for_same_rng_seed() {
        let store_a = CrmStore::open_in_memory().unwrap();
        let store_b = CrmStore::open_in_memory().unwrap();
        let today = date("2026-03-01");

        seed_store(&store_a, 5, &mut StdRng::seed_from_u64(1), today).unwrap();
        seed_store(&store_b, 5, &mut StdRng::seed_from_u64(1), today).unwrap();

        let names_a: Vec<String> = store_a.get_all_customers().unwrap().iter().map(|c| c.name.clone()).collect();
        let names_b: Vec<String> = store_b.get_all_customers().unwrap().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names_a, names_b);
    }
}
