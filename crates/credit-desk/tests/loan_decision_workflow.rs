//! End-to-end scenarios driven through the public lending facade.

mod common {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use credit_desk::lending::{
        CreditPolicy, Customer, CustomerId, InMemoryLendingRepository, LedgerSnapshot,
        LendingService, LoanApplication, LoanId, LoanRecord,
    };

    pub(super) fn customer(id: u64, monthly_income: f64) -> Customer {
        Customer {
            customer_id: CustomerId(id),
            first_name: "Anika".to_string(),
            last_name: "Rao".to_string(),
            age: 31,
            phone_number: "9811122233".to_string(),
            monthly_income,
            approved_limit: credit_desk::lending::approved_limit_for(monthly_income),
            current_debt: 0.0,
        }
    }

    pub(super) fn loan(id: u64, customer_id: u64, monthly_payment: f64) -> LoanRecord {
        let start = NaiveDate::from_ymd_opt(2022, 3, 15).expect("valid date");
        LoanRecord {
            loan_id: LoanId(id),
            customer_id: CustomerId(customer_id),
            loan_amount: 200_000.0,
            tenure: 24,
            interest_rate: 12.0,
            monthly_payment,
            emis_paid_on_time: 24,
            start_date: start,
            end_date: NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date"),
        }
    }

    pub(super) fn application(
        customer_id: u64,
        amount: f64,
        rate: f64,
        tenure: u32,
    ) -> LoanApplication {
        LoanApplication {
            customer_id: CustomerId(customer_id),
            loan_amount: amount,
            interest_rate: rate,
            tenure,
        }
    }

    pub(super) fn service(snapshot: LedgerSnapshot) -> LendingService<InMemoryLendingRepository> {
        let repository =
            InMemoryLendingRepository::from_snapshot(snapshot).expect("snapshot loads");
        LendingService::new(Arc::new(repository), CreditPolicy::default())
    }
}

use chrono::NaiveDate;
use common::*;
use credit_desk::lending::{CustomerId, CustomerRegistration, LedgerSnapshot};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 10).expect("valid date")
}

#[test]
fn registered_customer_can_take_and_list_a_loan() {
    let service = service(LedgerSnapshot::default());

    let customer = service
        .register_customer(CustomerRegistration {
            first_name: "Dev".to_string(),
            last_name: "Malhotra".to_string(),
            age: 45,
            phone_number: "9700011122".to_string(),
            monthly_income: 50_000.0,
        })
        .expect("registration succeeds");
    assert_eq!(customer.approved_limit, 1_800_000.0);

    let created = service
        .create_loan_on(
            &application(customer.customer_id.0, 100_000.0, 10.0, 12),
            today(),
        )
        .expect("creation succeeds");
    assert!(created.loan_approved);
    assert_eq!(created.monthly_installment, 8_791.59);

    let loan_id = created.loan_id.expect("approved loan has an id");
    let detail = service.view_loan(loan_id).expect("view succeeds");
    assert_eq!(detail.customer.id, customer.customer_id);
    assert_eq!(detail.interest_rate, 10.0);

    let listing = service
        .view_loans(customer.customer_id)
        .expect("listing succeeds");
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].repayments_left, 12);
}

#[test]
fn over_burdened_customer_is_rejected_before_pricing() {
    let service = service(LedgerSnapshot {
        customers: vec![customer(1, 20_000.0)],
        loans: vec![loan(1, 1, 11_000.0)],
    });

    let check = service
        .check_eligibility(&application(1, 50_000.0, 14.0, 12))
        .expect("eligibility check succeeds");
    assert!(!check.approval);
    assert_eq!(check.monthly_installment, 0.0);

    let created = service
        .create_loan_on(&application(1, 50_000.0, 14.0, 12), today())
        .expect("creation succeeds");
    assert_eq!(created.message, "Loan rejected due to low credit score");
    assert!(service
        .view_loans(CustomerId(1))
        .expect("listing succeeds")
        .iter()
        .all(|loan| loan.loan_id.0 == 1));
}

#[test]
fn eligibility_response_serializes_flat_fields() {
    let service = service(LedgerSnapshot {
        customers: vec![customer(1, 50_000.0)],
        loans: Vec::new(),
    });
    let check = service
        .check_eligibility(&application(1, 100_000.0, 10.0, 12))
        .expect("eligibility check succeeds");

    let body = serde_json::to_value(&check).expect("serializes");
    assert_eq!(body["customer_id"], 1);
    assert_eq!(body["approval"], true);
    assert_eq!(body["monthly_installment"], 8_791.59);
}

#[test]
fn json_snapshot_seeds_the_ledger() {
    let raw = r#"{
        "customers": [{
            "customer_id": 4,
            "first_name": "Ira",
            "last_name": "Sen",
            "age": 27,
            "phone_number": "9000000000",
            "monthly_income": 40000.0,
            "approved_limit": 1400000.0
        }],
        "loans": [{
            "loan_id": 10,
            "customer_id": 4,
            "loan_amount": 90000.0,
            "tenure": 12,
            "interest_rate": 9.0,
            "monthly_payment": 7870.0,
            "emis_paid_on_time": 11,
            "start_date": "2024-01-01",
            "end_date": "2025-01-01"
        }]
    }"#;

    let snapshot: LedgerSnapshot = serde_json::from_str(raw).expect("snapshot parses");
    let service = service(snapshot);
    let loans = service.view_loans(CustomerId(4)).expect("listing succeeds");
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].repayments_left, 1);
}
