use chrono::Local;
use credit_desk::error::AppError;
use credit_desk::lending::{
    CreditPolicy, CustomerId, CustomerRegistration, InMemoryLendingRepository, LendingService,
    LoanApplication,
};
use std::sync::Arc;

struct DemoCustomer {
    label: &'static str,
    first_name: &'static str,
    monthly_income: f64,
    request: (f64, f64, u32),
    repeat: usize,
}

const DEMO_CUSTOMERS: [DemoCustomer; 3] = [
    DemoCustomer {
        label: "new customer, modest request",
        first_name: "Asha",
        monthly_income: 50_000.0,
        request: (100_000.0, 10.0, 12),
        repeat: 1,
    },
    DemoCustomer {
        label: "new customer, unaffordable request",
        first_name: "Rohan",
        monthly_income: 20_000.0,
        request: (1_000_000.0, 10.0, 12),
        repeat: 1,
    },
    DemoCustomer {
        label: "repeat borrower stacking installments",
        first_name: "Leela",
        monthly_income: 30_000.0,
        request: (120_000.0, 10.0, 12),
        repeat: 3,
    },
];

pub(crate) fn run_demo(policy: CreditPolicy) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryLendingRepository::default());
    let service = LendingService::new(repository, policy);
    let today = Local::now().date_naive();

    println!("Credit desk demo ({today})");
    for demo in DEMO_CUSTOMERS.iter() {
        let customer = service.register_customer(CustomerRegistration {
            first_name: demo.first_name.to_string(),
            last_name: "Demo".to_string(),
            age: 30,
            phone_number: "9000000000".to_string(),
            monthly_income: demo.monthly_income,
        })?;
        println!(
            "\n{} ({}): income {:.2}, approved limit {:.2}",
            customer.name, demo.label, customer.monthly_income, customer.approved_limit
        );

        let (loan_amount, interest_rate, tenure) = demo.request;
        let application = LoanApplication {
            customer_id: customer.customer_id,
            loan_amount,
            interest_rate,
            tenure,
        };

        for attempt in 1..=demo.repeat {
            let check = service.check_eligibility(&application)?;
            let created = service.create_loan_on(&application, today)?;
            println!(
                "  attempt {attempt}: requested {:.2}% -> corrected {:.2}%, installment {:.2}, {}",
                check.interest_rate,
                check.corrected_interest_rate,
                created.monthly_installment,
                created.message
            );
        }

        render_loans(&service, customer.customer_id)?;
    }

    Ok(())
}

fn render_loans(
    service: &LendingService<InMemoryLendingRepository>,
    customer_id: CustomerId,
) -> Result<(), AppError> {
    let loans = service.view_loans(customer_id)?;
    if loans.is_empty() {
        println!("  no loans on record");
        return Ok(());
    }
    for loan in loans {
        println!(
            "  loan {}: {:.2} at {:.2}%, installment {:.2}, {} repayment(s) left",
            loan.loan_id,
            loan.loan_amount,
            loan.interest_rate,
            loan.monthly_installment,
            loan.repayments_left
        );
    }
    Ok(())
}
