/// loan lifecycle - application, origination, charges and collection
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use loan_schedule_rs::charges::outstanding_by_type;
use loan_schedule_rs::{
    ensure_cancellable, ChargeType, InterestMethod, Loan, LoanApplication, LoanCharge, LoanConfig,
    Money, Rate, SafeTimeProvider, TimeSource,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 31, 9, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();
    let config = LoanConfig::standard();

    // stage 1: application
    let mut application = LoanApplication::builder()
        .party("Jane Roe")
        .requested_amount(Money::from_major(5_000))
        .legal_expenses_rate(dec!(3))
        .periods(6)
        .annual_rate(Rate::from_percentage(24))
        .interest_method(InterestMethod::Compound)
        .build(&config)?;

    println!("stage 1: application");
    println!("--------------------");
    println!("requested net: {}", application.requested_net_amount());
    println!("legal expenses: {}\n", application.legal_expenses_amount());

    // stage 2: approval and origination, billed on the 31st
    application.approve()?;
    let posting_date = NaiveDate::from_ymd_opt(2024, 1, 31).ok_or("bad date")?;
    let mut loan = Loan::originate(&application, posting_date, Some(31), &config, &time)?;

    println!("stage 2: originated");
    println!("-------------------");
    println!("loan amount: {}  lent: {}", loan.loan_amount(), loan.lent_amount());
    for installment in &loan.installments {
        println!(
            "{:>2}  {}  {:>8}  {:?}",
            installment.period_index(),
            installment.repayment_date,
            installment.row.repayment_amount,
            installment.status
        );
    }
    println!();

    // stage 3: charges
    let mut charges = LoanCharge::for_installments(&loan)?;
    println!("stage 3: {} charges", charges.len());
    println!("------------------");
    println!("capital due:  {}", outstanding_by_type(&charges, ChargeType::Capital));
    println!("interest due: {}", outstanding_by_type(&charges, ChargeType::Interest));
    println!("cancellable:  {}\n", ensure_cancellable(&charges).is_ok());

    // stage 4: first installment paid after its due date
    controller.advance(Duration::days(35));
    let today = time.now().date_naive();
    let first_due = loan.installments[0].amount_due();
    loan.record_payment(1, first_due, &time)?;
    for charge in charges.iter_mut().filter(|c| c.period_index == 1) {
        let amount = charge.outstanding_amount;
        charge.apply_payment(amount, today)?;
    }
    for charge in charges.iter_mut() {
        charge.refresh_status(&time);
    }

    println!("stage 4: {} paid on {}", first_due, today);
    println!("------------------------------");
    println!("still due: {}", loan.amount_due());
    println!("cancellable: {}\n", ensure_cancellable(&charges).is_ok());

    println!("{}", loan.json());

    Ok(())
}
