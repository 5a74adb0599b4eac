/// compare methods - simple vs compound interest on the same terms
use loan_schedule_rs::{AmortizationStrategy, Amortizer, InterestMethod, Money, Rate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let principal = Money::from_major(25_000);
    let rate = Rate::from_percentage(18).per_period(12);
    let periods = 36;

    println!("=== {} at {} per month, {} months ===\n", principal, rate, periods);

    for method in [InterestMethod::Simple, InterestMethod::Compound] {
        let amortizer = Amortizer::for_method(method, 2);
        let summary = amortizer.summary(principal, rate, periods)?;
        let schedule = amortizer.schedule(principal, rate, periods)?;

        println!("{:?}", method);
        println!("  installment:    {}", summary.repayment_amount);
        println!("  total interest: {}", summary.total_interest_amount);
        println!("  total payable:  {}", summary.total_payable_amount);

        let first = schedule.rows().first().ok_or("empty schedule")?;
        let last = schedule.last().ok_or("empty schedule")?;
        println!(
            "  first row: capital {} / interest {}",
            first.capital_amount, first.interest_amount
        );
        println!(
            "  last row:  capital {} / interest {} / outstanding {}\n",
            last.capital_amount, last.interest_amount, last.outstanding_amount
        );
    }

    Ok(())
}
