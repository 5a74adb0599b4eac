/// quick start - amortize a loan in a few lines
use loan_schedule_rs::{InterestMethod, LoanTerms, Money, Rate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // $1,000 at 1% per month over 12 months
    let terms = LoanTerms::new(
        Money::from_major(1_000),
        Rate::from_percentage(1),
        12,
        InterestMethod::Compound,
    );

    let summary = terms.summary(2)?;
    println!("installment:    {}", summary.repayment_amount);
    println!("total interest: {}", summary.total_interest_amount);
    println!("total payable:  {}", summary.total_payable_amount);
    println!();

    for row in &terms.schedule(2)? {
        println!(
            "{:>3}  capital {:>8}  interest {:>6}  repayment {:>7}  outstanding {:>8}",
            row.period_index,
            row.capital_amount,
            row.interest_amount,
            row.repayment_amount,
            row.outstanding_amount
        );
    }

    Ok(())
}
