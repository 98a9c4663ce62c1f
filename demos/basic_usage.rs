/// basic usage - amortize a mortgage and print the first few periods
use loan_amortization_rs::chrono::NaiveDate;
use loan_amortization_rs::{calculate, LoanInput, LoanTerm, Money, PaymentFrequency, Rate, Decimal};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== basic usage example ===\n");

    let input = LoanInput::builder()
        .loan_balance(Money::from_major(250_000))
        .down_payment(Money::from_major(25_000))
        .interest_rate(Rate::from_percentage(Decimal::new(55, 1)))
        .arrangement_fee_rate(Rate::from_percentage(Decimal::ONE))
        .property_insurance_rate(Rate::from_percentage(Decimal::new(5, 1)))
        .term(LoanTerm::new(25, 0))
        .first_payment_date(NaiveDate::from_ymd_opt(2025, 1, 1).ok_or("bad date")?)
        .payment_frequency(PaymentFrequency::Monthly)
        .build()?;

    let result = calculate(input)?;

    println!("monthly payment: {}", result.periodic_payment);
    println!("total payment:   {}", result.total_payment);
    println!("total interest:  {}", result.total_interest);

    println!("\nfirst periods:");
    for row in result.schedule.iter().take(4) {
        println!(
            "{:>3}  {}  {:>10}  {:>10}  {:>10}  {:>12}",
            row.period, row.date, row.payment, row.principal_paid, row.interest, row.balance
        );
    }

    Ok(())
}
