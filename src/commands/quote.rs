use anyhow::Result;
use colored::Colorize;
use delivery_manager::pricing::{compute_cost, CostBreakdown, ShipmentRequest};

/// Execute the quote command
///
/// Prices the shipment with the same engine the HTTP API uses.
pub fn execute(
    distance_km: &str,
    rate_per_km: &str,
    weight_kg: &str,
    rate_per_kg: &str,
    urgency: &str,
) -> Result<()> {
    let request = ShipmentRequest::parse(distance_km, rate_per_km, weight_kg, rate_per_kg, urgency)?;
    let costs = compute_cost(&request)?;

    println!("{}", "Shipment:".bold());
    println!(
        "  {}: {} km x {}",
        "Distance".cyan(),
        request.distance_km,
        request.rate_per_km
    );
    println!(
        "  {}: {} kg x {}",
        "Weight".cyan(),
        request.weight_kg,
        request.rate_per_kg
    );
    println!("  {}: {}", "Urgency".cyan(), request.urgency);
    println!();
    print_breakdown(&costs);

    Ok(())
}

fn print_breakdown(costs: &CostBreakdown) {
    println!("{}", "Cost Breakdown:".bold());
    println!("  {:<14} {:>12}", "Distance", costs.distance_cost);
    println!("  {:<14} {:>12}", "Weight", costs.weight_cost);
    println!("  {:<14} {:>12}", "Base", costs.base_cost);
    println!("  {:<14} {:>12}", "Surcharge", costs.surcharge);
    println!("  {:<14} {:>12}", "Discount", format!("-{}", costs.discount));
    println!("  {:<14} {:>12}", "Extra fee", costs.extra_fee);
    println!(
        "  {:<14} {:>12}",
        "Final".green().bold(),
        costs.final_cost.to_string().green().bold()
    );
}
