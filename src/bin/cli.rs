//! GBS Options CLI
//!
//! Walk-through of pricing, Greeks, implied volatility and payoff analysis.

use gbs_options::prelude::*;

fn main() {
    println!("Generalized Black-Scholes Pricing");
    println!("=================================\n");

    let spot = 500.0;
    let strike = 505.0;
    let time = 30.0 / 365.0; // 30 days
    let rate = 0.05;
    let div = 0.01;
    let vol = 0.20;

    println!("Market:");
    println!("  Spot: ${:.2}", spot);
    println!("  Strike: ${:.2}", strike);
    println!("  Time: {:.0} days", time * 365.0);
    println!("  Rate: {:.1}%", rate * 100.0);
    println!("  Div: {:.1}%", div * 100.0);
    println!("  Vol: {:.1}%\n", vol * 100.0);

    let model = PricingModel::Merton { dividend_yield: div };

    for option_type in [OptionType::Call, OptionType::Put] {
        match price(model, option_type, spot, strike, time, rate, vol) {
            Ok(v) => {
                println!("{:?}:", option_type);
                println!("  Value: ${:.4}", v.value);
                println!("  Delta: {:.4}", v.delta);
                println!("  Gamma: {:.6}", v.gamma);
                println!("  Theta: {:.4} (per day: {:.4})", v.theta, v.theta_per_day());
                println!("  Vega:  {:.4}", v.vega);
                println!("  Rho:   {:.4}\n", v.rho);
            }
            Err(e) => println!("  Pricing failed: {}", e),
        }
    }

    println!("Implied Volatility Solver:");
    let market_price = match price(model, OptionType::Call, spot, strike, time, rate, vol) {
        Ok(v) => v.value + 0.50, // Simulated market price
        Err(e) => {
            println!("  Pricing failed: {}", e);
            return;
        }
    };
    match implied_volatility_stock(OptionType::Call, market_price, spot, strike, time, rate, div) {
        Ok(iv) => println!(
            "  Market price ${:.4} implies vol: {:.2}%\n",
            market_price,
            iv * 100.0
        ),
        Err(e) => println!("  IV solve failed: {}\n", e),
    }

    println!("Iron Butterfly Payoff at Expiry:");
    let iron_fly = VanillaOption::put(480.0) - VanillaOption::put(500.0)
        - VanillaOption::call(500.0)
        + VanillaOption::call(520.0);
    println!("  {}", iron_fly);

    let config = PayoffConfig {
        interval: 5.0,
        ..Default::default()
    };
    match calculate_profit_loss(&iron_fly, &config, false) {
        Ok(profile) => {
            for (p, pnl) in profile.prices.iter().zip(&profile.pnl) {
                println!("  {:>7.2} | {:>8.2}", p, pnl);
            }
        }
        Err(e) => println!("  P&L failed: {}", e),
    }

    println!("\n--- Done ---");
}
