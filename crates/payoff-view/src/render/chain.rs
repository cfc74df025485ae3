use common::{ExpiryGroup, OptionChain, OptionContract};

use super::table::{Align, TextTable};
use crate::format::{date, opt_fixed, thousands, usd, usd_short};

const ITM: &str = "ITM";

fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => "N/A".to_string(),
    }
}

fn side_cells(contract: Option<&OptionContract>, greeks: bool, underlying: f64) -> Vec<String> {
    let Some(c) = contract else {
        return vec!["-".to_string(); 6];
    };

    let itm = if c.is_itm(underlying) { ITM } else { "" }.to_string();
    if greeks {
        vec![
            itm,
            usd(c.mark_price),
            opt_fixed(c.delta, 2),
            opt_fixed(c.gamma, 4),
            opt_fixed(c.theta, 2),
            opt_fixed(c.vega, 2),
        ]
    } else {
        vec![
            itm,
            usd(c.bid_price),
            usd(c.ask_price),
            usd(c.last_price),
            thousands(c.volume),
            percent(c.implied_volatility),
        ]
    }
}

/// Calls | strike | puts for one expiry
///
/// `expiry` defaults to the earliest. The strike nearest the underlying
/// price is marked ATM; in-the-money contracts are flagged ITM.
pub fn chain_table(chain: &OptionChain, expiry: Option<&str>, greeks: bool) -> String {
    let selected: Option<(&String, &ExpiryGroup)> = match expiry {
        Some(key) => chain.expiries.get_key_value(key),
        None => chain.expiries.iter().next(),
    };
    let Some((key, group)) = selected else {
        return match expiry {
            Some(key) => format!(
                "No contracts for expiry {} (available: {})",
                key,
                chain.expiry_keys().join(", ")
            ),
            None => format!("No options listed for {}", chain.asset),
        };
    };

    let strikes = group.strikes();
    let atm = strikes
        .iter()
        .copied()
        .min_by(|a, b| (a - chain.underlying_price).abs().total_cmp(&(b - chain.underlying_price).abs()));

    let side_headers: &[&str] = if greeks {
        &["", "Mark", "Delta", "Gamma", "Theta", "Vega"]
    } else {
        &["", "Bid", "Ask", "Last", "Vol", "IV"]
    };
    let headers = side_headers
        .iter()
        .map(|h| (h.to_string(), Align::Right))
        .chain(std::iter::once(("Strike".to_string(), Align::Right)))
        .chain(std::iter::once((String::new(), Align::Left)))
        .chain(side_headers.iter().rev().map(|h| (h.to_string(), Align::Right)));
    let mut table = TextTable::new(headers);

    for strike in &strikes {
        let call = group.calls.iter().find(|c| c.strike_price == *strike);
        let put = group.puts.iter().find(|c| c.strike_price == *strike);

        let mut row = side_cells(call, greeks, chain.underlying_price);
        row.push(usd_short(*strike));
        row.push(if Some(*strike) == atm { "ATM" } else { "" }.to_string());
        let mut puts = side_cells(put, greeks, chain.underlying_price);
        puts.reverse();
        row.extend(puts);
        table.push(row);
    }

    let title = format!(
        "{} options @ {} | expiry {} | updated {}",
        chain.asset,
        usd(chain.underlying_price),
        date(key),
        chain.last_updated
    );
    let banner = format!("{:<w$}{}", "CALLS", "PUTS", w = 48);
    format!("{}\n{}\n{}", title, banner, table.render())
}
