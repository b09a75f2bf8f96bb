//! Battle Coin economics: INR to coin conversion, bonus tiers, and the preset
//! top-up catalog shown in the wallet.

use crate::models::{PaymentAmounts, PaymentPack};

/// Coins credited per rupee before any bonus.
pub const COINS_PER_RUPEE: u64 = 10;

/// Bonus tiers as `(inclusive lower bound, bonus percent)`, highest first.
const BONUS_TIERS: [(u32, u32); 5] = [(2000, 75), (1000, 50), (500, 30), (250, 20), (100, 10)];

pub fn bonus_percentage(amount: u32) -> u32 {
    BONUS_TIERS
        .iter()
        .find(|(threshold, _)| amount >= *threshold)
        .map(|(_, bonus)| *bonus)
        .unwrap_or(0)
}

/// `floor(amount * 10 * (1 + bonus / 100))`, in integer arithmetic.
pub fn amount_to_coins(amount: u32) -> u64 {
    let base = u64::from(amount) * COINS_PER_RUPEE;
    base * (100 + u64::from(bonus_percentage(amount))) / 100
}

fn pack(amount: u32, label: &'static str, description: &'static str) -> PaymentPack {
    PaymentPack {
        amount,
        label,
        description,
        coins: amount_to_coins(amount),
    }
}

pub fn payment_amounts() -> PaymentAmounts {
    PaymentAmounts {
        quick: vec![
            pack(50, "Quick Entry", "Single tournament entry"),
            pack(100, "Battle Pack", "5 tournament entries"),
            pack(250, "Warrior Pack", "Premium tournaments"),
        ],
        popular: vec![
            pack(500, "Elite Pack", "VIP tournaments + bonuses"),
            pack(1000, "Champion Pack", "Unlimited entries for 1 month"),
            pack(2000, "Legend Pack", "All access + exclusive rewards"),
        ],
    }
}

/// Rupee display with Indian digit grouping and no decimals, e.g. `₹1,00,000`.
pub fn format_inr(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return format!("₹{}", digits);
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("₹{},{}", groups.join(","), last_three)
}

/// Countdown display as `m:ss`.
pub fn format_countdown(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bonus_tiers_are_inclusive_at_thresholds() {
        assert_eq!(bonus_percentage(0), 0);
        assert_eq!(bonus_percentage(99), 0);
        assert_eq!(bonus_percentage(100), 10);
        assert_eq!(bonus_percentage(249), 10);
        assert_eq!(bonus_percentage(250), 20);
        assert_eq!(bonus_percentage(499), 20);
        assert_eq!(bonus_percentage(500), 30);
        assert_eq!(bonus_percentage(999), 30);
        assert_eq!(bonus_percentage(1000), 50);
        assert_eq!(bonus_percentage(1999), 50);
        assert_eq!(bonus_percentage(2000), 75);
        assert_eq!(bonus_percentage(u32::MAX), 75);
    }

    #[test]
    fn bonus_is_monotonic() {
        let mut previous = 0;
        for amount in 0..=2500 {
            let bonus = bonus_percentage(amount);
            assert!(bonus >= previous, "bonus dropped at {}", amount);
            previous = bonus;
        }
    }

    #[test]
    fn coins_include_bonus() {
        assert_eq!(amount_to_coins(50), 500);
        assert_eq!(amount_to_coins(100), 1100);
        assert_eq!(amount_to_coins(250), 3000);
        assert_eq!(amount_to_coins(500), 6500);
        assert_eq!(amount_to_coins(1000), 15000);
        assert_eq!(amount_to_coins(2000), 35000);
        // 333 * 10 * 1.2 = 3996
        assert_eq!(amount_to_coins(333), 3996);
        // 101 * 10 * 1.1 = 1111
        assert_eq!(amount_to_coins(101), 1111);
    }

    #[test]
    fn catalog_agrees_with_conversion() {
        let amounts = payment_amounts();
        let all: Vec<_> = amounts.quick.iter().chain(amounts.popular.iter()).collect();

        let listed: Vec<u32> = all.iter().map(|p| p.amount).collect();
        assert_eq!(listed, vec![50, 100, 250, 500, 1000, 2000]);

        for pack in all {
            assert_eq!(pack.coins, amount_to_coins(pack.amount), "{}", pack.label);
        }
    }

    #[test]
    fn formats_rupees_with_indian_grouping() {
        assert_eq!(format_inr(0), "₹0");
        assert_eq!(format_inr(500), "₹500");
        assert_eq!(format_inr(1000), "₹1,000");
        assert_eq!(format_inr(25000), "₹25,000");
        assert_eq!(format_inr(100000), "₹1,00,000");
        assert_eq!(format_inr(12345678), "₹1,23,45,678");
    }

    #[test]
    fn formats_countdown() {
        assert_eq!(format_countdown(300), "5:00");
        assert_eq!(format_countdown(65), "1:05");
        assert_eq!(format_countdown(9), "0:09");
        assert_eq!(format_countdown(0), "0:00");
    }
}
