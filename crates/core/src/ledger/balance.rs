//! Account balance calculations.
//!
//! - Asset/Expense: balance += debit - credit (debit-normal)
//! - Liability/Equity/Revenue: balance += credit - debit (credit-normal)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::AccountType;

/// Which side of an entry increases an account's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalBalance {
    /// Debit-normal accounts (Asset, Expense)
    DebitNormal,
    /// Credit-normal accounts (Liability, Equity, Revenue)
    CreditNormal,
}

impl NormalBalance {
    /// Determines the normal side for an account type.
    #[must_use]
    pub const fn for_account_type(account_type: AccountType) -> Self {
        match account_type {
            AccountType::Asset | AccountType::Expense => Self::DebitNormal,
            AccountType::Liability | AccountType::Equity | AccountType::Revenue => {
                Self::CreditNormal
            }
        }
    }

    /// Calculates the balance change for an entry.
    #[must_use]
    pub fn calculate_balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::DebitNormal => debit - credit,
            Self::CreditNormal => credit - debit,
        }
    }
}

/// Signed effect of posting `debit`/`credit` against an account of `account_type`.
#[must_use]
pub fn balance_change(account_type: AccountType, debit: Decimal, credit: Decimal) -> Decimal {
    NormalBalance::for_account_type(account_type).calculate_balance_change(debit, credit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(AccountType::Asset, dec!(100), dec!(0), dec!(100))]
    #[case(AccountType::Asset, dec!(0), dec!(40), dec!(-40))]
    #[case(AccountType::Expense, dec!(250.50), dec!(0), dec!(250.50))]
    #[case(AccountType::Liability, dec!(0), dec!(300), dec!(300))]
    #[case(AccountType::Liability, dec!(75), dec!(0), dec!(-75))]
    #[case(AccountType::Equity, dec!(0), dec!(1000), dec!(1000))]
    #[case(AccountType::Revenue, dec!(12450), dec!(0), dec!(-12450))]
    fn test_balance_change_sign_rule(
        #[case] account_type: AccountType,
        #[case] debit: Decimal,
        #[case] credit: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(balance_change(account_type, debit, credit), expected);
    }

    #[test]
    fn test_normal_balance_mapping() {
        assert_eq!(
            NormalBalance::for_account_type(AccountType::Asset),
            NormalBalance::DebitNormal
        );
        assert_eq!(
            NormalBalance::for_account_type(AccountType::Expense),
            NormalBalance::DebitNormal
        );
        assert_eq!(
            NormalBalance::for_account_type(AccountType::Revenue),
            NormalBalance::CreditNormal
        );
    }

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn account_type_strategy() -> impl Strategy<Value = AccountType> {
        prop_oneof![
            Just(AccountType::Asset),
            Just(AccountType::Liability),
            Just(AccountType::Equity),
            Just(AccountType::Revenue),
            Just(AccountType::Expense),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Debit-normal and credit-normal changes are mirror images.
        #[test]
        fn prop_sides_are_opposite(debit in amount_strategy(), credit in amount_strategy()) {
            prop_assert_eq!(
                NormalBalance::DebitNormal.calculate_balance_change(debit, credit),
                -NormalBalance::CreditNormal.calculate_balance_change(debit, credit)
            );
        }

        /// Folding a sequence of postings gives the same balance in any order.
        #[test]
        fn prop_balance_is_order_independent(
            account_type in account_type_strategy(),
            postings in prop::collection::vec((amount_strategy(), amount_strategy()), 1..40),
        ) {
            let forward: Decimal = postings
                .iter()
                .map(|(d, c)| balance_change(account_type, *d, *c))
                .sum();
            let backward: Decimal = postings
                .iter()
                .rev()
                .map(|(d, c)| balance_change(account_type, *d, *c))
                .sum();

            let total_debit: Decimal = postings.iter().map(|(d, _)| *d).sum();
            let total_credit: Decimal = postings.iter().map(|(_, c)| *c).sum();

            prop_assert_eq!(forward, backward);
            prop_assert_eq!(forward, balance_change(account_type, total_debit, total_credit));
        }
    }
}
