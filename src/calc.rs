use crate::models::CategoryData;

/// One contributing line in a category result. The label/amount pairs are
/// fixed per category and render in this order.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub label: &'static str,
    pub amount: f64,
}

/// Signed category result with its breakdown. Costs show up as negative
/// amounts in the detail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calculation {
    pub result: f64,
    pub detail: Vec<DetailRow>,
}

/// Compute the result for a category's entered figures. No figures means a
/// zero result with no detail; this never fails.
pub fn calculate(data: Option<&CategoryData>) -> Calculation {
    let Some(data) = data else {
        return Calculation::default();
    };

    match data {
        CategoryData::Bank(d) => Calculation {
            result: d.interest - d.fees,
            detail: vec![
                DetailRow { label: "Interest", amount: d.interest },
                DetailRow { label: "Fees", amount: -d.fees },
            ],
        },
        CategoryData::Investments(d) => {
            // deposits are not gains, withdrawals are not losses
            let growth = d.end_value - d.begin_value - d.deposits + d.withdrawals;
            Calculation {
                result: growth + d.dividends - d.costs,
                detail: vec![
                    DetailRow { label: "Value growth", amount: growth },
                    DetailRow { label: "Dividends", amount: d.dividends },
                    DetailRow { label: "Costs", amount: -d.costs },
                ],
            }
        }
        CategoryData::RealEstate(d) => {
            // whichever is higher counts: actual rent or the imputed income
            let base = d.rent.max(d.imputed_income);
            Calculation {
                result: base - d.maintenance,
                detail: vec![
                    DetailRow { label: "Rent/imputed", amount: base },
                    DetailRow { label: "Maintenance", amount: -d.maintenance },
                ],
            }
        }
        CategoryData::Loans(d) => Calculation {
            result: d.interest_received - d.interest_paid,
            detail: vec![
                DetailRow { label: "Interest received", amount: d.interest_received },
                DetailRow { label: "Interest paid", amount: -d.interest_paid },
            ],
        },
        CategoryData::Crypto(d) => {
            let growth = d.end_value - d.begin_value;
            Calculation {
                result: growth + d.staking - d.fees,
                detail: vec![
                    DetailRow { label: "Value growth", amount: growth },
                    DetailRow { label: "Staking", amount: d.staking },
                    DetailRow { label: "Fees", amount: -d.fees },
                ],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BankData, CryptoData, InvestmentsData, LoansData, RealEstateData};

    #[test]
    fn test_no_data_is_zero_with_no_detail() {
        let calc = calculate(None);
        assert_eq!(calc.result, 0.0);
        assert!(calc.detail.is_empty());
    }

    #[test]
    fn test_bank_interest_minus_fees() {
        let data = CategoryData::Bank(BankData {
            interest: 245.0,
            fees: 18.0,
            ..Default::default()
        });
        let calc = calculate(Some(&data));
        assert_eq!(calc.result, 227.0);
        assert_eq!(calc.detail[0].label, "Interest");
        assert_eq!(calc.detail[0].amount, 245.0);
        assert_eq!(calc.detail[1].label, "Fees");
        assert_eq!(calc.detail[1].amount, -18.0);
    }

    #[test]
    fn test_investments_growth_ignores_cash_moves() {
        let data = CategoryData::Investments(InvestmentsData {
            begin_value: 55_000.0,
            end_value: 61_200.0,
            deposits: 4_000.0,
            withdrawals: 0.0,
            dividends: 820.0,
            costs: 120.0,
            ..Default::default()
        });
        let calc = calculate(Some(&data));
        assert_eq!(calc.detail[0].amount, 2_200.0);
        assert_eq!(calc.result, 2_900.0);
    }

    #[test]
    fn test_real_estate_takes_imputed_when_higher() {
        let data = CategoryData::RealEstate(RealEstateData {
            rent: 9_500.0,
            imputed_income: 14_238.0,
            maintenance: 2_100.0,
            ..Default::default()
        });
        let calc = calculate(Some(&data));
        assert_eq!(calc.detail[0].amount, 14_238.0);
        assert_eq!(calc.result, 12_138.0);
    }

    #[test]
    fn test_real_estate_takes_rent_when_higher() {
        let data = CategoryData::RealEstate(RealEstateData {
            rent: 20_000.0,
            imputed_income: 14_238.0,
            maintenance: 500.0,
            ..Default::default()
        });
        let calc = calculate(Some(&data));
        assert_eq!(calc.result, 19_500.0);
    }

    #[test]
    fn test_loans_nets_interest_both_ways() {
        let data = CategoryData::Loans(LoansData {
            interest_received: 300.0,
            interest_paid: 120.0,
            ..Default::default()
        });
        assert_eq!(calculate(Some(&data)).result, 180.0);
    }

    #[test]
    fn test_crypto_growth_plus_staking_minus_fees() {
        let data = CategoryData::Crypto(CryptoData {
            begin_value: 6_000.0,
            end_value: 8_500.0,
            staking: 120.0,
            fees: 20.0,
            ..Default::default()
        });
        let calc = calculate(Some(&data));
        assert_eq!(calc.result, 2_600.0);
        assert_eq!(calc.detail[0].amount, 2_500.0);
    }

    #[test]
    fn test_result_can_go_negative() {
        let data = CategoryData::Bank(BankData {
            interest: 5.0,
            fees: 60.0,
            ..Default::default()
        });
        assert_eq!(calculate(Some(&data)).result, -55.0);
    }
}
