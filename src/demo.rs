//! Banking walkthrough: branches encrypt balances, a central server sums
//! them blind, headquarters decrypts the aggregate.

use log::info;
use num_bigint::{BigInt, BigUint};

use crate::encoding::{div_round, FixedPoint};
use crate::error::{Error, Result};
use crate::keys::KeyGenerator;
use crate::roles::{Account, Aggregator, Branch, Headquarters};

const BRANCHES: &[(&str, &[(u32, &str, &str)])] = &[
    ("Branch-001", &[(1, "Alice Johnson", "5000.00"), (2, "Bob Smith", "12000.00"), (3, "Carol White", "8500.00")]),
    ("Branch-002", &[(4, "David Brown", "15000.00"), (5, "Eve Davis", "6500.00"), (6, "Frank Miller", "9800.00")]),
];

const INTEREST: &[(u32, &str, &str)] =
    &[(1, "Account A", "250.50"), (2, "Account B", "180.75"), (3, "Account C", "420.25")];

// 20% tax: keep 4/5
const TAX_KEEP_NUMERATOR: u32 = 4;
const TAX_KEEP_DENOMINATOR: i32 = 5;

/// Figures produced by [`run`], in minor units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub accounts:         usize,
    pub total_balance:    BigInt,
    pub average_balance:  BigInt,
    pub expected_average: BigInt,
    pub total_interest:   BigInt,
    pub after_tax:        BigInt,
}

impl Report {
    pub fn matches_plaintext(&self) -> bool {
        self.average_balance == self.expected_average
    }
}

/// Run both scenarios under a fresh keypair. Any failing step aborts the
/// run; nothing falls back to computing on plaintext.
pub fn run(generator: &KeyGenerator) -> Result<Report> {
    let cents = FixedPoint::CURRENCY;

    info!("generating {}-bit keypair", generator.bit_length());
    let (public_key, private_key) = generator.generate()?;
    let hq = Headquarters::new(public_key.clone(), private_key, cents)?;
    info!("public key distributed to branches; private key kept at headquarters");

    let mut branches = Vec::new();
    let mut expected_sum = BigInt::from(0);
    for (branch_id, accounts) in BRANCHES {
        let mut branch = Branch::new(*branch_id, public_key.clone());
        for (id, name, balance) in accounts.iter() {
            let balance = cents.parse(balance)?;
            expected_sum += &balance;
            branch.add_account(Account { id: *id, name: (*name).to_owned(), balance });
        }
        branches.push(branch);
    }
    let accounts: usize = branches.iter().map(|b| b.accounts().len()).sum();

    let mut server = Aggregator::new(public_key.clone());
    for branch in &branches {
        let submissions = branch.encrypt_balances()?;
        info!("{}: encrypted {} balances", branch.id(), submissions.len());
        for submission in submissions {
            server.submit(submission)?;
        }
    }
    if let Some(sample) = server.submissions().first() {
        let shown = sample.ciphertext.value().to_str_radix(16);
        info!("server sees {} as {}…", sample.producer, &shown[..shown.len().min(32)]);
    }

    let Some(total) = server.encrypted_total()? else {
        return Err(Error::EmptyAggregate);
    };
    info!("server combined {} ciphertexts without decrypting", total.count);

    let total_balance = hq.decrypt_total(&total)?;
    let average_balance = hq.average(&total)?;
    let expected_average = div_round(&expected_sum, &BigInt::from(accounts))
        .ok_or(Error::EmptyAggregate)?;
    info!(
        "headquarters: total {} over {} accounts, average {} (expected {})",
        cents.format(&total_balance),
        total.count,
        cents.format(&average_balance),
        cents.format(&expected_average),
    );

    let mut interest_branch = Branch::new("Interest", public_key.clone());
    for (id, name, amount) in INTEREST {
        interest_branch.add_account(Account { id: *id, name: (*name).to_owned(), balance: cents.parse(amount)? });
    }
    let mut interest_server = Aggregator::new(public_key);
    for submission in interest_branch.encrypt_balances()? {
        interest_server.submit(submission)?;
    }
    let Some(interest) = interest_server.encrypted_total()? else {
        return Err(Error::EmptyAggregate);
    };
    let total_interest = hq.decrypt_total(&interest)?;
    let scaled = interest.scaled(&BigUint::from(TAX_KEEP_NUMERATOR));
    let after_tax = hq.decrypt_ratio(&scaled, &BigInt::from(TAX_KEEP_DENOMINATOR))?;
    info!(
        "interest: total {}, after 20% tax {}",
        cents.format(&total_interest),
        cents.format(&after_tax),
    );

    Ok(Report { accounts, total_balance, average_balance, expected_average, total_interest, after_tax })
}
