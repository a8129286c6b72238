//! Pre-built Test Fixtures
//!
//! Fixed dates and amounts so scenario tests produce predictable deadlines
//! and scores.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{ClaimId, Currency, DocumentId, Money, PartyId};
use domain_claims::{DocumentKind, DocumentMeta, Participant, PartyRole, WitnessStatement};

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    pub fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }

    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }

    /// Standard deductible on fixture policies
    pub fn deductible() -> Money {
        Money::new(dec!(500), Currency::USD)
    }

    /// Actual cash value of fixture vehicles
    pub fn vehicle_value() -> Money {
        Money::new(dec!(22000), Currency::USD)
    }

    /// A CAD amount for currency mismatch tests
    pub fn cad(amount: Decimal) -> Money {
        Money::new(amount, Currency::CAD)
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Policy inception (June 1, 2023)
    pub fn policy_start() -> NaiveDate {
        Self::date(2023, 6, 1)
    }

    /// Policy expiry (May 31, 2024)
    pub fn policy_end() -> NaiveDate {
        Self::date(2024, 5, 31)
    }

    /// Standard loss date, two days before the report
    pub fn loss_date() -> NaiveDate {
        Self::date(2024, 3, 8)
    }

    /// First notice of loss (March 10, 2024 09:00 UTC)
    pub fn reported_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()
    }

    /// Evaluation instant `days` after the report
    pub fn days_after_report(days: i64) -> DateTime<Utc> {
        Self::reported_at() + Duration::days(days)
    }

    /// Default evaluation instant, five days after the report
    pub fn as_of() -> DateTime<Utc> {
        Self::days_after_report(5)
    }

    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }
}

/// Fixture for identifiers
pub struct IdFixtures;

impl IdFixtures {
    /// Deterministic claim id for the `n`th fixture claim
    pub fn claim_id(n: u128) -> ClaimId {
        ClaimId::from_u128(0xC1A1_0000 + n)
    }
}

/// Fixture for claim participants and paperwork
pub struct PartyFixtures;

impl PartyFixtures {
    pub fn insured() -> Participant {
        Participant {
            party_id: PartyId::new(),
            role: PartyRole::Insured,
            name: "Dana Whitfield".to_string(),
            statement: None,
            insurance_carrier: Some("Open Mutual".to_string()),
            attorney_represented: false,
        }
    }

    pub fn other_party() -> Participant {
        Participant {
            party_id: PartyId::new(),
            role: PartyRole::OtherParty,
            name: "Lee Okafor".to_string(),
            statement: None,
            insurance_carrier: Some("Coastline Insurance".to_string()),
            attorney_represented: false,
        }
    }

    pub fn document(kind: DocumentKind) -> DocumentMeta {
        DocumentMeta {
            document_id: DocumentId::new(),
            kind,
            received_at: TemporalFixtures::reported_at() + Duration::hours(4),
        }
    }

    pub fn witness(at_fault: Option<PartyRole>) -> WitnessStatement {
        WitnessStatement {
            name: "Morgan Reyes".to_string(),
            identifies_at_fault: at_fault,
            statement: "I saw the collision from the crosswalk.".to_string(),
        }
    }
}
